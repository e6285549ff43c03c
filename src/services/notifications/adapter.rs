//! Core notification adapter trait and types.
//!
//! Every destination (Flowdock, HipChat, Slack, generic webhook) implements
//! [`NotificationAdapter`]. Adapters are configured once and reused; an
//! adapter whose required options are missing is permanently disabled and
//! never touches the network.

use super::action_policy::ActionPolicy;
use crate::error::{AppError, AppResult};
use crate::external::{HttpTransport, OutboundRequest};
use crate::models::Payload;
use async_trait::async_trait;
use serde::Serialize;

/// Why a payload was not delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Required configuration is missing
    Disabled,
    /// The payload's action is not forwarded by this adapter
    ActionFiltered,
}

/// Result of a successful `send`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SendOutcome {
    Delivered { requests: usize },
    Skipped { reason: SkipReason },
}

impl SendOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        SendOutcome::Skipped { reason }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered { .. })
    }
}

/// Trait for notification adapters
///
/// # Example Implementation
/// ```ignore
/// #[async_trait]
/// impl NotificationAdapter for FlowdockAdapter {
///     async fn send(&self, payload: &Payload) -> AppResult<SendOutcome> {
///         // Implementation here
///     }
///
///     fn name(&self) -> &'static str {
///         "flowdock"
///     }
///
///     fn missing_option(&self) -> Option<&'static str> {
///         self.state.missing()
///     }
/// }
/// ```
#[async_trait]
pub trait NotificationAdapter: Send + Sync {
    /// Forwards the payload if this adapter is enabled and accepts its action
    ///
    /// Skips are reported as `Ok(SendOutcome::Skipped { .. })`. Errors are
    /// only returned for transport failures and non-success responses.
    async fn send(&self, payload: &Payload) -> AppResult<SendOutcome>;

    /// Returns the adapter name for logging
    fn name(&self) -> &'static str;

    /// First required option that was missing at configuration time
    fn missing_option(&self) -> Option<&'static str>;

    /// Whether the adapter was configured with every required option
    fn is_enabled(&self) -> bool {
        self.missing_option().is_none()
    }
}

/// Configured-or-disabled state, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AdapterState<T> {
    Configured(T),
    Disabled { missing: &'static str },
}

impl<T> AdapterState<T> {
    pub(crate) fn target(&self) -> Option<&T> {
        match self {
            AdapterState::Configured(target) => Some(target),
            AdapterState::Disabled { .. } => None,
        }
    }

    pub(crate) fn missing(&self) -> Option<&'static str> {
        match self {
            AdapterState::Configured(_) => None,
            AdapterState::Disabled { missing } => Some(missing),
        }
    }
}

/// A required string option: blank values count as missing.
pub(crate) fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

/// A required option kept exactly as configured; only blank counts as missing.
pub(crate) fn verbatim(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .map(String::from)
}

/// Submits one request and turns transport problems into [`AppError`]s.
pub(crate) async fn submit(
    transport: &dyn HttpTransport,
    service: &'static str,
    request: &OutboundRequest,
) -> AppResult<()> {
    let response = transport
        .submit(request)
        .await
        .map_err(|source| AppError::Transport {
            service: service.to_string(),
            url: redact(&request.url),
            source,
        })?;

    if !response.is_success() {
        return Err(AppError::Delivery {
            service: service.to_string(),
            url: redact(&request.url),
            status: response.status,
        });
    }

    tracing::info!(
        service = service,
        url = %redact(&request.url),
        status = response.status,
        "Notification delivered"
    );
    Ok(())
}

/// Drops the query string so tokens passed as parameters stay out of logs.
pub(crate) fn redact(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{}?…", base),
        None => url.to_string(),
    }
}

/// Returns the configured target when `payload` should be delivered,
/// otherwise the skip outcome to report.
///
/// Configuration is checked before the action filter.
pub(crate) fn admit<'a, T>(
    service: &'static str,
    state: &'a AdapterState<T>,
    policy: &ActionPolicy,
    payload: &Payload,
) -> Result<&'a T, SendOutcome> {
    let reason = match state.target() {
        None => SkipReason::Disabled,
        Some(_) if !policy.permits(payload) => SkipReason::ActionFiltered,
        Some(target) => return Ok(target),
    };

    tracing::debug!(
        service = service,
        action = payload.action().unwrap_or("<none>"),
        missing = state.missing(),
        reason = ?reason,
        "Notification skipped"
    );
    Err(SendOutcome::skipped(reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::testing::RecordingTransport;

    #[test]
    fn test_required_treats_blank_as_missing() {
        assert_eq!(required(&None), None);
        assert_eq!(required(&Some("".to_string())), None);
        assert_eq!(required(&Some("   ".to_string())), None);
        assert_eq!(required(&Some(" tok ".to_string())), Some("tok".to_string()));
    }

    #[test]
    fn test_verbatim_keeps_surrounding_whitespace() {
        assert_eq!(verbatim(&None), None);
        assert_eq!(verbatim(&Some(" \t".to_string())), None);
        assert_eq!(
            verbatim(&Some(" http://sprint.ly ".to_string())),
            Some(" http://sprint.ly ".to_string())
        );
    }

    #[test]
    fn test_adapter_state() {
        let configured = AdapterState::Configured(1);
        assert_eq!(configured.target(), Some(&1));
        assert_eq!(configured.missing(), None);

        let disabled: AdapterState<i32> = AdapterState::Disabled { missing: "url" };
        assert_eq!(disabled.target(), None);
        assert_eq!(disabled.missing(), Some("url"));
    }

    #[test]
    fn test_redact_strips_query() {
        assert_eq!(
            redact("https://api.hipchat.com/v2/room/1/notification?auth_token=secret"),
            "https://api.hipchat.com/v2/room/1/notification?…"
        );
        assert_eq!(redact("http://sprint.ly"), "http://sprint.ly");
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(SendOutcome::Delivered { requests: 2 }).unwrap();
        assert_eq!(json, serde_json::json!({"status": "delivered", "requests": 2}));

        let json = serde_json::to_value(SendOutcome::skipped(SkipReason::ActionFiltered)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "skipped", "reason": "action_filtered"})
        );
    }

    #[test]
    fn test_admit_checks_configuration_first() {
        let payload = Payload::from_value(serde_json::json!({"action": "updated"})).unwrap();
        let disabled: AdapterState<()> = AdapterState::Disabled { missing: "url" };
        assert_eq!(
            admit("test", &disabled, &ActionPolicy::created_only(), &payload),
            Err(SendOutcome::skipped(SkipReason::Disabled))
        );

        let configured = AdapterState::Configured(5);
        assert_eq!(
            admit("test", &configured, &ActionPolicy::created_only(), &payload),
            Err(SendOutcome::skipped(SkipReason::ActionFiltered))
        );
        assert_eq!(
            admit("test", &configured, &ActionPolicy::any(), &payload),
            Ok(&5)
        );
    }

    #[tokio::test]
    async fn test_submit_maps_status_to_delivery_error() {
        let transport = RecordingTransport::new().with_status("http://down", 503);
        let err = submit(&transport, "webhook", &OutboundRequest::post("http://down"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Delivery { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_submit_maps_connection_error() {
        let transport = RecordingTransport::new().failing_for("http://gone");
        let err = submit(&transport, "webhook", &OutboundRequest::post("http://gone"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transport { .. }));
    }
}
