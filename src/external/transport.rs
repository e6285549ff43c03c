//! Outbound HTTP abstraction used by the notification adapters.
//!
//! Adapters build an [`OutboundRequest`] and hand it to an [`HttpTransport`].
//! The transport is injected at construction, so tests can substitute a
//! recording implementation for the real client.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

/// A fully built request, ready for submission
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl OutboundRequest {
    /// Starts a POST request to `url`; the URL is kept verbatim.
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets a JSON body and the matching content type.
    pub fn json(self, body: Value) -> Self {
        let mut request = self.header("Content-Type", "application/json");
        request.body = Some(body);
        request
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// What came back from a submitted request; bodies are not inspected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Submits built requests
///
/// Implementations own connection pooling and timeouts. An `Err` means the
/// request never produced a response (DNS, connect, TLS, timeout).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn submit(&self, request: &OutboundRequest) -> anyhow::Result<TransportResponse>;
}
