//! Declarative action filtering shared by all adapters.

use crate::models::{Action, Payload};
use std::collections::BTreeSet;

/// Which actions an adapter accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionFilter {
    /// Every payload, whatever its action
    Any,
    /// Only payloads whose effective action string is in the set
    Only(BTreeSet<String>),
}

/// Allowed actions plus the action assumed when a payload carries none
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPolicy {
    filter: ActionFilter,
    default_action: Action,
}

impl ActionPolicy {
    pub fn new(filter: ActionFilter, default_action: Action) -> Self {
        Self {
            filter,
            default_action,
        }
    }

    /// Single-action services: only `created` events.
    pub fn created_only() -> Self {
        Self::only([Action::Created.as_str()])
    }

    /// No filtering at all.
    pub fn any() -> Self {
        Self::new(ActionFilter::Any, Action::Created)
    }

    /// Allow-list of action names. Names outside [`Action`] are matched as given.
    pub fn only<S: Into<String>>(actions: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            ActionFilter::Only(actions.into_iter().map(Into::into).collect()),
            Action::Created,
        )
    }

    /// Policy from an optional allow-list; `None` keeps the legacy `created`-only behavior.
    pub fn from_allow_list(actions: Option<&[String]>) -> Self {
        match actions {
            Some(actions) => Self::only(actions.iter().cloned()),
            None => Self::created_only(),
        }
    }

    pub fn default_action(&self) -> Action {
        self.default_action
    }

    pub fn filter(&self) -> &ActionFilter {
        &self.filter
    }

    /// Whether `payload` should be forwarded under this policy.
    pub fn permits(&self, payload: &Payload) -> bool {
        match &self.filter {
            ActionFilter::Any => true,
            ActionFilter::Only(allowed) => payload
                .effective_action(self.default_action.as_str())
                .is_some_and(|action| allowed.contains(action)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload_with(action: Option<&str>) -> Payload {
        match action {
            Some(action) => Payload::from_value(json!({"action": action})).unwrap(),
            None => Payload::default(),
        }
    }

    #[test]
    fn test_created_only() {
        let policy = ActionPolicy::created_only();
        assert!(policy.permits(&payload_with(None)));
        assert!(policy.permits(&payload_with(Some("created"))));
        assert!(!policy.permits(&payload_with(Some("updated"))));
        assert!(!policy.permits(&payload_with(Some("deleted"))));
        assert!(!policy.permits(&payload_with(Some("archived"))));
    }

    #[test]
    fn test_any_permits_unknown_actions() {
        let policy = ActionPolicy::any();
        assert!(policy.permits(&payload_with(Some("archived"))));
        assert!(policy.permits(&payload_with(None)));
    }

    fn allow_list(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_allow_list() {
        let names = allow_list(&["updated", "deleted"]);
        let policy = ActionPolicy::from_allow_list(Some(names.as_slice()));
        assert!(!policy.permits(&payload_with(None)));
        assert!(!policy.permits(&payload_with(Some("created"))));
        assert!(policy.permits(&payload_with(Some("updated"))));
        assert!(policy.permits(&payload_with(Some("deleted"))));
    }

    #[test]
    fn test_missing_allow_list_is_legacy() {
        assert_eq!(ActionPolicy::from_allow_list(None), ActionPolicy::created_only());
    }

    #[test]
    fn test_empty_allow_list_permits_nothing() {
        let policy = ActionPolicy::from_allow_list(Some(&[]));
        for action in [None, Some("created"), Some("updated"), Some("deleted")] {
            assert!(!policy.permits(&payload_with(action)));
        }
    }

    #[test]
    fn test_allow_list_matches_names_outside_known_actions() {
        let names = allow_list(&["created", "commented"]);
        let policy = ActionPolicy::from_allow_list(Some(names.as_slice()));
        assert!(policy.permits(&payload_with(Some("commented"))));
        assert!(policy.permits(&payload_with(None)));
        assert!(!policy.permits(&payload_with(Some("Commented"))));
        assert!(!policy.permits(&payload_with(Some("updated"))));
    }

    #[test]
    fn test_explicit_null_action_matches_no_allow_list() {
        let null_action = Payload::from_value(json!({"action": null})).unwrap();
        let names = allow_list(&["created"]);
        assert!(!ActionPolicy::created_only().permits(&null_action));
        assert!(!ActionPolicy::from_allow_list(Some(names.as_slice())).permits(&null_action));
        assert!(ActionPolicy::any().permits(&null_action));
    }

    #[test]
    fn test_default_action_is_used_when_absent() {
        let policy = ActionPolicy::new(
            ActionFilter::Only(["updated".to_string()].into_iter().collect()),
            Action::Updated,
        );
        assert!(policy.permits(&payload_with(None)));
        assert_eq!(policy.default_action(), Action::Updated);
    }
}
