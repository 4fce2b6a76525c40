//! Entitlement state snapshot.

use serde::Serialize;
use serde_json::Value;

/// Last-known entitlement of the client's credential.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntitlementState {
    /// Whether the last successful check reported an entitlement.
    pub is_entitled: bool,

    /// When the last successful check happened, in epoch milliseconds.
    /// Zero until the first success.
    pub last_checked_at_millis: i64,

    /// Raw body of the last successful check.
    pub last_response: Option<Value>,
}

impl EntitlementState {
    /// Whether a positive result is still within `ttl_millis` of `now_millis`.
    pub fn is_fresh(&self, now_millis: i64, ttl_millis: i64) -> bool {
        self.is_entitled && now_millis - self.last_checked_at_millis < ttl_millis
    }
}

/// A subscribe response grants entitlement when `subscribed` is `true` or
/// `plan` is `"pro"`.
pub fn is_entitled_response(body: &Value) -> bool {
    body.get("subscribed") == Some(&Value::Bool(true))
        || body.get("plan").and_then(Value::as_str) == Some("pro")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initial_state() {
        let state = EntitlementState::default();
        assert!(!state.is_entitled);
        assert_eq!(state.last_checked_at_millis, 0);
        assert!(state.last_response.is_none());
    }

    #[test]
    fn test_entitled_responses() {
        assert!(is_entitled_response(&json!({"subscribed": true})));
        assert!(is_entitled_response(&json!({"subscribed": false, "plan": "pro"})));
        assert!(!is_entitled_response(&json!({"subscribed": "true"})));
        assert!(!is_entitled_response(&json!({"plan": "free"})));
        assert!(!is_entitled_response(&json!([])));
    }

    #[test]
    fn test_freshness() {
        let state = EntitlementState {
            is_entitled: true,
            last_checked_at_millis: 1_000,
            last_response: None,
        };
        assert!(state.is_fresh(1_500, 1_000));
        assert!(!state.is_fresh(2_000, 1_000));

        let not_entitled = EntitlementState {
            is_entitled: false,
            ..state
        };
        assert!(!not_entitled.is_fresh(1_001, 1_000));
    }
}
