//! The response envelope wrapped around every gateway reply.
//!
//! ```json
//! { "status": "ok", "retcode": 0, "data": { ... }, "msg": null }
//! ```
//!
//! Only `status` decides success. `retcode`, `msg` and `wording` are kept for
//! diagnostics when the gateway declines an action.

use serde_json::Value;

use cqhttp_core::{ActionError, ActionResult};

/// A decoded gateway reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// `"ok"`, `"async"` or `"failed"`; empty if the gateway sent none.
    pub status: String,
    /// Gateway return code, when present.
    pub retcode: Option<i64>,
    /// Action-specific payload; `null` when absent.
    pub data: Value,
    /// Error description (`msg`, falling back to `wording`).
    pub message: Option<String>,
}

impl ApiResponse {
    /// Reads the envelope fields out of a decoded body.
    ///
    /// A body that is not a JSON object yields an envelope with an empty
    /// status, which is never ok.
    pub fn from_value(body: Value) -> Self {
        let Value::Object(mut map) = body else {
            return Self {
                status: String::new(),
                retcode: None,
                data: Value::Null,
                message: None,
            };
        };
        let text = |v: Option<&Value>| v.and_then(Value::as_str).map(str::to_string);
        Self {
            status: text(map.get("status")).unwrap_or_default(),
            retcode: map.get("retcode").and_then(Value::as_i64),
            message: text(map.get("msg")).or_else(|| text(map.get("wording"))),
            data: map.remove("data").unwrap_or(Value::Null),
        }
    }

    /// Checks if the gateway accepted the action.
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    /// Converts the envelope into its `data` payload or a rejection.
    pub fn into_data(self, action: &str) -> ActionResult<Value> {
        if self.is_ok() {
            Ok(self.data)
        } else {
            Err(ActionError::Rejected {
                action: action.to_string(),
                status: self.status,
                retcode: self.retcode,
                message: self.message,
            })
        }
    }
}

/// Loose truthiness of a JSON value.
///
/// `false`, `0`, `""`, `null`, `[]` and `{}` are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_yields_data() {
        let resp = ApiResponse::from_value(json!({
            "status": "ok",
            "retcode": 0,
            "data": { "message_id": 42 }
        }));
        assert!(resp.is_ok());
        assert_eq!(
            resp.into_data("send_group_msg").unwrap(),
            json!({ "message_id": 42 })
        );
    }

    #[test]
    fn test_missing_data_is_null() {
        let resp = ApiResponse::from_value(json!({ "status": "ok" }));
        assert_eq!(resp.into_data("set_group_kick").unwrap(), Value::Null);
    }

    #[test]
    fn test_non_ok_envelope_is_rejected() {
        let resp = ApiResponse::from_value(json!({
            "status": "failed",
            "retcode": 100,
            "wording": "group not found"
        }));
        match resp.into_data("get_group_info").unwrap_err() {
            ActionError::Rejected {
                action,
                status,
                retcode,
                message,
            } => {
                assert_eq!(action, "get_group_info");
                assert_eq!(status, "failed");
                assert_eq!(retcode, Some(100));
                assert_eq!(message.as_deref(), Some("group not found"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_body_is_never_ok() {
        assert!(!ApiResponse::from_value(json!(["ok"])).is_ok());
        assert!(!ApiResponse::from_value(json!({ "status": "OK" })).is_ok());
        assert!(!ApiResponse::from_value(json!({ "status": true })).is_ok());
    }

    #[test]
    fn test_truthiness() {
        for v in [json!(true), json!(1), json!("yes"), json!([0]), json!({ "a": 1 })] {
            assert!(is_truthy(&v), "{v} should be truthy");
        }
        for v in [json!(false), json!(0), json!(0.0), json!(""), json!(null), json!([]), json!({})] {
            assert!(!is_truthy(&v), "{v} should be falsy");
        }
    }
}
