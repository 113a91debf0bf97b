//! JSON-RPC 2.0 helpers for the MCP stdio protocol.

use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Standard JSON-RPC error codes
pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// Thread-safe JSON-RPC request ID generator.
pub struct RequestIdGenerator {
    counter: AtomicU64,
}

impl RequestIdGenerator {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(1),
        }
    }

    /// Generate the next request ID.
    pub fn next_id(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for RequestIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RequestIdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestIdGenerator")
            .field("counter", &self.counter.load(Ordering::SeqCst))
            .finish()
    }
}

/// A JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for RpcError {}

/// Build a JSON-RPC 2.0 request.
pub fn build_request(id: u64, method: &str, params: Value) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

/// Build a JSON-RPC 2.0 response.
pub fn build_response(id: Value, result: Value) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

/// Build a JSON-RPC 2.0 error response.
pub fn build_error_response(id: Value, code: i64, message: &str) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message,
        },
    })
}

/// Extract error code and message from a JSON-RPC response, if present.
pub fn extract_error(resp: &Value) -> Option<RpcError> {
    let err = resp.get("error")?;
    let code = err.get("code").and_then(|v| v.as_i64()).unwrap_or(-1);
    let message = err
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown error");
    Some(RpcError::new(code, message))
}

/// Shape of an incoming line, after parsing
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    /// Call that expects a response
    Request {
        id: Value,
        method: String,
        params: Value,
    },
    /// Fire-and-forget message
    Notification { method: String },
    /// Reply to a request this side sent
    Response { id: Option<u64>, message: Value },
}

/// Classify a parsed JSON-RPC message.
///
/// Returns an error response payload for messages that are none of the
/// three shapes.
pub fn classify(msg: Value) -> Result<Incoming, RpcError> {
    if !msg.is_object() {
        return Err(RpcError::new(INVALID_REQUEST, "Invalid Request"));
    }

    let method = msg.get("method").and_then(|v| v.as_str()).map(str::to_string);
    let id = msg.get("id").filter(|v| !v.is_null()).cloned();

    match (method, id) {
        (Some(method), Some(id)) => Ok(Incoming::Request {
            id,
            method,
            params: msg.get("params").cloned().unwrap_or(Value::Null),
        }),
        (Some(method), None) => Ok(Incoming::Notification { method }),
        (None, Some(id)) if msg.get("result").is_some() || msg.get("error").is_some() => {
            Ok(Incoming::Response {
                id: id.as_u64(),
                message: msg,
            })
        }
        _ => Err(RpcError::new(INVALID_REQUEST, "Invalid Request")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_request_with_correct_format() {
        let req = build_request(1, "elicitation/create", json!({"message": "hi"}));
        assert_eq!(req["jsonrpc"], "2.0");
        assert_eq!(req["id"], 1);
        assert_eq!(req["method"], "elicitation/create");
        assert_eq!(req["params"]["message"], "hi");
    }

    #[test]
    fn test_build_response_keeps_string_ids() {
        let resp = build_response(json!("abc"), json!({"status": "ok"}));
        assert_eq!(resp["id"], "abc");
        assert_eq!(resp["result"]["status"], "ok");
    }

    #[test]
    fn test_extract_error_from_error_response() {
        let resp = build_error_response(json!(1), INVALID_PARAMS, "bad");
        assert_eq!(extract_error(&resp), Some(RpcError::new(-32602, "bad")));
        assert!(extract_error(&build_response(json!(1), json!({}))).is_none());
    }

    #[test]
    fn test_classify_messages() {
        let request = json!({"jsonrpc": "2.0", "id": 7, "method": "ping"});
        assert_eq!(
            classify(request).unwrap(),
            Incoming::Request {
                id: json!(7),
                method: "ping".to_string(),
                params: Value::Null
            }
        );

        let notification = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        assert!(matches!(
            classify(notification).unwrap(),
            Incoming::Notification { .. }
        ));

        let response = json!({"jsonrpc": "2.0", "id": 3, "result": {}});
        assert!(matches!(
            classify(response).unwrap(),
            Incoming::Response { id: Some(3), .. }
        ));
    }

    #[test]
    fn test_classify_rejects_malformed_messages() {
        assert_eq!(classify(json!([1, 2])).unwrap_err().code, INVALID_REQUEST);
        assert_eq!(classify(json!({"id": 1})).unwrap_err().code, INVALID_REQUEST);
    }

    #[test]
    fn test_generate_sequential_ids() {
        let id_gen = RequestIdGenerator::new();
        assert_eq!(id_gen.next_id(), 1);
        assert_eq!(id_gen.next_id(), 2);
    }
}
