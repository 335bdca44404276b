use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ProcedureError;

/// A REST response value produced exactly once per request.
///
/// `body: None` means no body is emitted at all; `Some(Value::Null)` is a
/// legitimate JSON `null` body. The two must never be conflated.
///
/// The response carries no transport headers: the outbound surface is always
/// the status line plus `Content-Type: application/json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// HTTP status code.
    pub code: u16,
    /// Status reason phrase.
    pub text: String,
    /// JSON body, absent when nothing should be emitted.
    pub body: Option<Value>,
}

impl Response {
    /// Build a response with a body.
    #[must_use]
    pub fn new(code: u16, text: &str, body: Value) -> Self {
        Self {
            code,
            text: text.to_string(),
            body: Some(body),
        }
    }

    /// Build a response without a body.
    #[must_use]
    pub fn empty(code: u16, text: &str) -> Self {
        Self {
            code,
            text: text.to_string(),
            body: None,
        }
    }

    /// Render the status line for the given protocol, e.g.
    /// `HTTP/1.1 404 Not Found`.
    #[must_use]
    pub fn status_line(&self, protocol: &str) -> String {
        format!("{protocol} {} {}", self.code, self.text)
    }

    /// Serialize the body to JSON bytes, or `None` when there is no body.
    #[must_use]
    pub fn body_bytes(&self) -> Option<Vec<u8>> {
        self.body.as_ref().and_then(|b| serde_json::to_vec(b).ok())
    }
}

/// `200 OK` with a body.
#[must_use]
pub fn ok(body: Value) -> Response {
    Response::new(200, "OK", body)
}

/// `201 Created` with a body.
#[must_use]
pub fn created(body: Value) -> Response {
    Response::new(201, "Created", body)
}

/// `204 No Content`.
#[must_use]
pub fn no_content() -> Response {
    Response::empty(204, "No Content")
}

/// `400 Bad Request` with a body.
#[must_use]
pub fn bad_request(body: Value) -> Response {
    Response::new(400, "Bad Request", body)
}

/// `403 Forbidden` with a body.
#[must_use]
pub fn forbidden(body: Value) -> Response {
    Response::new(403, "Forbidden", body)
}

/// `404 Not Found`.
#[must_use]
pub fn not_found() -> Response {
    Response::empty(404, "Not Found")
}

/// `405 Method Not Allowed`.
#[must_use]
pub fn method_not_allowed() -> Response {
    Response::empty(405, "Method Not Allowed")
}

/// `500 Internal Server Error` with a body.
#[must_use]
pub fn internal_server_error(body: Value) -> Response {
    Response::new(500, "Internal Server Error", body)
}

/// `500 Internal Server Error` with no body. Reserved for configuration
/// defects where no failure detail exists to serialize.
#[must_use]
pub fn internal_server_error_empty() -> Response {
    Response::empty(500, "Internal Server Error")
}

/// Shape a failure into a transport body.
///
/// This is the single place failure detail is prepared for callers. The
/// `trace` and `debuginfo` keys exist only in verbose mode; production
/// responses never include them.
#[must_use]
pub fn serialize_failure(err: &ProcedureError, verbose: bool) -> Value {
    let mut data = Map::new();
    data.insert(
        "exception".to_string(),
        Value::String(err.kind.as_str().to_string()),
    );
    data.insert(
        "errorcode".to_string(),
        err.error_code
            .as_ref()
            .map_or(Value::Null, |c| Value::String(c.clone())),
    );
    data.insert("message".to_string(), Value::String(err.message.clone()));
    if verbose {
        data.insert(
            "trace".to_string(),
            err.trace
                .as_ref()
                .map_or(Value::Null, |t| Value::String(t.clone())),
        );
        data.insert(
            "debuginfo".to_string(),
            err.debug_info
                .as_ref()
                .map_or(Value::Null, |d| Value::String(d.clone())),
        );
    }
    Value::Object(data)
}

/// `400 Bad Request` carrying a serialized failure.
#[must_use]
pub fn bad_request_from_error(err: &ProcedureError, verbose: bool) -> Response {
    bad_request(serialize_failure(err, verbose))
}

/// `403 Forbidden` carrying a serialized failure.
#[must_use]
pub fn forbidden_from_error(err: &ProcedureError, verbose: bool) -> Response {
    forbidden(serialize_failure(err, verbose))
}

/// `500 Internal Server Error` carrying a serialized failure.
#[must_use]
pub fn internal_server_error_from_error(err: &ProcedureError, verbose: bool) -> Response {
    internal_server_error(serialize_failure(err, verbose))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_vs_null_body() {
        let empty = no_content();
        let null_body = ok(Value::Null);
        assert!(empty.body.is_none());
        assert_eq!(null_body.body, Some(Value::Null));
        assert!(empty.body_bytes().is_none());
        assert_eq!(null_body.body_bytes(), Some(b"null".to_vec()));
    }

    #[test]
    fn test_status_line() {
        let resp = not_found();
        assert_eq!(resp.status_line("HTTP/1.1"), "HTTP/1.1 404 Not Found");
    }

    #[test]
    fn test_serialize_failure_terse() {
        let err = ProcedureError::application("boom")
            .with_code("oops")
            .with_trace("at line 1")
            .with_debug_info("secret detail");
        let body = serialize_failure(&err, false);
        assert_eq!(
            body,
            json!({"exception": "application", "errorcode": "oops", "message": "boom"})
        );
    }

    #[test]
    fn test_serialize_failure_verbose() {
        let err = ProcedureError::application("boom").with_trace("at line 1");
        let body = serialize_failure(&err, true);
        assert_eq!(body["trace"], json!("at line 1"));
        assert_eq!(body["debuginfo"], Value::Null);
        assert_eq!(body["errorcode"], Value::Null);
    }
}
