//! HTTP response type.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::RouterError;

/// The uniform error object written for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorBody {
    /// HTTP status code, repeated in the body.
    pub code: u16,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorBody {
    /// Creates a new error body.
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Renders the body as JSON bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }
}

/// An HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a new response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Creates a response carrying an [`ErrorBody`].
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::new(status)
            .header("Content-Type", "application/json")
            .body(ErrorBody::new(status, message).to_bytes())
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the body as a string.
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    /// Parses the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

impl From<RouterError> for Response {
    /// Renders a routing failure with its status; a 405 also carries `Allow`.
    fn from(err: RouterError) -> Self {
        let res = Self::error(err.status(), err.to_string());
        match err {
            RouterError::MethodNotAllowed { allowed, .. } => {
                res.header("Allow", allowed.join(","))
            }
            _ => res,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_wire_shape() {
        let res = Response::error(400, "invalid id");
        assert_eq!(res.status, 400);
        assert_eq!(
            res.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        let value: serde_json::Value = res.json().unwrap();
        assert_eq!(value, serde_json::json!({"Code": 400, "Message": "invalid id"}));
        let body: ErrorBody = res.json().unwrap();
        assert_eq!(body, ErrorBody::new(400, "invalid id"));
    }

    #[test]
    fn test_method_not_allowed_header() {
        let res = Response::from(RouterError::MethodNotAllowed {
            method: "PUT".to_string(),
            path: "/abc".to_string(),
            allowed: vec!["GET".to_string(), "POST".to_string()],
        });
        assert_eq!(res.status, 405);
        assert_eq!(res.headers.get("Allow"), Some(&"GET,POST".to_string()));
        let body: ErrorBody = res.json().unwrap();
        assert_eq!(body, ErrorBody::new(405, "method not allowed: PUT for /abc"));
    }

    #[test]
    fn test_not_found_from_error() {
        let res = Response::from(RouterError::NotFound {
            method: "GET".to_string(),
            path: "/zzz".to_string(),
        });
        assert_eq!(res.status, 404);
        assert!(!res.headers.contains_key("Allow"));
        let body: ErrorBody = res.json().unwrap();
        assert_eq!(body, ErrorBody::new(404, "no route matched: GET /zzz"));
    }

    #[test]
    fn test_error_body_bytes_match_serde() {
        let body = ErrorBody::new(400, "bad \"id\"");
        assert_eq!(body.to_bytes(), br#"{"Code":400,"Message":"bad \"id\""}"#.to_vec());
    }

    #[test]
    fn test_response_builder() {
        let res = Response::new(200).header("X-Custom", "value").body("Hello");

        assert_eq!(res.status, 200);
        assert_eq!(res.headers.get("X-Custom"), Some(&"value".to_string()));
        assert_eq!(res.body_string(), Some("Hello".to_string()));
    }
}
