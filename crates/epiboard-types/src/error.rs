//! Error taxonomy at the API-client boundary
//!
//! Every call returns `ApiResult<T>`: pages branch on the closed set of
//! [`ApiErrorKind`] instead of probing response shapes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of failure classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiErrorKind {
    /// 401/403: intercepted globally, forces logout
    Auth,
    /// Other 4xx: the request itself was rejected
    Validation,
    /// 5xx or an undecodable success body
    Server,
    /// Transport failure, no HTTP response
    Network,
}

impl ApiErrorKind {
    fn fallback_message(&self) -> &'static str {
        match self {
            ApiErrorKind::Auth => "Session expired, please log in again",
            ApiErrorKind::Validation => "The request was rejected",
            ApiErrorKind::Server => "Failed to load data. Please try again later.",
            ApiErrorKind::Network => "Unable to reach the server",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, format!("Network error: {}", message.into()))
    }

    /// Success status but the payload did not match the expected shape
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(
            ApiErrorKind::Server,
            format!("Invalid response: {}", message.into()),
        )
    }

    /// Classify a non-success HTTP response, keeping the server's message when present
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            401 | 403 => ApiErrorKind::Auth,
            400..=499 => ApiErrorKind::Validation,
            _ => ApiErrorKind::Server,
        };
        let message =
            detail_message(body).unwrap_or_else(|| kind.fallback_message().to_string());
        Self {
            kind,
            status: Some(status),
            message,
        }
    }

    pub fn is_auth(&self) -> bool {
        self.kind == ApiErrorKind::Auth
    }

    /// Whether the status code triggers the forced-logout path
    pub fn is_auth_status(status: u16) -> bool {
        matches!(status, 401 | 403)
    }

    /// Replace the message with a caller-chosen fallback unless the server sent one
    pub fn or_message(self, fallback: &str) -> String {
        if self.status.is_some() && self.message != self.kind.fallback_message() {
            self.message
        } else {
            fallback.to_string()
        }
    }
}

/// Extract `detail` from a JSON error body.
///
/// `detail` is either a string or a list of `{msg, ...}` validation entries.
fn detail_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(|msg| msg.as_str())
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ApiError::from_status(401, "").kind, ApiErrorKind::Auth);
        assert_eq!(ApiError::from_status(403, "").kind, ApiErrorKind::Auth);
        assert_eq!(ApiError::from_status(404, "").kind, ApiErrorKind::Validation);
        assert_eq!(ApiError::from_status(422, "").kind, ApiErrorKind::Validation);
        assert_eq!(ApiError::from_status(500, "").kind, ApiErrorKind::Server);
        assert_eq!(ApiError::from_status(503, "oops").status, Some(503));
    }

    #[test]
    fn test_detail_string_is_kept() {
        let err = ApiError::from_status(401, r#"{"detail":"Incorrect username or password"}"#);
        assert_eq!(err.message, "Incorrect username or password");
        assert_eq!(err.to_string(), "Incorrect username or password");
    }

    #[test]
    fn test_detail_validation_list() {
        let body = r#"{"detail":[{"loc":["body","Confirmed"],"msg":"field required"}]}"#;
        assert_eq!(ApiError::from_status(422, body).message, "field required");
    }

    #[test]
    fn test_fallback_when_body_is_not_json() {
        let err = ApiError::from_status(502, "<html>bad gateway</html>");
        assert_eq!(err.message, "Failed to load data. Please try again later.");
    }

    #[test]
    fn test_or_message() {
        let with_detail = ApiError::from_status(401, r#"{"detail":"Nope"}"#);
        assert_eq!(with_detail.or_message("Login failed"), "Nope");

        let without = ApiError::from_status(401, "");
        assert_eq!(without.or_message("Login failed"), "Login failed");

        let network = ApiError::network("connection refused");
        assert_eq!(network.or_message("Login failed"), "Login failed");
    }
}
