use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Response body of a rejected request, kept for display by the caller.
#[derive(Debug, Clone, Default)]
pub struct ErrorBody {
    /// Raw body text, truncated to avoid logging excessive data
    pub raw: String,
    /// Parsed body when the backend answered with JSON
    pub json: Option<Value>,
}

impl ErrorBody {
    pub fn new(body: &str) -> Self {
        Self {
            raw: truncate_body(body),
            json: serde_json::from_str(body).ok(),
        }
    }

    /// Best human-readable message the backend provided.
    ///
    /// Looks at `error`, `message` and `errors` (string, list or map of
    /// field -> messages), falling back to the raw text.
    pub fn message(&self) -> Option<String> {
        if let Some(json) = &self.json {
            for key in ["error", "message"] {
                if let Some(text) = json.get(key).and_then(Value::as_str) {
                    return Some(text.to_string());
                }
            }
            if let Some(errors) = json.get("errors") {
                match errors {
                    Value::String(s) => return Some(s.clone()),
                    Value::Array(items) => {
                        let parts: Vec<String> = items.iter().map(value_text).collect();
                        if !parts.is_empty() {
                            return Some(parts.join("; "));
                        }
                    }
                    Value::Object(fields) => {
                        let parts: Vec<String> = fields
                            .iter()
                            .map(|(field, msgs)| format!("{} {}", field, value_text(msgs)))
                            .collect();
                        if !parts.is_empty() {
                            return Some(parts.join("; "));
                        }
                    }
                    _ => {}
                }
            }
        }
        if self.raw.trim().is_empty() {
            None
        } else {
            Some(self.raw.clone())
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => f.write_str(&message),
            None => f.write_str("(empty response)"),
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        body.to_string()
    } else {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorBody),

    #[error("Access denied: {0}")]
    AccessDenied(ErrorBody),

    #[error("Resource not found: {0}")]
    NotFound(ErrorBody),

    #[error("Request rejected ({status}): {body}")]
    Rejected { status: StatusCode, body: ErrorBody },

    #[error("Rate limited - please wait before retrying: {0}")]
    RateLimited(ErrorBody),

    #[error("Server error ({status}): {body}")]
    ServerError { status: StatusCode, body: ErrorBody },

    #[error("Status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: ErrorBody },

    #[error("No refresh token available")]
    MissingRefreshToken,

    #[error("Session expired - please log in again")]
    SessionExpired {
        login_path: String,
        #[source]
        cause: Box<ApiError>,
    },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Session storage error: {0:#}")]
    Storage(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Storage(err)
    }
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = ErrorBody::new(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized(body),
            403 => ApiError::AccessDenied(body),
            404 => ApiError::NotFound(body),
            400 | 409 | 422 => ApiError::Rejected { status, body },
            429 => ApiError::RateLimited(body),
            500..=599 => ApiError::ServerError { status, body },
            _ => ApiError::UnexpectedStatus { status, body },
        }
    }

    /// HTTP status behind this error, when the backend answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            ApiError::AccessDenied(_) => Some(StatusCode::FORBIDDEN),
            ApiError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ApiError::Rejected { status, .. } | ApiError::ServerError { status, .. } => {
                Some(*status)
            }
            ApiError::RateLimited(_) => Some(StatusCode::TOO_MANY_REQUESTS),
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            ApiError::SessionExpired { cause, .. } => cause.status(),
            ApiError::NetworkError(e) => e.status(),
            _ => None,
        }
    }

    /// Backend payload behind this error, if any.
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            ApiError::Unauthorized(body)
            | ApiError::AccessDenied(body)
            | ApiError::NotFound(body)
            | ApiError::RateLimited(body)
            | ApiError::ServerError { body, .. }
            | ApiError::Rejected { body, .. }
            | ApiError::UnexpectedStatus { body, .. } => Some(body),
            ApiError::SessionExpired { cause, .. } => cause.body(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// True when the session was cleared and the user has to log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::SessionExpired { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "nope"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, "{}"),
            ApiError::Rejected { .. }
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, ""),
            ApiError::ServerError { .. }
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::UnexpectedStatus { .. }
        ));
    }

    #[test]
    fn test_error_body_message_extraction() {
        let body = ErrorBody::new(r#"{"error": "Invalid credentials"}"#);
        assert_eq!(body.message().as_deref(), Some("Invalid credentials"));

        let body = ErrorBody::new(r#"{"errors": {"name": ["can't be blank"], "ip_address": ["is invalid"]}}"#);
        let message = body.message().unwrap_or_default();
        assert!(message.contains("name can't be blank"));
        assert!(message.contains("ip_address is invalid"));

        let body = ErrorBody::new(r#"{"errors": ["first", "second"]}"#);
        assert_eq!(body.message().as_deref(), Some("first; second"));

        let body = ErrorBody::new("<html>Bad Gateway</html>");
        assert!(body.json.is_none());
        assert_eq!(body.message().as_deref(), Some("<html>Bad Gateway</html>"));

        assert_eq!(ErrorBody::new("").message(), None);
    }

    #[test]
    fn test_long_body_is_truncated() {
        let long = "x".repeat(2000);
        let body = ErrorBody::new(&long);
        assert!(body.raw.len() < 600);
        assert!(body.raw.contains("truncated, 2000 total bytes"));
    }

    #[test]
    fn test_session_expired_exposes_cause() {
        let err = ApiError::SessionExpired {
            login_path: "/login".to_string(),
            cause: Box::new(ApiError::from_status(
                StatusCode::UNAUTHORIZED,
                r#"{"error": "Token revoked"}"#,
            )),
        };
        assert!(err.requires_login());
        assert_eq!(err.to_string(), "Session expired - please log in again");
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string).as_deref(),
            Some("Unauthorized: Token revoked")
        );
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(
            err.body().and_then(ErrorBody::message).as_deref(),
            Some("Token revoked")
        );
    }

    #[test]
    fn test_display_includes_backend_message() {
        let err = ApiError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"error": "Invalid credentials"}"#,
        );
        assert_eq!(err.to_string(), "Unauthorized: Invalid credentials");

        let err = ApiError::from_status(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": "Slow down, retry in 30s"}"#,
        );
        assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
        assert_eq!(
            err.body().and_then(ErrorBody::message).as_deref(),
            Some("Slow down, retry in 30s")
        );
        assert!(err.to_string().ends_with("Slow down, retry in 30s"));
    }
}
