use thiserror::Error;

use super::response::ErrorEnvelope;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - access token missing or rejected")]
    Unauthorized,

    #[error("Session expired - sign in again")]
    SessionExpired,

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Extract the server's error message from an envelope body, falling
    /// back to the (truncated) raw body when the envelope doesn't parse.
    fn message_from_body(body: &str) -> String {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope.error,
            Err(_) => Self::truncate_body(body),
        }
    }

    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::message_from_body(body);
        match status.as_u16() {
            400 => ApiError::Validation(message),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_uses_envelope_error_message() {
        let body = r#"{"status_code": 400, "message": "Bad Request", "error": "Email is not available"}"#;
        match ApiError::from_status(StatusCode::BAD_REQUEST, body) {
            ApiError::Validation(msg) => assert_eq!(msg, "Email is not available"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_from_status_401_is_unauthorized() {
        let body = r#"{"status_code": 401, "message": "Unauthorized", "error": "The access token provided is invalid"}"#;
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, body),
            ApiError::Unauthorized
        ));
    }

    #[test]
    fn test_from_status_falls_back_to_raw_body() {
        match ApiError::from_status(StatusCode::NOT_FOUND, "plain text error") {
            ApiError::NotFound(msg) => assert_eq!(msg, "plain text error"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_from_status_server_error_range() {
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, ""),
            ApiError::ServerError(_)
        ));
    }

    #[test]
    fn test_truncates_oversized_body() {
        let body = "x".repeat(2000);
        match ApiError::from_status(StatusCode::NOT_FOUND, &body) {
            ApiError::NotFound(msg) => {
                assert!(msg.len() < body.len());
                assert!(msg.contains("truncated"));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }
}
