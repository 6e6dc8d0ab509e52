use crate::models::ErrorBody;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

const MAX_MESSAGE_CHARS: usize = 200;

pub const IMAGE_REQUIRED: &str = "Image is required";
pub const INVALID_JSON: &str = "Invalid JSON body";
pub const BODY_TOO_LARGE: &str = "Request body is too large";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    /// The model call failed. `context` names the operation, `message` is
    /// already sanitized.
    Upstream { context: &'static str, message: String },
}

impl ApiError {
    pub fn upstream(context: &'static str, err: &crate::Error, secret: Option<&str>) -> Self {
        ApiError::Upstream {
            context,
            message: sanitize_message(&err.to_string(), secret),
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(BODY_TOO_LARGE.to_string())
        } else {
            ApiError::BadRequest(INVALID_JSON.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::Upstream { context, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{}: {}", context, message),
            ),
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

/// First line only, secret masked, capped at 200 characters.
pub fn sanitize_message(message: &str, secret: Option<&str>) -> String {
    let mut line = message.lines().next().unwrap_or("").trim().to_string();

    if let Some(secret) = secret.filter(|s| !s.is_empty()) {
        line = line.replace(secret, "***");
    }

    if line.chars().count() > MAX_MESSAGE_CHARS {
        line = line.chars().take(MAX_MESSAGE_CHARS).collect::<String>() + "...";
    }

    if line.is_empty() {
        "Unknown error".to_string()
    } else {
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_first_line() {
        assert_eq!(
            sanitize_message("AI provider error: boom\n{\"details\": []}", None),
            "AI provider error: boom"
        );
    }

    #[test]
    fn test_sanitize_masks_secret() {
        assert_eq!(
            sanitize_message("key AIza-123 rejected", Some("AIza-123")),
            "key *** rejected"
        );
    }

    #[test]
    fn test_sanitize_truncates_long_messages() {
        let long = "x".repeat(500);
        let sanitized = sanitize_message(&long, None);
        assert_eq!(sanitized.chars().count(), MAX_MESSAGE_CHARS + 3);
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn test_sanitize_empty_message() {
        assert_eq!(sanitize_message("", None), "Unknown error");
    }
}
