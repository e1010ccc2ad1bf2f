//! Error handling middleware - `{message, error?}` JSON responses.

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use quill_shared::ErrorResponse;
use std::fmt;

/// Application-level error type rendered as an `ErrorResponse` body.
///
/// Every variant is logged when it is turned into a response.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    /// The store rejected a write; `error` is shown to the client.
    BadRequest { message: String, error: String },
    /// Unexpected failure; `source` is only logged.
    Internal { message: String, source: String },
}

impl AppError {
    pub fn post_not_found() -> Self {
        AppError::NotFound("Post not found".to_string())
    }

    pub fn rejected(message: &str, err: impl fmt::Display) -> Self {
        AppError::BadRequest {
            message: message.to_string(),
            error: err.to_string(),
        }
    }

    pub fn internal(message: &str, err: impl fmt::Display) -> Self {
        AppError::Internal {
            message: message.to_string(),
            source: err.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest { message, error } => {
                write!(f, "Bad request: {}: {}", message, error)
            }
            AppError::Internal { message, source } => {
                write!(f, "Internal error: {}: {}", message, source)
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::NotFound(message) => {
                tracing::warn!(status = 404, "{}", message);
                ErrorResponse::new(message)
            }
            AppError::BadRequest { message, error } => {
                tracing::warn!(status = 400, error = %error, "{}", message);
                ErrorResponse::new(message).with_error(error)
            }
            AppError::Internal { message, source } => {
                tracing::error!(status = 500, error = %source, "{}", message);
                ErrorResponse::new(message)
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Malformed JSON bodies become a 400 in the same shape as store rejections.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::rejected("Invalid request body", err).into()
}

/// A path segment that is not a UUID cannot name a post.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Unparseable post id");
    AppError::post_not_found().into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn test_bad_request_carries_error_text() {
        let err = AppError::rejected("Failed to create post", "title is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Failed to create post");
        assert_eq!(json["error"], "title is required");
    }

    #[actix_rt::test]
    async fn test_internal_hides_source() {
        let err = AppError::internal("Error fetching posts", "connection reset");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Error fetching posts" }));
    }
}
