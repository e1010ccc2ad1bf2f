//! Response envelopes for the posts API.

use serde::{Deserialize, Serialize};

/// A bare confirmation, e.g. `{"message": "Post deleted successfully"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Returned after a comment is appended, carrying the updated post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentAddedResponse<T> {
    pub message: String,
    pub post: T,
}

/// Returned by the explicit view-count endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewCountResponse {
    pub message: String,
    pub views: i64,
}

/// Error body. Write failures also carry the underlying `error` text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A short, human-readable summary of what failed.
    pub message: String,

    /// The store's explanation, when it is safe to show.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
