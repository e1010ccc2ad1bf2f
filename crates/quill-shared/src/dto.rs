//! Data Transfer Objects - request bodies for the posts API.
//!
//! Every field is optional on the wire; required-field checks belong to the
//! post store so that a missing field surfaces as a store rejection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /api/posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub excerpt: Option<String>,
    pub author: Option<Uuid>,
    pub category: Option<Uuid>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
}

/// Body of `PUT /api/posts/{id}`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub excerpt: Option<String>,
    pub slug: Option<String>,
    pub author: Option<Uuid>,
    pub category: Option<Uuid>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
}

/// Body of `POST /api/posts/{id}/comments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    pub user_id: Option<Uuid>,
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_ignores_protected_fields() {
        let req: UpdatePostRequest = serde_json::from_str(
            r#"{"title":"New","viewCount":999,"comments":[],"isPublished":true}"#,
        )
        .unwrap();
        assert_eq!(req.title.as_deref(), Some("New"));
        assert_eq!(req.is_published, Some(true));
        assert!(req.content.is_none());
    }

    #[test]
    fn test_comment_request_uses_camel_case() {
        let user_id = Uuid::new_v4();
        let req: AddCommentRequest =
            serde_json::from_value(serde_json::json!({ "userId": user_id, "content": "hi" }))
                .unwrap();
        assert_eq!(req.user_id, Some(user_id));
        assert_eq!(req.content.as_deref(), Some("hi"));
    }
}
