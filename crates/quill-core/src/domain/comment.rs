use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// A reader comment attached to a post. Never edited once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Unvalidated comment input.
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub user_id: Option<Uuid>,
    pub content: String,
}

impl NewComment {
    /// Check the comment schema and stamp it.
    pub fn into_comment(self) -> Result<Comment, DomainError> {
        let user_id = self
            .user_id
            .ok_or_else(|| DomainError::Validation("userId is required".to_string()))?;

        if self.content.trim().is_empty() {
            return Err(DomainError::Validation(
                "comment content is required".to_string(),
            ));
        }

        Ok(Comment {
            id: Uuid::new_v4(),
            user_id,
            content: self.content,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_requires_user_and_content() {
        let missing_user = NewComment {
            user_id: None,
            content: "Nice".to_string(),
        };
        assert_eq!(
            missing_user.into_comment(),
            Err(DomainError::Validation("userId is required".to_string()))
        );

        let blank = NewComment {
            user_id: Some(Uuid::new_v4()),
            content: "  ".to_string(),
        };
        assert!(blank.into_comment().is_err());

        let user_id = Uuid::new_v4();
        let comment = NewComment {
            user_id: Some(user_id),
            content: "Nice".to_string(),
        }
        .into_comment()
        .unwrap();
        assert_eq!(comment.user_id, user_id);
        assert_eq!(comment.content, "Nice");
    }
}
