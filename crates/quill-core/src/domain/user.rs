use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The public projection of a user, as shown on a post's `author` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}
