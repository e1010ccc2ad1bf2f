use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The public projection of a category, as shown on a post's `category` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
}
