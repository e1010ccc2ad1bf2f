use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewComment, PopulatedPost, Post, PostPatch};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Store a new entity and return the stored representation.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Returns `false` if nothing was removed.
    async fn delete(&self, id: ID) -> Result<bool, RepoError>;
}

/// Post store.
///
/// Implementations own the post schema: `insert` runs `Schema::validate_new`,
/// `update` runs `Post::validate`, slugs stay unique and references to
/// unknown users or categories are rejected.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts with author and category resolved, newest first.
    async fn list_populated(&self) -> Result<Vec<PopulatedPost>, RepoError>;

    /// A single post by slug with author and category resolved.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PopulatedPost>, RepoError>;

    /// Apply a partial update. `Ok(None)` when no post has that ID.
    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, RepoError>;

    /// Atomically add one to the view counter and return the new value.
    async fn increment_view_count(&self, id: Uuid) -> Result<Option<i64>, RepoError>;

    /// Append a comment. Existence is checked before the comment is validated.
    async fn add_comment(&self, id: Uuid, comment: NewComment)
    -> Result<Option<Post>, RepoError>;
}
