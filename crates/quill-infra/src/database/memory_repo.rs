//! In-memory post store - used when no database is configured, and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{
    AuthorSummary, CategorySummary, NewComment, PopulatedPost, Post, PostPatch, Schema,
};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};

#[derive(Default)]
struct Directory {
    /// Insertion order.
    posts: Vec<Post>,
    users: HashMap<Uuid, AuthorSummary>,
    categories: HashMap<Uuid, CategorySummary>,
}

impl Directory {
    fn position(&self, id: Uuid) -> Option<usize> {
        self.posts.iter().position(|p| p.id == id)
    }

    /// Referenced users and categories must exist at write time.
    fn check_references(&self, post: &Post) -> Result<(), RepoError> {
        if let Some(author) = post.author {
            if !self.users.contains_key(&author) {
                return Err(RepoError::Constraint(format!(
                    "author {author} does not exist"
                )));
            }
        }
        if let Some(category) = post.category {
            if !self.categories.contains_key(&category) {
                return Err(RepoError::Constraint(format!(
                    "category {category} does not exist"
                )));
            }
        }
        Ok(())
    }

    fn check_slug(&self, post: &Post) -> Result<(), RepoError> {
        let taken = self
            .posts
            .iter()
            .any(|other| other.id != post.id && other.slug == post.slug);

        if taken {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already exists",
                post.slug
            )));
        }
        Ok(())
    }

    fn populate(&self, post: Post) -> PopulatedPost {
        let author = post.author.and_then(|id| self.users.get(&id).cloned());
        let category = post.category.and_then(|id| self.categories.get(&id).cloned());
        PopulatedPost::new(post, author, category)
    }
}

/// In-memory post store with a user and category directory for population.
///
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    store: RwLock<Directory>,
    /// Reject authors and categories missing from the directory.
    enforce_references: bool,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Directory::default()),
            enforce_references: true,
        }
    }

    /// A store without a user or category directory to check against.
    ///
    /// Author and category ids are stored as given and populate as `null`
    /// until a matching user or category is registered.
    pub fn standalone() -> Self {
        Self {
            store: RwLock::new(Directory::default()),
            enforce_references: false,
        }
    }

    /// Register a user that posts may reference as their author.
    pub async fn insert_user(&self, user: AuthorSummary) {
        let mut store = self.store.write().await;
        store.users.insert(user.id, user);
    }

    /// Register a category that posts may reference.
    pub async fn insert_category(&self, category: CategorySummary) {
        let mut store = self.store.write().await;
        store.categories.insert(category.id, category);
    }

    /// Remove a user, nullifying `author` on every post that referenced it.
    pub async fn remove_user(&self, id: Uuid) -> bool {
        let mut store = self.store.write().await;
        if store.users.remove(&id).is_none() {
            return false;
        }
        for post in store.posts.iter_mut().filter(|p| p.author == Some(id)) {
            post.author = None;
        }
        true
    }

    /// Remove a category, nullifying `category` on every post that referenced it.
    pub async fn remove_category(&self, id: Uuid) -> bool {
        let mut store = self.store.write().await;
        if store.categories.remove(&id).is_none() {
            return false;
        }
        for post in store.posts.iter_mut().filter(|p| p.category == Some(id)) {
            post.category = None;
        }
        true
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, entity: Post) -> Result<Post, RepoError> {
        entity.validate_new()?;

        let mut store = self.store.write().await;
        if store.position(entity.id).is_some() {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        if self.enforce_references {
            store.check_references(&entity)?;
        }
        store.check_slug(&entity)?;

        store.posts.push(entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        match store.position(id) {
            Some(idx) => {
                store.posts.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_populated(&self) -> Result<Vec<PopulatedPost>, RepoError> {
        let store = self.store.read().await;

        // Newest insert first so equal timestamps still list newest first.
        let mut posts: Vec<Post> = store.posts.iter().rev().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(posts.into_iter().map(|p| store.populate(p)).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PopulatedPost>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .posts
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
            .map(|p| store.populate(p)))
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        let mut store = self.store.write().await;
        let Some(idx) = store.position(id) else {
            return Ok(None);
        };

        let mut draft = store.posts[idx].clone();
        draft.apply(patch);
        draft.validate()?;
        if self.enforce_references {
            store.check_references(&draft)?;
        }
        store.check_slug(&draft)?;

        store.posts[idx] = draft.clone();
        Ok(Some(draft))
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<Option<i64>, RepoError> {
        let mut store = self.store.write().await;
        Ok(store.posts.iter_mut().find(|p| p.id == id).map(|post| {
            post.view_count += 1;
            post.view_count
        }))
    }

    async fn add_comment(
        &self,
        id: Uuid,
        comment: NewComment,
    ) -> Result<Option<Post>, RepoError> {
        let mut store = self.store.write().await;
        let Some(idx) = store.position(id) else {
            return Ok(None);
        };

        let comment = comment.into_comment()?;
        let post = &mut store.posts[idx];
        post.push_comment(comment);
        Ok(Some(post.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::NewPost;

    fn author() -> AuthorSummary {
        AuthorSummary {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    fn draft(title: &str, author: Uuid) -> Post {
        Post::new(NewPost {
            title: title.to_string(),
            content: "Body".to_string(),
            author: Some(author),
            ..Default::default()
        })
    }

    async fn repo_with_author() -> (InMemoryPostRepository, AuthorSummary) {
        let repo = InMemoryPostRepository::new();
        let user = author();
        repo.insert_user(user.clone()).await;
        (repo, user)
    }

    #[tokio::test]
    async fn test_insert_and_find_by_slug_populates() {
        let (repo, user) = repo_with_author().await;
        let category = CategorySummary {
            id: Uuid::new_v4(),
            name: "Rust".to_string(),
        };
        repo.insert_category(category.clone()).await;

        let mut post = draft("Hello World", user.id);
        post.category = Some(category.id);
        repo.insert(post).await.unwrap();

        let found = repo.find_by_slug("hello-world").await.unwrap().unwrap();
        assert_eq!(found.author, Some(user));
        assert_eq!(found.category, Some(category));
        assert!(repo.find_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_rejected() {
        let (repo, user) = repo_with_author().await;
        repo.insert(draft("Same Title", user.id)).await.unwrap();

        let err = repo.insert(draft("Same  title!", user.id)).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_unknown_author_is_rejected() {
        let repo = InMemoryPostRepository::new();
        let err = repo
            .insert(draft("Orphan", Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_standalone_store_accepts_unregistered_author() {
        let repo = InMemoryPostRepository::standalone();
        let author = Uuid::new_v4();

        let post = repo.insert(draft("Unregistered", author)).await.unwrap();
        assert_eq!(post.author, Some(author));

        let found = repo.find_by_slug("unregistered").await.unwrap().unwrap();
        assert!(found.author.is_none());

        let err = repo.insert(draft("unregistered", author)).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_missing_required_field_is_validation_error() {
        let (repo, user) = repo_with_author().await;
        let mut post = draft("No Content", user.id);
        post.content = String::new();

        let err = repo.insert(post).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (repo, user) = repo_with_author().await;
        for title in ["A", "B", "C"] {
            repo.insert(draft(title, user.id)).await.unwrap();
        }

        let titles: Vec<String> = repo
            .list_populated()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["C", "B", "A"]);
    }

    #[tokio::test]
    async fn test_update_rejects_slug_collision() {
        let (repo, user) = repo_with_author().await;
        repo.insert(draft("First", user.id)).await.unwrap();
        let second = repo.insert(draft("Second", user.id)).await.unwrap();

        let err = repo
            .update(
                second.id,
                PostPatch {
                    slug: Some("first".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));

        let missing = repo
            .update(Uuid::new_v4(), PostPatch::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_increment_and_comment() {
        let (repo, user) = repo_with_author().await;
        let post = repo.insert(draft("Counted", user.id)).await.unwrap();

        assert_eq!(repo.increment_view_count(post.id).await.unwrap(), Some(1));
        assert_eq!(repo.increment_view_count(post.id).await.unwrap(), Some(2));
        assert_eq!(
            repo.increment_view_count(Uuid::new_v4()).await.unwrap(),
            None
        );

        for text in ["first", "second"] {
            repo.add_comment(
                post.id,
                NewComment {
                    user_id: Some(user.id),
                    content: text.to_string(),
                },
            )
            .await
            .unwrap();
        }
        let stored = repo.find_by_id(post.id).await.unwrap().unwrap();
        let contents: Vec<&str> = stored.comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert_eq!(stored.view_count, 2);
    }

    #[tokio::test]
    async fn test_removing_user_nullifies_author() {
        let (repo, user) = repo_with_author().await;
        repo.insert(draft("Dangling", user.id)).await.unwrap();

        assert!(repo.remove_user(user.id).await);
        let found = repo.find_by_slug("dangling").await.unwrap().unwrap();
        assert!(found.author.is_none());
        assert!(!repo.remove_user(user.id).await);
    }

    #[tokio::test]
    async fn test_delete() {
        let (repo, user) = repo_with_author().await;
        let post = repo.insert(draft("Gone", user.id)).await.unwrap();

        assert!(repo.delete(post.id).await.unwrap());
        assert!(!repo.delete(post.id).await.unwrap());
        assert!(repo.find_by_slug("gone").await.unwrap().is_none());
    }
}
