use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthorSummary, CategorySummary, Comment, Schema};
use crate::error::DomainError;

/// Post entity - a blog post as stored, with unresolved references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author: Option<Uuid>,
    pub category: Option<Uuid>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub view_count: i64,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author: Option<Uuid>,
    pub category: Option<Uuid>,
    pub tags: Vec<String>,
    pub is_published: bool,
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub slug: Option<String>,
    pub author: Option<Uuid>,
    pub category: Option<Uuid>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
}

impl Post {
    /// Create a new post. The slug is derived from the title.
    pub fn new(draft: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&draft.title),
            title: draft.title,
            content: draft.content,
            excerpt: draft.excerpt,
            featured_image: draft.featured_image,
            author: draft.author,
            category: draft.category,
            tags: normalize_tags(draft.tags),
            is_published: draft.is_published,
            view_count: 0,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Schema rules that hold for every stored post.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("title is required".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(DomainError::Validation("content is required".to_string()));
        }
        if self.slug.is_empty() {
            return Err(DomainError::Validation(
                "slug must contain at least one letter or digit".to_string(),
            ));
        }
        if self.view_count < 0 {
            return Err(DomainError::Validation(
                "viewCount cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply a partial update in place. Changing the title keeps the slug.
    pub fn apply(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(excerpt) = patch.excerpt {
            self.excerpt = Some(excerpt);
        }
        if let Some(featured_image) = patch.featured_image {
            self.featured_image = Some(featured_image);
        }
        if let Some(slug) = patch.slug {
            self.slug = slugify(&slug);
        }
        if let Some(author) = patch.author {
            self.author = Some(author);
        }
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(tags) = patch.tags {
            self.tags = normalize_tags(tags);
        }
        if let Some(is_published) = patch.is_published {
            self.is_published = is_published;
        }
        self.updated_at = Utc::now();
    }

    /// Append a comment to the end of the thread.
    pub fn push_comment(&mut self, comment: Comment) {
        self.updated_at = comment.created_at;
        self.comments.push(comment);
    }
}

/// The author may later be nullified when the user is removed, so it is only
/// mandatory on creation.
impl Schema for Post {
    fn validate_new(&self) -> Result<(), DomainError> {
        self.validate()?;
        if self.author.is_none() {
            return Err(DomainError::Validation("author is required".to_string()));
        }
        Ok(())
    }
}

/// A post with its author and category resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author: Option<AuthorSummary>,
    pub category: Option<CategorySummary>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub view_count: i64,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PopulatedPost {
    /// Attach already-resolved references. A missing summary renders as `null`.
    pub fn new(
        post: Post,
        author: Option<AuthorSummary>,
        category: Option<CategorySummary>,
    ) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            content: post.content,
            excerpt: post.excerpt,
            featured_image: post.featured_image,
            author,
            category,
            tags: post.tags,
            is_published: post.is_published,
            view_count: post.view_count,
            comments: post.comments,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Derive a URL-safe slug: lowercase ASCII letters and digits, with every
/// other run of characters collapsed to a single hyphen.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Trim labels, drop blanks and duplicates, keep first-seen order.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: "Body".to_string(),
            author: Some(Uuid::new_v4()),
            ..Default::default()
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust 2024 -- Edition  "), "rust-2024-edition");
        assert_eq!(slugify("Crème brûlée"), "cr-me-br-l-e");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_new_post_defaults() {
        let post = Post::new(draft("First Post"));
        assert_eq!(post.slug, "first-post");
        assert_eq!(post.view_count, 0);
        assert!(post.comments.is_empty());
        assert!(!post.is_published);
        assert_eq!(post.created_at, post.updated_at);
        assert!(post.validate_new().is_ok());
    }

    #[test]
    fn test_validation_rules() {
        let post = Post::new(draft("   "));
        assert_eq!(
            post.validate(),
            Err(DomainError::Validation("title is required".to_string()))
        );

        let post = Post::new(draft("???"));
        assert!(post.validate().is_err());

        let mut no_author = draft("Orphan");
        no_author.author = None;
        let post = Post::new(no_author);
        assert!(post.validate().is_ok());
        assert_eq!(
            post.validate_new(),
            Err(DomainError::Validation("author is required".to_string()))
        );
    }

    #[test]
    fn test_tags_are_normalized() {
        let mut input = draft("Tagged");
        input.tags = vec![
            " rust ".to_string(),
            "web".to_string(),
            "".to_string(),
            "rust".to_string(),
        ];
        let post = Post::new(input);
        assert_eq!(post.tags, vec!["rust", "web"]);
    }

    #[test]
    fn test_apply_patch_keeps_slug_unless_given() {
        let mut post = Post::new(draft("Original Title"));
        post.apply(PostPatch {
            title: Some("Renamed".to_string()),
            is_published: Some(true),
            ..Default::default()
        });
        assert_eq!(post.title, "Renamed");
        assert_eq!(post.slug, "original-title");
        assert!(post.is_published);
        assert_eq!(post.content, "Body");

        post.apply(PostPatch {
            slug: Some("Brand New Slug".to_string()),
            ..Default::default()
        });
        assert_eq!(post.slug, "brand-new-slug");
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let post = Post::new(draft("Wire"));
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["viewCount"], 0);
        assert_eq!(json["isPublished"], false);
        assert!(json.get("featuredImage").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
