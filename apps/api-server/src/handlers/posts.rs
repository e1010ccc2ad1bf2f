//! Post resource handlers.
//!
//! Each handler makes one or two post store calls and maps the outcome to a
//! status code. Write failures answer 400 with the store's reason; read and
//! delete failures answer 500.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::RepoError;
use quill_core::domain::{NewComment, NewPost, Post, PostPatch};
use quill_shared::dto::{AddCommentRequest, CreatePostRequest, UpdatePostRequest};
use quill_shared::{CommentAddedResponse, MessageResponse, ViewCountResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let draft = NewPost {
        title: req.title.unwrap_or_default(),
        content: req.content.unwrap_or_default(),
        excerpt: req.excerpt,
        featured_image: req.featured_image,
        author: req.author,
        category: req.category,
        tags: req.tags.unwrap_or_default(),
        is_published: req.is_published.unwrap_or(false),
    };

    let post = state
        .posts
        .insert(Post::new(draft))
        .await
        .map_err(|e| AppError::rejected("Failed to create post", e))?;

    tracing::info!(post_id = %post.id, slug = %post.slug, "Post created");
    Ok(HttpResponse::Created().json(post))
}

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state
        .posts
        .list_populated()
        .await
        .map_err(|e| AppError::internal("Error fetching posts", e))?;

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{slug}
///
/// Counts a view. The returned `viewCount` includes this view.
pub async fn get_post_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let fetch_failed = |e: RepoError| AppError::internal("Error fetching post", e);

    let mut post = state
        .posts
        .find_by_slug(&slug)
        .await
        .map_err(fetch_failed)?
        .ok_or_else(AppError::post_not_found)?;

    // Deleted between the two calls.
    post.view_count = state
        .posts
        .increment_view_count(post.id)
        .await
        .map_err(fetch_failed)?
        .ok_or_else(AppError::post_not_found)?;

    Ok(HttpResponse::Ok().json(post))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let patch = PostPatch {
        title: req.title,
        content: req.content,
        excerpt: req.excerpt,
        featured_image: req.featured_image,
        slug: req.slug,
        author: req.author,
        category: req.category,
        tags: req.tags,
        is_published: req.is_published,
    };

    let post = state
        .posts
        .update(id, patch)
        .await
        .map_err(|e| AppError::rejected("Failed to update post", e))?
        .ok_or_else(AppError::post_not_found)?;

    tracing::info!(post_id = %post.id, "Post updated");
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let deleted = state
        .posts
        .delete(id)
        .await
        .map_err(|e| AppError::internal("Error deleting post", e))?;

    if !deleted {
        return Err(AppError::post_not_found());
    }

    tracing::info!(post_id = %id, "Post deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<AddCommentRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let comment = NewComment {
        user_id: req.user_id,
        content: req.content.unwrap_or_default(),
    };

    let post = state
        .posts
        .add_comment(id, comment)
        .await
        .map_err(|e| AppError::rejected("Failed to add comment", e))?
        .ok_or_else(AppError::post_not_found)?;

    Ok(HttpResponse::Created().json(CommentAddedResponse {
        message: "Comment added".to_string(),
        post,
    }))
}

/// PUT /api/posts/{id}/view
pub async fn increment_view(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let views = state
        .posts
        .increment_view_count(id)
        .await
        .map_err(|e| AppError::internal("Error incrementing view count", e))?
        .ok_or_else(AppError::post_not_found)?;

    Ok(HttpResponse::Ok().json(ViewCountResponse {
        message: "View count incremented".to_string(),
        views,
    }))
}
