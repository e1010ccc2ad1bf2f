//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::PostRepository;
use quill_infra::{DatabaseConfig, InMemoryPostRepository};

#[cfg(feature = "postgres")]
use quill_infra::{DatabaseConnections, PostgresPostRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    /// Which post store backs `posts`, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// Build state around an already constructed post store.
    pub fn with_repository(posts: Arc<dyn PostRepository>, storage: &'static str) -> Self {
        Self { posts, storage }
    }

    /// Build the application state with the appropriate post store.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let connected = Self::connect_postgres(db_config).await;

        #[cfg(not(feature = "postgres"))]
        let connected: Option<Self> = {
            if db_config.is_some() {
                tracing::warn!("DATABASE_URL ignored - built without postgres feature");
            }
            None
        };

        if let Some(state) = connected {
            tracing::info!(storage = state.storage, "Application state initialized");
            return state;
        }

        tracing::info!(storage = "memory", "Application state initialized");
        Self::with_repository(Arc::new(InMemoryPostRepository::standalone()), "memory")
    }

    #[cfg(feature = "postgres")]
    async fn connect_postgres(db_config: Option<&DatabaseConfig>) -> Option<Self> {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return None;
        };

        match DatabaseConnections::init(config).await {
            Ok(connections) => {
                let repo = PostgresPostRepository::new(connections.main);
                Some(Self::with_repository(Arc::new(repo), "postgres"))
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};
    use uuid::Uuid;

    use super::*;
    use crate::handlers::configure_routes;

    #[actix_rt::test]
    async fn test_fallback_store_accepts_new_posts() {
        let state = AppState::new(None).await;
        assert_eq!(state.storage, "memory");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let author = Uuid::new_v4();
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "Hello", "content": "Body", "author": author }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let post: Value = test::read_body_json(resp).await;
        assert_eq!(post["slug"], "hello");
        assert_eq!(post["author"], json!(author));

        let req = test::TestRequest::get()
            .uri("/api/posts/hello")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let post: Value = test::read_body_json(resp).await;
        assert_eq!(post["author"], Value::Null);
        assert_eq!(post["viewCount"], 1);
    }
}
