//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::web;

use crate::middleware::error::{json_error_handler, path_error_handler};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/posts")
                        .service(
                            web::resource("")
                                .route(web::post().to(posts::create_post))
                                .route(web::get().to(posts::list_posts)),
                        )
                        .service(
                            web::resource("/{key}")
                                .route(web::get().to(posts::get_post_by_slug))
                                .route(web::put().to(posts::update_post))
                                .route(web::delete().to(posts::delete_post)),
                        )
                        .route("/{id}/comments", web::post().to(posts::add_comment))
                        .route("/{id}/view", web::put().to(posts::increment_view)),
                ),
        );
}
