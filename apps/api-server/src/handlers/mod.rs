//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod health;
mod posts;
mod responses;

use actix_web::web;
use uuid::Uuid;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/comments", web::get().to(posts::list_comments))
                    .route("/{id}/comments", web::post().to(posts::add_comment)),
            )
            .service(
                web::scope("/categories")
                    .route("", web::get().to(categories::list))
                    .route("", web::post().to(categories::create))
                    .route("/{id}", web::get().to(categories::get))
                    .route("/{id}", web::put().to(categories::update))
                    .route("/{id}", web::delete().to(categories::delete)),
            ),
    );
}

/// A malformed id can never match, so it reads as not found.
fn parse_id(raw: &str, entity: &'static str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(entity))
}
