//! # Inkwell API Server
//!
//! Actix-web application wiring: routes, extractors, middleware and state.
//! `main.rs` runs it; integration tests mount the same configuration.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

use actix_web::web;
use inkwell_shared::FieldError;

use middleware::error::AppError;
use state::AppState;

/// Register state, extractor error handlers and every route.
pub fn configure_app(cfg: &mut web::ServiceConfig, state: AppState) {
    cfg.app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            AppError::Validation(vec![FieldError::new("body", err.to_string())]).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            AppError::Validation(vec![FieldError::new("query", err.to_string())]).into()
        }))
        .configure(handlers::configure_routes);
}
