//! # Inkwell API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer};
use tracing_actix_web::TracingLogger;

use api_server::config::AppConfig;
use api_server::observability::RequestIdMiddleware;
use api_server::state::AppState;
use api_server::telemetry::init_telemetry;
use inkwell_infra::JwtTokenService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_telemetry(config.json_logs);

    tracing::info!(
        "Starting Inkwell API Server on {}:{}",
        config.host,
        config.port
    );

    let tokens = Arc::new(JwtTokenService::from_env());
    let state = AppState::new(config.database.as_ref(), tokens).await;

    #[cfg(feature = "rate-limit")]
    let rate_limiter = rate_limiter()?;
    #[cfg(feature = "rate-limit")]
    let rate_limit_enabled = config.rate_limit_enabled;

    HttpServer::new(move || {
        let app = App::new();

        #[cfg(feature = "rate-limit")]
        let app = app.wrap(actix_web::middleware::Condition::new(
            rate_limit_enabled,
            api_server::middleware::rate_limit::RateLimitMiddleware::new(rate_limiter.clone()),
        ));

        let state = state.clone();
        app.wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .configure(move |cfg| api_server::configure_app(cfg, state))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(feature = "rate-limit")]
fn rate_limiter() -> std::io::Result<Arc<dyn inkwell_core::ports::RateLimiter>> {
    use inkwell_infra::{InMemoryRateLimiter, RateLimitConfig};

    let config = RateLimitConfig::from_env();
    tracing::info!(
        max_requests = config.max_requests,
        window_secs = config.window.as_secs(),
        "Rate limiting configured"
    );

    let limiter = InMemoryRateLimiter::new(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    Ok(Arc::new(limiter))
}
