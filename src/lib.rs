use std::sync::Arc;

pub mod auth;
pub mod clients;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

/// Shared per-process state: configuration loaded once at startup, one
/// database pool, one outbound HTTP client. Handlers receive it by reference
/// through axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::AppConfig>,
    pub db: sqlx::PgPool,
    pub http: reqwest::Client,
}
