use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_api::{config::AppConfig, database, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up DATABASE_URL and API keys.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let db = database::pool::connect(&config.database).await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let port = config.http.port;
    let state = AppState {
        config: Arc::new(config),
        db,
        http: reqwest::Client::new(),
    };

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("storefront API listening on http://0.0.0.0:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}
