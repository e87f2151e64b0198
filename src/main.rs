use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing::{info, warn};

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod validation;

use crate::config::Config;
use crate::db::{InMemoryItemStore, ItemStore, PgItemStore};

/// Shared application state — cheap to clone (the store sits behind an Arc).
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,item_service=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let state = AppState {
        store: connect_store(&config).await?,
    };

    let app = handlers::router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn ItemStore>> {
    let Some(url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL not set; items are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryItemStore::new()));
    };

    info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(url)
        .await?;
    info!("Database connection pool established.");

    // Run pending migrations
    info!("Running migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations complete.");

    Ok(Arc::new(PgItemStore::new(pool)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
