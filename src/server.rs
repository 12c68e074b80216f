//! HTTP server initialization and runtime setup.
//!
//! Handles the database connection, migrations, service wiring, and the
//! Axum server lifecycle.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;

use crate::application::services::{LinkService, SlidingWindowLimiter};
use crate::config::Config;
use crate::domain::clock::SystemClock;
use crate::infrastructure::persistence::PgLinkRepository;
use crate::routes::app_router;
use crate::state::AppState;

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let pool = Arc::new(pool);
    let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));

    let link_service = Arc::new(LinkService::new(
        link_repository,
        SystemClock::new(),
        config.allow_destination_update,
    ));

    let rate_limiter = Arc::new(SlidingWindowLimiter::new(
        config.rate_limit_capacity,
        Duration::from_secs(config.rate_limit_window_secs),
        SystemClock::new(),
    ));

    let state = AppState {
        db: pool,
        link_service,
        rate_limiter,
        base_url: config.base_url.clone(),
        fallback_url: config.fallback_redirect_url.clone(),
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }

    tracing::info!("Shutdown signal received");
}
