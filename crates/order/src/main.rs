use anyhow::{Context, Result};
use notification::{
    dispatcher::NotificationDispatcher,
    gateway::{DynMessagingGateway, HttpMessagingGateway},
};
use order::{handler::AppRouter, state::AppState};
use shared::{
    config::{Config, ConnectionManager, ConnectionPool},
    utils::init_logger,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let (config, state) = setup().await.context("Failed to setup application")?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    let gateway: DynMessagingGateway = Arc::new(
        HttpMessagingGateway::new(&config.gateway.url, &config.gateway.api_key)
            .context("Failed to build messaging gateway client")?,
    );

    let dispatcher = NotificationDispatcher::new(gateway);
    let dispatcher_handle = tokio::spawn(dispatcher.run(state.bus.subscribe_transitions()));

    let server_handle = tokio::spawn({
        let state = state.clone();
        async move {
            if let Err(e) = AppRouter::serve(config.port, state, shutdown_rx).await {
                error!("HTTP server failed: {e}");
            }
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("🛑 Shutdown signal received (Ctrl+C).");

    if let Err(e) = shutdown_tx.send(()) {
        warn!("Failed to broadcast shutdown signal: {e}");
    }

    shutdown(server_handle, dispatcher_handle).await;

    Ok(())
}

async fn setup() -> Result<(Config, Arc<AppState>)> {
    dotenv::dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    init_logger("order-service", is_dev, is_enable_file);

    let config = Config::init().context("Failed to load configuration")?;

    let db_pool = ConnectionManager::new_pool(
        &config.database_url,
        config.db_min_conn,
        config.db_max_conn,
    )
    .await
    .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("Failed to migrate database")?;
    }

    let state = Arc::new(AppState::new(db_pool).context("Failed to create AppState")?);

    info!("✅ Application setup completed successfully.");
    Ok((config, state))
}

async fn shutdown(
    server_handle: tokio::task::JoinHandle<()>,
    dispatcher_handle: tokio::task::JoinHandle<()>,
) {
    info!("🛑 Shutting down...");

    let shutdown_timeout = tokio::time::Duration::from_secs(30);

    match tokio::time::timeout(shutdown_timeout, server_handle).await {
        Ok(join_result) => {
            if let Err(e) = join_result {
                error!("Server task panicked: {e}");
            }
            info!("✅ HTTP server shutdown gracefully.");
        }
        Err(_) => {
            warn!("⚠️  Shutdown timeout reached, forcing exit.");
        }
    }

    // The dispatcher loop ends once the bus side is dropped; do not wait
    // on it past the timeout.
    dispatcher_handle.abort();

    info!("✅ Order service shutdown complete.");
}

pub async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    Ok(())
}
