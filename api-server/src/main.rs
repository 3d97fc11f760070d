use std::sync::Arc;

use anyhow::Context;
use api_server::build_router;
use core_library::db::{create_pool, DatabaseConfig};
use core_library::SqliteSongRepository;
use core_runtime::logging::{init_logging, LoggingConfig};
use core_runtime::AppConfig;
use core_service::SongCatalogService;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let mut logging = LoggingConfig::for_environment(config.environment);
    if let Some(dir) = &config.log_dir {
        logging = logging.with_log_dir(dir);
    }
    if let Ok(filter) = std::env::var("RUST_LOG") {
        logging = logging.with_filter(filter);
    }
    let _log_guard = init_logging(logging).context("Failed to initialize logging")?;

    let pool = create_pool(
        DatabaseConfig::from_url(&config.database.url)
            .max_connections(config.database.max_connections),
    )
    .await
    .context("Failed to open song database")?;

    let catalog = SongCatalogService::new(Arc::new(SqliteSongRepository::new(pool.clone())));
    let app = build_router(catalog);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(
        address = %address,
        environment = %config.environment,
        "Song catalog listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
