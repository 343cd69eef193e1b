use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::net::TcpListener;
use tracing::info;

use banking_users::infrastructure::{init_logging, AppConfig, RandomIdGenerator};
use banking_users::{create_router, UserRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();
    let _log_guard = init_logging(&config.logging()).map_err(|e| anyhow!(e))?;

    info!("Starting banking user service");

    // The registry lives for the whole process; state is lost on restart.
    let registry = Arc::new(UserRegistry::new(Arc::new(RandomIdGenerator)));
    let app = create_router(registry);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
