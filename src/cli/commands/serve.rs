//! Serve command handler

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};

use crate::api;
use crate::config::Config;

pub async fn cmd_serve(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!("soloauth v{} starting...", env!("CARGO_PKG_VERSION"));

    let addr = config.listen_address();
    let state = api::create_app_state_from_config(config, prometheus_handle).await?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🌐 Web Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            // Without a signal handler, keep serving until the process is killed
            error!("Error listening for shutdown: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
