use anyhow::Context;
use dotenvy::dotenv;
use taskly::logging::init_tracing;
use taskly::metrics::init_metrics;
use taskly::router::init_router;
use taskly::state::init_app_state;
use taskly_config::ServerConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let metrics_handle = init_metrics()?;
    let state = init_app_state().await?;
    let app = init_router(state, metrics_handle);

    let server = ServerConfig::from_env();
    let address = server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!(%address, "Server running");
    info!("Swagger UI available at http://{address}/swagger-ui");
    info!("Scalar UI available at http://{address}/scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}
