pub mod response;

use crate::config::Config;
use crate::features::{self, data_sets::SharedExecutor};
use crate::middleware;
use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::{net::SocketAddr, time::Duration};
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tracing::info;

/// Bind the configured address and serve until a shutdown signal arrives
pub async fn serve(config: Config, executor: SharedExecutor) -> anyhow::Result<()> {
    let app = create_router(executor, &config);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Create the application router with all routes and middleware
pub fn create_router(executor: SharedExecutor, config: &Config) -> Router {
    let feature_routes = features::router(features::FeatureState { executor });

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", feature_routes)
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Graceful shutdown signal handler
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    // Give ongoing requests time to complete
    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
