//! SDP Server - Main entry point

use std::sync::Arc;

use anyhow::Result;
use sdp_common::logging::{init_logging, LogConfig};
use tracing::info;

use sdp_server::{api, config::Config, features::data_sets::UnconfiguredExecutor};

#[tokio::main]
async fn main() -> Result<()> {
    // Environment variables take precedence over these defaults
    let log_config = LogConfig::builder()
        .log_file_prefix("sdp-server")
        .filter_directives("sdp_server=debug,sdp_common=debug,tower_http=debug")
        .build()
        .with_env_overrides()?;

    let _log_guard = init_logging(&log_config)?;

    info!("Starting SDP Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    api::serve(config, Arc::new(UnconfiguredExecutor)).await
}
