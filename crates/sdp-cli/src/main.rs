//! SDP CLI - Main entry point

use clap::Parser;
use sdp_cli::{commands, Cli, Commands};
use sdp_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::debug;

fn main() {
    let cli = Cli::parse();

    // Verbose mode logs debug output to the console; otherwise warnings only
    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("sdp-cli")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().with_env_overrides().unwrap_or(log_config);

    // The CLI works without logging
    let _guard = init_logging(&log_config).ok().flatten();

    if let Err(e) = execute_command(&cli) {
        debug!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn execute_command(cli: &Cli) -> sdp_cli::Result<()> {
    match &cli.command {
        Commands::Validate { input, get, format } => commands::validate::run(input, *get, *format),
        Commands::Parse { command } => commands::parse::run(command),
        Commands::ParsedPeriod { value } => commands::parsed_period::run(value),
    }
}
