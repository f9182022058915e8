//! SDP CLI Library
//!
//! Command-line access to the data set query validation rules.
//!
//! # Overview
//!
//! - **Request Validation**: Check a JSON query body or a URL query string
//!   (`sdp validate`)
//! - **Encoding Inspection**: Parse compact location, time period and sort
//!   strings into their structured form (`sdp parse`)
//! - **Period Normalization**: Print the canonical period for a time period
//!   (`sdp parsed-period`)

pub mod commands;
pub mod error;

// Re-export commonly used types
pub use error::{CliError, Result};

use clap::{Parser, Subcommand, ValueEnum};

/// SDP - Data set query toolkit
#[derive(Parser, Debug)]
#[command(name = "sdp")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a data set query request
    Validate {
        /// Request file, or '-' to read from stdin
        input: String,

        /// Treat the input as a URL query string instead of a JSON body
        #[arg(long)]
        get: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, env = "SDP_OUTPUT_FORMAT")]
        format: OutputFormat,
    },

    /// Parse a compact encoding and print its structured form
    Parse {
        #[command(subcommand)]
        command: ParseCommand,
    },

    /// Print the canonical period of a time period (e.g. '2021|AY' gives '2021/2022')
    ParsedPeriod {
        /// Time period in the format PERIOD|CODE
        value: String,
    },
}

/// Encodings understood by `sdp parse`
#[derive(Subcommand, Debug)]
pub enum ParseCommand {
    /// Location in the format LEVEL|PROPERTY|VALUE (e.g. 'NAT|id|12345')
    Location { value: String },

    /// Time period in the format PERIOD|CODE (e.g. '2020/2021|AY')
    TimePeriod { value: String },

    /// Sort in the format FIELD|DIRECTION (e.g. 'timePeriod|Desc')
    Sort { value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
