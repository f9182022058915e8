//! Error types for SDP

use thiserror::Error;

use crate::query::QueryError;

/// Result type alias for SDP operations
pub type Result<T> = std::result::Result<T, SdpError>;

/// Main error type for SDP
#[derive(Error, Debug)]
pub enum SdpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),
}
