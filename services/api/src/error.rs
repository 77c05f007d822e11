//! services/api/src/error.rs
//!
//! Startup failures of the API binary. Request-time errors never reach this type;
//! handlers map `CoreError` to a status code instead.

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The feedback database could not be reached.
    #[error("Could not connect to the feedback database: {0}")]
    DatabaseConnect(#[source] sqlx::Error),

    /// The feedback table could not be created or verified.
    #[error("Could not prepare feedback table '{table}': {source}")]
    Schema {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Could not bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}
