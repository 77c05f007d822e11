//! services/api/src/config.rs
//!
//! Startup configuration for the Smart City Assistant API.
//!
//! Read once from the environment (plus `.env` during local development) and
//! validated before any adapter is built. Missing credentials stop the process.

use std::net::SocketAddr;
use tracing::Level;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_FEEDBACK_TABLE: &str = "citizen_feedback";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_GENERATION_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_GENERATION_MODEL: &str = "ibm/granite-13b-instruct-v2";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Credentials and options for the generation endpoint.
#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub api_key: String,
    pub base_url: String,
    pub project_id: Option<String>,
    pub model: String,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub feedback_table: String,
    pub log_level: Level,
    pub max_upload_bytes: usize,
    pub generation: GenerationConfig,
}

impl Config {
    /// Reads the process environment, after merging `.env` outside of tests.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Builds and validates the configuration from any key/value source.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingVar(key.to_string()))
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or_default = |key: &str, default: &str| optional(key).unwrap_or_else(|| default.to_string());
        let invalid = |key: &str, reason: String| ConfigError::InvalidValue(key.to_string(), reason);

        // Server and feedback store
        let bind_address: SocketAddr = or_default("BIND_ADDRESS", DEFAULT_BIND_ADDRESS)
            .parse()
            .map_err(|e: std::net::AddrParseError| invalid("BIND_ADDRESS", e.to_string()))?;

        let database_url = required("DATABASE_URL")?;

        let feedback_table = or_default("FEEDBACK_TABLE", DEFAULT_FEEDBACK_TABLE);
        if !is_sql_identifier(&feedback_table) {
            return Err(invalid(
                "FEEDBACK_TABLE",
                format!("'{feedback_table}' is not a plain SQL identifier"),
            ));
        }

        let level_name = or_default("RUST_LOG", "INFO");
        let log_level: Level = level_name
            .parse()
            .map_err(|_| invalid("RUST_LOG", format!("'{level_name}' is not a log level")))?;

        let max_upload_bytes: usize = match optional("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("MAX_UPLOAD_BYTES", e.to_string()))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        // Generation endpoint
        let generation = GenerationConfig {
            api_key: required("GENERATION_API_KEY")?,
            base_url: or_default("GENERATION_BASE_URL", DEFAULT_GENERATION_BASE_URL),
            project_id: optional("GENERATION_PROJECT_ID"),
            model: or_default("GENERATION_MODEL", DEFAULT_GENERATION_MODEL),
        };
        if !generation.base_url.starts_with("http://") && !generation.base_url.starts_with("https://") {
            return Err(invalid(
                "GENERATION_BASE_URL",
                format!("'{}' is not an http(s) URL", generation.base_url),
            ));
        }

        Ok(Self {
            bind_address,
            database_url,
            feedback_table,
            log_level,
            max_upload_bytes,
            generation,
        })
    }
}

fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name.len() <= 63
}
