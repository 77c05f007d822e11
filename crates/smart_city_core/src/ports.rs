//! crates/smart_city_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;

use crate::domain::{FeedbackRecord, GenerationParams};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The external service could not be reached.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    /// The external service answered but refused the request.
    #[error("Request rejected: {0}")]
    Rejected(String),
    /// The external service answered with something we could not interpret.
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Sends a single prompt to the generation endpoint and returns the generated text.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> PortResult<String>;
}

/// The document parsing collaborator. Parsing is CPU-bound and local, so this port is synchronous.
pub trait PageExtractor: Send + Sync {
    /// Returns the text of every page in document order.
    fn extract_pages(&self, bytes: &[u8]) -> PortResult<Vec<String>>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Atomically inserts one record.
    async fn insert(&self, record: &FeedbackRecord) -> PortResult<()>;

    /// Returns up to `limit` records, newest first.
    async fn list_recent(&self, limit: usize) -> PortResult<Vec<FeedbackRecord>>;
}
