//! crates/smart_city_core/src/error.rs
//!
//! The error taxonomy reported by the core services. Every failure is scoped to
//! the single operation that produced it.

use crate::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Could not extract text from the document: {0}")]
    ExtractionFailed(String),

    #[error("Document is not valid UTF-8 text: {0}")]
    DecodeError(String),

    #[error("Nothing to process: {0}")]
    EmptyInput(String),

    #[error("The generation service failed: {0}")]
    Upstream(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("The feedback store failed: {0}")]
    Persistence(String),
}

impl CoreError {
    pub(crate) fn upstream(err: PortError) -> Self {
        Self::Upstream(err.to_string())
    }

    pub(crate) fn persistence(err: PortError) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// A convenience type alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;
