//! crates/smart_city_core/src/extractor.rs
//!
//! Turns an uploaded document into plain text, dispatching on its declared type.

use std::sync::Arc;
use tracing::debug;

use crate::domain::{DocumentKind, UploadedDocument};
use crate::error::{CoreError, CoreResult};
use crate::ports::PageExtractor;

/// Placed between the text of consecutive PDF pages.
pub const PAGE_SEPARATOR: &str = "\n\n";

#[derive(Clone)]
pub struct DocumentExtractor {
    pages: Arc<dyn PageExtractor>,
}

impl DocumentExtractor {
    pub fn new(pages: Arc<dyn PageExtractor>) -> Self {
        Self { pages }
    }

    /// Extracts the document's text.
    ///
    /// An empty string is a valid outcome (e.g. a scanned PDF with no text layer).
    /// Callers should check [`has_content`] before sending the result anywhere.
    pub fn extract(&self, document: &UploadedDocument) -> CoreResult<String> {
        let kind = DocumentKind::from_tag(&document.declared_type)
            .ok_or_else(|| CoreError::UnsupportedFormat(document.declared_type.clone()))?;

        debug!(
            file_name = %document.file_name,
            kind = kind.as_str(),
            bytes = document.bytes.len(),
            "extracting document text"
        );

        match kind {
            DocumentKind::Text => std::str::from_utf8(&document.bytes)
                .map(str::to_owned)
                .map_err(|e| CoreError::DecodeError(e.to_string())),
            DocumentKind::Pdf => {
                let pages = self
                    .pages
                    .extract_pages(&document.bytes)
                    .map_err(|e| CoreError::ExtractionFailed(e.to_string()))?;
                Ok(join_pages(pages))
            }
        }
    }
}

/// Returns true when the text holds anything worth summarizing.
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}

fn join_pages(pages: Vec<String>) -> String {
    pages
        .into_iter()
        .filter(|page| has_content(page))
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}
