//! services/api/src/adapters/pdf.rs
//!
//! Implements the `PageExtractor` port with `lopdf`.

use lopdf::Document;
use smart_city_core::ports::{PageExtractor, PortError, PortResult};
use tracing::{debug, warn};

#[derive(Clone, Default)]
pub struct LopdfPageExtractor;

impl LopdfPageExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl PageExtractor for LopdfPageExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> PortResult<Vec<String>> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| PortError::Malformed(format!("Failed to parse PDF: {}", e)))?;

        if doc.is_encrypted() {
            return Err(PortError::Malformed("the PDF is encrypted".to_string()));
        }

        let pages = doc.get_pages();
        debug!(page_count = pages.len(), "extracting PDF text");

        // Page numbers come back in document order from the BTreeMap.
        pages
            .keys()
            .map(|&page_number| {
                doc.extract_text(&[page_number]).map_err(|e| {
                    warn!(page_number, "failed to extract page text: {}", e);
                    PortError::Malformed(format!("page {}: {}", page_number, e))
                })
            })
            .collect()
    }
}
