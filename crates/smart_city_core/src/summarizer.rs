//! crates/smart_city_core/src/summarizer.rs
//!
//! Builds the policy summarization prompt and sends it to the generation endpoint.
//! One attempt per call; failures are reported as-is and the caller decides whether
//! to resubmit. Over-length documents are not split, the endpoint's own limit applies.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{GenerationParams, SummaryRequest};
use crate::error::{CoreError, CoreResult};
use crate::extractor::has_content;
use crate::ports::TextGenerationService;

const SUMMARY_PROMPT_TEMPLATE: &str = r#"
As a policy analyst assistant, summarize the following policy document into a concise, citizen-friendly version.
Focus on the key objectives, stakeholders, and outcomes. Use clear and simple language and bullet points.

Document:
---
{document}
---

Summary:
"#;

#[derive(Clone)]
pub struct SummarizationClient {
    generator: Arc<dyn TextGenerationService>,
    params: GenerationParams,
}

impl SummarizationClient {
    pub fn new(generator: Arc<dyn TextGenerationService>) -> Self {
        Self {
            generator,
            params: GenerationParams::SUMMARY,
        }
    }

    /// Overrides the default decoding parameters.
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Summarizes `text`. `max_length_hint` caps the number of generated tokens.
    pub async fn summarize(&self, text: &str, max_length_hint: Option<u32>) -> CoreResult<String> {
        if !has_content(text) {
            return Err(CoreError::EmptyInput(
                "the document contains no text to summarize".to_string(),
            ));
        }

        let mut params = self.params;
        if let Some(max) = max_length_hint.filter(|max| *max > 0) {
            params.max_new_tokens = max;
        }

        let prompt = build_summary_prompt(text);
        info!(chars = text.len(), max_new_tokens = params.max_new_tokens, "requesting summary");

        self.generator
            .generate(&prompt, &params)
            .await
            .map_err(|e| {
                warn!("summary generation failed: {}", e);
                CoreError::upstream(e)
            })
    }

    pub async fn handle(&self, request: &SummaryRequest) -> CoreResult<String> {
        self.summarize(&request.source_text, request.max_length_hint).await
    }
}

fn build_summary_prompt(document: &str) -> String {
    SUMMARY_PROMPT_TEMPLATE.replace("{document}", document)
}
