//! services/api/src/adapters/generation_llm.rs
//!
//! This module contains the adapter for the hosted text-generation endpoint.
//! It implements the `TextGenerationService` port from the `core` crate against any
//! OpenAI-compatible chat-completions API.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use smart_city_core::{
    domain::GenerationParams,
    ports::{PortError, PortResult, TextGenerationService},
};
use tracing::debug;

use crate::config::GenerationConfig;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiGenerationAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiGenerationAdapter {
    /// Creates a new `OpenAiGenerationAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Builds the client from the loaded configuration.
    pub fn from_config(config: &GenerationConfig) -> Self {
        let mut openai_config = OpenAIConfig::new()
            .with_api_base(&config.base_url)
            .with_api_key(&config.api_key);
        if let Some(project_id) = &config.project_id {
            openai_config = openai_config.with_project_id(project_id);
        }
        Self::new(Client::with_config(openai_config), config.model.clone())
    }
}

/// Maps client errors onto the port's failure classes.
fn map_openai_error(err: OpenAIError) -> PortError {
    match err {
        OpenAIError::Reqwest(e) => PortError::Unavailable(e.to_string()),
        OpenAIError::ApiError(e) => PortError::Rejected(e.to_string()),
        e @ OpenAIError::JSONDeserialize(..) => PortError::Malformed(e.to_string()),
        e => PortError::Unexpected(e.to_string()),
    }
}

//=========================================================================================
// `TextGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextGenerationService for OpenAiGenerationAdapter {
    /// Sends the prompt as a single user message and returns the first choice's text.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> PortResult<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .max_completion_tokens(params.max_new_tokens)
            .temperature(params.temperature)
            .top_p(params.top_p)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!(model = %self.model, prompt_chars = prompt.len(), "calling generation endpoint");

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        // Extract the text content from the first choice in the response.
        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                Ok(content.trim().to_string())
            } else {
                Err(PortError::Malformed(
                    "Generation response contained no text content.".to_string(),
                ))
            }
        } else {
            Err(PortError::Malformed(
                "Generation endpoint returned no choices in its response.".to_string(),
            ))
        }
    }
}
