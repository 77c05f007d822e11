//! crates/smart_city_core/src/chat.rs
//!
//! The conversational assistant. A `ChatSession` owns the transcript of one UI
//! session; it is created when the session starts, cleared by `reset` and dropped
//! when the session ends. Nothing here is persisted.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{ChatRole, ChatTurn, GenerationParams};
use crate::error::{CoreError, CoreResult};
use crate::ports::TextGenerationService;
use crate::roles::Role;

const SYSTEM_PROMPT: &str = r#"You are a helpful and knowledgeable Smart City Assistant. Your primary role is to provide information and advice on topics related to:
- Sustainable urban development
- Smart city technologies (e.g., IoT, AI applications in urban environments)
- Environmental policies and green infrastructure
- Urban planning, citizen engagement, and public services in a smart city context

Please adhere to the following guidelines:
1.  **Be concise and clear**: Provide direct and easy-to-understand answers.
2.  **Use bullet points**: Where appropriate, structure information using bullet points for readability.
3.  **Maintain a friendly and professional tone**: Be approachable and helpful.
4.  **Do not invent information**: If you don't know the answer or if the question is outside your defined scope, politely state that you cannot provide specific details.
5.  **Focus on general principles**: Avoid making specific policy recommendations for a particular city unless explicit context about that city's situation is provided.
6.  **Summarize complex topics**: Break down complex ideas into understandable terms for a broad audience (citizens, city planners, administrators).

Now, based on the conversation history, provide a helpful response.
"#;

/// Suggested openers shown next to the chat.
pub const EXAMPLE_PROMPTS: [&str; 3] = [
    "What are the key components of a smart city?",
    "How can IoT improve waste management?",
    "Suggest some green infrastructure policies for urban areas.",
];

#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    transcript: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new(role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            created_at: Utc::now(),
            transcript: Vec::new(),
        }
    }

    /// The turns so far, oldest first.
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Forgets the conversation. The session itself stays usable.
    pub fn reset(&mut self) {
        self.transcript.clear();
    }

    /// Records the user's message, asks the generation endpoint for a reply and
    /// records that too.
    ///
    /// If the endpoint fails the user turn is kept and no assistant turn is added,
    /// so a resubmission sees the same history.
    pub async fn append_and_respond(
        &mut self,
        generator: &dyn TextGenerationService,
        user_message: &str,
    ) -> CoreResult<ChatTurn> {
        if user_message.trim().is_empty() {
            return Err(CoreError::EmptyInput("the message is empty".to_string()));
        }

        self.transcript.push(ChatTurn::user(user_message));
        let prompt = build_chat_prompt(&self.transcript);
        debug!(session_id = %self.id, turns = self.transcript.len(), "sending chat prompt");

        let reply = generator
            .generate(&prompt, &GenerationParams::CHAT)
            .await
            .map_err(|e| {
                warn!(session_id = %self.id, "chat generation failed: {}", e);
                CoreError::upstream(e)
            })?;

        let turn = ChatTurn::assistant(reply.trim());
        self.transcript.push(turn.clone());
        Ok(turn)
    }
}

fn build_chat_prompt(transcript: &[ChatTurn]) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);
    for turn in transcript {
        let label = match turn.role {
            ChatRole::User => "Input",
            ChatRole::Assistant => "Response",
        };
        prompt.push('\n');
        prompt.push_str(label);
        prompt.push_str(": ");
        prompt.push_str(&turn.content);
    }
    prompt.push_str("\nResponse:");
    prompt
}
