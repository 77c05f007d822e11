//! crates/smart_city_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

//=========================================================================================
// Documents
//=========================================================================================

/// The file types the extractor knows how to turn into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Pdf,
}

impl DocumentKind {
    /// Resolves a declared type tag. Accepts the short tags (`text`, `pdf`),
    /// MIME types and file extensions, ignoring case.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().trim_start_matches('.').to_ascii_lowercase();
        match tag.as_str() {
            "text" | "txt" | "text/plain" => Some(Self::Text),
            "pdf" | "application/pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
        }
    }
}

/// A file uploaded for summarization. Lives only for the request that carried it.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// The type as declared by the client (MIME type, extension or short tag).
    pub declared_type: String,
}

impl UploadedDocument {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>, declared_type: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            declared_type: declared_type.into(),
        }
    }
}

//=========================================================================================
// Generation
//=========================================================================================

/// Decoding options forwarded to the generation endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl GenerationParams {
    pub const SUMMARY: Self = Self {
        max_new_tokens: 350,
        temperature: 0.5,
        top_p: 0.9,
    };

    pub const CHAT: Self = Self {
        max_new_tokens: 512,
        temperature: 0.6,
        top_p: 0.8,
    };
}

/// A request to summarize already-extracted text.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub source_text: String,
    pub max_length_hint: Option<u32>,
}

//=========================================================================================
// Chat
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One entry of a chat transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

//=========================================================================================
// Feedback
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackStatus {
    Open,
    InReview,
    Resolved,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InReview => "in_review",
            Self::Resolved => "resolved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "in_review" => Some(Self::InReview),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

impl fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feedback form as submitted by a citizen, before validation.
#[derive(Debug, Clone, Default)]
pub struct NewFeedback {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub category: String,
    pub location: Option<String>,
    pub description: String,
}

/// A stored feedback report. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub citizen: String,
    pub contact: String,
    pub category: String,
    pub location: String,
    pub description: String,
    pub status: FeedbackStatus,
    pub created_at: DateTime<Utc>,
}
