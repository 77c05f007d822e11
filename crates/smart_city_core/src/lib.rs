pub mod chat;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod feedback;
pub mod metrics;
pub mod ports;
pub mod roles;
pub mod summarizer;

#[cfg(test)]
pub(crate) mod testing;

pub use chat::ChatSession;
pub use domain::{
    ChatRole, ChatTurn, DocumentKind, FeedbackRecord, FeedbackStatus, GenerationParams, NewFeedback,
    SummaryRequest, UploadedDocument,
};
pub use error::{CoreError, CoreResult};
pub use extractor::DocumentExtractor;
pub use feedback::FeedbackStore;
pub use ports::{FeedbackRepository, PageExtractor, PortError, PortResult, TextGenerationService};
pub use roles::{Role, View};
pub use summarizer::SummarizationClient;
