pub mod db;
pub mod generation_llm;
pub mod memory;
pub mod pdf;

pub use db::DbAdapter;
pub use generation_llm::OpenAiGenerationAdapter;
pub use memory::InMemoryFeedbackAdapter;
pub use pdf::LopdfPageExtractor;
