pub mod llm;

pub use llm::{CompletionModel, LlmClient, OfflineModel};
