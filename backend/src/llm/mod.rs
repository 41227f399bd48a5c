//! Completion API boundary.

mod openai;

pub use openai::{OpenAiClient, SYSTEM_PROMPT, TEMPERATURE};

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
    /// Non-2xx response; `message` is `error.message` from the body when present.
    #[error("Completion API returned {status}")]
    Api { status: u16, message: Option<String> },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, CompletionError>;

/// Generates an answer for a single question.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// `Ok(None)` means the API succeeded but returned no content.
    async fn complete(&self, question: &str) -> Result<Option<String>>;
}
