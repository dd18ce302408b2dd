pub mod models;
pub mod normalize;
pub mod prompts;
pub mod providers;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    /// The call itself failed: connection, non-2xx status, unreadable body.
    #[error("{0}")]
    Request(String),
    /// The provider answered but `choices[0].message.content` is unusable.
    #[error("{0}")]
    InvalidResponse(String),
    /// The model's text is not the JSON document we asked for.
    #[error("{0}")]
    Parse(String),
    #[error("LLM configuration error: {0}")]
    Config(String),
    #[error("Prompt rendering failed: {0}")]
    Prompt(#[from] minijinja::Error),
}

/// One chat-completion round trip. Returns the provider's raw reply body.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        temperature: Option<f32>,
    ) -> Result<serde_json::Value, LlmError>;

    /// Model id sent to the provider, for logging.
    fn model(&self) -> &str;
}
