use async_trait::async_trait;
use futures_core::Stream;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// Stream of generated text chunks.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, LLMError>> + Send>>;

#[derive(Debug, Error)]
pub enum LLMError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response")]
    InvalidResponse,
    #[error("model not found")]
    ModelNotFound,
    #[error("no chunk received within {0:?}")]
    ChunkTimeout(Duration),
    #[error("generation exceeded {0:?}")]
    TotalTimeout(Duration),
}

/// Sampling options forwarded to the model server.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn stream_generate(
        &self,
        model: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<ChunkStream, LLMError>;

    /// Names of the models installed on the server.
    async fn list_models(&self) -> Result<Vec<String>, LLMError>;
}
