//! HTTP client for interacting with an Ollama language model server.
//!
//! This module provides the [`OllamaClient`] type which implements the
//! [`LLMClient`] trait. It streams completions from `/api/generate` and
//! lists installed models from `/api/tags` on a running Ollama instance.

use crate::traits::{ChunkStream, GenerationOptions, LLMClient, LLMError};
use async_trait::async_trait;
use tokio_stream::StreamExt;

use ollama_rs::{generation::completion::request::GenerationRequest, models::ModelOptions, Ollama};

pub struct OllamaClient {
    inner: Ollama,
}

impl OllamaClient {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, LLMError> {
        let inner = Ollama::try_new(base_url.as_ref())
            .map_err(|e| LLMError::Network(format!("invalid url {}: {e}", base_url.as_ref())))?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn stream_generate(
        &self,
        model: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<ChunkStream, LLMError> {
        let req = GenerationRequest::new(model.to_string(), prompt.to_string()).options(
            ModelOptions::default()
                .temperature(options.temperature)
                .top_p(options.top_p),
        );
        let stream = self
            .inner
            .generate_stream(req)
            .await
            .map_err(|e| LLMError::Network(e.to_string()))?;
        let mapped = stream.map(|res| {
            res.map_err(|e| LLMError::Network(e.to_string()))
                .map(|chunk| {
                    chunk
                        .into_iter()
                        .map(|c| c.response)
                        .collect::<Vec<_>>()
                        .join("")
                })
        });
        Ok(Box::pin(mapped))
    }

    async fn list_models(&self) -> Result<Vec<String>, LLMError> {
        let models = self
            .inner
            .list_local_models()
            .await
            .map_err(|e| LLMError::Network(e.to_string()))?;
        Ok(models.into_iter().map(|m| m.name).collect())
    }
}
