//! Abstractions for talking to a local large language model server.
//!
//! The `llm` crate defines a [`LLMClient`] trait along with the concrete
//! [`OllamaClient`]. [`runner`] bounds streaming generations with per-chunk
//! and whole-call deadlines, and [`catalog`] caches the list of installed
//! models for a short time.

pub mod catalog;
pub mod client;
pub mod runner;
pub mod traits;

pub use catalog::{ModelCatalog, DEFAULT_MODELS};
pub use client::OllamaClient;
pub use runner::{collect_with_timeouts, generate_bounded, TimeoutPolicy};
pub use traits::{ChunkStream, GenerationOptions, LLMClient, LLMError};
