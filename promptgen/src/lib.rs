//! Image prompt generation on top of a local Ollama server.
//!
//! [`PromptGenerator`] renders a style template around a short
//! description, streams the model's answer under a [`llm::TimeoutPolicy`],
//! and strips reasoning markup from the result. [`apply_style`] is the
//! model-free companion that appends keyword presets to a prompt.

pub mod applier;
pub mod cleanup;
pub mod config;
pub mod generator;
pub mod logging;
pub mod presets;
pub mod render;
pub mod styles;

pub use crate::applier::{apply_style, Emphasis, Position, StyledPrompt};
pub use crate::cleanup::{extract_final_prompt, finalize_output};
pub use crate::config::Settings;
pub use crate::generator::{declare_inputs, GenerateError, GenerateRequest, PromptGenerator, OUTPUT_NAME};
pub use crate::logging::init_logging;
pub use crate::presets::{style_prompt, StyleMode};
pub use crate::render::{render, PromptFields};
pub use crate::styles::{StyleLibrary, StyleTemplate};
