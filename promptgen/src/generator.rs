use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use llm::{generate_bounded, GenerationOptions, LLMClient, LLMError, TimeoutPolicy};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::cleanup::finalize_output;
use crate::render::{render, PromptFields, RenderError};
use crate::styles::{StyleLibrary, DEFAULT_STYLE};

pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.1..=1.0;
pub const TOP_P_RANGE: RangeInclusive<f32> = 0.1..=1.0;
pub const SLIDER_STEP: f32 = 0.1;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.9;
pub const DEFAULT_MODEL: &str = "qwen3:8b";

/// Name of the node's single string output.
pub const OUTPUT_NAME: &str = "prompt";

/// Inputs of one `generate` call.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerateRequest {
    pub description: String,
    pub style: String,
    pub emphasis: Option<String>,
    pub mood: Option<String>,
    pub temperature: f32,
    pub top_p: f32,
    pub include_reasoning: bool,
    pub model: String,
}

impl GenerateRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            style: DEFAULT_STYLE.into(),
            emphasis: None,
            mood: None,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            include_reasoning: false,
            model: DEFAULT_MODEL.into(),
        }
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn emphasis(mut self, emphasis: impl Into<String>) -> Self {
        self.emphasis = Some(emphasis.into());
        self
    }

    pub fn mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn include_reasoning(mut self, include: bool) -> Self {
        self.include_reasoning = include;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sampling options clamped to their declared ranges.
    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: clamp(self.temperature, &TEMPERATURE_RANGE, DEFAULT_TEMPERATURE),
            top_p: clamp(self.top_p, &TOP_P_RANGE, DEFAULT_TOP_P),
        }
    }
}

fn clamp(value: f32, range: &RangeInclusive<f32>, fallback: f32) -> f32 {
    if value.is_nan() {
        return fallback;
    }
    value.clamp(*range.start(), *range.end())
}

/// Kind and constraints of a declared input.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    Text { multiline: bool, placeholder: &'static str },
    Choice { options: Vec<String>, default: String },
    Float { min: f32, max: f32, step: f32, default: f32 },
    Boolean { default: bool, label_on: &'static str, label_off: &'static str },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InputSpec {
    pub name: &'static str,
    pub required: bool,
    #[serde(flatten)]
    pub kind: InputKind,
}

/// The inputs the generator accepts, given the available styles and models.
pub fn declare_inputs(styles: &StyleLibrary, models: &[String]) -> Vec<InputSpec> {
    let style_keys: Vec<String> = styles.keys().into_iter().map(String::from).collect();
    let default_style = if style_keys.iter().any(|k| k == DEFAULT_STYLE) {
        DEFAULT_STYLE.to_string()
    } else {
        style_keys.first().cloned().unwrap_or_default()
    };
    let default_model = models.first().cloned().unwrap_or_else(|| DEFAULT_MODEL.into());
    vec![
        InputSpec {
            name: "description",
            required: true,
            kind: InputKind::Text {
                multiline: true,
                placeholder: "e.g., a mystical forest at twilight",
            },
        },
        InputSpec {
            name: "style",
            required: true,
            kind: InputKind::Choice {
                options: style_keys,
                default: default_style,
            },
        },
        InputSpec {
            name: "model",
            required: true,
            kind: InputKind::Choice {
                options: models.to_vec(),
                default: default_model,
            },
        },
        InputSpec {
            name: "emphasis",
            required: false,
            kind: InputKind::Text {
                multiline: false,
                placeholder: "e.g., lighting, composition, details",
            },
        },
        InputSpec {
            name: "mood",
            required: false,
            kind: InputKind::Text {
                multiline: false,
                placeholder: "e.g., mysterious, serene, dramatic",
            },
        },
        InputSpec {
            name: "temperature",
            required: false,
            kind: InputKind::Float {
                min: *TEMPERATURE_RANGE.start(),
                max: *TEMPERATURE_RANGE.end(),
                step: SLIDER_STEP,
                default: DEFAULT_TEMPERATURE,
            },
        },
        InputSpec {
            name: "top_p",
            required: false,
            kind: InputKind::Float {
                min: *TOP_P_RANGE.start(),
                max: *TOP_P_RANGE.end(),
                step: SLIDER_STEP,
                default: DEFAULT_TOP_P,
            },
        },
        InputSpec {
            name: "include_reasoning",
            required: false,
            kind: InputKind::Boolean {
                default: false,
                label_on: "Show Reasoning",
                label_off: "Hide Reasoning",
            },
        },
    ]
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("⚠️ Please enter an image description.")]
    EmptyDescription,
    #[error("⚠️ Generation returned empty result.")]
    EmptyResult,
    #[error("⚠️ Generation timed out after {}", seconds(.0))]
    TimedOut(Duration),
    #[error("⚠️ Ollama error: {0}")]
    Llm(LLMError),
    #[error("⚠️ Error: {0}")]
    Render(#[from] RenderError),
}

impl From<LLMError> for GenerateError {
    fn from(e: LLMError) -> Self {
        match e {
            LLMError::ChunkTimeout(d) | LLMError::TotalTimeout(d) => GenerateError::TimedOut(d),
            other => GenerateError::Llm(other),
        }
    }
}

fn seconds(d: &Duration) -> String {
    if d.subsec_nanos() == 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{:.1}s", d.as_secs_f32())
    }
}

/// Expands short descriptions into detailed image prompts.
pub struct PromptGenerator {
    client: Arc<dyn LLMClient>,
    styles: StyleLibrary,
    policy: TimeoutPolicy,
}

impl PromptGenerator {
    pub fn new(client: Arc<dyn LLMClient>, styles: StyleLibrary, policy: TimeoutPolicy) -> Self {
        Self {
            client,
            styles,
            policy,
        }
    }

    /// Render the model request for `req` without sending it.
    pub fn render_request(&self, req: &GenerateRequest) -> Result<String, GenerateError> {
        let fields = PromptFields::new(&req.description, req.emphasis.as_deref(), req.mood.as_deref());
        if fields.description.is_empty() {
            return Err(GenerateError::EmptyDescription);
        }
        let template = self.styles.template_for(&req.style);
        Ok(render(&template, &fields)?)
    }

    pub async fn try_generate(&self, req: &GenerateRequest) -> Result<String, GenerateError> {
        let prompt = self.render_request(req)?;
        let options = req.options();
        info!(
            style = %req.style,
            model = %req.model,
            temperature = options.temperature,
            top_p = options.top_p,
            "generating prompt"
        );
        let raw = generate_bounded(self.client.as_ref(), &req.model, &prompt, options, self.policy)
            .await?;
        let output = finalize_output(&raw, req.include_reasoning);
        if output.is_empty() {
            return Err(GenerateError::EmptyResult);
        }
        info!("generated {} characters", output.chars().count());
        Ok(output)
    }

    /// Generate a prompt. Failures are reported as the returned text.
    pub async fn generate(&self, req: &GenerateRequest) -> String {
        match self.try_generate(req).await {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!("generation failed: {e}");
                e.to_string()
            }
        }
    }
}
