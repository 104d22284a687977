//! Strips model reasoning and decoration from generated prompts.
//!
//! Reasoning models emit their chain of thought before the answer, either
//! as `<think>…</think>` tags over the API or as a
//! `Thinking...` / `...done thinking.` block on the command line. Only
//! the text that follows is the prompt.

use once_cell::sync::Lazy;
use regex::Regex;

static THINKING_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Thinking\.\.\..*?\.\.\.done thinking\.\s*").unwrap());

static THINK_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<think>.*?</think>\s*|<thinking>.*?</thinking>\s*").unwrap()
});

static OPEN_THINK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*<think(?:ing)?>").unwrap());

static PROMPT_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*(?:(?:Stable Diffusion )?Prompt|Prompt for Image Generation):\*\*\s*").unwrap()
});

/// Return only the generated prompt from raw model output.
///
/// ```
/// use promptgen::extract_final_prompt;
///
/// let raw = "<think>\nthe user wants a forest\n</think>\n\n**Prompt:** \"misty forest, volumetric light\"";
/// assert_eq!(extract_final_prompt(raw), "misty forest, volumetric light");
/// ```
pub fn extract_final_prompt(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = THINKING_BLOCK.replace_all(text, "");
    let text = THINK_TAGS.replace_all(&text, "");
    // Reasoning that never closed means no answer was produced.
    if OPEN_THINK_TAG.is_match(&text) {
        return String::new();
    }
    let text = PROMPT_LABEL.replace_all(&text, "");
    text.trim().trim_matches('"').trim().to_string()
}

/// Cleanup applied to a finished generation, honouring the reasoning toggle.
pub fn finalize_output(raw: &str, include_reasoning: bool) -> String {
    if include_reasoning {
        raw.trim().to_string()
    } else {
        extract_final_prompt(raw)
    }
}
