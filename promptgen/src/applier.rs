use clap::ValueEnum;
use serde::Serialize;

use crate::presets::{style_prompt, StyleMode};

/// Where the preset keywords go relative to the prompt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Position {
    Prefix,
    #[default]
    Suffix,
    Wrap,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Emphasis {
    Low,
    #[default]
    Medium,
    High,
}

impl Emphasis {
    pub fn as_str(self) -> &'static str {
        match self {
            Emphasis::Low => "low",
            Emphasis::Medium => "medium",
            Emphasis::High => "high",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StyledPrompt {
    pub styled_prompt: String,
    pub style_keywords: String,
}

/// Combine `prompt` with the keywords of the preset named `style`.
///
/// Like the generator node this never fails: an unknown style yields an
/// error message in `styled_prompt` and empty keywords.
pub fn apply_style(
    prompt: &str,
    style: &str,
    position: Position,
    emphasis: Emphasis,
    include_technical: bool,
) -> StyledPrompt {
    let prompt = prompt.trim();
    let style = match style.trim() {
        "" => StyleMode::Cinematic.as_str(),
        s => s,
    };

    let mode = match StyleMode::parse(style) {
        Ok(mode) => mode,
        Err(e) => {
            return StyledPrompt {
                styled_prompt: format!("[StyleApplier] Error: {e}"),
                style_keywords: String::new(),
            }
        }
    };

    let keywords = style_prompt(mode, Some(emphasis.as_str()), include_technical);
    if prompt.is_empty() {
        return StyledPrompt {
            styled_prompt: keywords.clone(),
            style_keywords: keywords,
        };
    }

    let styled_prompt = match position {
        Position::Prefix => format!("{keywords}, {prompt}"),
        Position::Suffix => format!("{prompt}, {keywords}"),
        Position::Wrap => format!("{keywords}, {prompt}, {keywords}"),
    };
    StyledPrompt {
        styled_prompt,
        style_keywords: keywords,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_by_default() {
        let out = apply_style("a red fox", "cinematic", Position::default(), Emphasis::default(), true);
        assert!(out.styled_prompt.starts_with("a red fox, emphasis on medium, cinematic shot"));
        assert!(out.styled_prompt.ends_with(&out.style_keywords));
    }

    #[test]
    fn prefix_and_wrap() {
        let pre = apply_style("fox", "still_image", Position::Prefix, Emphasis::Low, false);
        assert_eq!(pre.styled_prompt, format!("{}, fox", pre.style_keywords));
        let wrap = apply_style("fox", "still_image", Position::Wrap, Emphasis::High, false);
        assert_eq!(
            wrap.styled_prompt,
            format!("{k}, fox, {k}", k = wrap.style_keywords)
        );
    }

    #[test]
    fn empty_prompt_returns_keywords_twice() {
        let out = apply_style("   ", "cinematic", Position::Wrap, Emphasis::Medium, true);
        assert_eq!(out.styled_prompt, out.style_keywords);
        assert!(!out.style_keywords.is_empty());
    }

    #[test]
    fn blank_style_means_cinematic() {
        let out = apply_style("fox", "", Position::Suffix, Emphasis::Medium, true);
        assert!(out.style_keywords.contains("cinematic shot"));
    }

    #[test]
    fn style_name_ignores_case() {
        let out = apply_style("fox", "Still_Image", Position::Suffix, Emphasis::Medium, true);
        assert!(out.style_keywords.contains("professional photography"));
    }

    #[test]
    fn unknown_style_reports_error() {
        let out = apply_style("fox", "watercolor", Position::Suffix, Emphasis::Medium, true);
        assert_eq!(
            out.styled_prompt,
            "[StyleApplier] Error: Unknown style 'watercolor'. Available: cinematic, still_image"
        );
        assert!(out.style_keywords.is_empty());
    }
}
