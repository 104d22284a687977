use minijinja::{context, Environment};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Values substituted into a style template.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PromptFields {
    pub description: String,
    pub emphasis: Option<String>,
    pub mood: Option<String>,
}

impl PromptFields {
    /// Trims every field and turns blank optional fields into `None`.
    pub fn new(description: &str, emphasis: Option<&str>, mood: Option<&str>) -> Self {
        Self {
            description: description.trim().to_string(),
            emphasis: non_blank(emphasis),
            mood: non_blank(mood),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Render `template` with `fields`. Absent optional fields are falsy, so
/// their `{% if %}` blocks drop out.
pub fn render(template: &str, fields: &PromptFields) -> Result<String, RenderError> {
    let env = Environment::new();
    let out = env.render_str(
        template,
        context! {
            description => &fields.description,
            emphasis => &fields.emphasis,
            mood => &fields.mood,
        },
    )?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "Prompt for: {{ description }}\n{% if emphasis %}Focus: {{ emphasis }}{% endif %}\n{% if mood %}Mood: {{ mood }}{% endif %}";

    #[test]
    fn substitutes_fields_verbatim() {
        let fields = PromptFields::new("a <mystical> forest & river", Some("lighting"), Some("serene"));
        let out = render(TEMPLATE, &fields).unwrap();
        assert_eq!(
            out,
            "Prompt for: a <mystical> forest & river\nFocus: lighting\nMood: serene"
        );
    }

    #[test]
    fn missing_fields_drop_their_blocks() {
        let fields = PromptFields::new("a castle", None, Some("   "));
        let out = render(TEMPLATE, &fields).unwrap();
        assert_eq!(out, "Prompt for: a castle\n\n");
        assert!(!out.contains("Focus"));
        assert!(!out.contains("Mood"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let fields = PromptFields::new("a castle", Some("towers"), None);
        assert_eq!(render(TEMPLATE, &fields).unwrap(), render(TEMPLATE, &fields).unwrap());
    }

    #[test]
    fn malformed_template_is_an_error() {
        let fields = PromptFields::new("a castle", None, None);
        assert!(render("{% if description %}unterminated", &fields).is_err());
    }
}
