//! Named style templates used to phrase the request sent to the model.
//!
//! Templates use Jinja syntax: `{{ description }}` plus optional
//! `{% if emphasis %}` and `{% if mood %}` blocks. A YAML file can
//! replace the built-in set:
//!
//! ```yaml
//! cinematic:
//!   name: Cinematic
//!   description: Dramatic lighting
//!   template: "Write a prompt for: {{ description }}"
//! sketch: "Pencil sketch of {{ description }}"
//! ```

use std::path::Path;

use indoc::indoc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_STYLE: &str = "cinematic";

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("failed to read templates: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid templates file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("templates file defines no styles")]
    Empty,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleTemplate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub template: String,
}

impl StyleTemplate {
    fn builtin(name: &str, description: &str, template: &str) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            template: template.into(),
        }
    }
}

/// A style in a templates file is either a full entry or a bare template.
#[derive(Deserialize)]
#[serde(untagged)]
enum StyleEntry {
    Full(StyleTemplate),
    Bare(String),
}

#[derive(Clone, Debug)]
pub struct StyleLibrary {
    styles: Vec<(String, StyleTemplate)>,
}

impl Default for StyleLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StyleLibrary {
    /// The seven styles shipped with the crate.
    pub fn builtin() -> Self {
        let styles = builtin_styles()
            .into_iter()
            .map(|(k, t)| (k.to_string(), t))
            .collect();
        Self { styles }
    }

    /// Load styles from `path`, falling back to [`StyleLibrary::builtin`]
    /// when the file is missing or unusable.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("no templates at {}, using default styles", path.display());
            return Self::builtin();
        }
        match Self::try_load(path) {
            Ok(lib) => {
                info!("loaded {} styles from {}", lib.len(), path.display());
                lib
            }
            Err(e) => {
                warn!("failed to load {}: {e}; using default styles", path.display());
                Self::builtin()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, StyleError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parse a templates file. Entries with a non-string key or no usable
    /// template are skipped with a warning; the rest are kept.
    pub fn from_yaml_str(text: &str) -> Result<Self, StyleError> {
        let mapping: Option<serde_yaml::Mapping> = serde_yaml::from_str(text)?;
        let mut styles = Vec::new();
        for (key, value) in mapping.unwrap_or_default() {
            let Some(key) = key.as_str().map(str::to_string) else {
                warn!("skipping style with non-string key {key:?}");
                continue;
            };
            let entry = match serde_yaml::from_value::<StyleEntry>(value) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping style '{key}': {e}");
                    continue;
                }
            };
            let style = match entry {
                StyleEntry::Full(mut t) => {
                    if t.name.is_empty() {
                        t.name = key.clone();
                    }
                    t
                }
                StyleEntry::Bare(template) => StyleTemplate {
                    name: key.clone(),
                    description: String::new(),
                    template,
                },
            };
            styles.push((key, style));
        }
        if styles.is_empty() {
            return Err(StyleError::Empty);
        }
        Ok(Self { styles })
    }

    pub fn get(&self, key: &str) -> Option<&StyleTemplate> {
        self.styles.iter().find(|(k, _)| k == key).map(|(_, t)| t)
    }

    /// Template text for `key`; unknown keys use the cinematic built-in.
    pub fn template_for(&self, key: &str) -> String {
        if let Some(style) = self.get(key) {
            return style.template.clone();
        }
        warn!("unknown style '{key}', falling back to built-in {DEFAULT_STYLE}");
        CINEMATIC.to_string()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.styles.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleTemplate)> {
        self.styles.iter().map(|(k, t)| (k.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

const CINEMATIC: &str = indoc! {"
    Write a detailed Stable Diffusion prompt for: {{ description }}

    Style: Create a cinematic scene with dramatic lighting and composition.
    {% if emphasis %}Focus particularly on: {{ emphasis }}{% endif %}
    {% if mood %}Mood/Atmosphere: {{ mood }}{% endif %}

    Include specific details about:
    - Composition and framing
    - Lighting (dramatic, moody)
    - Color palette
    - Atmosphere and depth
    - Technical qualities (8k, high detail)

    Format the response as a single, detailed prompt."};

const ANIME: &str = indoc! {"
    Write a detailed Stable Diffusion prompt for: {{ description }}

    Style: Design an anime-style illustration with vibrant colors and expressive details.
    {% if emphasis %}Focus particularly on: {{ emphasis }}{% endif %}
    {% if mood %}Mood/Atmosphere: {{ mood }}{% endif %}

    Include specific details about:
    - Anime art style elements
    - Dynamic composition
    - Vibrant color palette
    - Character expression (if applicable)
    - Background and atmosphere

    Format the response as a single, detailed prompt in anime style."};

const PHOTOREALISTIC: &str = indoc! {"
    Write a detailed Stable Diffusion prompt for: {{ description }}

    Style: Generate a photorealistic image with high detail and natural lighting.
    {% if emphasis %}Focus particularly on: {{ emphasis }}{% endif %}
    {% if mood %}Mood/Atmosphere: {{ mood }}{% endif %}

    Include specific details about:
    - Realistic textures and materials
    - Natural lighting conditions
    - Depth of field and focus
    - Environmental details
    - Camera and lens qualities (e.g., DSLR, 85mm)

    Format the response as a single, detailed prompt for photorealistic output."};

const FANTASY: &str = indoc! {"
    Write a detailed Stable Diffusion prompt for: {{ description }}

    Style: Create a fantasy-themed illustration with magical elements.
    {% if emphasis %}Focus particularly on: {{ emphasis }}{% endif %}
    {% if mood %}Mood/Atmosphere: {{ mood }}{% endif %}

    Include specific details about:
    - Magical and mystical elements
    - Ethereal lighting and glow effects
    - Rich fantasy color palette
    - Atmospheric depth and wonder
    - Intricate details and ornamentation

    Format the response as a single, detailed fantasy prompt."};

const ABSTRACT: &str = indoc! {"
    Write a detailed Stable Diffusion prompt for: {{ description }}

    Style: Design an abstract artistic composition.
    {% if emphasis %}Focus particularly on: {{ emphasis }}{% endif %}
    {% if mood %}Mood/Atmosphere: {{ mood }}{% endif %}

    Include specific details about:
    - Abstract shapes and forms
    - Color theory and palette
    - Texture and pattern
    - Visual rhythm and flow
    - Emotional expression

    Format the response as a single, detailed abstract art prompt."};

const CYBERPUNK: &str = indoc! {"
    Write a detailed Stable Diffusion prompt for: {{ description }}

    Style: Create a cyberpunk-themed image with neon lights, high technology, and urban dystopia.
    {% if emphasis %}Focus particularly on: {{ emphasis }}{% endif %}
    {% if mood %}Mood/Atmosphere: {{ mood }}{% endif %}

    Include specific details about:
    - Neon lighting and reflections
    - Futuristic technology elements
    - Urban dystopian environment
    - Rain/wet surfaces for reflections
    - Cybernetic and tech details

    Format the response as a single, detailed cyberpunk prompt."};

const SCI_FI: &str = indoc! {"
    Write a detailed Stable Diffusion prompt for: {{ description }}

    Style: Generate a science fiction scene with futuristic technology.
    {% if emphasis %}Focus particularly on: {{ emphasis }}{% endif %}
    {% if mood %}Mood/Atmosphere: {{ mood }}{% endif %}

    Include specific details about:
    - Futuristic technology and spacecraft
    - Space environments or alien worlds
    - Advanced materials and surfaces
    - Dramatic sci-fi lighting
    - Scale and grandeur

    Format the response as a single, detailed sci-fi prompt."};

fn builtin_styles() -> Vec<(&'static str, StyleTemplate)> {
    vec![
        (
            "cinematic",
            StyleTemplate::builtin(
                "Cinematic",
                "Dramatic lighting and composition for film-quality images",
                CINEMATIC,
            ),
        ),
        (
            "anime",
            StyleTemplate::builtin(
                "Anime",
                "Vibrant anime-style illustration with dynamic colors",
                ANIME,
            ),
        ),
        (
            "photorealistic",
            StyleTemplate::builtin(
                "Photorealistic",
                "High-detail realistic images with natural lighting",
                PHOTOREALISTIC,
            ),
        ),
        (
            "fantasy",
            StyleTemplate::builtin(
                "Fantasy",
                "Magical elements and themes with ethereal atmosphere",
                FANTASY,
            ),
        ),
        (
            "abstract",
            StyleTemplate::builtin(
                "Abstract",
                "Artistic abstract compositions with creative expression",
                ABSTRACT,
            ),
        ),
        (
            "cyberpunk",
            StyleTemplate::builtin(
                "Cyberpunk",
                "Neon lights, high technology, and urban dystopia",
                CYBERPUNK,
            ),
        ),
        (
            "sci-fi",
            StyleTemplate::builtin(
                "Sci-Fi",
                "Futuristic technology and space exploration scenes",
                SCI_FI,
            ),
        ),
    ]
}
