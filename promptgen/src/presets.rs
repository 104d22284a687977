//! Keyword presets appended to an existing prompt.
//!
//! Unlike the templates in [`crate::styles`], presets do not involve the
//! model at all: each one is a fixed set of descriptive keywords.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PresetError {
    #[error("Unknown style '{0}'. Available: {1}")]
    UnknownStyle(String, String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleMode {
    Cinematic,
    StillImage,
}

impl StyleMode {
    pub const ALL: [StyleMode; 2] = [StyleMode::Cinematic, StyleMode::StillImage];

    pub fn as_str(self) -> &'static str {
        match self {
            StyleMode::Cinematic => "cinematic",
            StyleMode::StillImage => "still_image",
        }
    }

    pub fn parse(name: &str) -> Result<Self, PresetError> {
        let lower = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == lower)
            .ok_or_else(|| PresetError::UnknownStyle(name.to_string(), available_styles().join(", ")))
    }

    pub fn definition(self) -> StyleDefinition {
        match self {
            StyleMode::Cinematic => StyleDefinition {
                name: "Cinematic",
                description: "Film-like visuals with dramatic lighting and anamorphic qualities",
                keywords: StyleKeywords {
                    primary: &["cinematic shot", "film grain", "movie still", "dramatic scene"],
                    lighting: &[
                        "dramatic lighting",
                        "volumetric light",
                        "rim lighting",
                        "chiaroscuro",
                        "golden hour",
                    ],
                    technical: &[
                        "anamorphic lens",
                        "shallow depth of field",
                        "bokeh",
                        "35mm film",
                        "wide aspect ratio",
                    ],
                    composition: &[
                        "rule of thirds",
                        "leading lines",
                        "dynamic composition",
                        "cinematic framing",
                    ],
                    texture: &["rich color grading", "film texture", "atmospheric haze"],
                },
            },
            StyleMode::StillImage => StyleDefinition {
                name: "Still Image (Photography)",
                description: "Sharp, realistic photography with technical camera specifications",
                keywords: StyleKeywords {
                    primary: &[
                        "professional photography",
                        "high resolution",
                        "sharp focus",
                        "studio quality",
                    ],
                    lighting: &[
                        "natural lighting",
                        "soft diffused light",
                        "studio lighting",
                        "balanced exposure",
                    ],
                    technical: &[
                        "f/2.8 aperture",
                        "ISO 100",
                        "sharp optics",
                        "full frame sensor",
                        "RAW quality",
                    ],
                    composition: &[
                        "centered composition",
                        "clean framing",
                        "balanced layout",
                        "professional angle",
                    ],
                    texture: &[
                        "realistic textures",
                        "fine details",
                        "crisp definition",
                        "accurate colors",
                    ],
                },
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleKeywords {
    pub primary: &'static [&'static str],
    pub lighting: &'static [&'static str],
    pub technical: &'static [&'static str],
    pub composition: &'static [&'static str],
    pub texture: &'static [&'static str],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub keywords: StyleKeywords,
}

pub fn available_styles() -> Vec<&'static str> {
    StyleMode::ALL.iter().map(|m| m.as_str()).collect()
}

/// Keyword string for `mode`. Technical keywords go last so they can be
/// left out; `emphasis` is placed first.
pub fn style_prompt(mode: StyleMode, emphasis: Option<&str>, include_technical: bool) -> String {
    let kw = mode.definition().keywords;
    let mut parts: Vec<String> = Vec::new();
    if let Some(e) = emphasis.filter(|e| !e.is_empty()) {
        parts.push(format!("emphasis on {e}"));
    }
    let groups = [kw.primary, kw.lighting, kw.composition, kw.texture];
    parts.extend(groups.iter().flat_map(|g| g.iter()).map(|s| s.to_string()));
    if include_technical {
        parts.extend(kw.technical.iter().map(|s| s.to_string()));
    }
    parts.join(", ")
}
