use std::path::PathBuf;
use std::time::Duration;

use llm::catalog::DEFAULT_TTL;
use llm::TimeoutPolicy;
use serde::Serialize;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_TEMPLATES_PATH: &str = "config/templates.yaml";

/// Upper bound for any configured number of seconds.
pub const MAX_SECONDS: Duration = Duration::from_secs(24 * 60 * 60);

/// Runtime settings shared by the library and the command line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Settings {
    pub ollama_url: String,
    /// Model used when a request does not name one.
    pub model: Option<String>,
    pub templates_path: PathBuf,
    pub chunk_timeout: Duration,
    pub total_timeout: Duration,
    pub cache_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        let policy = TimeoutPolicy::default();
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.into(),
            model: None,
            templates_path: PathBuf::from(DEFAULT_TEMPLATES_PATH),
            chunk_timeout: policy.chunk,
            total_timeout: policy.total,
            cache_ttl: DEFAULT_TTL,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// | variable | setting |
    /// |---|---|
    /// | `OLLAMA_URL` | server base URL |
    /// | `OLLAMA_MODEL` | default model |
    /// | `PROMPTGEN_TEMPLATES` | templates file |
    /// | `PROMPTGEN_CHUNK_TIMEOUT` | seconds to wait for each chunk |
    /// | `PROMPTGEN_TOTAL_TIMEOUT` | seconds for the whole generation |
    /// | `PROMPTGEN_CACHE_TTL` | seconds to cache the model list |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Unparsable numbers keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(url) = lookup("OLLAMA_URL").filter(|v| !v.trim().is_empty()) {
            settings.ollama_url = url;
        }
        settings.model = lookup("OLLAMA_MODEL").filter(|v| !v.trim().is_empty());
        if let Some(path) = lookup("PROMPTGEN_TEMPLATES") {
            settings.templates_path = PathBuf::from(path);
        }
        if let Some(d) = lookup("PROMPTGEN_CHUNK_TIMEOUT").and_then(|v| parse_secs(&v)) {
            settings.chunk_timeout = d;
        }
        if let Some(d) = lookup("PROMPTGEN_TOTAL_TIMEOUT").and_then(|v| parse_secs(&v)) {
            settings.total_timeout = d;
        }
        if let Some(d) = lookup("PROMPTGEN_CACHE_TTL").and_then(|v| parse_secs(&v)) {
            settings.cache_ttl = d;
        }
        settings
    }

    pub fn timeout_policy(&self) -> TimeoutPolicy {
        TimeoutPolicy::new(self.chunk_timeout, self.total_timeout)
    }
}

/// Parse a positive number of seconds, fractions allowed. Values past
/// [`MAX_SECONDS`] are capped.
pub fn parse_secs(value: &str) -> Option<Duration> {
    let secs: f64 = value.trim().parse().ok()?;
    if secs.is_nan() || secs <= 0.0 {
        return None;
    }
    let d = Duration::try_from_secs_f64(secs).unwrap_or(MAX_SECONDS);
    Some(d.min(MAX_SECONDS))
}
