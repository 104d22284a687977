//! Short-lived cache of the model names installed on a server.
//!
//! Listing models is a network round trip, and callers such as parameter
//! declarations ask for it often. [`ModelCatalog`] keeps the last
//! successful listing for a fixed time-to-live and otherwise falls back
//! to [`DEFAULT_MODELS`]. A listing that takes longer than the catalog's
//! list timeout counts as a failure.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{timeout, Instant};
use tracing::{info, warn};

use crate::traits::LLMClient;

/// Returned when the server has no models or cannot be reached.
pub const DEFAULT_MODELS: [&str; 3] = ["qwen3:8b", "qwen3:4b", "llama3.2:latest"];

/// Name fragments marking fine-tuned models, which are listed first.
pub const FINE_TUNED_KEYWORDS: [&str; 5] = ["lora", "limbicnation", "fine", "style", "prompt"];

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

pub const DEFAULT_LIST_TIMEOUT: Duration = Duration::from_secs(10);

struct Cached {
    models: Vec<String>,
    fetched_at: Instant,
}

pub struct ModelCatalog {
    client: Arc<dyn LLMClient>,
    ttl: Duration,
    list_timeout: Duration,
    cached: Mutex<Option<Cached>>,
}

impl ModelCatalog {
    pub fn new(client: Arc<dyn LLMClient>, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            list_timeout: DEFAULT_LIST_TIMEOUT,
            cached: Mutex::new(None),
        }
    }

    /// Bound each listing request by `limit` instead of [`DEFAULT_LIST_TIMEOUT`].
    pub fn with_list_timeout(mut self, limit: Duration) -> Self {
        self.list_timeout = limit;
        self
    }

    /// Model names, fine-tuned first, served from cache while it is fresh.
    pub async fn models(&self) -> Vec<String> {
        let mut cached = self.cached.lock().await;
        if let Some(c) = cached.as_ref() {
            if c.fetched_at.elapsed() < self.ttl {
                return c.models.clone();
            }
        }
        let Ok(listed) = timeout(self.list_timeout, self.client.list_models()).await else {
            warn!("model listing timed out after {:?}, using defaults", self.list_timeout);
            return default_models();
        };
        match listed {
            Ok(models) if !models.is_empty() => {
                let models = sort_models(models);
                info!("found {} models", models.len());
                *cached = Some(Cached {
                    models: models.clone(),
                    fetched_at: Instant::now(),
                });
                models
            }
            Ok(_) => {
                warn!("server reported no models, using defaults");
                default_models()
            }
            Err(e) => {
                warn!("could not fetch models: {e}");
                default_models()
            }
        }
    }

    /// The model a caller should use when none was chosen.
    pub async fn default_model(&self) -> String {
        self.models()
            .await
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_MODELS[0].to_string())
    }

    /// Forget the cached listing so the next call refetches.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }
}

pub fn default_models() -> Vec<String> {
    DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
}

pub fn is_fine_tuned(name: &str) -> bool {
    let lower = name.to_lowercase();
    FINE_TUNED_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Fine-tuned models first, then alphabetical within each group.
pub fn sort_models(mut models: Vec<String>) -> Vec<String> {
    models.sort_by(|a, b| {
        (!is_fine_tuned(a), a.as_str()).cmp(&(!is_fine_tuned(b), b.as_str()))
    });
    models
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fine_tuned_sorted_first() {
        let sorted = sort_models(vec![
            "llama3.2:latest".into(),
            "qwen3:8b".into(),
            "limbicnation/qwen-style:latest".into(),
            "Mistral-LoRA:7b".into(),
        ]);
        assert_eq!(
            sorted,
            vec![
                "Mistral-LoRA:7b",
                "limbicnation/qwen-style:latest",
                "llama3.2:latest",
                "qwen3:8b",
            ]
        );
    }

    #[test]
    fn keyword_match_ignores_case() {
        assert!(is_fine_tuned("My-FINETUNE"));
        assert!(!is_fine_tuned("gemma3:27b"));
    }
}
