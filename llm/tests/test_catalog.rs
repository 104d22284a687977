use async_trait::async_trait;
use httpmock::Method::GET;
use httpmock::MockServer;
use llm::catalog::{default_models, DEFAULT_TTL};
use llm::{ChunkStream, GenerationOptions, LLMClient, LLMError, ModelCatalog, OllamaClient};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use mock_server::spawn_stalled_listener;

struct CountingLister {
    calls: AtomicUsize,
    replies: Mutex<Vec<Result<Vec<String>, LLMError>>>,
}

impl CountingLister {
    fn new(replies: Vec<Result<Vec<String>, LLMError>>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            replies: Mutex::new(replies),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LLMClient for CountingLister {
    async fn stream_generate(
        &self,
        _model: &str,
        _prompt: &str,
        _options: GenerationOptions,
    ) -> Result<ChunkStream, LLMError> {
        Err(LLMError::ModelNotFound)
    }

    async fn list_models(&self) -> Result<Vec<String>, LLMError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            Ok(vec!["qwen3:8b".into()])
        } else {
            replies.remove(0)
        }
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test(start_paused = true)]
async fn cached_until_window_elapses() {
    let lister = CountingLister::new(vec![
        Ok(names(&["qwen3:8b", "llama3.2:latest"])),
        Ok(names(&["qwen3:8b", "prompt-lora:1b"])),
    ]);
    let catalog = ModelCatalog::new(lister.clone(), DEFAULT_TTL);

    let first = catalog.models().await;
    tokio::time::advance(Duration::from_secs(30)).await;
    let second = catalog.models().await;
    assert_eq!(first, second);
    assert_eq!(lister.calls(), 1);

    tokio::time::advance(Duration::from_secs(31)).await;
    let third = catalog.models().await;
    assert_eq!(third, names(&["prompt-lora:1b", "qwen3:8b"]));
    assert_eq!(lister.calls(), 2);

    let fourth = catalog.models().await;
    assert_eq!(third, fourth);
    assert_eq!(lister.calls(), 2);
}

#[tokio::test]
async fn empty_listing_falls_back_without_caching() {
    let lister = CountingLister::new(vec![Ok(Vec::new())]);
    let catalog = ModelCatalog::new(lister.clone(), DEFAULT_TTL);
    assert_eq!(catalog.models().await, default_models());
    assert_eq!(catalog.models().await, names(&["qwen3:8b"]));
    assert_eq!(lister.calls(), 2);
}

#[tokio::test]
async fn error_falls_back_to_defaults() {
    let lister = CountingLister::new(vec![Err(LLMError::Network("refused".into()))]);
    let catalog = ModelCatalog::new(lister.clone(), DEFAULT_TTL);
    assert_eq!(catalog.models().await, default_models());
    assert_eq!(catalog.default_model().await, "qwen3:8b");
}

#[tokio::test]
async fn invalidate_forces_refetch() {
    let lister = CountingLister::new(Vec::new());
    let catalog = ModelCatalog::new(lister.clone(), DEFAULT_TTL);
    catalog.models().await;
    catalog.invalidate().await;
    catalog.models().await;
    assert_eq!(lister.calls(), 2);
}

#[tokio::test]
async fn lists_models_from_server() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/tags");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r#"{"models": [
                    {"name": "qwen3:8b", "modified_at": "0", "size": 0},
                    {"name": "limbicnation/style-lora:latest", "modified_at": "0", "size": 0}
                ]}"#,
            );
    });

    let client = Arc::new(OllamaClient::new(server.base_url()).unwrap());
    let catalog = ModelCatalog::new(client, DEFAULT_TTL);
    let models = catalog.models().await;
    assert_eq!(models, names(&["limbicnation/style-lora:latest", "qwen3:8b"]));
    catalog.models().await;
    mock.assert_hits(1);
}

#[tokio::test]
async fn stalled_listing_falls_back_without_caching() {
    let url = spawn_stalled_listener().await;
    let client = Arc::new(OllamaClient::new(&url).unwrap());
    let catalog =
        ModelCatalog::new(client, DEFAULT_TTL).with_list_timeout(Duration::from_millis(200));

    let start = Instant::now();
    assert_eq!(catalog.models().await, default_models());
    assert!(start.elapsed() < Duration::from_secs(5));

    // Nothing was cached, so the second call waits out the deadline again.
    let start = Instant::now();
    assert_eq!(catalog.models().await, default_models());
    assert!(start.elapsed() >= Duration::from_millis(200));
}
