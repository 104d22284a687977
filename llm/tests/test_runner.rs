use llm::{generate_bounded, GenerationOptions, LLMClient, LLMError, OllamaClient, TimeoutPolicy};
use std::time::{Duration, Instant};
use tokio_stream::StreamExt;

use mock_server::{
    spawn_delayed_mock_server, spawn_mock_server, spawn_scripted_mock_server, spawn_stalled_listener,
};

#[tokio::test]
async fn streams_chunks_from_server() {
    let (url, shutdown) = spawn_mock_server(vec!["misty ", "forest, ", "twilight"]).await;
    let client = OllamaClient::new(&url).unwrap();
    let mut stream = client
        .stream_generate("qwen3:8b", "test", GenerationOptions::default())
        .await
        .unwrap();
    let mut out = Vec::new();
    while let Some(c) = stream.next().await {
        out.push(c.unwrap());
    }
    assert_eq!(out, vec!["misty ", "forest, ", "twilight"]);
    let _ = shutdown.send(()).await;
}

#[tokio::test]
async fn bounded_generation_collects_text() {
    let (url, shutdown) = spawn_delayed_mock_server(vec!["Hello ", "world."], 10).await;
    let client = OllamaClient::new(&url).unwrap();
    let text = generate_bounded(
        &client,
        "qwen3:8b",
        "test",
        GenerationOptions::default(),
        TimeoutPolicy::default(),
    )
    .await
    .unwrap();
    assert_eq!(text, "Hello world.");
    let _ = shutdown.send(()).await;
}

#[tokio::test]
async fn stalled_server_times_out_per_chunk() {
    let (url, shutdown) = spawn_scripted_mock_server(vec![(0, "first"), (5_000, "late")]).await;
    let client = OllamaClient::new(&url).unwrap();
    let policy = TimeoutPolicy::new(Duration::from_millis(300), Duration::from_secs(4));
    let start = Instant::now();
    let res = generate_bounded(&client, "qwen3:8b", "test", GenerationOptions::default(), policy).await;
    assert!(matches!(res, Err(LLMError::ChunkTimeout(_))));
    assert!(start.elapsed() < Duration::from_secs(4));
    let _ = shutdown.send(()).await;
}

#[tokio::test]
async fn server_silent_before_headers_times_out_per_chunk() {
    let url = spawn_stalled_listener().await;
    let client = OllamaClient::new(&url).unwrap();
    let policy = TimeoutPolicy::new(Duration::from_millis(200), Duration::from_secs(4));
    let start = Instant::now();
    let res = generate_bounded(&client, "qwen3:8b", "test", GenerationOptions::default(), policy).await;
    assert!(matches!(res, Err(LLMError::ChunkTimeout(d)) if d == Duration::from_millis(200)));
    assert!(start.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn slow_trickle_times_out_overall() {
    let (url, shutdown) =
        spawn_delayed_mock_server(vec!["a", "b", "c", "d", "e", "f", "g", "h"], 200).await;
    let client = OllamaClient::new(&url).unwrap();
    let policy = TimeoutPolicy::new(Duration::from_secs(1), Duration::from_millis(700));
    let res = generate_bounded(&client, "qwen3:8b", "test", GenerationOptions::default(), policy).await;
    assert!(matches!(res, Err(LLMError::TotalTimeout(_))));
    let _ = shutdown.send(()).await;
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let client = OllamaClient::new("http://127.0.0.1:9").unwrap();
    let res = generate_bounded(
        &client,
        "qwen3:8b",
        "test",
        GenerationOptions::default(),
        TimeoutPolicy::default(),
    )
    .await;
    assert!(matches!(res, Err(LLMError::Network(_))));
}
