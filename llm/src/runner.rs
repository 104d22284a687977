use crate::traits::{ChunkStream, GenerationOptions, LLMClient, LLMError};
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tokio_stream::StreamExt;
use tracing::{debug, warn};

/// Deadlines enforced around a streaming generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeoutPolicy {
    /// Longest wait for any single chunk, including the first.
    pub chunk: Duration,
    /// Longest the whole call may take.
    pub total: Duration,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            chunk: Duration::from_secs(30),
            total: Duration::from_secs(120),
        }
    }
}

impl TimeoutPolicy {
    pub fn new(chunk: Duration, total: Duration) -> Self {
        Self { chunk, total }
    }
}

/// Stand-in deadline for durations too long to add to the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

fn deadline_after(d: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(d).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Tracks the per-chunk and whole-call deadlines of one call.
struct Watchdog {
    policy: TimeoutPolicy,
    overall: Instant,
}

impl Watchdog {
    fn arm(policy: TimeoutPolicy) -> Self {
        Self {
            policy,
            overall: deadline_after(policy.total),
        }
    }

    /// The earlier of the next chunk deadline and the overall deadline,
    /// with the error to report if it passes.
    fn next_deadline(&self) -> (Instant, LLMError) {
        let chunk = deadline_after(self.policy.chunk);
        if chunk < self.overall {
            (chunk, LLMError::ChunkTimeout(self.policy.chunk))
        } else {
            (self.overall, LLMError::TotalTimeout(self.policy.total))
        }
    }
}

/// Drain `stream` into a single string while enforcing `policy`.
///
/// The stream is dropped as soon as a deadline passes, which aborts the
/// underlying request. Nothing is retried.
pub async fn collect_with_timeouts(
    mut stream: ChunkStream,
    policy: TimeoutPolicy,
) -> Result<String, LLMError> {
    let watchdog = Watchdog::arm(policy);
    collect_armed(&mut stream, &watchdog).await
}

async fn collect_armed(stream: &mut ChunkStream, watchdog: &Watchdog) -> Result<String, LLMError> {
    let mut buffer = String::new();
    let mut chunks = 0usize;
    loop {
        let (deadline, expired) = watchdog.next_deadline();
        match timeout_at(deadline, stream.next()).await {
            Ok(Some(chunk)) => {
                buffer.push_str(&chunk?);
                chunks += 1;
            }
            Ok(None) => break,
            Err(_) => {
                warn!(chunks, "generation abandoned: {expired}");
                return Err(expired);
            }
        }
    }
    debug!(chunks, chars = buffer.len(), "generation stream finished");
    Ok(buffer)
}

/// Open a generation stream on `client` and collect it under `policy`.
///
/// Opening the stream counts against the same deadlines as the first chunk.
pub async fn generate_bounded<C: LLMClient + ?Sized>(
    client: &C,
    model: &str,
    prompt: &str,
    options: GenerationOptions,
    policy: TimeoutPolicy,
) -> Result<String, LLMError> {
    let watchdog = Watchdog::arm(policy);
    let (deadline, expired) = watchdog.next_deadline();
    let mut stream = match timeout_at(deadline, client.stream_generate(model, prompt, options)).await
    {
        Ok(res) => res?,
        Err(_) => {
            warn!(model, "no response from server: {expired}");
            return Err(expired);
        }
    };
    collect_armed(&mut stream, &watchdog).await
}
