//! Correlation ids and token accounting for generation requests.
//!
//! Each diagnosis submission gets a `request_id` that appears on every log
//! line it produces. Token usage reported by the service is summed so the
//! CLI can print a total at exit.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

/// Generate a unique id for one diagnosis request.
pub fn generate_request_id() -> String {
    let ts = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    // Use a counter to handle sub-nanosecond calls.
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("dg-{ts:x}-{count:04x}")
}

/// Cumulative token usage across requests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UsageTracker {
    pub requests: u64,
    pub prompt_tokens: u64,
    pub output_tokens: u64,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed request.
    pub fn record(&mut self, prompt_tokens: u64, output_tokens: u64) {
        self.requests += 1;
        self.prompt_tokens += prompt_tokens;
        self.output_tokens += output_tokens;
    }

    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.output_tokens
    }

    /// Format as a short summary string.
    pub fn summary(&self) -> String {
        format!(
            "requests: {}, tokens: {} prompt + {} output = {} total",
            self.requests,
            self.prompt_tokens,
            self.output_tokens,
            self.total_tokens(),
        )
    }
}
