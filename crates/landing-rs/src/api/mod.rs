//! Structured-generation layer: the generator seam and its Gemini client.
//!
//! - [`StructuredGenerator`]: the one capability the diagnosis flow needs.
//!   Send a prompt plus a response schema, get back raw JSON text. Tests
//!   implement it with canned responses.
//! - [`gemini`]: [`GeminiClient`], the reqwest implementation against the
//!   `generateContent` endpoint.
//! - [`tracing`]: per-request correlation ids and token usage totals.

pub mod gemini;
pub mod tracing;

use std::future::Future;
use std::pin::Pin;

use crate::error::TransportFailure;

pub use gemini::GeminiClient;
pub use tracing::{UsageTracker, generate_request_id};

/// Type alias to keep trait signatures and implementations readable.
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, TransportFailure>> + Send + 'a>>;

/// One structured-generation call.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    /// Correlation id carried through the log lines of this call.
    pub request_id: String,
    pub model: String,
    /// Free-text user prompt, already trimmed.
    pub prompt: String,
    pub system_instruction: String,
    /// Provider-facing schema the output must conform to.
    pub response_schema: serde_json::Value,
}

/// A service that turns a [`StructuredRequest`] into JSON text.
///
/// Only transport-level problems are reported here; checking that the text
/// is the JSON the caller asked for is the caller's job.
///
/// Uses a boxed future so that the trait is dyn-compatible (object-safe).
pub trait StructuredGenerator: Send + Sync {
    fn generate<'a>(&'a self, request: &'a StructuredRequest) -> GenerateFuture<'a>;
}
