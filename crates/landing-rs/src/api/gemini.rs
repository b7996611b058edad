//! Async client for the Gemini `generateContent` endpoint.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{GenerateFuture, StructuredGenerator, StructuredRequest, UsageTracker};
use crate::error::TransportFailure;

/// Public v1beta API root.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Longest slice of an error body kept in a [`TransportFailure::Status`].
const ERROR_BODY_LIMIT: usize = 500;

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize, Debug)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a serde_json::Value,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiErrorResponse>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for structured generation with Gemini models.
///
/// A client without an API key is valid to construct; every call then fails
/// with [`TransportFailure::MissingApiKey`], which lets the page render and
/// surface the usual error panel instead of refusing to start.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    key_source: String,
    base_url: String,
    timeout: Duration,
    usage: Mutex<UsageTracker>,
}

impl GeminiClient {
    /// Create a client with an explicit key.
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self, TransportFailure> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("landing-rs/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| TransportFailure::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            key_source: "explicit key".to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            timeout,
            usage: Mutex::new(UsageTracker::new()),
        })
    }

    /// Create a client reading the key from the first set variable in `vars`.
    pub fn from_env(vars: &[&str], timeout: Duration) -> Result<Self, TransportFailure> {
        let api_key = vars
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()));
        let mut client = Self::new(api_key, timeout)?;
        client.key_source = vars.join(" / ");
        Ok(client)
    }

    /// Point the client at a different API root (used by tests and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Token usage reported by the service so far.
    pub fn usage(&self) -> UsageTracker {
        self.usage
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    /// Send one request and return the concatenated text of the first candidate.
    pub async fn generate_content(
        &self,
        request: &StructuredRequest,
    ) -> Result<String, TransportFailure> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| TransportFailure::MissingApiKey(self.key_source.clone()))?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &request.system_instruction,
                }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.response_schema,
            },
        };

        debug!(
            request_id = %request.request_id,
            "Generation request: model={}, prompt={} chars",
            request.model,
            request.prompt.chars().count(),
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(&body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.map_send_error(e))?;

        debug!(
            request_id = %request.request_id,
            "Generation response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(TransportFailure::Status {
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| TransportFailure::Api(format!("failed to parse envelope: {e}")))?;

        if let Some(err) = parsed.error {
            return Err(TransportFailure::Api(err.message));
        }

        if let Some(ref usage) = parsed.usage_metadata {
            debug!(
                "Token usage: prompt={}, output={}",
                usage.prompt_token_count, usage.candidates_token_count,
            );
            self.usage
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .record(usage.prompt_token_count, usage.candidates_token_count);
        }

        let candidate = parsed
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or(TransportFailure::EmptyResponse)?;

        if let Some(ref reason) = candidate.finish_reason {
            trace!("Finish reason: {reason}");
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(TransportFailure::EmptyResponse);
        }
        Ok(text)
    }

    fn map_send_error(&self, e: reqwest::Error) -> TransportFailure {
        if e.is_timeout() {
            TransportFailure::Timeout(self.timeout)
        } else {
            TransportFailure::Request(e.to_string())
        }
    }
}

impl StructuredGenerator for GeminiClient {
    fn generate<'a>(&'a self, request: &'a StructuredRequest) -> GenerateFuture<'a> {
        Box::pin(self.generate_content(request))
    }
}
