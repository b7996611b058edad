//! Typed failures for every fallible seam of the page runtime.
//!
//! Each controller returns one of these instead of unwinding, and the UI
//! layer pattern-matches on them to pick a recovery: a visual nudge, a
//! single error message, or silently disabling a feature.

use std::time::Duration;

use thiserror::Error;

// ── Diagnosis ─────────────────────────────────────────────────────────

/// Everything that can go wrong between the prompt box and a rendered
/// diagnosis panel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosisError {
    /// The trimmed prompt was empty. Recovered locally with a shake cue.
    #[error("prompt is empty")]
    InvalidInput,

    /// The generation service could not be reached or refused the call.
    #[error("transport: {0}")]
    Transport(#[from] TransportFailure),

    /// The service answered, but not with a usable diagnosis.
    #[error("validation: {0}")]
    Validation(#[from] ValidationFailure),
}

impl DiagnosisError {
    /// Short machine-friendly label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::Transport(_) => "transport_failure",
            Self::Validation(_) => "validation_failure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("no API key found in {0}")]
    MissingApiKey(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("response carried no text candidate")]
    EmptyResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("response is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("response does not match the diagnosis schema:\n{}", .0.join("\n"))]
    Schema(Vec<String>),
}

// ── Storage ───────────────────────────────────────────────────────────

/// Failures of a key-value store backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The backend refuses all access (e.g. disabled by policy).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage I/O error: {0}")]
    Io(String),

    /// The backing data exists but cannot be decoded.
    #[error("storage data is corrupt: {0}")]
    Corrupt(String),
}

// ── Clipboard ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard write failed: {0}")]
    Write(String),
}
