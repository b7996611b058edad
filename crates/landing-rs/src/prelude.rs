//! Convenience re-exports for front ends.
//!
//! ```ignore
//! use landing_rs::prelude::*;
//! ```

// ── Core types ──────────────────────────────────────────────────────
pub use crate::config::LandingConfig;
pub use crate::error::{
    ClipboardError, DiagnosisError, StorageError, TransportFailure, ValidationFailure,
};
pub use crate::json_schema_for;

// ── Diagnosis ───────────────────────────────────────────────────────
pub use crate::api::{GeminiClient, StructuredGenerator, StructuredRequest};
pub use crate::diagnosis::{
    DiagnosisFlow, DiagnosisRequest, DiagnosisResult, FlowEffect, FlowEvent, RequestState,
    request_diagnosis, submit,
};

// ── Page ────────────────────────────────────────────────────────────
pub use crate::page::{Landing, PageLayout, Services};
pub use crate::popup::{Dismissal, Key, KeyOutcome};
pub use crate::viewport::{ElementBox, Viewport};

// ── Collaborators ───────────────────────────────────────────────────
pub use crate::clipboard::{Clipboard, MemoryClipboard, SharedClipboard};
pub use crate::storage::{FileStore, KeyValueStore, MemoryStore, SharedStore};

// ── UI ──────────────────────────────────────────────────────────────
pub use crate::ui::tracing::{LogBuffer, UiTracingLayer};
pub use crate::ui::{Console, LogLevel, LogLine};
