//! Interactive runtime for the "O Poder da Reprogramação Mental" landing page.
//!
//! `landing-rs` models every dynamic behaviour of the page as a plain state
//! machine over injected collaborators, so the same logic drives the
//! terminal front end (`landing-tui`), the headless `landing` CLI and the
//! tests. Nothing here renders; front ends feed signals in and draw from
//! the resulting state.
//!
//! # Getting started
//!
//! ```ignore
//! use landing_rs::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), TransportFailure> {
//!     let config = LandingConfig::default();
//!     let generator = config.build_generator()?;
//!
//!     let flow = std::sync::Mutex::new(DiagnosisFlow::new());
//!     let state = submit(&flow, &generator, &config, "Procrastino demais").await;
//!     if let RequestState::Success(result) = state {
//!         println!("{}", result.clipboard_summary());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Where to find things
//!
//! - **The AI diagnosis:** [`diagnosis::DiagnosisFlow`] is the request state
//!   machine; [`diagnosis::request_diagnosis`] performs one call through any
//!   [`api::StructuredGenerator`], of which [`api::GeminiClient`] is the
//!   production one.
//! - **Exit intent:** [`popup::PopupController`] arms on scroll, shows once
//!   per session and traps focus.
//! - **Offer countdown:** [`countdown::CountdownStore`] over a durable
//!   [`storage::KeyValueStore`].
//! - **Scroll-driven effects:** [`reveal`], [`lazy_image`], [`parallax`]
//!   and [`anchor`], all on the geometry in [`viewport`].
//! - **Everything wired together:** [`page::Landing::bootstrap`].
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`diagnosis`] | Request lifecycle, result schema, clipboard summary |
//! | [`api`] | Gemini `generateContent` client, request ids, token usage |
//! | [`popup`] | Exit-intent modal and focus trap |
//! | [`countdown`] | 24 h deadline persisted across visits |
//! | [`accordion`] | Single-open FAQ |
//! | [`reveal`] / [`lazy_image`] | Visibility-driven reveal and image loading |
//! | [`parallax`] / [`anchor`] | Hero motion and smooth in-page scrolling |
//! | [`storage`] / [`clipboard`] | Collaborator seams and in-memory impls |
//! | [`page`] | Bootstrap and signal fan-out |
//! | [`ui`] | Console model and the tracing capture layer |

pub mod accordion;
pub mod anchor;
pub mod api;
pub mod clipboard;
pub mod config;
pub mod content;
pub mod countdown;
pub mod diagnosis;
pub mod error;
pub mod lazy_image;
pub mod page;
pub mod parallax;
pub mod popup;
pub mod prelude;
pub mod reveal;
pub mod storage;
pub mod ui;
pub mod viewport;

use schemars::JsonSchema;

// Re-export schemars for downstream crates.
pub use schemars;

// ── Constants ──────────────────────────────────────────────────────

/// Default model for diagnosis requests.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

// ── Schema generation ──────────────────────────────────────────────

/// Generate a JSON Schema `serde_json::Value` from a type that implements
/// `schemars::JsonSchema`. Used to validate structured responses before
/// they are deserialised.
///
/// # Example
///
/// ```
/// use landing_rs::json_schema_for;
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct Verdict {
///     summary: String,
///     #[serde(default)]
///     note: Option<String>,
/// }
///
/// let schema = json_schema_for::<Verdict>();
/// assert_eq!(schema["type"], "object");
/// assert!(schema["required"].as_array().unwrap().contains(&"summary".into()));
/// ```
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnosis::DiagnosisResult;

    #[test]
    fn diagnosis_schema_requires_every_field() {
        let schema = json_schema_for::<DiagnosisResult>();
        assert_eq!(schema["type"], "object");
        let required = schema["required"].as_array().unwrap();
        for field in ["insight", "concept", "action", "quote"] {
            assert!(required.contains(&field.into()), "{field} not required");
            assert_eq!(schema["properties"][field]["type"], "string");
        }
    }
}
