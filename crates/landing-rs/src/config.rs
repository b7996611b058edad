//! Page runtime configuration with sensible defaults.
//!
//! [`LandingConfig`] captures the knobs both binaries expose and converts
//! them into runtime collaborators via [`build_generator`](LandingConfig::build_generator)
//! and [`build_durable_store`](LandingConfig::build_durable_store).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::DEFAULT_MODEL;
use crate::api::GeminiClient;
use crate::api::gemini::GEMINI_API_BASE;
use crate::error::TransportFailure;
use crate::lazy_image::LAZY_BOTTOM_MARGIN;
use crate::storage::{DisabledStore, FileStore, SharedStore};

/// Environment variables searched, in order, for the API key.
pub const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone)]
pub struct LandingConfig {
    /// Model identifier. Default: `"gemini-2.5-flash"`.
    pub model: String,
    /// API root. Default: the public Gemini v1beta endpoint.
    pub api_base: String,
    /// Upper bound for one diagnosis request. Default: 30 s.
    pub request_timeout: Duration,
    /// Durable store location. `None` disables durable storage, which in
    /// turn hides the countdown. Default: `.landing/storage.json`.
    pub storage_path: Option<PathBuf>,
    /// Reduced-motion preference; disables the hero parallax. Default: `false`.
    pub reduced_motion: bool,
    /// Whether viewport intersection events are delivered. When `false`,
    /// lazy images load eagerly at startup. Default: `true`.
    pub intersection_observer: bool,
    /// How far below the viewport lazy images start loading, in the
    /// front end's layout units. Default: 200 (pixels).
    pub lazy_image_margin: f64,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: GEMINI_API_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
            storage_path: Some(PathBuf::from(".landing/storage.json")),
            reduced_motion: false,
            intersection_observer: true,
            lazy_image_margin: LAZY_BOTTOM_MARGIN,
        }
    }
}

impl LandingConfig {
    /// Build the Gemini client, reading the key from [`API_KEY_VARS`].
    pub fn build_generator(&self) -> Result<GeminiClient, TransportFailure> {
        Ok(GeminiClient::from_env(API_KEY_VARS, self.request_timeout)?.with_base_url(&self.api_base))
    }

    /// Build the durable store, or a disabled one when no path is set.
    pub fn build_durable_store(&self) -> SharedStore {
        match &self.storage_path {
            Some(path) => Arc::new(FileStore::new(path)),
            None => Arc::new(DisabledStore::new("durable storage disabled")),
        }
    }
}
