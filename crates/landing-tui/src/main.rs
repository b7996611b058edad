//! Browse the landing page in a terminal.
//!
//! Reads the API key from `GEMINI_API_KEY` (or `API_KEY`). Logs go to the
//! in-app console (toggle with `,`); set `RUST_LOG` to change the filter.
//!
//! ```sh
//! landing-tui
//! landing-tui --reduced-motion --no-intersection-observer
//! landing-tui --no-storage          # countdown hidden, like blocked storage
//! ```

use std::path::PathBuf;
use std::process;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use landing_rs::config::LandingConfig;
use landing_rs::countdown::now_ms;
use landing_rs::page::{Landing, Services};
use landing_rs::ui::tracing::UiTracingLayer;
use landing_tui::{Osc52Clipboard, TuiConfig, spawn_tui};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "landing-tui")]
struct Cli {
    /// Model to use for the diagnosis
    #[arg(long, default_value = landing_rs::DEFAULT_MODEL)]
    model: String,

    /// API root (for proxies and local stubs)
    #[arg(long)]
    api_base: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Durable storage file
    #[arg(long, default_value = ".landing/storage.json")]
    storage: PathBuf,

    /// Run without durable storage
    #[arg(long, conflicts_with = "storage")]
    no_storage: bool,

    /// Disable the hero parallax
    #[arg(long)]
    reduced_motion: bool,

    /// Behave as if visibility observation were unsupported
    #[arg(long)]
    no_intersection_observer: bool,

    /// Rows below the screen at which lazy images start loading
    #[arg(long, default_value_t = landing_tui::LAZY_MARGIN_ROWS)]
    lazy_margin_rows: f64,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let (tracing_layer, log_buffer) = UiTracingLayer::new();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,landing_rs=debug,landing_tui=debug"));
    tracing_subscriber::registry()
        .with(tracing_layer.with_filter(filter))
        .init();

    let mut config = LandingConfig {
        model: cli.model,
        request_timeout: Duration::from_secs(cli.timeout_secs),
        storage_path: (!cli.no_storage).then_some(cli.storage),
        reduced_motion: cli.reduced_motion,
        intersection_observer: !cli.no_intersection_observer,
        lazy_image_margin: cli.lazy_margin_rows,
        ..Default::default()
    };
    if let Some(base) = cli.api_base {
        config.api_base = base;
    }

    let generator = match config.build_generator() {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    if !generator.has_api_key() {
        warn!("No API key set; diagnosis requests will fail");
    }

    let services = Services::from_config(&config, Arc::new(Osc52Clipboard::new()));
    let page = Arc::new(Mutex::new(Landing::bootstrap(&config, services, now_ms())));
    info!("Model: {}", config.model);

    let tui_config = TuiConfig {
        log_buffer: Some(log_buffer),
        runtime: tokio::runtime::Handle::current(),
        generator: Arc::new(generator),
        landing: config,
    };
    let tui_handle = spawn_tui(page, tui_config);

    // Wait for the TUI thread without blocking a runtime worker.
    tokio::task::spawn_blocking(move || tui_handle.join().ok())
        .await
        .ok();
}
