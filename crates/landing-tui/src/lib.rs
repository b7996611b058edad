//! Terminal front end for the `landing-rs` page runtime.
//!
//! Renders the landing page (ratatui + crossterm) from a shared
//! [`Landing`] and feeds terminal input back into it as page signals.
//! Diagnosis requests run on the caller's tokio runtime; the TUI itself
//! lives on a dedicated OS thread.
//!
//! # Quick start
//!
//! ```ignore
//! use landing_rs::prelude::*;
//! use landing_tui::{TuiConfig, spawn_tui};
//! use std::sync::{Arc, Mutex};
//!
//! let config = LandingConfig::default();
//! let services = Services::from_config(&config, Arc::new(MemoryClipboard::new()));
//! let page = Arc::new(Mutex::new(Landing::bootstrap(&config, services, now_ms())));
//! let tui = TuiConfig {
//!     log_buffer: None,
//!     runtime: tokio::runtime::Handle::current(),
//!     generator: Arc::new(config.build_generator()?),
//!     landing: config,
//! };
//! spawn_tui(page, tui).join().ok();
//! ```

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{cursor, execute};
use landing_rs::api::StructuredGenerator;
use landing_rs::config::LandingConfig;
use landing_rs::countdown::now_ms;
use landing_rs::page::Landing;
use landing_rs::ui::tracing::LogBuffer;
use ratatui::prelude::*;
use tracing::debug;

mod app;
pub mod clipboard;
mod input;
mod render;

pub use clipboard::Osc52Clipboard;
pub use render::{hero_offset, log_level_style, truncate_str, wrap_text};

use app::{App, FrameMap};
use input::{handle_key_event, handle_mouse_event};
use render::{build_document, modal_area, modal_buttons, nav_hits, render, snapshot, split};

/// Lazy-image margin in terminal rows. The page lays out in rows, so the
/// browser's 200 px default would cover the whole document.
pub const LAZY_MARGIN_ROWS: f64 = 4.0;

/// How often the countdown ticks.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for the TUI.
pub struct TuiConfig {
    /// Optional log buffer from the tracing layer.
    ///
    /// When set, the TUI drains pending log lines from this buffer once
    /// per frame into the page console. The tracing layer never touches
    /// the page lock, so logging from a tokio worker cannot block the
    /// render thread.
    pub log_buffer: Option<LogBuffer>,
    /// Runtime that runs diagnosis requests.
    pub runtime: tokio::runtime::Handle,
    pub generator: Arc<dyn StructuredGenerator>,
    pub landing: LandingConfig,
}

/// Lock the page, recovering from a poisoned mutex.
pub(crate) fn lock(state: &Arc<Mutex<Landing>>) -> MutexGuard<'_, Landing> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Spawn the TUI on a dedicated OS thread.
///
/// The TUI runs until the visitor quits or `quit_requested` is set on the
/// page.
pub fn spawn_tui(state: Arc<Mutex<Landing>>, config: TuiConfig) -> JoinHandle<()> {
    std::thread::spawn(move || {
        if let Err(e) = run_tui(state, &config) {
            eprintln!("TUI error: {e}");
        }
    })
}

/// Run the TUI event loop (blocking). Call this from a dedicated OS thread.
pub fn run_tui(state: Arc<Mutex<Landing>>, config: &TuiConfig) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut app = App::new();

    loop {
        if app.should_quit || lock(&state).quit_requested {
            lock(&state).quit_requested = true;
            break;
        }

        // Flush pending log lines before rendering. Takes the page lock
        // briefly and only when there are new lines.
        if let Some(ref log_buf) = config.log_buffer {
            log_buf.flush_into(&state);
        }

        let now = Instant::now();
        {
            let mut page = lock(&state);
            if now.duration_since(app.last_tick) >= TICK_INTERVAL {
                page.on_tick(now_ms());
                app.last_tick = now;
            }
            page.on_frame(now);
        }

        // Lay the page out for the current terminal size and push the
        // geometry into the runtime when it changed.
        let size = terminal.size()?;
        let panes = split(Rect::new(0, 0, size.width, size.height), app.show_logs);
        let page_area = panes.page_inner();
        let mut snap = snapshot(&state, &app, now);
        let doc = build_document(&snap, usize::from(page_area.width));

        let synced = Some((doc.layout.clone(), page_area.height));
        if app.synced != synced {
            let mut page = lock(&state);
            let update = page.set_layout(doc.layout.clone(), f64::from(page_area.height));
            if !update.revealed.is_empty() {
                debug!("Revealed {:?}", update.revealed);
            }
            snap.scroll_y = page.viewport.scroll_y;
            app.synced = synced;
        }

        let modal = modal_area(Rect::new(0, 0, size.width, size.height));
        app.map = FrameMap {
            page: page_area,
            scroll: snap.scroll_y.round().max(0.0) as usize,
            hero: doc.layout.get(landing_rs::content::ids::HERO),
            targets: doc.targets.clone(),
            nav: nav_hits(&snap.content, panes.nav),
            modal: snap.popup_visible.then_some(modal),
            modal_buttons: if snap.popup_visible {
                modal_buttons(&snap.content, modal)
            } else {
                Vec::new()
            },
        };

        terminal.draw(|frame| {
            render(frame, &panes, &snap, doc, &app);
        })?;

        // Poll for input events (100ms timeout for responsive rendering).
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(key, &mut app, &state, config);
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, &mut app, &state, config),
                Event::Resize(..) => app.synced = None,
                _ => {}
            }
        }
    }

    // Restore terminal.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen,
        cursor::Show
    )?;
    terminal.show_cursor()?;
    Ok(())
}
