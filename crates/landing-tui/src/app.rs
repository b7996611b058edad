//! TUI-local state (not shared with the page runtime).

use std::time::Instant;

use landing_rs::page::PageLayout;
use landing_rs::parallax::HeroRect;
use landing_rs::popup::Dismissal;
use landing_rs::viewport::ElementBox;
use ratatui::layout::Rect;

/// Input mode for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    /// Arrow keys scroll, Tab moves focus, Enter activates.
    Browse,
    /// Typing into the challenge field. Enter submits, Esc leaves.
    Prompt,
}

/// What activating a focusable element does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Activation {
    Anchor(&'static str),
    EditPrompt,
    Submit,
    Copy,
    ToggleFaq(usize),
    Dismiss(Dismissal),
}

/// A focusable element placed on a document row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Target {
    pub(crate) id: String,
    pub(crate) row: usize,
    pub(crate) activation: Activation,
}

/// A focusable element on a fixed screen row, hit by column range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Hit {
    pub(crate) id: String,
    pub(crate) row: u16,
    pub(crate) columns: (u16, u16),
    pub(crate) activation: Activation,
}

impl Hit {
    pub(crate) fn contains(&self, column: u16, row: u16) -> bool {
        row == self.row && column >= self.columns.0 && column < self.columns.1
    }
}

/// Where things landed on screen in the last frame. Mouse handling maps
/// screen cells back to page elements through this.
#[derive(Debug, Clone, Default)]
pub(crate) struct FrameMap {
    /// Inner area of the page pane.
    pub(crate) page: Rect,
    pub(crate) scroll: usize,
    pub(crate) hero: Option<ElementBox>,
    pub(crate) targets: Vec<Target>,
    pub(crate) nav: Vec<Hit>,
    pub(crate) modal: Option<Rect>,
    pub(crate) modal_buttons: Vec<Hit>,
}

impl FrameMap {
    /// The hero's on-screen rectangle, if any part of it is visible.
    pub(crate) fn hero_rect(&self) -> Option<HeroRect> {
        let hero = self.hero?;
        let top = f64::from(self.page.y) + hero.top - self.scroll as f64;
        let bottom = top + hero.height;
        if bottom <= f64::from(self.page.y) || top >= f64::from(self.page.bottom()) {
            return None;
        }
        Some(HeroRect {
            left: f64::from(self.page.x),
            top,
            width: f64::from(self.page.width),
            height: hero.height,
        })
    }

    /// The document target under a screen cell inside the page pane.
    pub(crate) fn target_at(&self, column: u16, row: u16) -> Option<&Target> {
        let inside = column >= self.page.x
            && column < self.page.right()
            && row >= self.page.y
            && row < self.page.bottom();
        if !inside {
            return None;
        }
        let doc_row = usize::from(row - self.page.y) + self.scroll;
        self.targets.iter().find(|t| t.row == doc_row)
    }

    /// Page focus order: the nav bar, then the document.
    pub(crate) fn focus_ring(&self) -> Vec<&str> {
        self.nav
            .iter()
            .map(|h| h.id.as_str())
            .chain(self.targets.iter().map(|t| t.id.as_str()))
            .collect()
    }

    /// What activating `id` does, wherever it is drawn.
    pub(crate) fn activation_for(&self, id: &str) -> Option<Activation> {
        self.nav
            .iter()
            .chain(self.modal_buttons.iter())
            .find(|h| h.id == id)
            .map(|h| h.activation.clone())
            .or_else(|| {
                self.targets
                    .iter()
                    .find(|t| t.id == id)
                    .map(|t| t.activation.clone())
            })
    }
}

/// Next id in `ring` after `current`, wrapping. `None` focus starts at the
/// first (or last, going backwards) element.
pub(crate) fn cycle_focus<'a>(ring: &[&'a str], current: Option<&str>, back: bool) -> Option<&'a str> {
    if ring.is_empty() {
        return None;
    }
    let last = ring.len() - 1;
    let index = match current.and_then(|id| ring.iter().position(|r| *r == id)) {
        Some(i) if back => {
            if i == 0 {
                last
            } else {
                i - 1
            }
        }
        Some(i) => {
            if i == last {
                0
            } else {
                i + 1
            }
        }
        None if back => last,
        None => 0,
    };
    Some(ring[index])
}

/// TUI-local state (not shared with the page runtime).
pub(crate) struct App {
    pub(crate) input_mode: InputMode,
    /// Whether the logs pane is visible (toggled with `,`).
    pub(crate) show_logs: bool,
    /// Offset from the bottom of the log (0 = follow tail).
    pub(crate) log_scroll: usize,
    /// Status messages shown temporarily at the bottom.
    pub(crate) status_message: Option<String>,
    pub(crate) should_quit: bool,
    /// When the countdown last ticked.
    pub(crate) last_tick: Instant,
    pub(crate) pointer_in_hero: bool,
    /// Layout and viewport height last pushed into the page.
    pub(crate) synced: Option<(PageLayout, u16)>,
    pub(crate) map: FrameMap,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            input_mode: InputMode::Browse,
            show_logs: false,
            log_scroll: 0,
            status_message: None,
            should_quit: false,
            last_tick: Instant::now(),
            pointer_in_hero: false,
            synced: None,
            map: FrameMap::default(),
        }
    }
}
