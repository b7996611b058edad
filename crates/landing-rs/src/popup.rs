//! Exit-intent popup: one-time arming on scroll, a modal shown at most once
//! per session, and a keyboard focus trap while it is open.
//!
//! Focus is tracked by element id. The front end reports the currently
//! focused element on each call and applies the focus moves returned here.

use tracing::{debug, warn};

use crate::storage::{EXIT_INTENT_KEY, SharedStore};

/// Fraction of the document height the visitor must scroll past before
/// exit intent is armed.
pub const ARM_FRACTION: f64 = 0.25;

const SESSION_FLAG_VALUE: &str = "true";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupVisibility {
    #[default]
    Hidden,
    Visible,
}

/// The modal's focusable children, in document order, plus its close
/// control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalLayout {
    pub focusables: Vec<String>,
    pub close_control: String,
}

/// How the visitor closed the modal. All three behave the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    CloseButton,
    Overlay,
    CallToAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab { shift: bool },
    Other,
}

/// What the front end should do with a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Let the default behaviour run.
    Default,
    /// Prevent the default and move focus to this element.
    MoveFocus(String),
    /// The modal closed; restore focus to this element if any.
    Closed { restore_focus: Option<String> },
}

pub struct PopupController {
    session: SharedStore,
    layout: ModalLayout,
    armed: bool,
    shown: bool,
    visible: bool,
    scroll_locked: bool,
    focus: Option<String>,
    last_focused: Option<String>,
}

impl PopupController {
    /// Build the controller, seeding `shown` from the session flag.
    pub fn new(session: SharedStore, layout: ModalLayout) -> Self {
        let shown = session_flag_set(&session);
        if shown {
            debug!("Exit popup already shown this session");
        }
        Self {
            session,
            layout,
            armed: false,
            shown,
            visible: false,
            scroll_locked: false,
            focus: None,
            last_focused: None,
        }
    }

    pub fn visibility(&self) -> PopupVisibility {
        if self.visible {
            PopupVisibility::Visible
        } else {
            PopupVisibility::Hidden
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn was_shown(&self) -> bool {
        self.shown
    }

    /// Page scroll is locked while the modal is up.
    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Element inside the modal that holds focus, if the modal is open.
    pub fn focused(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    pub fn layout(&self) -> &ModalLayout {
        &self.layout
    }

    /// `false` once armed: the scroll listener can be detached.
    pub fn wants_scroll(&self) -> bool {
        !self.armed
    }

    /// Arm exit intent once the visitor is past a quarter of the page.
    /// Returns `true` only on the call that arms.
    pub fn arm(&mut self, scroll_y: f64, scroll_height: f64) -> bool {
        if self.armed || scroll_y <= scroll_height * ARM_FRACTION {
            return false;
        }
        self.armed = true;
        debug!("Exit intent armed at scroll_y={scroll_y:.0}");
        true
    }

    /// The pointer left the document. `client_y <= 0` means it left
    /// through the top edge.
    pub fn on_pointer_out(&mut self, client_y: f64, active: Option<&str>) -> bool {
        if client_y <= 0.0 && self.armed {
            self.show(active)
        } else {
            false
        }
    }

    /// Open the modal. Returns `false` when it was already shown this
    /// session.
    pub fn show(&mut self, active: Option<&str>) -> bool {
        if self.shown || session_flag_set(&self.session) {
            self.shown = true;
            return false;
        }

        self.last_focused = active.map(str::to_string);
        self.visible = true;
        self.scroll_locked = true;
        self.shown = true;
        if let Err(e) = self.session.set(EXIT_INTENT_KEY, SESSION_FLAG_VALUE) {
            warn!("Could not persist exit popup flag: {e}");
        }

        self.focus = Some(
            self.layout
                .focusables
                .first()
                .unwrap_or(&self.layout.close_control)
                .clone(),
        );
        debug!("Exit popup shown");
        true
    }

    /// Close the modal and hand back the element to refocus.
    pub fn hide(&mut self) -> Option<String> {
        self.visible = false;
        self.scroll_locked = false;
        self.focus = None;
        self.last_focused.clone()
    }

    pub fn dismiss(&mut self, via: Dismissal) -> Option<String> {
        debug!("Exit popup dismissed via {via:?}");
        self.hide()
    }

    /// Focus moved inside the modal through default Tab behaviour.
    pub fn set_focus(&mut self, id: &str) {
        if self.visible {
            self.focus = Some(id.to_string());
        }
    }

    pub fn on_keydown(&mut self, key: Key, active: Option<&str>) -> KeyOutcome {
        if !self.visible {
            return KeyOutcome::Default;
        }
        match key {
            Key::Escape => KeyOutcome::Closed {
                restore_focus: self.hide(),
            },
            Key::Tab { shift } => {
                let (Some(first), Some(last)) =
                    (self.layout.focusables.first(), self.layout.focusables.last())
                else {
                    return KeyOutcome::Default;
                };
                let target = if shift && active == Some(first.as_str()) {
                    last.clone()
                } else if !shift && active == Some(last.as_str()) {
                    first.clone()
                } else {
                    return KeyOutcome::Default;
                };
                self.focus = Some(target.clone());
                KeyOutcome::MoveFocus(target)
            }
            Key::Other => KeyOutcome::Default,
        }
    }

    /// Where default Tab behaviour would move focus inside the modal.
    pub fn default_tab_target(&self, active: Option<&str>, shift: bool) -> Option<&str> {
        let list = &self.layout.focusables;
        let index = list.iter().position(|id| Some(id.as_str()) == active)?;
        let next = if shift {
            index.checked_sub(1)?
        } else {
            index + 1
        };
        list.get(next).map(String::as_str)
    }
}

fn session_flag_set(session: &SharedStore) -> bool {
    match session.get(EXIT_INTENT_KEY) {
        Ok(value) => value.is_some_and(|v| !v.is_empty()),
        Err(e) => {
            warn!("Could not read exit popup flag: {e}");
            false
        }
    }
}
