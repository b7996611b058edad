//! Key and mouse handling for the landing TUI.
//!
//! Terminal events are translated into the page runtime's signals: wheel
//! and arrow keys scroll, moving over the hero drives the parallax,
//! reaching the top row counts as leaving the page, and Tab/Esc go
//! through the popup's focus trap before any default handling.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use landing_rs::diagnosis::{DiagnosisRequest, RequestState, request_diagnosis};
use landing_rs::page::Landing;
use landing_rs::popup::{Dismissal, Key, KeyOutcome};
use tracing::debug;

use crate::app::{Activation, App, InputMode, cycle_focus};
use crate::{TuiConfig, lock};

/// Rows moved per arrow key or wheel notch.
const SCROLL_STEP: f64 = 3.0;

pub(crate) fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    state: &Arc<Mutex<Landing>>,
    config: &TuiConfig,
) {
    // Ctrl+C always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if lock(state).popup.is_visible() {
        handle_popup_key(key, app, state, config);
        return;
    }

    match app.input_mode {
        InputMode::Browse => handle_browse_key(key, app, state, config),
        InputMode::Prompt => handle_prompt_key(key, app, state, config),
    }
}

fn handle_popup_key(
    key: KeyEvent,
    app: &mut App,
    state: &Arc<Mutex<Landing>>,
    config: &TuiConfig,
) {
    match key.code {
        KeyCode::Esc => {
            lock(state).on_keydown(Key::Escape);
        }
        KeyCode::Tab => {
            lock(state).on_keydown(Key::Tab { shift: false });
        }
        KeyCode::BackTab => {
            lock(state).on_keydown(Key::Tab { shift: true });
        }
        KeyCode::Enter => {
            let focused = lock(state).focus.clone();
            if let Some(activation) = focused.and_then(|id| app.map.activation_for(&id)) {
                activate(&activation, app, state, config);
            }
        }
        KeyCode::Char('q') => app.should_quit = true,
        _ => {
            lock(state).on_keydown(Key::Other);
        }
    }
}

fn handle_browse_key(
    key: KeyEvent,
    app: &mut App,
    state: &Arc<Mutex<Landing>>,
    config: &TuiConfig,
) {
    app.status_message = None;
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char(',') => {
            app.show_logs = !app.show_logs;
            app.log_scroll = 0;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            let back = key.code == KeyCode::BackTab;
            move_focus(app, state, back);
        }
        KeyCode::Esc => {
            lock(state).on_keydown(Key::Escape);
        }
        KeyCode::Enter => {
            let focused = lock(state).focus.clone();
            match focused.and_then(|id| app.map.activation_for(&id)) {
                Some(activation) => activate(&activation, app, state, config),
                None => app.status_message = Some("Press [Tab] to pick a link.".into()),
            }
        }
        KeyCode::Up if shift && app.show_logs => {
            app.log_scroll = app.log_scroll.saturating_add(3);
        }
        KeyCode::Down if shift && app.show_logs => {
            app.log_scroll = app.log_scroll.saturating_sub(3);
        }
        KeyCode::Up | KeyCode::Char('k') => scroll_by(app, state, -SCROLL_STEP),
        KeyCode::Down | KeyCode::Char('j') => scroll_by(app, state, SCROLL_STEP),
        KeyCode::PageUp => scroll_by(app, state, -page_step(app)),
        KeyCode::PageDown | KeyCode::Char(' ') => scroll_by(app, state, page_step(app)),
        KeyCode::Home => {
            lock(state).scroll_to(0.0);
        }
        KeyCode::End => {
            let mut page = lock(state);
            let bottom = page.viewport.max_scroll();
            page.scroll_to(bottom);
        }
        KeyCode::Char('i') | KeyCode::Char('/') => start_prompt(app, state),
        KeyCode::Char('c') => copy_result(app, state),
        KeyCode::Char('x') => leave_page(app, state),
        KeyCode::Char(d @ '1'..='9') => {
            let index = (d as usize) - ('1' as usize);
            let mut page = lock(state);
            if index < page.faq.len() {
                page.toggle_faq(index);
            }
        }
        _ => {}
    }
}

fn handle_prompt_key(
    key: KeyEvent,
    app: &mut App,
    state: &Arc<Mutex<Landing>>,
    config: &TuiConfig,
) {
    match key.code {
        KeyCode::Enter => submit_prompt(app, state, config),
        KeyCode::Esc => app.input_mode = InputMode::Browse,
        KeyCode::Backspace => {
            lock(state).prompt.pop();
        }
        KeyCode::Char(c) => {
            lock(state).prompt.push(c);
        }
        // Pass through navigation keys so the visitor can scroll while
        // typing.
        KeyCode::Up => scroll_by(app, state, -SCROLL_STEP),
        KeyCode::Down => scroll_by(app, state, SCROLL_STEP),
        KeyCode::PageUp => scroll_by(app, state, -page_step(app)),
        KeyCode::PageDown => scroll_by(app, state, page_step(app)),
        _ => {}
    }
}

pub(crate) fn handle_mouse_event(
    mouse: MouseEvent,
    app: &mut App,
    state: &Arc<Mutex<Landing>>,
    config: &TuiConfig,
) {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            if row == 0 {
                leave_page(app, state);
                return;
            }
            match app.map.hero_rect() {
                Some(hero)
                    if f64::from(row) >= hero.top
                        && f64::from(row) < hero.top + hero.height
                        && column >= app.map.page.x
                        && column < app.map.page.right() =>
                {
                    lock(state).on_pointer_move(f64::from(column), f64::from(row), hero);
                    app.pointer_in_hero = true;
                }
                _ if app.pointer_in_hero => {
                    lock(state).on_pointer_leave_hero();
                    app.pointer_in_hero = false;
                }
                _ => {}
            }
        }
        MouseEventKind::ScrollUp => scroll_by(app, state, -SCROLL_STEP),
        MouseEventKind::ScrollDown => scroll_by(app, state, SCROLL_STEP),
        MouseEventKind::Down(MouseButton::Left) => click(column, row, app, state, config),
        _ => {}
    }
}

fn click(
    column: u16,
    row: u16,
    app: &mut App,
    state: &Arc<Mutex<Landing>>,
    config: &TuiConfig,
) {
    if lock(state).popup.is_visible() {
        let button = app
            .map
            .modal_buttons
            .iter()
            .find(|h| h.contains(column, row))
            .map(|h| h.activation.clone());
        let inside = app.map.modal.is_some_and(|m| {
            column >= m.x && column < m.right() && row >= m.y && row < m.bottom()
        });
        match button {
            Some(activation) => activate(&activation, app, state, config),
            None if !inside => activate(&Activation::Dismiss(Dismissal::Overlay), app, state, config),
            None => {}
        }
        return;
    }

    let hit = app
        .map
        .nav
        .iter()
        .find(|h| h.contains(column, row))
        .map(|h| (h.id.clone(), h.activation.clone()))
        .or_else(|| {
            app.map
                .target_at(column, row)
                .map(|t| (t.id.clone(), t.activation.clone()))
        });
    if let Some((id, activation)) = hit {
        lock(state).focus = Some(id);
        activate(&activation, app, state, config);
    }
}

// ── Actions ───────────────────────────────────────────────────────────

fn activate(activation: &Activation, app: &mut App, state: &Arc<Mutex<Landing>>, config: &TuiConfig) {
    let now = Instant::now();
    match activation {
        Activation::Anchor(href) => {
            lock(state).click_anchor(href, now);
        }
        Activation::EditPrompt => start_prompt(app, state),
        Activation::Submit => submit_prompt(app, state, config),
        Activation::Copy => copy_result(app, state),
        Activation::ToggleFaq(index) => {
            lock(state).toggle_faq(*index);
        }
        Activation::Dismiss(via) => {
            let mut page = lock(state);
            page.dismiss_popup(*via);
            if *via == Dismissal::CallToAction {
                let href = page.content.popup.cta_href;
                page.click_anchor(href, now);
            }
        }
    }
}

fn move_focus(app: &App, state: &Arc<Mutex<Landing>>, back: bool) {
    let mut page = lock(state);
    let outcome = page.on_keydown(Key::Tab { shift: back });
    if outcome != KeyOutcome::Default {
        return;
    }
    let ring = app.map.focus_ring();
    if let Some(next) = cycle_focus(&ring, page.focus.as_deref(), back) {
        page.focus = Some(next.to_string());
    }
}

fn scroll_by(app: &mut App, state: &Arc<Mutex<Landing>>, delta: f64) {
    if lock(state).scroll_by(delta).is_none() {
        app.status_message = Some("Close the popup to keep scrolling.".into());
    }
}

fn page_step(app: &App) -> f64 {
    f64::from(app.map.page.height.saturating_sub(2).max(1))
}

fn start_prompt(app: &mut App, state: &Arc<Mutex<Landing>>) {
    lock(state).focus = Some("user-challenge".into());
    app.input_mode = InputMode::Prompt;
}

/// Submit the challenge and run the request on the tokio runtime.
fn submit_prompt(app: &mut App, state: &Arc<Mutex<Landing>>, config: &TuiConfig) {
    let request = lock(state).submit_diagnosis(Instant::now());
    if let Some(request) = request {
        app.input_mode = InputMode::Browse;
        dispatch_diagnosis(state, config, request);
    }
}

fn dispatch_diagnosis(state: &Arc<Mutex<Landing>>, config: &TuiConfig, request: DiagnosisRequest) {
    let state = Arc::clone(state);
    let generator = Arc::clone(&config.generator);
    let landing = config.landing.clone();
    config.runtime.spawn(async move {
        let outcome = request_diagnosis(generator.as_ref(), &request, &landing).await;
        lock(&state).finish_diagnosis(outcome);
    });
}

fn copy_result(app: &mut App, state: &Arc<Mutex<Landing>>) {
    let mut page = lock(state);
    if !matches!(page.diagnosis.state(), RequestState::Success(_)) {
        app.status_message = Some("No diagnosis to copy yet.".into());
        return;
    }
    page.copy_diagnosis(Instant::now());
}

/// The pointer left through the top edge.
fn leave_page(app: &mut App, state: &Arc<Mutex<Landing>>) {
    let mut page = lock(state);
    if page.on_pointer_out(0.0) {
        debug!("Exit-intent popup shown");
        app.input_mode = InputMode::Browse;
    }
    if app.pointer_in_hero {
        page.on_pointer_leave_hero();
        app.pointer_in_hero = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{FrameMap, Hit, Target};
    use landing_rs::api::{GenerateFuture, StructuredGenerator, StructuredRequest};
    use landing_rs::clipboard::MemoryClipboard;
    use landing_rs::config::LandingConfig;
    use landing_rs::content::ids;
    use landing_rs::diagnosis::SubmitControl;
    use landing_rs::error::TransportFailure;
    use landing_rs::page::{PageLayout, Services};
    use landing_rs::storage::MemoryStore;
    use landing_rs::viewport::ElementBox;
    use crossterm::event::KeyEventKind;
    use ratatui::layout::Rect;

    struct Offline;

    impl StructuredGenerator for Offline {
        fn generate<'a>(&'a self, _request: &'a StructuredRequest) -> GenerateFuture<'a> {
            Box::pin(async {
                Err(TransportFailure::MissingApiKey(
                    "GEMINI_API_KEY".into(),
                ))
            })
        }
    }

    struct Harness {
        app: App,
        state: Arc<Mutex<Landing>>,
        config: TuiConfig,
        runtime: tokio::runtime::Runtime,
    }

    impl Harness {
        fn new() -> Self {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let landing = LandingConfig::default();
            let mut page = Landing::bootstrap(
                &landing,
                Services {
                    durable: MemoryStore::shared(),
                    session: MemoryStore::shared(),
                    clipboard: Arc::new(MemoryClipboard::new()),
                },
                1_700_000_000_000,
            );
            let mut layout = PageLayout::default();
            layout.insert(ids::HERO, ElementBox::new(0.0, 10.0));
            layout.insert(ids::OFFER, ElementBox::new(60.0, 10.0));
            layout.insert(ids::FAQ, ElementBox::new(70.0, 30.0));
            page.set_layout(layout, 20.0);

            let mut app = App::new();
            app.map = FrameMap {
                page: Rect::new(1, 3, 78, 20),
                scroll: 0,
                hero: Some(ElementBox::new(0.0, 10.0)),
                targets: vec![
                    Target {
                        id: "cta-hero".into(),
                        row: 8,
                        activation: Activation::Anchor("#oferta"),
                    },
                    Target {
                        id: "faq-question-1".into(),
                        row: 75,
                        activation: Activation::ToggleFaq(0),
                    },
                ],
                nav: vec![Hit {
                    id: "nav-1".into(),
                    row: 1,
                    columns: (1, 13),
                    activation: Activation::Anchor("#faq"),
                }],
                modal: Some(Rect::new(20, 8, 40, 9)),
                modal_buttons: vec![
                    Hit {
                        id: ids::CLOSE_POPUP.into(),
                        row: 15,
                        columns: (22, 32),
                        activation: Activation::Dismiss(Dismissal::CloseButton),
                    },
                    Hit {
                        id: ids::POPUP_CTA.into(),
                        row: 15,
                        columns: (34, 54),
                        activation: Activation::Dismiss(Dismissal::CallToAction),
                    },
                ],
            };

            Self {
                app,
                state: Arc::new(Mutex::new(page)),
                config: TuiConfig {
                    log_buffer: None,
                    runtime: runtime.handle().clone(),
                    generator: Arc::new(Offline),
                    landing,
                },
                runtime,
            }
        }

        fn key(&mut self, code: KeyCode) {
            self.key_with(code, KeyModifiers::NONE);
        }

        fn key_with(&mut self, code: KeyCode, modifiers: KeyModifiers) {
            let event = KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                state: crossterm::event::KeyEventState::NONE,
            };
            handle_key_event(event, &mut self.app, &self.state, &self.config);
        }

        fn mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) {
            let event = MouseEvent {
                kind,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            };
            handle_mouse_event(event, &mut self.app, &self.state, &self.config);
        }

        fn page(&self) -> std::sync::MutexGuard<'_, Landing> {
            lock(&self.state)
        }
    }

    #[test]
    fn ctrl_c_quits() {
        let mut h = Harness::new();
        h.key_with(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(h.app.should_quit);
    }

    #[test]
    fn tab_walks_the_page_focus_ring() {
        let mut h = Harness::new();
        h.key(KeyCode::Tab);
        assert_eq!(h.page().focus.as_deref(), Some("nav-1"));
        h.key(KeyCode::Tab);
        assert_eq!(h.page().focus.as_deref(), Some("cta-hero"));
        h.key(KeyCode::BackTab);
        h.key(KeyCode::BackTab);
        assert_eq!(h.page().focus.as_deref(), Some("faq-question-1"));
    }

    #[test]
    fn digits_toggle_faq_items() {
        let mut h = Harness::new();
        h.key(KeyCode::Char('2'));
        assert_eq!(h.page().faq.open_index(), Some(1));
        h.key(KeyCode::Char('2'));
        assert_eq!(h.page().faq.open_index(), None);
        h.key(KeyCode::Char('9'));
        assert_eq!(h.page().faq.open_index(), None);
    }

    #[test]
    fn typing_edits_the_prompt_and_blank_submit_shakes() {
        let mut h = Harness::new();
        h.key(KeyCode::Char('i'));
        assert_eq!(h.app.input_mode, InputMode::Prompt);
        h.key(KeyCode::Char(' '));
        h.key(KeyCode::Enter);
        // Blank input keeps the field open and never sends.
        assert_eq!(h.app.input_mode, InputMode::Prompt);
        assert!(h.page().diagnosis.is_shaking(Instant::now()));
        assert_eq!(h.page().diagnosis.state(), &RequestState::Idle);

        h.key(KeyCode::Backspace);
        for c in "foco".chars() {
            h.key(KeyCode::Char(c));
        }
        assert_eq!(h.page().prompt, "foco");
        h.key(KeyCode::Esc);
        assert_eq!(h.app.input_mode, InputMode::Browse);
    }

    #[test]
    fn submit_moves_to_loading_and_completes_on_the_runtime() {
        let mut h = Harness::new();
        h.page().prompt = "Procrastino".into();
        h.key(KeyCode::Char('i'));
        h.key(KeyCode::Enter);
        assert_eq!(h.app.input_mode, InputMode::Browse);
        assert_eq!(h.page().diagnosis.state(), &RequestState::Loading);
        assert!(!h.page().diagnosis.submit_control().enabled);

        // Let the spawned request run to completion.
        h.runtime.block_on(async {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        });
        assert!(matches!(
            h.page().diagnosis.state(),
            RequestState::Error(_)
        ));
        let page = h.page();
        let control = page.diagnosis.submit_control();
        assert!(control.enabled);
        assert_eq!(control.label, SubmitControl::default().label);
    }

    #[test]
    fn copy_without_result_sets_status() {
        let mut h = Harness::new();
        h.key(KeyCode::Char('c'));
        assert_eq!(
            h.app.status_message.as_deref(),
            Some("No diagnosis to copy yet.")
        );
    }

    #[test]
    fn top_row_triggers_exit_intent_once_armed() {
        let mut h = Harness::new();
        h.mouse(MouseEventKind::Moved, 10, 0);
        assert!(!h.page().popup.is_visible());

        h.key(KeyCode::End);
        h.mouse(MouseEventKind::Moved, 10, 0);
        assert!(h.page().popup.is_visible());
        assert_eq!(h.page().focus.as_deref(), Some(ids::CLOSE_POPUP));

        // Scrolling is locked while the popup is open.
        h.key(KeyCode::Up);
        {
            let page = h.page();
            assert_eq!(page.viewport.scroll_y, page.viewport.max_scroll());
        }

        h.key(KeyCode::Tab);
        assert_eq!(h.page().focus.as_deref(), Some(ids::POPUP_CTA));
        h.key(KeyCode::Esc);
        assert!(!h.page().popup.is_visible());
    }

    #[test]
    fn clicking_outside_the_modal_dismisses_it() {
        let mut h = Harness::new();
        h.key(KeyCode::End);
        h.key(KeyCode::Char('x'));
        assert!(h.page().popup.is_visible());

        // Inside the modal but not on a button.
        h.mouse(MouseEventKind::Down(MouseButton::Left), 30, 10);
        assert!(h.page().popup.is_visible());

        h.mouse(MouseEventKind::Down(MouseButton::Left), 2, 2);
        assert!(!h.page().popup.is_visible());
        h.key(KeyCode::Char('x'));
        assert!(!h.page().popup.is_visible());
    }

    #[test]
    fn popup_cta_closes_and_scrolls_to_the_offer() {
        let mut h = Harness::new();
        h.key(KeyCode::End);
        h.key(KeyCode::Char('x'));
        h.mouse(MouseEventKind::Down(MouseButton::Left), 40, 15);
        assert!(!h.page().popup.is_visible());
        assert!(h.page().scroll_animation.is_some());
    }

    #[test]
    fn clicking_a_nav_link_focuses_and_animates() {
        let mut h = Harness::new();
        h.mouse(MouseEventKind::Down(MouseButton::Left), 5, 1);
        assert_eq!(h.page().focus.as_deref(), Some("nav-1"));
        let target = h.page().scroll_animation.map(|a| a.target());
        assert_eq!(target, Some(70.0));
    }

    #[test]
    fn pointer_over_hero_schedules_a_parallax_frame() {
        let mut h = Harness::new();
        h.mouse(MouseEventKind::Moved, 10, 5);
        assert!(h.app.pointer_in_hero);
        assert!(h.page().parallax.as_ref().unwrap().frame_pending());

        h.mouse(MouseEventKind::Moved, 10, 18);
        assert!(!h.app.pointer_in_hero);
    }
}
