//! Page bootstrap and signal fan-out.
//!
//! [`Landing`] owns every controller and is the state a front end shares
//! behind `Arc<Mutex<Landing>>`. The front end feeds it raw signals
//! (scroll, pointer, keys, clicks, clock) and renders from its fields.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, info, trace};

use crate::accordion::{AccordionChange, AccordionController};
use crate::anchor::{AnchorAction, ScrollAnimation, resolve_anchor};
use crate::clipboard::SharedClipboard;
use crate::config::LandingConfig;
use crate::content::{PageContent, ids};
use crate::countdown::{CountdownStore, CountdownTick, init_countdown};
use crate::diagnosis::{DiagnosisFlow, DiagnosisRequest, DiagnosisResult, FlowEffect, FlowEvent};
use crate::error::DiagnosisError;
use crate::lazy_image::{LazyImageLoader, LoadRequest};
use crate::parallax::{BackgroundTransform, HeroParallax, HeroRect};
use crate::popup::{Dismissal, Key, KeyOutcome, PopupController};
use crate::reveal::ScrollObserver;
use crate::storage::{MemoryStore, SharedStore};
use crate::ui::Console;
use crate::viewport::{ElementBox, Viewport};

/// Collaborators injected at bootstrap.
pub struct Services {
    pub durable: SharedStore,
    pub session: SharedStore,
    pub clipboard: SharedClipboard,
}

impl Services {
    /// Durable store from the config, a fresh session store.
    pub fn from_config(config: &LandingConfig, clipboard: SharedClipboard) -> Self {
        Self {
            durable: config.build_durable_store(),
            session: MemoryStore::shared(),
            clipboard,
        }
    }
}

/// Element boxes as laid out by the front end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    boxes: BTreeMap<String, ElementBox>,
    pub document_height: f64,
}

impl PageLayout {
    pub fn insert(&mut self, id: impl Into<String>, bounds: ElementBox) {
        let bounds_bottom = bounds.bottom();
        self.boxes.insert(id.into(), bounds);
        self.document_height = self.document_height.max(bounds_bottom);
    }

    pub fn get(&self, id: &str) -> Option<ElementBox> {
        self.boxes.get(id).copied()
    }
}

/// What a scroll changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollUpdate {
    pub revealed: Vec<String>,
    pub image_loads: Vec<LoadRequest>,
    pub popup_armed: bool,
}

/// What one animation frame changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameUpdate {
    pub flow_effects: Vec<FlowEffect>,
    pub hero_transform: Option<BackgroundTransform>,
    pub scroll: Option<ScrollUpdate>,
}

pub struct Landing {
    pub content: PageContent,
    pub parallax: Option<HeroParallax>,
    pub reveal: ScrollObserver,
    pub images: LazyImageLoader,
    pub faq: AccordionController,
    /// `None` hides the countdown element.
    pub countdown: Option<CountdownStore>,
    pub countdown_display: Option<CountdownTick>,
    pub diagnosis: DiagnosisFlow,
    /// Current contents of the challenge field.
    pub prompt: String,
    pub popup: PopupController,
    pub layout: PageLayout,
    pub viewport: Viewport,
    pub scroll_animation: Option<ScrollAnimation>,
    /// Id of the focused element, if any.
    pub focus: Option<String>,
    pub console: Console,
    pub quit_requested: bool,
    clipboard: SharedClipboard,
}

impl Landing {
    /// Initialise every component in page order. Components whose
    /// prerequisites are missing are skipped.
    pub fn bootstrap(config: &LandingConfig, services: Services, now_ms: i64) -> Self {
        let content = PageContent::default();

        let parallax = HeroParallax::new(config.reduced_motion);
        if parallax.is_none() {
            debug!("Reduced motion preferred; hero parallax disabled");
        }

        let mut reveal = ScrollObserver::new();
        for section in &content.sections {
            reveal.observe(section.id);
        }
        for id in [ids::DIAGNOSIS, ids::OFFER, ids::FAQ] {
            reveal.observe(id);
        }

        let mut images = LazyImageLoader::new(config.intersection_observer)
            .with_bottom_margin(config.lazy_image_margin);
        let mut eager = Vec::new();
        for spec in &content.images {
            eager.extend(images.register(spec.clone()));
        }
        if !config.intersection_observer {
            debug!("No intersection support; loaded {} image(s) eagerly", eager.len());
            for request in &eager {
                images.mark_loaded(&request.id);
            }
        }

        let faq = AccordionController::new(content.faq.len());

        let mut countdown = init_countdown(services.durable, now_ms);
        let countdown_display = countdown.as_mut().map(|c| c.tick(now_ms));
        if countdown.is_none() {
            debug!("Countdown hidden");
        }

        let popup = PopupController::new(services.session, content.modal_layout());

        info!("Landing page ready");
        Self {
            content,
            parallax,
            reveal,
            images,
            faq,
            countdown,
            countdown_display,
            diagnosis: DiagnosisFlow::new(),
            prompt: String::new(),
            popup,
            layout: PageLayout::default(),
            viewport: Viewport::default(),
            scroll_animation: None,
            focus: None,
            console: Console::new(),
            quit_requested: false,
            clipboard: services.clipboard,
        }
    }

    pub fn countdown_visible(&self) -> bool {
        self.countdown.is_some()
    }

    /// Replace the layout after the front end re-flows the page.
    pub fn set_layout(&mut self, layout: PageLayout, viewport_height: f64) -> ScrollUpdate {
        self.viewport.document_height = layout.document_height;
        self.viewport.height = viewport_height;
        self.layout = layout;
        let viewport = Viewport {
            scroll_y: self.viewport.clamp_scroll(self.viewport.scroll_y),
            ..self.viewport
        };
        self.on_scroll(viewport)
    }

    // ── Scroll ──

    /// Fan a new viewport out to every scroll listener.
    pub fn on_scroll(&mut self, viewport: Viewport) -> ScrollUpdate {
        self.viewport = viewport;
        if let Some(parallax) = self.parallax.as_mut() {
            parallax.on_scroll();
        }

        let popup_armed = self.popup.wants_scroll()
            && self.popup.arm(viewport.scroll_y, viewport.document_height);

        let layout = &self.layout;
        let revealed = self.reveal.on_viewport(&viewport, |id| layout.get(id));
        let image_loads = self.images.on_viewport(&viewport, |id| layout.get(id));
        for request in &image_loads {
            self.images.mark_loaded(&request.id);
        }

        ScrollUpdate {
            revealed,
            image_loads,
            popup_armed,
        }
    }

    /// User-initiated scroll. Ignored while the popup locks the page.
    pub fn scroll_to(&mut self, offset: f64) -> Option<ScrollUpdate> {
        if self.popup.is_scroll_locked() {
            return None;
        }
        self.scroll_animation = None;
        let viewport = Viewport {
            scroll_y: self.viewport.clamp_scroll(offset),
            ..self.viewport
        };
        Some(self.on_scroll(viewport))
    }

    pub fn scroll_by(&mut self, delta: f64) -> Option<ScrollUpdate> {
        self.scroll_to(self.viewport.scroll_y + delta)
    }

    fn animate_to(&mut self, target: f64, now: Instant) {
        let target = self.viewport.clamp_scroll(target);
        self.scroll_animation = Some(ScrollAnimation::new(self.viewport.scroll_y, target, now));
    }

    // ── Clock ──

    /// Once-per-second tick for the countdown.
    pub fn on_tick(&mut self, now_ms: i64) -> Option<CountdownTick> {
        let countdown = self.countdown.as_mut().filter(|c| c.is_running())?;
        let tick = countdown.tick(now_ms);
        self.countdown_display = Some(tick);
        Some(tick)
    }

    /// Per-frame work: transient cues, the hero transform, smooth scroll.
    pub fn on_frame(&mut self, now: Instant) -> FrameUpdate {
        let flow_effects = self.diagnosis.handle(FlowEvent::Tick, now);

        let scroll = match self.scroll_animation {
            Some(animation) => {
                let position = animation.position(now);
                if animation.is_finished(now) {
                    self.scroll_animation = None;
                }
                let viewport = Viewport {
                    scroll_y: position,
                    ..self.viewport
                };
                Some(self.on_scroll(viewport))
            }
            None => None,
        };

        let scroll_y = self.viewport.scroll_y;
        let hero_transform = self
            .parallax
            .as_mut()
            .filter(|p| p.frame_pending())
            .map(|p| p.frame(scroll_y));

        FrameUpdate {
            flow_effects,
            hero_transform,
            scroll,
        }
    }

    // ── Pointer ──

    pub fn on_pointer_move(&mut self, client_x: f64, client_y: f64, hero: HeroRect) {
        if let Some(parallax) = self.parallax.as_mut() {
            parallax.on_pointer_move(client_x, client_y, hero);
        }
    }

    pub fn on_pointer_leave_hero(&mut self) {
        if let Some(parallax) = self.parallax.as_mut() {
            parallax.on_pointer_leave();
        }
    }

    /// The pointer left the document at `client_y`.
    pub fn on_pointer_out(&mut self, client_y: f64) -> bool {
        let shown = self.popup.on_pointer_out(client_y, self.focus.as_deref());
        if shown {
            self.focus = self.popup.focused().map(str::to_string);
        }
        shown
    }

    // ── Keys and clicks ──

    pub fn on_keydown(&mut self, key: Key) -> KeyOutcome {
        let outcome = self.popup.on_keydown(key, self.focus.as_deref());
        match &outcome {
            KeyOutcome::MoveFocus(id) => self.focus = Some(id.clone()),
            KeyOutcome::Closed { restore_focus } => self.focus = restore_focus.clone(),
            KeyOutcome::Default => {
                if let Key::Tab { shift } = key
                    && self.popup.is_visible()
                {
                    let next = self
                        .popup
                        .default_tab_target(self.focus.as_deref(), shift)
                        .map(str::to_string);
                    if let Some(next) = next {
                        self.popup.set_focus(&next);
                        self.focus = Some(next);
                    }
                }
            }
        }
        outcome
    }

    pub fn dismiss_popup(&mut self, via: Dismissal) {
        self.focus = self.popup.dismiss(via);
    }

    /// Follow an in-page link.
    pub fn click_anchor(&mut self, href: &str, now: Instant) -> AnchorAction {
        let layout = &self.layout;
        let action = resolve_anchor(href, |id| layout.get(id).map(|b| b.top));
        if let AnchorAction::SmoothScroll { target, top } = &action {
            trace!("Smooth scroll to #{target}");
            self.animate_to(*top, now);
        }
        action
    }

    pub fn toggle_faq(&mut self, index: usize) -> Vec<AccordionChange> {
        self.focus = Some(format!("faq-question-{}", index + 1));
        self.faq.toggle(index)
    }

    // ── Diagnosis ──

    /// Submit the current prompt. Returns the request to send, if any.
    pub fn submit_diagnosis(&mut self, now: Instant) -> Option<DiagnosisRequest> {
        let effects = self.diagnosis.handle(
            FlowEvent::Submit {
                input: &self.prompt,
            },
            now,
        );
        let mut request = None;
        for effect in effects {
            match effect {
                FlowEffect::ScrollResultIntoView => {
                    if let Some(bounds) = self.layout.get(ids::AI_RESULT) {
                        let target = self.viewport.offset_to_center(bounds);
                        self.animate_to(target, now);
                    }
                }
                FlowEffect::SendRequest(r) => request = Some(r),
                _ => {}
            }
        }
        request
    }

    pub fn finish_diagnosis(&mut self, outcome: Result<DiagnosisResult, DiagnosisError>) {
        self.diagnosis.complete(outcome);
    }

    /// Copy the current result to the clipboard.
    pub fn copy_diagnosis(&mut self, now: Instant) -> Vec<FlowEffect> {
        let effects = self.diagnosis.handle(FlowEvent::CopyClicked, now);
        let mut out = Vec::new();
        for effect in effects {
            if let FlowEffect::WriteClipboard(text) = effect {
                let written = self.clipboard.write_text(&text);
                out.extend(self.diagnosis.copy_finished(written, now));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::diagnosis::{COPIED_LABEL, RequestState};
    use crate::popup::PopupVisibility;
    use crate::storage::{COUNTDOWN_KEY, DisabledStore, KeyValueStore};
    use std::sync::Arc;

    const NOW: i64 = 1_700_000_000_000;

    fn services(clipboard: Arc<MemoryClipboard>) -> Services {
        Services {
            durable: MemoryStore::shared(),
            session: MemoryStore::shared(),
            clipboard,
        }
    }

    fn layout() -> PageLayout {
        let mut layout = PageLayout::default();
        layout.insert(ids::HERO, ElementBox::new(0.0, 30.0));
        layout.insert("beneficios", ElementBox::new(30.0, 20.0));
        layout.insert("ebook-cover", ElementBox::new(40.0, 8.0));
        layout.insert("autor", ElementBox::new(50.0, 20.0));
        layout.insert("author-photo", ElementBox::new(60.0, 8.0));
        layout.insert(ids::DIAGNOSIS, ElementBox::new(70.0, 20.0));
        layout.insert(ids::AI_RESULT, ElementBox::new(80.0, 10.0));
        layout.insert(ids::OFFER, ElementBox::new(90.0, 20.0));
        layout.insert(ids::FAQ, ElementBox::new(110.0, 90.0));
        layout
    }

    fn landing() -> (Landing, Arc<MemoryClipboard>) {
        let clipboard = Arc::new(MemoryClipboard::new());
        let mut page = Landing::bootstrap(
            &LandingConfig::default(),
            services(clipboard.clone()),
            NOW,
        );
        page.set_layout(layout(), 40.0);
        (page, clipboard)
    }

    #[test]
    fn bootstrap_starts_the_countdown() {
        let (page, _) = landing();
        assert!(page.countdown_visible());
        let display = page.countdown_display.unwrap();
        assert_eq!(display.fields().padded(), ["01", "00", "00", "00"]);
    }

    #[test]
    fn lazy_margin_comes_from_config() {
        let config = LandingConfig {
            lazy_image_margin: 2.0,
            ..Default::default()
        };
        let clipboard = Arc::new(MemoryClipboard::new());
        let mut page = Landing::bootstrap(&config, services(clipboard), NOW);
        let update = page.set_layout(layout(), 40.0);

        assert_eq!(update.image_loads.len(), 1);
        assert!(page.images.get("ebook-cover").unwrap().loaded);
        assert!(!page.images.get("author-photo").unwrap().loaded);
    }

    #[test]
    fn unavailable_storage_hides_the_countdown() {
        let config = LandingConfig::default();
        let page = Landing::bootstrap(
            &config,
            Services {
                durable: Arc::new(DisabledStore::new("blocked")),
                session: MemoryStore::shared(),
                clipboard: Arc::new(MemoryClipboard::new()),
            },
            NOW,
        );
        assert!(!page.countdown_visible());
        assert!(page.countdown_display.is_none());
    }

    #[test]
    fn countdown_reuses_stored_deadline() {
        let durable = MemoryStore::shared();
        durable
            .set(COUNTDOWN_KEY, &(NOW + 3_661_000).to_string())
            .unwrap();
        let mut page = Landing::bootstrap(
            &LandingConfig::default(),
            Services {
                durable,
                session: MemoryStore::shared(),
                clipboard: Arc::new(MemoryClipboard::new()),
            },
            NOW,
        );
        let tick = page.on_tick(NOW + 1_000).unwrap();
        assert_eq!(tick.fields().padded(), ["00", "01", "01", "00"]);
    }

    #[test]
    fn reduced_motion_skips_parallax() {
        let config = LandingConfig {
            reduced_motion: true,
            ..Default::default()
        };
        let page = Landing::bootstrap(
            &config,
            services(Arc::new(MemoryClipboard::new())),
            NOW,
        );
        assert!(page.parallax.is_none());
    }

    #[test]
    fn no_observer_loads_images_eagerly() {
        let config = LandingConfig {
            intersection_observer: false,
            ..Default::default()
        };
        let page = Landing::bootstrap(
            &config,
            services(Arc::new(MemoryClipboard::new())),
            NOW,
        );
        assert!(page.images.images().iter().all(|i| i.loaded));
    }

    #[test]
    fn scrolling_reveals_loads_and_arms() {
        let (mut page, _) = landing();
        assert!(page.reveal.is_revealed("beneficios"));
        assert!(!page.reveal.is_revealed(ids::FAQ));

        let update = page.scroll_to(60.0).unwrap();
        assert!(update.popup_armed);
        assert!(update.revealed.contains(&ids::DIAGNOSIS.to_string()));
        assert!(!page.reveal.is_revealed(ids::FAQ));
        assert!(page.images.get("author-photo").unwrap().loaded);

        page.scroll_to(160.0);
        assert!(page.reveal.is_revealed(ids::FAQ));
    }

    #[test]
    fn exit_intent_locks_scroll_until_escape() {
        let (mut page, _) = landing();
        page.focus = Some("cta-hero".into());
        page.scroll_to(60.0);
        assert!(page.on_pointer_out(0.0));
        assert_eq!(page.popup.visibility(), PopupVisibility::Visible);
        assert_eq!(page.focus.as_deref(), Some(ids::CLOSE_POPUP));
        assert!(page.scroll_by(5.0).is_none());

        page.on_keydown(Key::Tab { shift: false });
        assert_eq!(page.focus.as_deref(), Some(ids::POPUP_CTA));
        page.on_keydown(Key::Tab { shift: false });
        assert_eq!(page.focus.as_deref(), Some(ids::CLOSE_POPUP));

        page.on_keydown(Key::Escape);
        assert_eq!(page.focus.as_deref(), Some("cta-hero"));
        assert!(page.scroll_by(5.0).is_some());
        assert!(!page.on_pointer_out(0.0));
    }

    #[test]
    fn anchor_click_animates_to_the_target() {
        let (mut page, _) = landing();
        let t0 = Instant::now();
        let action = page.click_anchor("#oferta", t0);
        assert!(matches!(action, AnchorAction::SmoothScroll { .. }));

        let frame = page.on_frame(t0 + crate::anchor::SMOOTH_SCROLL_DURATION);
        assert!(frame.scroll.is_some());
        assert_eq!(page.viewport.scroll_y, 90.0);
        assert!(page.scroll_animation.is_none());
    }

    #[test]
    fn copy_writes_the_summary() {
        let (mut page, clipboard) = landing();
        let t0 = Instant::now();
        page.prompt = "foco".into();
        assert!(page.submit_diagnosis(t0).is_some());
        assert!(page.scroll_animation.is_some());

        let result = DiagnosisResult {
            insight: "i".into(),
            concept: "c".into(),
            action: "a".into(),
            quote: "q".into(),
        };
        page.finish_diagnosis(Ok(result.clone()));
        assert_eq!(page.diagnosis.state(), &RequestState::Success(result.clone()));

        assert_eq!(page.copy_diagnosis(t0), vec![FlowEffect::ShowCopied]);
        assert_eq!(clipboard.contents(), Some(result.clipboard_summary()));
        assert_eq!(page.diagnosis.copy_button(t0).0, COPIED_LABEL);
    }

    #[test]
    fn faq_toggle_is_single_open() {
        let (mut page, _) = landing();
        page.toggle_faq(0);
        page.toggle_faq(2);
        assert_eq!(page.faq.open_index(), Some(2));
        assert_eq!(page.focus.as_deref(), Some("faq-question-3"));
    }
}
