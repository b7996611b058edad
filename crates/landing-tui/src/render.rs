//! Page rendering for the landing TUI.
//!
//! Every frame the page is laid out as a flat list of terminal rows (the
//! "document"). The row of each element becomes its [`ElementBox`], which
//! is pushed back into the page runtime so reveal, lazy loading, anchors
//! and the exit-intent threshold work on the same geometry the visitor
//! sees.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use landing_rs::accordion::answer_id;
use landing_rs::content::{PageContent, ids};
use landing_rs::countdown::CountdownTick;
use landing_rs::diagnosis::{RequestState, SubmitControl};
use landing_rs::lazy_image::{ImageSource, LazyImage};
use landing_rs::page::{Landing, PageLayout};
use landing_rs::parallax::BackgroundTransform;
use landing_rs::popup::Dismissal;
use landing_rs::ui::{LogLevel, LogLine};
use landing_rs::viewport::ElementBox;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{Activation, App, Hit, InputMode, Target};
use crate::lock;

/// Left margin of the hero copy before the parallax offset.
const HERO_INDENT: i64 = 4;

// ── Public Utilities ──────────────────────────────────────────────────

/// Truncate a string to at most `max` characters, appending "..." if
/// truncated.
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}

/// Greedy word wrap on character counts. Words longer than `width` get a
/// line of their own.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Map a log level to a ratatui [`Style`].
pub fn log_level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Trace => Style::default().fg(Color::DarkGray),
        LogLevel::Debug => Style::default().fg(Color::Cyan),
        LogLevel::Info => Style::default().fg(Color::Green),
        LogLevel::Warn => Style::default().fg(Color::Yellow),
        LogLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

/// Whole-cell offset of the hero copy for a background transform.
pub fn hero_offset(transform: Option<BackgroundTransform>) -> (i64, i64) {
    transform.map_or((0, 0), |t| {
        (t.translate_x.round() as i64, t.translate_y.round() as i64)
    })
}

// ── Snapshot ──────────────────────────────────────────────────────────

/// Snapshot of the page fields needed for rendering.
///
/// Cloned in one shot so the page lock is held only for the clone, never
/// while widgets are built or drawn. The diagnosis task completes on a
/// tokio worker and must not wait on the render pass.
pub(crate) struct RenderSnapshot {
    pub(crate) content: PageContent,
    pub(crate) hero_transform: Option<BackgroundTransform>,
    pub(crate) revealed: BTreeSet<&'static str>,
    pub(crate) images: Vec<LazyImage>,
    pub(crate) faq_open: Option<usize>,
    /// `None` when the countdown is hidden.
    pub(crate) countdown: Option<CountdownTick>,
    pub(crate) request: RequestState,
    pub(crate) submit: SubmitControl,
    pub(crate) shaking: bool,
    pub(crate) copy_label: &'static str,
    pub(crate) copy_flash: bool,
    pub(crate) prompt: String,
    pub(crate) editing: bool,
    pub(crate) popup_visible: bool,
    pub(crate) focus: Option<String>,
    pub(crate) scroll_y: f64,
    pub(crate) logs: Vec<LogLine>,
}

impl RenderSnapshot {
    fn is_focused(&self, id: &str) -> bool {
        self.focus.as_deref() == Some(id)
    }

    /// Text style for an element that fades in on scroll.
    fn tone(&self, id: &str) -> Style {
        if self.revealed.contains(id) {
            Style::default()
        } else {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM)
        }
    }

    fn image(&self, id: &str) -> Option<&LazyImage> {
        self.images.iter().find(|i| i.spec.id == id)
    }
}

pub(crate) fn snapshot(state: &Arc<Mutex<Landing>>, app: &App, now: Instant) -> RenderSnapshot {
    let page = lock(state);
    let (copy_label, copy_flash) = page.diagnosis.copy_button(now);
    let revealed = page
        .content
        .sections
        .iter()
        .map(|s| s.id)
        .chain([ids::DIAGNOSIS, ids::OFFER, ids::FAQ])
        .filter(|id| page.reveal.is_revealed(id))
        .collect();

    RenderSnapshot {
        content: page.content.clone(),
        hero_transform: page.parallax.as_ref().and_then(|p| p.current()),
        revealed,
        images: page.images.images().to_vec(),
        faq_open: page.faq.open_index(),
        countdown: page.countdown.as_ref().and(page.countdown_display),
        request: page.diagnosis.state().clone(),
        submit: page.diagnosis.submit_control().clone(),
        shaking: page.diagnosis.is_shaking(now),
        copy_label,
        copy_flash,
        prompt: page.prompt.clone(),
        editing: app.input_mode == InputMode::Prompt,
        popup_visible: page.popup.is_visible(),
        focus: page.focus.clone(),
        scroll_y: page.viewport.scroll_y,
        logs: if app.show_logs {
            page.console.lines().to_vec()
        } else {
            Vec::new()
        },
    }
    // lock released here
}

// ── Panes ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub(crate) struct Panes {
    /// Top row. Reaching it with the pointer counts as leaving the page.
    pub(crate) chrome: Rect,
    pub(crate) nav: Rect,
    pub(crate) page: Rect,
    pub(crate) logs: Option<Rect>,
    pub(crate) input: Rect,
}

impl Panes {
    /// Page pane without its border.
    pub(crate) fn page_inner(&self) -> Rect {
        Rect::new(
            self.page.x.saturating_add(1),
            self.page.y.saturating_add(1),
            self.page.width.saturating_sub(2),
            self.page.height.saturating_sub(2),
        )
    }
}

pub(crate) fn split(area: Rect, show_logs: bool) -> Panes {
    // [1] chrome | [1] nav | [flex] page (+ logs) | [3] input bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(area);

    let (page, logs) = if show_logs {
        let mid = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[2]);
        (mid[0], Some(mid[1]))
    } else {
        (chunks[2], None)
    };

    Panes {
        chrome: chunks[0],
        nav: chunks[1],
        page,
        logs,
        input: chunks[3],
    }
}

/// Centered box for the exit popup.
pub(crate) fn modal_area(area: Rect) -> Rect {
    let width = (area.width * 3 / 5).clamp(24.min(area.width), area.width);
    let height = 9.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn button_label(label: &str) -> String {
    format!("[ {label} ]")
}

/// Close and call-to-action buttons on the last inner row of the modal.
pub(crate) fn modal_buttons(content: &PageContent, modal: Rect) -> Vec<Hit> {
    let row = modal.bottom().saturating_sub(2);
    let mut column = modal.x + 2;
    let mut hits = Vec::new();
    for (id, label, activation) in [
        (
            ids::CLOSE_POPUP,
            content.popup.close_label,
            Activation::Dismiss(Dismissal::CloseButton),
        ),
        (
            ids::POPUP_CTA,
            content.popup.cta_label,
            Activation::Dismiss(Dismissal::CallToAction),
        ),
    ] {
        let width = button_label(label).chars().count() as u16;
        hits.push(Hit {
            id: id.to_string(),
            row,
            columns: (column, column + width),
            activation,
        });
        column += width + 2;
    }
    hits
}

/// Nav links laid out left to right on the nav row.
pub(crate) fn nav_hits(content: &PageContent, nav: Rect) -> Vec<Hit> {
    let mut column = nav.x + 1;
    content
        .nav
        .iter()
        .enumerate()
        .map(|(i, link)| {
            let width = link.label.chars().count() as u16 + 2;
            let hit = Hit {
                id: format!("nav-{}", i + 1),
                row: nav.y,
                columns: (column, column + width),
                activation: Activation::Anchor(link.href),
            };
            column += width + 2;
            hit
        })
        .collect()
}

// ── Document ──────────────────────────────────────────────────────────

/// The page laid out as terminal rows.
pub(crate) struct Document {
    pub(crate) lines: Vec<Line<'static>>,
    pub(crate) layout: PageLayout,
    /// Focusable elements in document order.
    pub(crate) targets: Vec<Target>,
}

struct DocBuilder {
    width: usize,
    lines: Vec<Line<'static>>,
    layout: PageLayout,
    targets: Vec<Target>,
}

impl DocBuilder {
    fn row(&self) -> usize {
        self.lines.len()
    }

    fn line(&mut self, line: Line<'static>) {
        self.lines.push(line);
    }

    fn blank(&mut self) {
        self.lines.push(Line::default());
    }

    fn paragraph(&mut self, text: &str, indent: usize, style: Style) {
        self.wrapped(text, indent, self.width.saturating_sub(indent), style);
    }

    /// Like [`Self::paragraph`], wrapping at a width that does not depend
    /// on the indent.
    fn wrapped(&mut self, text: &str, indent: usize, wrap_width: usize, style: Style) {
        let pad = " ".repeat(indent);
        for row in wrap_text(text, wrap_width) {
            self.line(Line::from(Span::styled(format!("{pad}{row}"), style)));
        }
    }

    fn heading(&mut self, text: &str, tone: Style) {
        let style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
            .patch(tone);
        self.paragraph(text, 2, style);
    }

    fn button(
        &mut self,
        id: &str,
        label: &str,
        activation: Activation,
        indent: usize,
        style: Style,
        focused: bool,
    ) {
        let row = self.row();
        self.targets.push(Target {
            id: id.to_string(),
            row,
            activation,
        });
        let style = if focused {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        };
        self.line(Line::from(vec![
            Span::raw(" ".repeat(indent)),
            Span::styled(button_label(label), style),
        ]));
    }

    /// Lay out one element and record its box. Empty elements take a row.
    fn element(&mut self, id: &str, build: impl FnOnce(&mut Self)) {
        let top = self.row();
        build(self);
        if self.row() == top {
            self.blank();
        }
        let height = self.row() - top;
        self.layout
            .insert(id, ElementBox::new(top as f64, height as f64));
    }

    fn finish(mut self) -> Document {
        self.layout.document_height = self.lines.len() as f64;
        Document {
            lines: self.lines,
            layout: self.layout,
            targets: self.targets,
        }
    }
}

pub(crate) fn build_document(snap: &RenderSnapshot, width: usize) -> Document {
    let mut b = DocBuilder {
        width,
        lines: Vec::new(),
        layout: PageLayout::default(),
        targets: Vec::new(),
    };

    hero(&mut b, snap);
    for section in &snap.content.sections {
        let tone = snap.tone(section.id);
        b.element(section.id, |b| {
            b.blank();
            b.heading(section.title, tone);
            b.blank();
            for paragraph in section.paragraphs {
                b.paragraph(&format!("• {paragraph}"), 4, tone);
            }
            for image in section.images {
                if let Some(image) = snap.image(image) {
                    b.blank();
                    lazy_image(b, image);
                }
            }
            b.blank();
        });
    }
    diagnosis(&mut b, snap);
    offer(&mut b, snap);
    faq(&mut b, snap);

    b.blank();
    b.paragraph(
        snap.content.footer,
        2,
        Style::default().fg(Color::DarkGray),
    );
    b.finish()
}

fn backdrop(width: usize, phase: i64) -> Line<'static> {
    let row: String = (0..width)
        .map(|i| {
            if (i as i64 + phase).rem_euclid(4) == 0 {
                '·'
            } else {
                ' '
            }
        })
        .collect();
    Line::from(Span::styled(row, Style::default().fg(Color::DarkGray)))
}

fn hero(b: &mut DocBuilder, snap: &RenderSnapshot) {
    let hero = &snap.content.hero;
    let (dx, dy) = hero_offset(snap.hero_transform);
    let indent = (HERO_INDENT + dx).max(0) as usize;
    b.element(ids::HERO, |b| {
        // Wrap at the resting width so the offset never changes row counts.
        let wrap_width = b.width.saturating_sub(2 * HERO_INDENT as usize);
        b.line(backdrop(b.width, dx + dy));
        b.blank();
        b.wrapped(
            &hero.eyebrow.to_uppercase(),
            indent,
            wrap_width,
            Style::default().fg(Color::Magenta),
        );
        b.wrapped(
            hero.title,
            indent,
            wrap_width,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        b.wrapped(
            hero.subtitle,
            indent,
            wrap_width,
            Style::default().fg(Color::Gray),
        );
        b.blank();
        b.button(
            "cta-hero",
            hero.cta_label,
            Activation::Anchor(hero.cta_href),
            indent,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            snap.is_focused("cta-hero"),
        );
        b.blank();
        b.line(backdrop(b.width, dx - dy));
    });
}

fn lazy_image(b: &mut DocBuilder, image: &LazyImage) {
    let source = match (&image.current, image.loaded) {
        (Some(ImageSource::Src(src)), true) => src.clone(),
        (Some(ImageSource::Srcset { srcset, .. }), true) => srcset.clone(),
        _ => "carregando...".to_string(),
    };
    let (glyph, style) = if image.loaded {
        ("▣", Style::default().fg(Color::Cyan))
    } else {
        ("░", Style::default().fg(Color::DarkGray))
    };
    let alt = image.spec.alt.clone();
    b.element(&image.spec.id, |b| {
        b.line(Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{glyph} {alt}"), style),
        ]));
        b.paragraph(&source, 6, Style::default().fg(Color::DarkGray));
    });
}

fn diagnosis(b: &mut DocBuilder, snap: &RenderSnapshot) {
    let copy = &snap.content.diagnosis;
    let tone = snap.tone(ids::DIAGNOSIS);
    b.element(ids::DIAGNOSIS, |b| {
        b.blank();
        b.heading(copy.title, tone);
        b.paragraph(copy.lead, 2, tone);
        b.blank();

        // Challenge field.
        let indent = if snap.shaking { 4 } else { 2 };
        let (text, mut style) = if snap.prompt.is_empty() && !snap.editing {
            (
                copy.placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            )
        } else if snap.editing {
            (format!("{}█", snap.prompt), Style::default().fg(Color::White))
        } else {
            (snap.prompt.clone(), Style::default().fg(Color::White))
        };
        if snap.shaking {
            style = style.fg(Color::Red);
        }
        if snap.is_focused("user-challenge") || snap.editing {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        let row = b.row();
        b.targets.push(Target {
            id: "user-challenge".to_string(),
            row,
            activation: Activation::EditPrompt,
        });
        b.line(Line::from(vec![
            Span::raw(" ".repeat(indent)),
            Span::styled("▸ ", Style::default().fg(Color::Cyan)),
            Span::styled(truncate_str(&text, b.width.saturating_sub(indent + 5)), style),
        ]));
        b.blank();

        let submit_style = if snap.submit.enabled {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        b.button(
            "diagnosis-submit",
            &snap.submit.label,
            Activation::Submit,
            2,
            submit_style,
            snap.is_focused("diagnosis-submit"),
        );
        b.blank();

        b.element(ids::AI_RESULT, |b| diagnosis_result(b, snap));
        b.blank();
    });
}

fn diagnosis_result(b: &mut DocBuilder, snap: &RenderSnapshot) {
    match &snap.request {
        RequestState::Idle => {}
        RequestState::Loading => {
            b.paragraph(
                landing_rs::diagnosis::SKELETON_LABEL,
                2,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::ITALIC),
            );
            for fraction in [9, 7, 8] {
                let bar = "▒".repeat(b.width.saturating_sub(4) * fraction / 10);
                b.line(Line::from(Span::styled(
                    format!("  {bar}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        RequestState::Success(result) => {
            for section in result.sections() {
                b.line(Line::from(Span::styled(
                    format!("  {} {}", section.icon.glyph(), section.heading),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )));
                b.paragraph(section.body, 5, Style::default());
                b.blank();
            }
            b.paragraph(
                &result.quote_block(),
                4,
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::ITALIC),
            );
            b.blank();
            let style = if snap.copy_flash {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            };
            b.button(
                "copy-button",
                snap.copy_label,
                Activation::Copy,
                2,
                style,
                snap.is_focused("copy-button"),
            );
        }
        RequestState::Error(message) => {
            b.paragraph(message, 2, Style::default().fg(Color::Red));
        }
    }
}

fn offer(b: &mut DocBuilder, snap: &RenderSnapshot) {
    let content = &snap.content;
    let tone = snap.tone(ids::OFFER);
    b.element(ids::OFFER, |b| {
        b.blank();
        b.heading(content.offer_title, tone);
        if let Some(tick) = snap.countdown {
            b.blank();
            b.element(ids::COUNTDOWN, |b| {
                b.paragraph(content.countdown_label, 2, tone);
                let [days, hours, minutes, seconds] = tick.fields().padded();
                b.line(Line::from(Span::styled(
                    format!("    {days}  :  {hours}  :  {minutes}  :  {seconds}"),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )));
                let units: Vec<String> = content
                    .countdown_units
                    .iter()
                    .map(|u| format!("{u:<7}"))
                    .collect();
                b.line(Line::from(Span::styled(
                    format!("    {}", units.concat()),
                    Style::default().fg(Color::DarkGray),
                )));
            });
        }
        b.blank();
    });
}

fn faq(b: &mut DocBuilder, snap: &RenderSnapshot) {
    let tone = snap.tone(ids::FAQ);
    b.element(ids::FAQ, |b| {
        b.blank();
        b.heading(snap.content.faq_title, tone);
        b.blank();
        for (i, item) in snap.content.faq.iter().enumerate() {
            let open = snap.faq_open == Some(i);
            let id = format!("faq-question-{}", i + 1);
            let marker = if open { "▾" } else { "▸" };
            let mut style = Style::default().fg(Color::White).patch(tone);
            if snap.is_focused(&id) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let row = b.row();
            b.targets.push(Target {
                id,
                row,
                activation: Activation::ToggleFaq(i),
            });
            b.line(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{marker} {}. {}", i + 1, item.question), style),
            ]));
            if open {
                b.element(&answer_id(i), |b| {
                    b.paragraph(item.answer, 6, Style::default().fg(Color::Gray));
                });
            }
        }
        b.blank();
    });
}

// ── Root Render ───────────────────────────────────────────────────────

pub(crate) fn render(
    frame: &mut Frame,
    panes: &Panes,
    snap: &RenderSnapshot,
    doc: Document,
    app: &App,
) {
    render_chrome(frame, panes.chrome, snap, doc.layout.document_height);
    render_nav(frame, panes.nav, snap, &app.map.nav);
    render_page(frame, panes.page, snap, doc);
    if let Some(area) = panes.logs {
        render_logs(frame, area, &snap.logs, app);
    }
    render_input(frame, panes.input, app, snap);
    if snap.popup_visible
        && let Some(modal) = app.map.modal
    {
        render_popup(frame, modal, snap, &app.map.modal_buttons);
    }
}

fn render_chrome(frame: &mut Frame, area: Rect, snap: &RenderSnapshot, document_height: f64) {
    let pct = if document_height > 0.0 {
        (snap.scroll_y / document_height * 100.0).round()
    } else {
        0.0
    };
    let line = Line::from(vec![
        Span::styled(" ◉ ", Style::default().fg(Color::Magenta)),
        Span::styled(
            snap.content.hero.title,
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!("   {pct:.0}%"), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_nav(frame: &mut Frame, area: Rect, snap: &RenderSnapshot, hits: &[Hit]) {
    let mut spans = vec![Span::raw(" ")];
    for (hit, link) in hits.iter().zip(&snap.content.nav) {
        let mut style = Style::default().fg(Color::Cyan);
        if snap.is_focused(&hit.id) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(format!(" {} ", link.label), style));
        spans.push(Span::raw("  "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_page(frame: &mut Frame, area: Rect, snap: &RenderSnapshot, doc: Document) {
    let border = if snap.popup_visible {
        Color::DarkGray
    } else {
        Color::Blue
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let scroll = snap.scroll_y.round().max(0.0) as u16;
    let paragraph = Paragraph::new(doc.lines).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

// ── Exit Popup ────────────────────────────────────────────────────────

fn render_popup(frame: &mut Frame, area: Rect, snap: &RenderSnapshot, buttons: &[Hit]) {
    let copy = &snap.content.popup;
    let inner_width = usize::from(area.width.saturating_sub(4));

    let mut lines: Vec<Line> = vec![Line::default()];
    for row in wrap_text(copy.body, inner_width) {
        lines.push(Line::from(Span::raw(format!(" {row}"))));
    }
    // Pad so the buttons land on the last inner row.
    let button_row = usize::from(area.height.saturating_sub(3));
    while lines.len() < button_row {
        lines.push(Line::default());
    }

    let mut spans = vec![Span::raw(" ")];
    for (hit, label) in buttons.iter().zip([copy.close_label, copy.cta_label]) {
        let mut style = if hit.id == ids::POPUP_CTA {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        if snap.is_focused(&hit.id) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(button_label(label), style));
        spans.push(Span::raw("  "));
    }
    lines.push(Line::from(spans));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} ", copy.title));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

// ── Log Pane ──────────────────────────────────────────────────────────

fn render_logs(frame: &mut Frame, area: Rect, logs: &[LogLine], app: &App) {
    let inner_height = area.height.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = Vec::with_capacity(logs.len());

    for log in logs {
        // Trace and debug stay in the buffer but are too noisy to show.
        if log.level < LogLevel::Info {
            continue;
        }
        let level_span = Span::styled(
            format!("{} ", log.level.label()),
            log_level_style(log.level),
        );
        let time_span = Span::styled(
            format!("{} ", log.time),
            Style::default().fg(Color::DarkGray),
        );
        let component_span = Span::styled(
            format!("{} ", log.component),
            Style::default().fg(Color::Cyan),
        );
        let msg_span = Span::raw(&log.message);
        lines.push(Line::from(vec![
            time_span,
            level_span,
            component_span,
            msg_span,
        ]));
    }

    let total = lines.len();
    let scroll = total
        .saturating_sub(inner_height)
        .saturating_sub(app.log_scroll);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Log ");

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

// ── Input Bar ─────────────────────────────────────────────────────────

fn render_input(frame: &mut Frame, area: Rect, app: &App, snap: &RenderSnapshot) {
    let (title, style) = if snap.popup_visible {
        (
            " [Tab] next  [Enter] choose  [Esc] close ".to_string(),
            Style::default().fg(Color::Yellow),
        )
    } else {
        match app.input_mode {
            InputMode::Browse => {
                let hint = if let Some(ref msg) = app.status_message {
                    msg.clone()
                } else {
                    "[q] quit  [Tab] focus  [Enter] open  [i] type  [1-4] FAQ  [c] copy  [,] logs"
                        .to_string()
                };
                (format!(" {hint} "), Style::default().fg(Color::DarkGray))
            }
            InputMode::Prompt => {
                let char_count = snap.prompt.chars().count();
                (
                    format!(" Your challenge ({char_count} chars)  [Enter] send  [Esc] done "),
                    Style::default().fg(Color::Green),
                )
            }
        }
    };

    let input_text = match app.input_mode {
        InputMode::Prompt if !snap.popup_visible => format!("> {}\u{2588}", snap.prompt),
        _ => String::new(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    let paragraph = Paragraph::new(input_text).block(block);
    frame.render_widget(paragraph, area);
}

// ── Tests ─────────────────────────────────────────────────────────────
