//! In-page anchor links with eased scrolling.

use std::time::{Duration, Instant};

/// Length of one smooth scroll.
pub const SMOOTH_SCROLL_DURATION: Duration = Duration::from_millis(450);

#[derive(Debug, Clone, PartialEq)]
pub enum AnchorAction {
    /// Let the link do whatever it normally does.
    Default,
    /// Prevent the default and scroll so the target's top meets the
    /// viewport top.
    SmoothScroll { target: String, top: f64 },
}

/// Resolve a click on a link with `href`. `lookup` returns the document
/// top of the element with the given id.
pub fn resolve_anchor<F>(href: &str, lookup: F) -> AnchorAction
where
    F: Fn(&str) -> Option<f64>,
{
    let Some(id) = href.strip_prefix('#') else {
        return AnchorAction::Default;
    };
    if id.is_empty() {
        return AnchorAction::Default;
    }
    match lookup(id) {
        Some(top) => AnchorAction::SmoothScroll {
            target: id.to_string(),
            top,
        },
        None => AnchorAction::Default,
    }
}

/// Cubic ease-in-out over `t` in 0.0..=1.0.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    from: f64,
    to: f64,
    started: Instant,
    duration: Duration,
}

impl ScrollAnimation {
    pub fn new(from: f64, to: f64, started: Instant) -> Self {
        Self::with_duration(from, to, started, SMOOTH_SCROLL_DURATION)
    }

    pub fn with_duration(from: f64, to: f64, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }

    /// Scroll offset at `now`.
    pub fn position(&self, now: Instant) -> f64 {
        if self.duration.is_zero() || self.is_finished(now) {
            return self.to;
        }
        let t = now.saturating_duration_since(self.started).as_secs_f64()
            / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * ease_in_out_cubic(t)
    }
}
