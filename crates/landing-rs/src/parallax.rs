//! Hero background parallax driven by pointer position and scroll.
//!
//! Pointer and scroll events only record state and request a frame;
//! requests are coalesced so at most one frame is pending at a time.

use std::fmt;

/// Pointer offset multiplier on both axes.
pub const POINTER_FACTOR: f64 = 0.02;
/// Scroll offset multiplier on the vertical axis.
pub const SCROLL_FACTOR: f64 = 0.15;
/// Fixed zoom so the translated background never shows its edges.
pub const SCALE: f64 = 1.05;

/// Screen rectangle of the hero section.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeroRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl HeroRect {
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl fmt::Display for BackgroundTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate({}px, {}px) scale({})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

#[derive(Debug, Default)]
pub struct HeroParallax {
    mouse_x: f64,
    mouse_y: f64,
    ticking: bool,
    last: Option<BackgroundTransform>,
}

impl HeroParallax {
    /// `None` when the visitor prefers reduced motion.
    pub fn new(reduced_motion: bool) -> Option<Self> {
        (!reduced_motion).then(Self::default)
    }

    /// Returns `true` when this call scheduled a frame.
    pub fn on_pointer_move(&mut self, client_x: f64, client_y: f64, hero: HeroRect) -> bool {
        let (cx, cy) = hero.center();
        self.mouse_x = client_x - cx;
        self.mouse_y = client_y - cy;
        self.request_frame()
    }

    pub fn on_pointer_leave(&mut self) -> bool {
        self.mouse_x = 0.0;
        self.mouse_y = 0.0;
        self.request_frame()
    }

    pub fn on_scroll(&mut self) -> bool {
        self.request_frame()
    }

    pub fn frame_pending(&self) -> bool {
        self.ticking
    }

    fn request_frame(&mut self) -> bool {
        if self.ticking {
            return false;
        }
        self.ticking = true;
        true
    }

    /// Run the pending frame and compute the transform for `scroll_offset`.
    pub fn frame(&mut self, scroll_offset: f64) -> BackgroundTransform {
        let transform = BackgroundTransform {
            translate_x: self.mouse_x * POINTER_FACTOR,
            translate_y: scroll_offset * SCROLL_FACTOR + self.mouse_y * POINTER_FACTOR,
            scale: SCALE,
        };
        self.ticking = false;
        self.last = Some(transform);
        transform
    }

    /// Transform applied by the most recent frame.
    pub fn current(&self) -> Option<BackgroundTransform> {
        self.last
    }
}
