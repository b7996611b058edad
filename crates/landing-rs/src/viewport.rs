//! Scroll geometry shared by the visibility-driven controllers.
//!
//! All coordinates are document-relative, in the same unit the front end
//! lays the page out in (CSS pixels in a browser, rows in the terminal).

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_y: f64,
    pub height: f64,
    pub document_height: f64,
}

/// Vertical extent of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementBox {
    pub top: f64,
    pub height: f64,
}

impl ElementBox {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Growth applied to the viewport before intersecting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RootMargin {
    pub top: f64,
    pub bottom: f64,
}

impl RootMargin {
    pub const NONE: Self = Self {
        top: 0.0,
        bottom: 0.0,
    };

    pub fn bottom(px: f64) -> Self {
        Self {
            top: 0.0,
            bottom: px,
        }
    }
}

impl Viewport {
    pub fn new(scroll_y: f64, height: f64, document_height: f64) -> Self {
        Self {
            scroll_y,
            height,
            document_height,
        }
    }

    /// Largest valid scroll offset.
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.height).max(0.0)
    }

    pub fn clamp_scroll(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_scroll())
    }

    /// Fraction of `element` inside the (margin-grown) viewport, 0.0..=1.0.
    pub fn intersection_ratio(&self, element: ElementBox, margin: RootMargin) -> f64 {
        let root_top = self.scroll_y - margin.top;
        let root_bottom = self.scroll_y + self.height + margin.bottom;

        if element.height <= 0.0 {
            let inside = element.top >= root_top && element.top <= root_bottom;
            return if inside { 1.0 } else { 0.0 };
        }

        let overlap = element.bottom().min(root_bottom) - element.top.max(root_top);
        (overlap.max(0.0) / element.height).min(1.0)
    }

    /// Whether `element` crosses `threshold` of visibility.
    pub fn intersects(&self, element: ElementBox, margin: RootMargin, threshold: f64) -> bool {
        let ratio = self.intersection_ratio(element, margin);
        ratio > 0.0 && ratio >= threshold
    }

    /// Scroll offset that puts the element's top at the viewport top.
    pub fn offset_to_start(&self, element: ElementBox) -> f64 {
        self.clamp_scroll(element.top)
    }

    /// Scroll offset that centres the element vertically.
    pub fn offset_to_center(&self, element: ElementBox) -> f64 {
        self.clamp_scroll(element.top + element.height / 2.0 - self.height / 2.0)
    }
}
