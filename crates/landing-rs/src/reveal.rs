//! Reveal-on-scroll: elements get their `visible` class the first time a
//! tenth of them is on screen, and are never observed again.

use std::collections::BTreeSet;

use tracing::trace;

use crate::viewport::{ElementBox, RootMargin, Viewport};

pub const REVEAL_THRESHOLD: f64 = 0.1;

#[derive(Debug, Default)]
pub struct ScrollObserver {
    observed: Vec<String>,
    revealed: BTreeSet<String>,
}

impl ScrollObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.revealed.contains(&id) && !self.observed.contains(&id) {
            self.observed.push(id);
        }
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }

    pub fn pending(&self) -> usize {
        self.observed.len()
    }

    /// Check every observed element against the viewport and return the
    /// ids revealed by this call. `layout` gives the current box of an id;
    /// ids it cannot place stay observed.
    pub fn on_viewport<F>(&mut self, viewport: &Viewport, layout: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<ElementBox>,
    {
        let (hit, rest): (Vec<String>, Vec<String>) =
            std::mem::take(&mut self.observed).into_iter().partition(|id| {
                layout(id).is_some_and(|b| viewport.intersects(b, RootMargin::NONE, REVEAL_THRESHOLD))
            });
        self.observed = rest;
        for id in &hit {
            trace!("Revealed {id}");
            self.revealed.insert(id.clone());
        }
        hit
    }
}
