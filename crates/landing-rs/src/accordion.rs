//! Single-open FAQ accordion.

use tracing::trace;

/// Id of the answer region for the 0-based item `index`.
pub fn answer_id(index: usize) -> String {
    format!("faq-answer-{}", index + 1)
}

/// Visual change for one item after a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionChange {
    pub index: usize,
    /// New `aria-expanded` value; the answer region expands or collapses
    /// with it.
    pub expanded: bool,
}

#[derive(Debug, Clone)]
pub struct AccordionController {
    len: usize,
    open: Option<usize>,
}

impl AccordionController {
    pub fn new(len: usize) -> Self {
        Self { len, open: None }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    /// Toggle one item. Opening it closes whichever other item was open.
    pub fn toggle(&mut self, index: usize) -> Vec<AccordionChange> {
        if index >= self.len {
            return Vec::new();
        }
        let opening = !self.is_open(index);
        let mut changes = Vec::with_capacity(2);
        if let Some(other) = self.open.filter(|&o| o != index) {
            changes.push(AccordionChange {
                index: other,
                expanded: false,
            });
        }
        changes.push(AccordionChange {
            index,
            expanded: opening,
        });
        self.open = opening.then_some(index);
        trace!("FAQ toggle {index}: open={:?}", self.open);
        changes
    }
}
