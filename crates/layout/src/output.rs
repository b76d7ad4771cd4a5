//! Output types from the layout engine.

use crate::elements::{LayoutElement, PositionedElement};

/// Pages of positioned elements ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDocument {
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<Vec<PositionedElement>>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text fragments of one page in drawing order.
    pub fn page_text(&self, index: usize) -> Vec<&str> {
        self.pages
            .get(index)
            .into_iter()
            .flatten()
            .filter_map(|e| match &e.element {
                LayoutElement::Text(t) => Some(t.content.as_str()),
                _ => None,
            })
            .collect()
    }
}
