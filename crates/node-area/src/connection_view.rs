//! Connection views
//!
//! A connection view only owns the element its renderer mounts into. It has
//! no position or size of its own and no drag binding.

use crate::element::Element;

#[derive(Debug, Clone, Default)]
pub struct ConnectionView {
    element: Element,
}

impl ConnectionView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}
