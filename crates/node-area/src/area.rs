//! Transient per-plugin surface state
//!
//! Holds the last pointer position (logical), the zoom/pan transform of the
//! surface and the [`Content`] every view element is attached to. None of
//! this is persisted.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::element::Content;
use crate::types::Position;

/// Zoom (`k`) and pan (`x`, `y`, in screen pixels) of the surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl AreaTransform {
    /// Map a screen point into logical node space
    pub fn to_logical(&self, screen: Position) -> Position {
        (screen - Position::new(self.x, self.y)).unzoom(self.k)
    }

    /// Map a logical point onto the screen
    pub fn to_screen(&self, logical: Position) -> Position {
        Position::new(logical.x * self.k + self.x, logical.y * self.k + self.y)
    }
}

impl Default for AreaTransform {
    fn default() -> Self {
        Self { k: 1.0, x: 0.0, y: 0.0 }
    }
}

/// Surface state shared by an area and its node views
#[derive(Debug, Default)]
pub struct Area {
    pointer: Mutex<Position>,
    transform: Mutex<AreaTransform>,
    content: Content,
}

impl Area {
    pub fn new(transform: AreaTransform) -> Self {
        Self {
            pointer: Mutex::new(Position::ORIGIN),
            transform: Mutex::new(transform),
            content: Content::new(),
        }
    }

    /// Last pointer position in logical coordinates
    pub fn pointer(&self) -> Position {
        *self.pointer.lock()
    }

    /// Record a screen-space pointer and return its logical position
    pub fn set_pointer_from_screen(&self, screen: Position) -> Position {
        let logical = self.transform().to_logical(screen);
        *self.pointer.lock() = logical;
        logical
    }

    pub fn transform(&self) -> AreaTransform {
        *self.transform.lock()
    }

    pub fn set_transform(&self, transform: AreaTransform) {
        *self.transform.lock() = transform;
    }

    pub fn zoom(&self) -> f64 {
        self.transform.lock().k
    }

    pub fn content(&self) -> &Content {
        &self.content
    }
}
