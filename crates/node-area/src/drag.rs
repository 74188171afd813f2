//! Pointer drag detection
//!
//! A drag binding turns raw pointer input on a view into logical positions.
//! It reads the view's current position through a [`DragContext`] when the
//! pointer is pressed, then maps every later pointer delta through the zoom
//! current at that move: `start + (pointer - pointer_start) / zoom`.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Mouse button reported with a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A raw pointer event in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub screen: Position,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn primary(x: f64, y: f64) -> Self {
        Self {
            screen: Position::new(x, y),
            button: PointerButton::Primary,
        }
    }

    pub fn secondary(x: f64, y: f64) -> Self {
        Self {
            screen: Position::new(x, y),
            button: PointerButton::Secondary,
        }
    }
}

/// Pointer input delivered to a node view
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down(PointerEvent),
    Move(PointerEvent),
    Up(PointerEvent),
    ContextMenu(PointerEvent),
}

/// Getters a drag binding reads while a drag runs
pub trait DragContext {
    fn current_position(&self) -> Position;
    fn zoom(&self) -> f64;
}

/// What a drag binding asks its owner to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragStep {
    /// The pointer was pressed on the view
    Start,
    /// Move the view to this logical position
    Translate(Position),
    /// The pointer was released after a press
    End,
}

/// Capability interface of a pointer drag detector
pub trait PointerDrag: Send {
    fn press(&mut self, event: &PointerEvent, context: &dyn DragContext) -> Option<DragStep>;

    fn moved(&mut self, event: &PointerEvent, context: &dyn DragContext) -> Option<DragStep>;

    fn release(&mut self, event: &PointerEvent) -> Option<DragStep>;

    /// Stop reacting to input. Calling it again has no effect.
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct DragOrigin {
    pointer: Position,
    start: Position,
}

/// Default drag detector driven by primary-button input
#[derive(Debug, Default)]
pub struct Drag {
    origin: Option<DragOrigin>,
    destroyed: bool,
}

impl Drag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.origin.is_some()
    }
}

fn valid_zoom(k: f64) -> bool {
    k.is_finite() && k > 0.0
}

impl PointerDrag for Drag {
    fn press(&mut self, event: &PointerEvent, context: &dyn DragContext) -> Option<DragStep> {
        if self.destroyed || event.button != PointerButton::Primary {
            return None;
        }
        let zoom = context.zoom();
        if !valid_zoom(zoom) {
            log::warn!("Ignoring drag start with invalid zoom {}", zoom);
            return None;
        }
        self.origin = Some(DragOrigin {
            pointer: event.screen,
            start: context.current_position(),
        });
        Some(DragStep::Start)
    }

    fn moved(&mut self, event: &PointerEvent, context: &dyn DragContext) -> Option<DragStep> {
        let origin = self.origin?;
        let zoom = context.zoom();
        if !valid_zoom(zoom) {
            log::warn!("Ignoring drag move with invalid zoom {}", zoom);
            return None;
        }
        let delta = (event.screen - origin.pointer).unzoom(zoom);
        Some(DragStep::Translate(origin.start + delta))
    }

    fn release(&mut self, _event: &PointerEvent) -> Option<DragStep> {
        self.origin.take().map(|_| DragStep::End)
    }

    fn destroy(&mut self) {
        self.origin = None;
        self.destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
