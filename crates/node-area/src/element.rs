//! Render elements and the content surface they attach to
//!
//! An [`Element`] is an opaque, shareable handle. The view layer only ever
//! writes a transform on a view's root element and a width/height on its
//! first content child; everything else belongs to the rendering backend.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::types::{Position, Size};

/// Stable identifier of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Uuid);

impl ElementId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Default)]
struct ElementState {
    transform: Option<Position>,
    width: Option<f64>,
    height: Option<f64>,
    children: Vec<Element>,
}

/// Handle to a render element
///
/// Clones share the same underlying element. Equality is identity.
#[derive(Clone)]
pub struct Element {
    id: ElementId,
    attachable: bool,
    state: Arc<Mutex<ElementState>>,
}

impl Element {
    /// Create an element that can carry styles and children
    pub fn new() -> Self {
        Self::with_attachable(true)
    }

    /// Create a leaf that cannot be styled (the equivalent of a bare text node)
    pub fn text() -> Self {
        Self::with_attachable(false)
    }

    fn with_attachable(attachable: bool) -> Self {
        Self {
            id: ElementId::generate(),
            attachable,
            state: Arc::new(Mutex::new(ElementState::default())),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Whether styles can be applied to this element
    pub fn is_attachable(&self) -> bool {
        self.attachable
    }

    pub fn transform(&self) -> Option<Position> {
        self.state.lock().transform
    }

    /// The transform rendered as a CSS-like `translate(..)` string
    pub fn transform_css(&self) -> Option<String> {
        self.transform()
            .map(|p| format!("translate({}px, {}px)", p.x, p.y))
    }

    pub fn set_transform(&self, position: Position) {
        self.state.lock().transform = Some(position);
    }

    /// Current width/height, if both have been set
    pub fn size(&self) -> Option<Size> {
        let state = self.state.lock();
        match (state.width, state.height) {
            (Some(width), Some(height)) => Some(Size { width, height }),
            _ => None,
        }
    }

    pub fn set_size(&self, size: Size) {
        let mut state = self.state.lock();
        state.width = Some(size.width);
        state.height = Some(size.height);
    }

    pub fn children(&self) -> Vec<Element> {
        self.state.lock().children.clone()
    }

    pub fn first_child(&self) -> Option<Element> {
        self.state.lock().children.first().cloned()
    }

    pub fn contains(&self, child: &Element) -> bool {
        self.state.lock().children.iter().any(|c| c == child)
    }

    /// Append a child, moving it to the end if already present
    pub fn append_child(&self, child: Element) {
        let mut state = self.state.lock();
        state.children.retain(|c| c != &child);
        state.children.push(child);
    }

    /// Insert `child` before `next`, or at the end when `next` is `None` or not a child
    pub fn insert_before(&self, child: Element, next: Option<&Element>) {
        let mut state = self.state.lock();
        state.children.retain(|c| c != &child);
        let index = next
            .and_then(|n| state.children.iter().position(|c| c == n))
            .unwrap_or(state.children.len());
        state.children.insert(index, child);
    }

    /// Remove a child; returns false if it was not attached here
    pub fn remove_child(&self, child: &Element) -> bool {
        let mut state = self.state.lock();
        let before = state.children.len();
        state.children.retain(|c| c != child);
        state.children.len() != before
    }

    pub fn clear_children(&self) {
        self.state.lock().children.clear();
    }
}

impl Default for Element {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("attachable", &self.attachable)
            .finish()
    }
}

/// The surface that view elements attach to
#[derive(Debug, Clone, Default)]
pub struct Content {
    holder: Element,
}

impl Content {
    pub fn new() -> Self {
        Self::default()
    }

    /// The element every view is attached under
    pub fn holder(&self) -> &Element {
        &self.holder
    }

    pub fn add(&self, element: Element) {
        self.holder.append_child(element);
    }

    /// Move `target` before `next` (or to the end)
    pub fn reorder(&self, target: Element, next: Option<&Element>) {
        self.holder.insert_before(target, next);
    }

    pub fn remove(&self, element: &Element) -> bool {
        self.holder.remove_child(element)
    }

    pub fn clear(&self) {
        self.holder.clear_children();
    }
}
