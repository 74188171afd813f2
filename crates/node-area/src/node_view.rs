//! Node views
//!
//! A [`NodeView`] owns one node's root element and its logical position.
//! Every change to the position goes through [`NodeView::translate`], so the
//! translate guard sees every move: programmatic, drag-driven or initial.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::drag::{Drag, DragContext, DragStep, PointerDrag, PointerInput};
use crate::element::Element;
use crate::error::Result;
use crate::guard::{NodeEvents, NodeGuards, Outcome};
use crate::types::{init_metadata, Metadata, Position, ResizeParams, Size, TranslateParams};

/// Reads the current zoom of the surface a view lives on
pub type ZoomFn = Arc<dyn Fn() -> f64 + Send + Sync>;

/// The view of a single node
pub struct NodeView {
    element: Element,
    position: Mutex<Position>,
    drag: Mutex<Box<dyn PointerDrag>>,
    zoom: ZoomFn,
    events: Arc<dyn NodeEvents>,
    guards: Arc<dyn NodeGuards>,
}

impl NodeView {
    /// Create a node view with the default [`Drag`] binding
    ///
    /// The view starts at the origin and performs a translate to `(0, 0)`
    /// tagged with `{"passive": true, "source": "init"}` before returning.
    pub async fn create(
        zoom: ZoomFn,
        events: Arc<dyn NodeEvents>,
        guards: Arc<dyn NodeGuards>,
    ) -> Result<Self> {
        Self::create_with_drag(zoom, events, guards, Box::new(Drag::new())).await
    }

    /// Create a node view with a custom drag binding
    pub async fn create_with_drag(
        zoom: ZoomFn,
        events: Arc<dyn NodeEvents>,
        guards: Arc<dyn NodeGuards>,
        drag: Box<dyn PointerDrag>,
    ) -> Result<Self> {
        let view = Self {
            element: Element::new(),
            position: Mutex::new(Position::ORIGIN),
            drag: Mutex::new(drag),
            zoom,
            events,
            guards,
        };
        view.translate(0.0, 0.0, Some(init_metadata())).await?;
        Ok(view)
    }

    /// Root element of the view
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Current logical position
    pub fn position(&self) -> Position {
        *self.position.lock()
    }

    /// Move the node to an absolute logical position
    ///
    /// The translate guard may reject the move or rewrite the target; the
    /// committed position is the one the guard returned. Metadata is handed
    /// unchanged to the guard and to the `translated` notification.
    pub async fn translate(&self, x: f64, y: f64, metadata: Option<Metadata>) -> Result<Outcome> {
        let previous = self.position();
        let proposed = TranslateParams {
            position: Position::new(x, y),
            previous,
        };

        let Some(accepted) = self.guards.translate(proposed, metadata.clone()).await?.accepted() else {
            log::trace!("Translate to ({}, {}) rejected", x, y);
            return Ok(Outcome::Rejected);
        };

        let position = accepted.position;
        if !position.is_finite() {
            log::warn!("Guard produced a non-finite position ({}, {}); ignoring", position.x, position.y);
            return Ok(Outcome::Rejected);
        }

        *self.position.lock() = position;
        self.element.set_transform(position);

        self.events
            .translated(TranslateParams { position, previous }, metadata)
            .await?;

        Ok(Outcome::Applied)
    }

    /// Resize the node's rendered content
    ///
    /// The resize guard only accepts or rejects; the requested size is what
    /// gets applied and reported. Returns [`Outcome::Unavailable`] without
    /// touching styles when the root element has no attachable content child.
    pub async fn resize(&self, width: f64, height: f64) -> Result<Outcome> {
        let params = ResizeParams {
            size: Size::new(width, height),
        };

        if !self.guards.resize(params).await?.is_accepted() {
            log::trace!("Resize to {}x{} rejected", width, height);
            return Ok(Outcome::Rejected);
        }

        let Some(content) = self.element.first_child().filter(Element::is_attachable) else {
            return Ok(Outcome::Unavailable);
        };

        content.set_size(params.size);
        self.events.resized(params).await?;

        Ok(Outcome::Applied)
    }

    /// Feed pointer input to the view's drag binding and context menu
    pub async fn handle_pointer(&self, input: PointerInput) -> Result<()> {
        if let PointerInput::ContextMenu(event) = input {
            return self.events.contextmenu(event).await;
        }

        let step = {
            let mut drag = self.drag.lock();
            match input {
                PointerInput::Down(event) => drag.press(&event, self),
                PointerInput::Move(event) => drag.moved(&event, self),
                PointerInput::Up(event) => drag.release(&event),
                PointerInput::ContextMenu(_) => None,
            }
        };

        match step {
            Some(DragStep::Start) => self.events.picked().await,
            Some(DragStep::Translate(target)) => {
                self.translate(target.x, target.y, None).await?;
                Ok(())
            }
            Some(DragStep::End) => self.events.dragged().await,
            None => Ok(()),
        }
    }

    /// Tear down the drag binding
    pub fn destroy(&self) {
        self.drag.lock().destroy();
    }

    pub fn is_destroyed(&self) -> bool {
        self.drag.lock().is_destroyed()
    }
}

impl DragContext for NodeView {
    fn current_position(&self) -> Position {
        self.position()
    }

    fn zoom(&self) -> f64 {
        (self.zoom)()
    }
}

impl std::fmt::Debug for NodeView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeView")
            .field("element", &self.element)
            .field("position", &self.position())
            .finish()
    }
}
