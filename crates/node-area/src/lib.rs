//! Node Area - Guarded node and connection views for a node editor surface
//!
//! This crate is the interactive view layer of a node-based editor. It keeps
//! one view per mounted node and connection on a pannable, zoomable surface
//! and routes every positional change through an async guard protocol:
//!
//! - Guards may veto a translate or resize, and rewrite a translate, before it is committed
//! - Notifications are awaited after the commit and never roll it back
//! - Pointer drags are mapped through the current zoom before any guard sees them
//! - A closed [`Signal`] union carries every interaction to host logic
//!
//! # Architecture
//!
//! - `NodeView`: owns a node's element and logical position
//! - `AreaPlugin`: registry of views plus the bulk operations hosts call
//! - `NodeArea`: in-memory `AreaPlugin` bridging view guards to a `SignalPipeline`
//!
//! # Example
//!
//! ```ignore
//! use node_area::{AreaConfig, AreaPlugin, NodeArea, NodeData, Position, Signal};
//!
//! let area = NodeArea::new(AreaConfig::default());
//! area.signals().add_fn(|signal| async move {
//!     Ok(match signal {
//!         Signal::NodeTranslate { id, mut position, previous, metadata } => {
//!             position.x = position.x.round();
//!             Some(Signal::NodeTranslate { id, position, previous, metadata })
//!         }
//!         other => Some(other),
//!     })
//! });
//!
//! area.add_node_view(NodeData::new("n1", "Source")).await?;
//! area.translate("n1", Position::new(10.4, 20.0)).await?;
//! ```

pub mod area;
pub mod config;
pub mod connection_view;
pub mod drag;
pub mod element;
pub mod error;
pub mod guard;
pub mod node_area;
pub mod node_view;
pub mod plugin;
pub mod signals;
pub mod types;

// Re-export key types
pub use area::{Area, AreaTransform};
pub use config::{AreaConfig, ZoomBounds};
pub use connection_view::ConnectionView;
pub use drag::{Drag, DragContext, DragStep, PointerButton, PointerDrag, PointerEvent, PointerInput};
pub use element::{Content, Element, ElementId};
pub use error::{AreaError, Result};
pub use guard::{AcceptAll, GuardDecision, NodeEvents, NodeGuards, NullEvents, Outcome};
pub use node_area::{EditorSignal, NodeArea};
pub use node_view::{NodeView, ZoomFn};
pub use plugin::{AreaPlugin, ViewMap};
pub use signals::{
    CallbackPipe, ContextMenuTarget, RecordingPipe, RenderData, RenderKind, Signal, SignalKind, SignalPipe,
    SignalPipeline,
};
pub use types::{
    ConnectionData, ConnectionId, Metadata, NodeData, NodeId, Position, ResizeParams, Size, TranslateParams,
};
