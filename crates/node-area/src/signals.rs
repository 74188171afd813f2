//! Signals exchanged between the view layer and host logic
//!
//! [`Signal`] is a closed union: every interaction kind has its own variant
//! and payload shape. Signals travel through a [`SignalPipeline`], an ordered
//! list of async pipes. Each pipe may pass the signal on, rewrite it, or stop
//! it by returning `None`; producers read the final value to learn whether a
//! guarded mutation was accepted and with which parameters.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::drag::PointerEvent;
use crate::element::Element;
use crate::error::Result;
use crate::types::{ConnectionData, Metadata, NodeData, NodeId, Position, Size};

/// What a context menu was opened on
#[derive(Debug, Clone, PartialEq)]
pub enum ContextMenuTarget {
    /// The empty surface
    Root,
    Node(NodeData),
    Connection(ConnectionData),
}

/// Kind of view a render request is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderKind {
    Node,
    Connection,
}

/// Payload of a render request
#[derive(Debug, Clone, PartialEq)]
pub enum RenderData {
    Node {
        payload: NodeData,
    },
    Connection {
        payload: ConnectionData,
        start: Option<Position>,
        end: Option<Position>,
    },
}

impl RenderData {
    pub fn kind(&self) -> RenderKind {
        match self {
            RenderData::Node { .. } => RenderKind::Node,
            RenderData::Connection { .. } => RenderKind::Connection,
        }
    }
}

/// Signals produced and consumed by the area
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// A node was pressed
    NodePicked { id: NodeId },

    /// A drag on a node ended
    NodeDragged { node: NodeData },

    /// A node is about to move; pipes may rewrite `position` or stop the signal
    NodeTranslate {
        id: NodeId,
        position: Position,
        previous: Position,
        metadata: Option<Metadata>,
    },

    /// A node moved
    NodeTranslated {
        id: NodeId,
        position: Position,
        previous: Position,
        metadata: Option<Metadata>,
    },

    /// A node is about to be resized; pipes may stop the signal
    NodeResize { id: NodeId, size: Size },

    /// A node was resized
    NodeResized { id: NodeId, size: Size },

    ContextMenu {
        event: PointerEvent,
        context: ContextMenuTarget,
    },

    PointerDown { position: Position, event: PointerEvent },

    PointerMove { position: Position, event: PointerEvent },

    PointerUp { position: Position, event: PointerEvent },

    /// Ask the rendering backend to mount content into `element`
    Render { element: Element, data: RenderData },

    /// The rendering backend finished mounting `element`
    Rendered { element: Element, data: RenderData },

    /// `element` left the surface; renderers release what they mounted into it
    Unmount { element: Element },

    /// `element` changed its stacking order on the surface
    Reordered { element: Element },
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::NodePicked { .. } => SignalKind::NodePicked,
            Signal::NodeDragged { .. } => SignalKind::NodeDragged,
            Signal::NodeTranslate { .. } => SignalKind::NodeTranslate,
            Signal::NodeTranslated { .. } => SignalKind::NodeTranslated,
            Signal::NodeResize { .. } => SignalKind::NodeResize,
            Signal::NodeResized { .. } => SignalKind::NodeResized,
            Signal::ContextMenu { .. } => SignalKind::ContextMenu,
            Signal::PointerDown { .. } => SignalKind::PointerDown,
            Signal::PointerMove { .. } => SignalKind::PointerMove,
            Signal::PointerUp { .. } => SignalKind::PointerUp,
            Signal::Render { .. } => SignalKind::Render,
            Signal::Rendered { .. } => SignalKind::Rendered,
            Signal::Unmount { .. } => SignalKind::Unmount,
            Signal::Reordered { .. } => SignalKind::Reordered,
        }
    }
}

/// Tag of a [`Signal`]; the string form is the wire name of the tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    NodePicked,
    NodeDragged,
    NodeTranslate,
    NodeTranslated,
    NodeResize,
    NodeResized,
    ContextMenu,
    PointerDown,
    PointerMove,
    PointerUp,
    Render,
    Rendered,
    Unmount,
    Reordered,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::NodePicked => "nodepicked",
            SignalKind::NodeDragged => "nodedragged",
            SignalKind::NodeTranslate => "nodetranslate",
            SignalKind::NodeTranslated => "nodetranslated",
            SignalKind::NodeResize => "noderesize",
            SignalKind::NodeResized => "noderesized",
            SignalKind::ContextMenu => "contextmenu",
            SignalKind::PointerDown => "pointerdown",
            SignalKind::PointerMove => "pointermove",
            SignalKind::PointerUp => "pointerup",
            SignalKind::Render => "render",
            SignalKind::Rendered => "rendered",
            SignalKind::Unmount => "unmount",
            SignalKind::Reordered => "reordered",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage of the signal pipeline
///
/// Return `Some` to pass the (possibly rewritten) signal on, `None` to stop it.
#[async_trait]
pub trait SignalPipe: Send + Sync {
    async fn pipe(&self, signal: Signal) -> Result<Option<Signal>>;
}

type PipeFuture = Pin<Box<dyn Future<Output = Result<Option<Signal>>> + Send>>;

/// Async callback wrapped as a [`SignalPipe`]
pub struct CallbackPipe {
    callback: Box<dyn Fn(Signal) -> PipeFuture + Send + Sync>,
}

impl CallbackPipe {
    pub fn new<F, Fut>(callback: F) -> Self
    where
        F: Fn(Signal) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Signal>>> + Send + 'static,
    {
        Self {
            callback: Box::new(move |signal| -> PipeFuture { Box::pin(callback(signal)) }),
        }
    }
}

#[async_trait]
impl SignalPipe for CallbackPipe {
    async fn pipe(&self, signal: Signal) -> Result<Option<Signal>> {
        (self.callback)(signal).await
    }
}

/// Ordered list of pipes every emitted signal runs through
#[derive(Default)]
pub struct SignalPipeline {
    pipes: RwLock<Vec<Arc<dyn SignalPipe>>>,
}

impl SignalPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pipe; it sees signals after every pipe added before it
    pub fn add_pipe(&self, pipe: Arc<dyn SignalPipe>) {
        self.pipes.write().push(pipe);
    }

    /// Append an async closure as a pipe
    pub fn add_fn<F, Fut>(&self, callback: F)
    where
        F: Fn(Signal) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Signal>>> + Send + 'static,
    {
        self.add_pipe(Arc::new(CallbackPipe::new(callback)));
    }

    pub fn len(&self) -> usize {
        self.pipes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.read().is_empty()
    }

    /// Run a signal through every pipe in order
    ///
    /// Pipes are awaited one after another. Returns `None` as soon as a pipe
    /// stops the signal; pipes after it are not called.
    pub async fn emit(&self, signal: Signal) -> Result<Option<Signal>> {
        let pipes = self.pipes.read().clone();
        let mut current = signal;
        for pipe in pipes {
            match pipe.pipe(current).await? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}

impl fmt::Debug for SignalPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalPipeline")
            .field("pipes", &self.len())
            .finish()
    }
}

/// A pipe that records every signal and passes it on unchanged
///
/// Useful for testing to verify signals were emitted correctly.
#[derive(Default)]
pub struct RecordingPipe {
    signals: Mutex<Vec<Signal>>,
}

impl RecordingPipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded signals
    pub fn signals(&self) -> Vec<Signal> {
        self.signals.lock().clone()
    }

    /// Get the tags of all recorded signals
    pub fn kinds(&self) -> Vec<SignalKind> {
        self.signals.lock().iter().map(Signal::kind).collect()
    }

    pub fn clear(&self) {
        self.signals.lock().clear();
    }
}

#[async_trait]
impl SignalPipe for RecordingPipe {
    async fn pipe(&self, signal: Signal) -> Result<Option<Signal>> {
        self.signals.lock().push(signal.clone());
        Ok(Some(signal))
    }
}
