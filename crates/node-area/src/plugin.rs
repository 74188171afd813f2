//! The area plugin contract
//!
//! [`AreaPlugin`] is what host code talks to: it owns the view registries and
//! exposes the bulk operations. Rendering backends implement the factory
//! methods (`add_*_view`) and the teardown; `translate` and `resize` are
//! provided on top of the node registry.
//!
//! # Registry invariants
//!
//! - One entry per id. Adding an existing id replaces the previous entry.
//! - Insertion and removal never suspend: once `remove_*_view` returns, the id
//!   is gone from the map.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::area::Area;
use crate::connection_view::ConnectionView;
use crate::error::Result;
use crate::guard::Outcome;
use crate::node_view::NodeView;
use crate::signals::RenderKind;
use crate::types::{ConnectionData, NodeData, Position};

/// Map of live views keyed by node or connection id
pub struct ViewMap<V> {
    views: RwLock<HashMap<String, Arc<V>>>,
}

impl<V> ViewMap<V> {
    pub fn new() -> Self {
        Self {
            views: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<V>> {
        self.views.read().get(id).cloned()
    }

    pub fn has(&self, id: &str) -> bool {
        self.views.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.views.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.read().is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.views.read().keys().cloned().collect()
    }

    /// Register a view, returning the entry it replaced
    ///
    /// Only plugin implementations should call this, from their add operation.
    pub fn insert(&self, id: impl Into<String>, view: Arc<V>) -> Option<Arc<V>> {
        self.views.write().insert(id.into(), view)
    }

    /// Unregister a view
    ///
    /// Only plugin implementations should call this, from their remove operation.
    pub fn remove(&self, id: &str) -> Option<Arc<V>> {
        self.views.write().remove(id)
    }

    /// Unregister every view at once
    pub fn drain(&self) -> Vec<(String, Arc<V>)> {
        self.views.write().drain().collect()
    }
}

impl<V> Default for ViewMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Abstract area plugin: view registry plus the operations hosts call
#[async_trait]
pub trait AreaPlugin: Send + Sync {
    fn node_views(&self) -> &ViewMap<NodeView>;

    fn connection_views(&self) -> &ViewMap<ConnectionView>;

    fn area(&self) -> &Area;

    /// Create, register and mount a view for `node`
    async fn add_node_view(&self, node: NodeData) -> Result<Arc<NodeView>>;

    /// Unregister a node view and release its resources
    async fn remove_node_view(&self, id: &str) -> Result<()>;

    /// Create, register and mount a view for `connection`
    async fn add_connection_view(&self, connection: ConnectionData) -> Result<Arc<ConnectionView>>;

    /// Unregister a connection view and release its resources
    async fn remove_connection_view(&self, id: &str) -> Result<()>;

    /// Re-render an existing view in place
    async fn update(&self, kind: RenderKind, id: &str) -> Result<Outcome>;

    /// Tear down every view and release the surface
    async fn destroy(&self) -> Result<()>;

    /// Guarded resize of a node view; [`Outcome::Unavailable`] if it is not mounted
    async fn resize(&self, id: &str, width: f64, height: f64) -> Result<Outcome> {
        match self.node_views().get(id) {
            Some(view) => view.resize(width, height).await,
            None => Ok(Outcome::Unavailable),
        }
    }

    /// Guarded translate of a node view; [`Outcome::Unavailable`] if it is not mounted
    async fn translate(&self, id: &str, position: Position) -> Result<Outcome> {
        match self.node_views().get(id) {
            Some(view) => view.translate(position.x, position.y, None).await,
            None => Ok(Outcome::Unavailable),
        }
    }
}
