//! In-memory area plugin
//!
//! [`NodeArea`] implements [`AreaPlugin`] on top of the [`Element`] model and a
//! [`SignalPipeline`]. Node view guards and events are bridged to signals:
//!
//! | view call             | signal             | effect of the pipeline result        |
//! |-----------------------|--------------------|--------------------------------------|
//! | guard `translate`     | `nodetranslate`    | `None` vetoes, a rewritten position is committed |
//! | guard `resize`        | `noderesize`       | `None` vetoes, the requested size is applied |
//! | event `translated`    | `nodetranslated`   | ignored                              |
//! | event `resized`       | `noderesized`      | ignored                              |
//! | event `picked`        | `nodepicked`       | ignored                              |
//! | event `dragged`       | `nodedragged`      | ignored                              |
//! | event `contextmenu`   | `contextmenu`      | ignored                              |

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, Weak};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::area::{Area, AreaTransform};
use crate::config::AreaConfig;
use crate::connection_view::ConnectionView;
use crate::drag::{PointerEvent, PointerInput};
use crate::element::Element;
use crate::error::{AreaError, Result};
use crate::guard::{GuardDecision, NodeEvents, NodeGuards, Outcome};
use crate::node_view::{NodeView, ZoomFn};
use crate::plugin::{AreaPlugin, ViewMap};
use crate::signals::{ContextMenuTarget, RenderData, RenderKind, Signal, SignalKind, SignalPipeline};
use crate::types::{
    ConnectionData, ConnectionId, Metadata, NodeData, NodeId, Position, ResizeParams, TranslateParams,
};

/// Changes of the editor's domain model mirrored into the area
#[derive(Debug, Clone, PartialEq)]
pub enum EditorSignal {
    NodeCreated(NodeData),
    NodeRemoved(NodeData),
    ConnectionCreated(ConnectionData),
    ConnectionRemoved(ConnectionData),
    Cleared,
}

#[derive(Default)]
struct Payloads {
    nodes: HashMap<NodeId, NodeData>,
    connections: HashMap<ConnectionId, ConnectionData>,
}

/// Area plugin backed by the in-memory element model
pub struct NodeArea {
    config: AreaConfig,
    signals: Arc<SignalPipeline>,
    area: Arc<Area>,
    nodes: ViewMap<NodeView>,
    connections: ViewMap<ConnectionView>,
    payloads: Mutex<Payloads>,
}

impl NodeArea {
    /// Create an area with its own, empty signal pipeline
    pub fn new(config: AreaConfig) -> Self {
        Self::with_pipeline(config, Arc::new(SignalPipeline::new()))
    }

    /// Create an area that emits into an existing pipeline
    pub fn with_pipeline(config: AreaConfig, signals: Arc<SignalPipeline>) -> Self {
        let config = config.normalized();
        let area = Arc::new(Area::new(config.initial_transform));
        Self {
            config,
            signals,
            area,
            nodes: ViewMap::new(),
            connections: ViewMap::new(),
            payloads: Mutex::new(Payloads::default()),
        }
    }

    pub fn config(&self) -> &AreaConfig {
        &self.config
    }

    /// The pipeline every signal of this area goes through
    pub fn signals(&self) -> &Arc<SignalPipeline> {
        &self.signals
    }

    pub fn node_data(&self, id: &str) -> Option<NodeData> {
        self.payloads.lock().nodes.get(id).cloned()
    }

    pub fn connection_data(&self, id: &str) -> Option<ConnectionData> {
        self.payloads.lock().connections.get(id).cloned()
    }

    /// Mirror a change of the editor's domain model
    pub async fn apply(&self, signal: EditorSignal) -> Result<()> {
        match signal {
            EditorSignal::NodeCreated(node) => self.add_node_view(node).await.map(|_| ()),
            EditorSignal::NodeRemoved(node) => self.remove_node_view(&node.id).await,
            EditorSignal::ConnectionCreated(connection) => {
                self.add_connection_view(connection).await.map(|_| ())
            }
            EditorSignal::ConnectionRemoved(connection) => {
                self.remove_connection_view(&connection.id).await
            }
            EditorSignal::Cleared => self.clear().await,
        }
    }

    /// Route pointer input to a node's view; unknown ids are ignored
    pub async fn node_pointer(&self, id: &str, input: PointerInput) -> Result<()> {
        match self.nodes.get(id) {
            Some(view) => view.handle_pointer(input).await,
            None => Ok(()),
        }
    }

    pub async fn pointer_down(&self, event: PointerEvent) -> Result<()> {
        let position = self.area.set_pointer_from_screen(event.screen);
        self.signals.emit(Signal::PointerDown { position, event }).await?;
        Ok(())
    }

    pub async fn pointer_move(&self, event: PointerEvent) -> Result<()> {
        let position = self.area.set_pointer_from_screen(event.screen);
        self.signals.emit(Signal::PointerMove { position, event }).await?;
        Ok(())
    }

    pub async fn pointer_up(&self, event: PointerEvent) -> Result<()> {
        let position = self.area.set_pointer_from_screen(event.screen);
        self.signals.emit(Signal::PointerUp { position, event }).await?;
        Ok(())
    }

    /// Open a context menu on the empty surface
    pub async fn root_contextmenu(&self, event: PointerEvent) -> Result<()> {
        self.signals
            .emit(Signal::ContextMenu {
                event,
                context: ContextMenuTarget::Root,
            })
            .await?;
        Ok(())
    }

    /// Open a context menu on a connection; unknown ids are ignored
    pub async fn connection_contextmenu(&self, id: &str, event: PointerEvent) -> Result<()> {
        let Some(connection) = self.connection_data(id) else {
            return Ok(());
        };
        self.signals
            .emit(Signal::ContextMenu {
                event,
                context: ContextMenuTarget::Connection(connection),
            })
            .await?;
        Ok(())
    }

    /// Zoom around a screen-space origin, keeping that point fixed
    ///
    /// The factor is clamped to the configured bounds. Returns false when the
    /// zoom did not change.
    pub fn zoom(&self, k: f64, origin: Position) -> bool {
        if !k.is_finite() || k <= 0.0 {
            return false;
        }
        let current = self.area.transform();
        let k = self.config.zoom.clamp(k);
        if k == current.k {
            return false;
        }
        let ratio = k / current.k;
        self.area.set_transform(AreaTransform {
            k,
            x: origin.x - (origin.x - current.x) * ratio,
            y: origin.y - (origin.y - current.y) * ratio,
        });
        true
    }

    /// Pan the surface to a screen-space offset
    pub fn pan(&self, x: f64, y: f64) {
        let current = self.area.transform();
        self.area.set_transform(AreaTransform { x, y, ..current });
    }

    /// Move an element before `next` (or to the top) and announce it
    pub async fn reorder(&self, element: Element, next: Option<&Element>) -> Result<()> {
        self.area.content().reorder(element.clone(), next);
        self.signals.emit(Signal::Reordered { element }).await?;
        Ok(())
    }

    /// Raise a node's element above every other element
    pub async fn bring_to_front(&self, id: &str) -> Result<()> {
        match self.nodes.get(id) {
            Some(view) => self.reorder(view.element().clone(), None).await,
            None => Ok(()),
        }
    }

    /// Remove every view without tearing down the area
    ///
    /// Every view is detached before the first `unmount` is emitted. A failing
    /// emission does not stop the others; the first error is returned.
    pub async fn clear(&self) -> Result<()> {
        let (nodes, connections) = self.unregister_all();
        let content = self.area.content();
        let mut detached = Vec::with_capacity(nodes.len() + connections.len());
        for (_, view) in connections {
            content.remove(view.element());
            detached.push(view.element().clone());
        }
        for (_, view) in nodes {
            view.destroy();
            content.remove(view.element());
            detached.push(view.element().clone());
        }

        let mut first_error = None;
        for element in detached {
            if let Err(err) = self.signals.emit(Signal::Unmount { element }).await {
                log::warn!("Unmount failed while clearing the area: {}", err);
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn unregister_all(&self) -> (Vec<(String, Arc<NodeView>)>, Vec<(String, Arc<ConnectionView>)>) {
        let mut payloads = self.payloads.lock();
        payloads.nodes.clear();
        payloads.connections.clear();
        (self.nodes.drain(), self.connections.drain())
    }

    async fn unmount(&self, element: Element) -> Result<()> {
        self.area.content().remove(&element);
        self.signals.emit(Signal::Unmount { element }).await?;
        Ok(())
    }

    async fn render(&self, element: Element, data: RenderData) -> Result<Outcome> {
        let rendered = self.signals.emit(Signal::Render { element, data }).await?;
        Ok(if rendered.is_some() {
            Outcome::Applied
        } else {
            Outcome::Rejected
        })
    }
}

#[async_trait]
impl AreaPlugin for NodeArea {
    fn node_views(&self) -> &ViewMap<NodeView> {
        &self.nodes
    }

    fn connection_views(&self) -> &ViewMap<ConnectionView> {
        &self.connections
    }

    fn area(&self) -> &Area {
        &self.area
    }

    async fn add_node_view(&self, node: NodeData) -> Result<Arc<NodeView>> {
        let bridge = Arc::new(NodeBridge {
            node: node.clone(),
            signals: self.signals.clone(),
            area: Arc::downgrade(&self.area),
            element: OnceLock::new(),
            bring_to_front: self.config.bring_to_front_on_pick,
        });
        let area = self.area.clone();
        let zoom: ZoomFn = Arc::new(move || area.zoom());

        let view = Arc::new(NodeView::create(zoom, bridge.clone(), bridge.clone()).await?);
        let stored = bridge.element.set(view.element().clone());
        debug_assert!(stored.is_ok(), "bridge element is set once per view");

        let replaced = {
            let mut payloads = self.payloads.lock();
            payloads.nodes.insert(node.id.clone(), node.clone());
            self.nodes.insert(node.id.clone(), view.clone())
        };
        self.area.content().add(view.element().clone());

        if let Some(previous) = replaced {
            log::debug!("Replacing node view '{}'", node.id);
            previous.destroy();
            self.unmount(previous.element().clone()).await?;
        }

        log::debug!("Added node view '{}'", node.id);
        self.render(view.element().clone(), RenderData::Node { payload: node })
            .await?;
        Ok(view)
    }

    async fn remove_node_view(&self, id: &str) -> Result<()> {
        let removed = {
            let mut payloads = self.payloads.lock();
            payloads.nodes.remove(id);
            self.nodes.remove(id)
        };
        let Some(view) = removed else {
            return Ok(());
        };

        view.destroy();
        log::debug!("Removed node view '{}'", id);
        self.unmount(view.element().clone()).await
    }

    async fn add_connection_view(&self, connection: ConnectionData) -> Result<Arc<ConnectionView>> {
        let view = Arc::new(ConnectionView::new());

        let replaced = {
            let mut payloads = self.payloads.lock();
            payloads
                .connections
                .insert(connection.id.clone(), connection.clone());
            self.connections.insert(connection.id.clone(), view.clone())
        };
        // Connections sit below every node
        let content = self.area.content();
        let first = content.holder().first_child();
        content.reorder(view.element().clone(), first.as_ref());

        if let Some(previous) = replaced {
            log::debug!("Replacing connection view '{}'", connection.id);
            self.unmount(previous.element().clone()).await?;
        }

        log::debug!("Added connection view '{}'", connection.id);
        self.render(
            view.element().clone(),
            RenderData::Connection {
                payload: connection,
                start: None,
                end: None,
            },
        )
        .await?;
        Ok(view)
    }

    async fn remove_connection_view(&self, id: &str) -> Result<()> {
        let removed = {
            let mut payloads = self.payloads.lock();
            payloads.connections.remove(id);
            self.connections.remove(id)
        };
        let Some(view) = removed else {
            return Ok(());
        };

        log::debug!("Removed connection view '{}'", id);
        self.unmount(view.element().clone()).await
    }

    async fn update(&self, kind: RenderKind, id: &str) -> Result<Outcome> {
        match kind {
            RenderKind::Node => {
                let (Some(view), Some(payload)) = (self.nodes.get(id), self.node_data(id)) else {
                    return Ok(Outcome::Unavailable);
                };
                self.render(view.element().clone(), RenderData::Node { payload })
                    .await
            }
            RenderKind::Connection => {
                let (Some(view), Some(payload)) =
                    (self.connections.get(id), self.connection_data(id))
                else {
                    return Ok(Outcome::Unavailable);
                };
                self.render(
                    view.element().clone(),
                    RenderData::Connection {
                        payload,
                        start: None,
                        end: None,
                    },
                )
                .await
            }
        }
    }

    async fn destroy(&self) -> Result<()> {
        let cleared = self.clear().await;
        self.area.content().clear();
        cleared
    }
}

impl std::fmt::Debug for NodeArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeArea")
            .field("nodes", &self.nodes.len())
            .field("connections", &self.connections.len())
            .field("transform", &self.area.transform())
            .finish()
    }
}

/// Guards and events of one node view, answered through the signal pipeline
struct NodeBridge {
    node: NodeData,
    signals: Arc<SignalPipeline>,
    area: Weak<Area>,
    element: OnceLock<Element>,
    bring_to_front: bool,
}

impl NodeBridge {
    async fn notify(&self, signal: Signal) -> Result<()> {
        self.signals.emit(signal).await?;
        Ok(())
    }
}

#[async_trait]
impl NodeGuards for NodeBridge {
    async fn translate(
        &self,
        params: TranslateParams,
        metadata: Option<Metadata>,
    ) -> Result<GuardDecision<TranslateParams>> {
        let signal = Signal::NodeTranslate {
            id: self.node.id.clone(),
            position: params.position,
            previous: params.previous,
            metadata,
        };
        match self.signals.emit(signal).await? {
            None => Ok(GuardDecision::Reject),
            Some(Signal::NodeTranslate { position, previous, .. }) => {
                Ok(GuardDecision::Accept(TranslateParams { position, previous }))
            }
            Some(other) => Err(AreaError::UnexpectedSignal {
                expected: SignalKind::NodeTranslate,
                actual: other.kind(),
            }),
        }
    }

    async fn resize(&self, params: ResizeParams) -> Result<GuardDecision<ResizeParams>> {
        let signal = Signal::NodeResize {
            id: self.node.id.clone(),
            size: params.size,
        };
        match self.signals.emit(signal).await? {
            None => Ok(GuardDecision::Reject),
            Some(Signal::NodeResize { size, .. }) => Ok(GuardDecision::Accept(ResizeParams { size })),
            Some(other) => Err(AreaError::UnexpectedSignal {
                expected: SignalKind::NodeResize,
                actual: other.kind(),
            }),
        }
    }
}

#[async_trait]
impl NodeEvents for NodeBridge {
    async fn picked(&self) -> Result<()> {
        if self.bring_to_front {
            if let (Some(area), Some(element)) = (self.area.upgrade(), self.element.get()) {
                area.content().reorder(element.clone(), None);
                self.notify(Signal::Reordered {
                    element: element.clone(),
                })
                .await?;
            }
        }
        self.notify(Signal::NodePicked {
            id: self.node.id.clone(),
        })
        .await
    }

    async fn translated(&self, params: TranslateParams, metadata: Option<Metadata>) -> Result<()> {
        self.notify(Signal::NodeTranslated {
            id: self.node.id.clone(),
            position: params.position,
            previous: params.previous,
            metadata,
        })
        .await
    }

    async fn dragged(&self) -> Result<()> {
        self.notify(Signal::NodeDragged {
            node: self.node.clone(),
        })
        .await
    }

    async fn contextmenu(&self, event: PointerEvent) -> Result<()> {
        self.notify(Signal::ContextMenu {
            event,
            context: ContextMenuTarget::Node(self.node.clone()),
        })
        .await
    }

    async fn resized(&self, params: ResizeParams) -> Result<()> {
        self.notify(Signal::NodeResized {
            id: self.node.id.clone(),
            size: params.size,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::RecordingPipe;
    use crate::types::Size;

    fn node(id: &str) -> NodeData {
        NodeData::new(id, id.to_uppercase())
    }

    fn area_with_recorder() -> (NodeArea, Arc<RecordingPipe>) {
        let area = NodeArea::new(AreaConfig::default());
        let recorder = Arc::new(RecordingPipe::new());
        area.signals().add_pipe(recorder.clone());
        (area, recorder)
    }

    /// Mounts an attachable content child on every node render, like a renderer would
    fn mount_content(area: &NodeArea) {
        area.signals().add_fn(|signal| async move {
            if let Signal::Render {
                element,
                data: RenderData::Node { .. },
            } = &signal
            {
                if element.first_child().is_none() {
                    element.append_child(Element::new());
                }
            }
            Ok(Some(signal))
        });
    }

    fn clamp_x(area: &NodeArea, max_x: f64) {
        area.signals().add_fn(move |signal| async move {
            Ok(Some(match signal {
                Signal::NodeTranslate {
                    id,
                    mut position,
                    previous,
                    metadata,
                } => {
                    position.x = position.x.min(max_x);
                    Signal::NodeTranslate {
                        id,
                        position,
                        previous,
                        metadata,
                    }
                }
                other => other,
            }))
        });
    }

    #[tokio::test]
    async fn test_add_node_view_mounts_and_renders() {
        let (area, recorder) = area_with_recorder();

        let view = area.add_node_view(node("a")).await.unwrap();

        assert!(area.node_views().has("a"));
        assert!(area.area().content().holder().contains(view.element()));
        assert_eq!(
            recorder.kinds(),
            vec![SignalKind::NodeTranslate, SignalKind::NodeTranslated, SignalKind::Render]
        );
        match &recorder.signals()[0] {
            Signal::NodeTranslate { metadata, .. } => {
                let metadata = metadata.as_ref().unwrap();
                assert_eq!(metadata["source"], "init");
                assert_eq!(metadata["passive"], true);
            }
            other => panic!("Expected NodeTranslate, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_translate_clamped_by_pipe() {
        let (area, recorder) = area_with_recorder();
        area.add_node_view(node("a")).await.unwrap();
        clamp_x(&area, 100.0);
        recorder.clear();

        let outcome = area.translate("a", Position::new(150.0, 5.0)).await.unwrap();

        assert_eq!(outcome, Outcome::Applied);
        let view = area.node_views().get("a").unwrap();
        assert_eq!(view.position(), Position::new(100.0, 5.0));
        assert_eq!(view.element().transform_css().as_deref(), Some("translate(100px, 5px)"));
        // The recorder sits before the clamp, so it saw the requested position
        match &recorder.signals()[..] {
            [Signal::NodeTranslate { position: requested, .. }, Signal::NodeTranslated { position, previous, .. }] => {
                assert_eq!(*requested, Position::new(150.0, 5.0));
                assert_eq!(*position, Position::new(100.0, 5.0));
                assert_eq!(*previous, Position::ORIGIN);
            }
            other => panic!("Unexpected signals: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_translate_vetoed_by_pipe() {
        let (area, recorder) = area_with_recorder();
        area.add_node_view(node("a")).await.unwrap();
        area.translate("a", Position::new(10.0, 10.0)).await.unwrap();
        area.signals().add_fn(|signal| async move {
            Ok(match signal {
                Signal::NodeTranslate { .. } => None,
                other => Some(other),
            })
        });
        recorder.clear();

        let outcome = area.translate("a", Position::new(70.0, 80.0)).await.unwrap();

        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(area.node_views().get("a").unwrap().position(), Position::new(10.0, 10.0));
        assert_eq!(recorder.kinds(), vec![SignalKind::NodeTranslate]);
    }

    #[tokio::test]
    async fn test_remove_is_immediately_visible() {
        let (area, recorder) = area_with_recorder();
        let view = area.add_node_view(node("a")).await.unwrap();
        recorder.clear();

        area.remove_node_view("a").await.unwrap();

        assert!(!area.node_views().has("a"));
        assert!(area.node_data("a").is_none());
        assert!(view.is_destroyed());
        assert!(!area.area().content().holder().contains(view.element()));
        assert_eq!(recorder.signals(), vec![Signal::Unmount { element: view.element().clone() }]);

        assert_eq!(
            area.translate("a", Position::new(1.0, 1.0)).await.unwrap(),
            Outcome::Unavailable
        );
        assert_eq!(area.resize("a", 10.0, 10.0).await.unwrap(), Outcome::Unavailable);
        area.remove_node_view("a").await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_add_replaces_entry() {
        let (area, recorder) = area_with_recorder();
        let first = area.add_node_view(node("a")).await.unwrap();
        let second = area.add_node_view(node("a")).await.unwrap();

        assert_eq!(area.node_views().len(), 1);
        assert!(first.is_destroyed());
        assert!(!second.is_destroyed());
        assert_eq!(area.area().content().holder().children(), vec![second.element().clone()]);
        assert!(recorder
            .signals()
            .contains(&Signal::Unmount { element: first.element().clone() }));
    }

    #[tokio::test]
    async fn test_drag_at_zoom_two_moves_half_as_far() {
        let (area, recorder) = area_with_recorder();
        let other = area.add_node_view(node("b")).await.unwrap();
        let view = area.add_node_view(node("a")).await.unwrap();
        area.bring_to_front("b").await.unwrap();
        assert!(area.zoom(2.0, Position::ORIGIN));
        recorder.clear();

        area.node_pointer("a", PointerInput::Down(PointerEvent::primary(0.0, 0.0)))
            .await
            .unwrap();
        area.node_pointer("a", PointerInput::Move(PointerEvent::primary(100.0, 40.0)))
            .await
            .unwrap();
        area.node_pointer("a", PointerInput::Up(PointerEvent::primary(100.0, 40.0)))
            .await
            .unwrap();

        assert_eq!(view.position(), Position::new(50.0, 20.0));
        assert_eq!(
            recorder.kinds(),
            vec![
                SignalKind::Reordered,
                SignalKind::NodePicked,
                SignalKind::NodeTranslate,
                SignalKind::NodeTranslated,
                SignalKind::NodeDragged,
            ]
        );
        assert_eq!(
            area.area().content().holder().children(),
            vec![other.element().clone(), view.element().clone()]
        );
    }

    #[tokio::test]
    async fn test_resize_needs_rendered_content() {
        let (area, recorder) = area_with_recorder();
        area.add_node_view(node("bare")).await.unwrap();
        assert_eq!(area.resize("bare", 120.0, 60.0).await.unwrap(), Outcome::Unavailable);
        assert!(!recorder.kinds().contains(&SignalKind::NodeResized));

        mount_content(&area);
        let view = area.add_node_view(node("a")).await.unwrap();
        recorder.clear();

        assert_eq!(area.resize("a", 120.0, 60.0).await.unwrap(), Outcome::Applied);
        let content = view.element().first_child().unwrap();
        assert_eq!(content.size(), Some(Size::new(120.0, 60.0)));
        assert_eq!(
            recorder.signals(),
            vec![
                Signal::NodeResize {
                    id: "a".to_string(),
                    size: Size::new(120.0, 60.0),
                },
                Signal::NodeResized {
                    id: "a".to_string(),
                    size: Size::new(120.0, 60.0),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_update_rerenders_in_place() {
        let (area, recorder) = area_with_recorder();
        let view = area.add_node_view(node("a")).await.unwrap();
        area.translate("a", Position::new(5.0, 6.0)).await.unwrap();
        recorder.clear();

        assert_eq!(area.update(RenderKind::Node, "a").await.unwrap(), Outcome::Applied);
        assert_eq!(area.update(RenderKind::Node, "missing").await.unwrap(), Outcome::Unavailable);
        assert_eq!(
            area.update(RenderKind::Connection, "a").await.unwrap(),
            Outcome::Unavailable
        );
        assert_eq!(view.position(), Position::new(5.0, 6.0));
        assert_eq!(
            recorder.signals(),
            vec![Signal::Render {
                element: view.element().clone(),
                data: RenderData::Node { payload: node("a") },
            }]
        );

        area.signals().add_fn(|signal| async move {
            Ok(match signal {
                Signal::Render { .. } => None,
                other => Some(other),
            })
        });
        assert_eq!(area.update(RenderKind::Node, "a").await.unwrap(), Outcome::Rejected);
    }

    #[tokio::test]
    async fn test_connections_sit_below_nodes() {
        let (area, recorder) = area_with_recorder();
        let a = area.add_node_view(node("a")).await.unwrap();
        area.add_node_view(node("b")).await.unwrap();
        recorder.clear();

        let link = area
            .add_connection_view(ConnectionData::new("c1", "a", "out", "b", "in"))
            .await
            .unwrap();

        let children = area.area().content().holder().children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0], *link.element());
        assert_eq!(children[1], *a.element());
        assert_eq!(recorder.kinds(), vec![SignalKind::Render]);
        assert_eq!(area.update(RenderKind::Connection, "c1").await.unwrap(), Outcome::Applied);

        area.remove_connection_view("c1").await.unwrap();
        assert!(!area.connection_views().has("c1"));
        assert_eq!(area.area().content().holder().children().len(), 2);
    }

    #[tokio::test]
    async fn test_destroy_twice_is_safe() {
        let (area, recorder) = area_with_recorder();
        let view = area.add_node_view(node("a")).await.unwrap();
        area.add_connection_view(ConnectionData::new("c1", "a", "out", "a", "in"))
            .await
            .unwrap();
        recorder.clear();

        area.destroy().await.unwrap();
        area.destroy().await.unwrap();

        assert!(area.node_views().is_empty());
        assert!(area.connection_views().is_empty());
        assert!(area.area().content().holder().children().is_empty());
        assert!(view.is_destroyed());
        assert_eq!(recorder.kinds(), vec![SignalKind::Unmount, SignalKind::Unmount]);
    }

    #[tokio::test]
    async fn test_destroy_detaches_every_view_when_unmount_fails() {
        let area = NodeArea::new(AreaConfig::default());
        let a = area.add_node_view(node("a")).await.unwrap();
        let b = area.add_node_view(node("b")).await.unwrap();
        area.add_connection_view(ConnectionData::new("c1", "a", "out", "b", "in"))
            .await
            .unwrap();
        let unmounts = Arc::new(RecordingPipe::new());
        area.signals().add_fn(|signal| async move {
            match signal {
                Signal::Unmount { .. } => Err(AreaError::pipe(SignalKind::Unmount, "renderer gone")),
                other => Ok(Some(other)),
            }
        });
        area.signals().add_pipe(unmounts.clone());

        let err = area.destroy().await.unwrap_err();

        assert_eq!(err.to_string(), "Pipe failed on 'unmount': renderer gone");
        assert!(area.node_views().is_empty());
        assert!(area.connection_views().is_empty());
        assert!(a.is_destroyed());
        assert!(b.is_destroyed());
        assert!(area.area().content().holder().children().is_empty());
        assert!(unmounts.signals().is_empty());
    }

    #[tokio::test]
    async fn test_resize_ignores_rewritten_size() {
        let area = NodeArea::new(AreaConfig::default());
        mount_content(&area);
        let view = area.add_node_view(node("a")).await.unwrap();
        area.signals().add_fn(|signal| async move {
            Ok(Some(match signal {
                Signal::NodeResize { id, .. } => Signal::NodeResize {
                    id,
                    size: Size {
                        width: -50.0,
                        height: f64::NAN,
                    },
                },
                other => other,
            }))
        });
        let recorder = Arc::new(RecordingPipe::new());
        area.signals().add_pipe(recorder.clone());

        assert_eq!(area.resize("a", 120.0, 60.0).await.unwrap(), Outcome::Applied);

        let content = view.element().first_child().unwrap();
        assert_eq!(content.size(), Some(Size::new(120.0, 60.0)));
        assert_eq!(
            recorder.signals().last(),
            Some(&Signal::NodeResized {
                id: "a".to_string(),
                size: Size::new(120.0, 60.0),
            })
        );
    }

    #[tokio::test]
    async fn test_apply_mirrors_editor_changes() {
        let area = NodeArea::new(AreaConfig::default());
        let link = ConnectionData::new("c1", "a", "out", "b", "in");

        area.apply(EditorSignal::NodeCreated(node("a"))).await.unwrap();
        area.apply(EditorSignal::NodeCreated(node("b"))).await.unwrap();
        area.apply(EditorSignal::ConnectionCreated(link.clone())).await.unwrap();
        assert_eq!(area.node_views().len(), 2);
        assert_eq!(area.connection_data("c1"), Some(link.clone()));

        area.apply(EditorSignal::ConnectionRemoved(link)).await.unwrap();
        area.apply(EditorSignal::NodeRemoved(node("a"))).await.unwrap();
        assert!(area.connection_views().is_empty());
        assert_eq!(area.node_views().ids(), vec!["b".to_string()]);

        area.apply(EditorSignal::Cleared).await.unwrap();
        assert!(area.node_views().is_empty());
    }

    #[tokio::test]
    async fn test_pointer_signals_carry_logical_position() {
        let (area, recorder) = area_with_recorder();
        area.pan(20.0, 10.0);
        assert!(area.zoom(2.0, Position::new(20.0, 10.0)));
        assert_eq!(area.area().transform(), AreaTransform { k: 2.0, x: 20.0, y: 10.0 });

        let event = PointerEvent::primary(120.0, 50.0);
        area.pointer_down(event).await.unwrap();
        area.pointer_move(event).await.unwrap();
        area.pointer_up(event).await.unwrap();

        assert_eq!(area.area().pointer(), Position::new(50.0, 20.0));
        assert_eq!(
            recorder.signals()[0],
            Signal::PointerDown {
                position: Position::new(50.0, 20.0),
                event,
            }
        );
        assert_eq!(
            recorder.kinds(),
            vec![SignalKind::PointerDown, SignalKind::PointerMove, SignalKind::PointerUp]
        );
    }

    #[tokio::test]
    async fn test_zoom_is_clamped() {
        let area = NodeArea::new(AreaConfig::default());
        assert!(area.zoom(50.0, Position::ORIGIN));
        assert_eq!(area.area().zoom(), 10.0);
        assert!(!area.zoom(20.0, Position::ORIGIN));
        assert!(!area.zoom(f64::NAN, Position::ORIGIN));
        assert!(!area.zoom(-1.0, Position::ORIGIN));
    }

    #[tokio::test]
    async fn test_contextmenu_targets() {
        let (area, recorder) = area_with_recorder();
        area.add_node_view(node("a")).await.unwrap();
        let link = ConnectionData::new("c1", "a", "out", "a", "in");
        area.add_connection_view(link.clone()).await.unwrap();
        recorder.clear();
        let event = PointerEvent::secondary(3.0, 4.0);

        area.root_contextmenu(event).await.unwrap();
        area.node_pointer("a", PointerInput::ContextMenu(event)).await.unwrap();
        area.connection_contextmenu("c1", event).await.unwrap();
        area.connection_contextmenu("missing", event).await.unwrap();

        let contexts: Vec<ContextMenuTarget> = recorder
            .signals()
            .into_iter()
            .filter_map(|signal| match signal {
                Signal::ContextMenu { context, .. } => Some(context),
                _ => None,
            })
            .collect();
        assert_eq!(
            contexts,
            vec![
                ContextMenuTarget::Root,
                ContextMenuTarget::Node(node("a")),
                ContextMenuTarget::Connection(link),
            ]
        );
    }

    #[tokio::test]
    async fn test_mismatched_guard_answer_is_error() {
        let area = NodeArea::new(AreaConfig::default());
        area.add_node_view(node("a")).await.unwrap();
        area.signals().add_fn(|signal| async move {
            Ok(Some(match signal {
                Signal::NodeTranslate { id, .. } => Signal::NodePicked { id },
                other => other,
            }))
        });

        let err = area.translate("a", Position::new(1.0, 1.0)).await.unwrap_err();
        assert!(matches!(
            err,
            AreaError::UnexpectedSignal {
                expected: SignalKind::NodeTranslate,
                actual: SignalKind::NodePicked,
            }
        ));
        assert_eq!(area.node_views().get("a").unwrap().position(), Position::ORIGIN);
    }
}
