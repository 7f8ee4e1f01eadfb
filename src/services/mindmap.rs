//! Mind-map service — Q&A graph state, child layout, and view state.
//!
//! DESIGN
//! ======
//! The graph is fetched once from a
//! [`GraphSource`](crate::sources::GraphSource) at startup and then only
//! grows: children are appended under an existing parent and edges can be
//! connected manually. Nothing is ever removed. `GraphEditor` is a plain
//! synchronous state machine (`Loading -> Ready | Failed`); the async
//! functions at the bottom of this module drive it from handlers while
//! holding the `AppState` lock only for the synchronous part.
//!
//! Expanded/collapsed flags are view state. They live in a map keyed by
//! node id next to the graph, never on the nodes themselves, so a wholesale
//! reload keeps the flags of nodes that survive it.
//!
//! Manual connections check only that both endpoints exist. Duplicate edges,
//! cycles, and extra parents are all allowed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::sources::SourceError;
use crate::state::AppState;

/// Horizontal distance between siblings.
pub const CHILD_SPACING_X: f64 = 150.0;
/// Vertical distance between a parent and its children.
pub const CHILD_ROW_HEIGHT: f64 = 180.0;

// =============================================================================
// TYPES
// =============================================================================

pub type NodeId = String;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A question/answer unit of the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub is_root: bool,
    /// Advisory layout only.
    #[serde(default)]
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
}

/// Wire shape of a whole graph: `{ nodes, edges }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Wire shape returned by a source when it creates a node. The node's
/// position is left unset; the editor lays it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCreated {
    pub node: Node,
    pub edge: Edge,
}

impl Graph {
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_root)
    }

    /// Number of edges leaving `parent_id`.
    #[must_use]
    pub fn child_count(&self, parent_id: &str) -> usize {
        self.edges.iter().filter(|e| e.source == parent_id).count()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("mind map is still loading")]
    NotReady,
    #[error("mind map failed to load: {0}")]
    LoadFailed(String),
    #[error("parent node not found: {0}")]
    ParentNotFound(NodeId),
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("node already exists: {0}")]
    DuplicateNode(NodeId),
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("source returned an edge that does not link {parent} to {child}")]
    MismatchedEdge { parent: NodeId, child: NodeId },
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl ErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotReady => "E_NOT_READY",
            Self::LoadFailed(_) => "E_LOAD_FAILED",
            Self::ParentNotFound(_) => "E_PARENT_NOT_FOUND",
            Self::NodeNotFound(_) => "E_NODE_NOT_FOUND",
            Self::DuplicateNode(_) => "E_DUPLICATE_NODE",
            Self::EmptyQuestion => "E_EMPTY_QUESTION",
            Self::MismatchedEdge { .. } => "E_MISMATCHED_EDGE",
            Self::Source(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::NotReady => true,
            Self::Source(e) => e.retryable(),
            _ => false,
        }
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

/// Position of a new child given its parent's position and how many
/// children the parent already has.
#[must_use]
pub fn layout_child(parent: Position, existing_children: usize) -> Position {
    #[allow(clippy::cast_precision_loss)]
    let n = existing_children as f64;
    let shift = if existing_children > 0 { CHILD_SPACING_X / 2.0 } else { 0.0 };
    Position { x: parent.x + n * CHILD_SPACING_X - shift, y: parent.y + CHILD_ROW_HEIGHT }
}

// =============================================================================
// EDITOR
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
enum LoadState {
    Loading,
    Ready(Graph),
    Failed(String),
}

/// In-memory graph plus its per-node view state.
#[derive(Debug)]
pub struct GraphEditor {
    load: LoadState,
    expanded: HashSet<NodeId>,
}

impl GraphEditor {
    /// A new editor waiting for its first load.
    #[must_use]
    pub fn new() -> Self {
        Self { load: LoadState::Loading, expanded: HashSet::new() }
    }

    /// An editor that is already loaded with `graph`.
    #[cfg(test)]
    #[must_use]
    pub fn ready(graph: Graph) -> Self {
        let mut editor = Self::new();
        editor.finish_load(Ok(graph));
        editor
    }

    #[must_use]
    pub fn status(&self) -> LoadStatus {
        match self.load {
            LoadState::Loading => LoadStatus::Loading,
            LoadState::Ready(_) => LoadStatus::Ready,
            LoadState::Failed(_) => LoadStatus::Failed,
        }
    }

    /// Apply the outcome of a fetch. A successful load replaces the graph
    /// wholesale; expanded flags survive for node ids still present.
    pub fn finish_load(&mut self, result: Result<Graph, SourceError>) {
        match result {
            Ok(graph) => {
                self.expanded.retain(|id| graph.contains(id));
                info!(nodes = graph.nodes.len(), edges = graph.edges.len(), "mind map loaded");
                match graph.root() {
                    None => warn!("mind map has no root node"),
                    Some(root) if graph.nodes.iter().filter(|n| n.is_root).count() > 1 => {
                        warn!(root = %root.id, "mind map has more than one root node");
                    }
                    Some(_) => {}
                }
                self.load = LoadState::Ready(graph);
            }
            Err(e) => {
                warn!(error = %e, "mind map load failed");
                self.load = LoadState::Failed(e.to_string());
            }
        }
    }

    /// The current graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotReady`] while loading and
    /// [`GraphError::LoadFailed`] after a failed load.
    pub fn graph(&self) -> Result<&Graph, GraphError> {
        match &self.load {
            LoadState::Ready(graph) => Ok(graph),
            LoadState::Loading => Err(GraphError::NotReady),
            LoadState::Failed(msg) => Err(GraphError::LoadFailed(msg.clone())),
        }
    }

    fn graph_mut(&mut self) -> Result<&mut Graph, GraphError> {
        match &mut self.load {
            LoadState::Ready(graph) => Ok(graph),
            LoadState::Loading => Err(GraphError::NotReady),
            LoadState::Failed(msg) => Err(GraphError::LoadFailed(msg.clone())),
        }
    }

    /// Check that a child can be added under `parent_id` before asking the
    /// source to create it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptyQuestion`], [`GraphError::ParentNotFound`],
    /// or a load-state error.
    pub fn check_child(&self, parent_id: &str, question: &str) -> Result<(), GraphError> {
        let graph = self.graph()?;
        if question.trim().is_empty() {
            return Err(GraphError::EmptyQuestion);
        }
        if !graph.contains(parent_id) {
            return Err(GraphError::ParentNotFound(parent_id.to_owned()));
        }
        Ok(())
    }

    /// Append a node created by the source under `parent_id`, laying it out
    /// relative to the parent and its existing children.
    ///
    /// # Errors
    ///
    /// Fails without touching the graph if the parent is missing, the node id
    /// is already taken, or the edge does not link parent to node.
    pub fn add_child(&mut self, parent_id: &str, created: NodeCreated) -> Result<(Node, Edge), GraphError> {
        let graph = self.graph_mut()?;
        let NodeCreated { mut node, edge } = created;

        let Some(parent) = graph.node(parent_id) else {
            return Err(GraphError::ParentNotFound(parent_id.to_owned()));
        };
        if graph.contains(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        if edge.source != parent_id || edge.target != node.id {
            return Err(GraphError::MismatchedEdge { parent: parent_id.to_owned(), child: node.id });
        }

        node.position = layout_child(parent.position, graph.child_count(parent_id));
        node.is_root = false;

        graph.nodes.push(node.clone());
        graph.edges.push(edge.clone());
        info!(parent = parent_id, node = %node.id, "mind map node added");
        Ok((node, edge))
    }

    /// Manually connect two existing nodes.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if either endpoint is missing.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<Edge, GraphError> {
        let graph = self.graph_mut()?;
        for id in [source, target] {
            if !graph.contains(id) {
                return Err(GraphError::NodeNotFound(id.to_owned()));
            }
        }

        let edge = Edge { id: format!("edge-{}", Uuid::new_v4()), source: source.to_owned(), target: target.to_owned() };
        graph.edges.push(edge.clone());
        debug!(source, target, "mind map edge connected");
        Ok(edge)
    }

    /// Flip the expanded flag of a node and return the new value.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] for unknown ids.
    pub fn toggle_expand(&mut self, id: &str) -> Result<bool, GraphError> {
        if !self.graph()?.contains(id) {
            return Err(GraphError::NodeNotFound(id.to_owned()));
        }
        if self.expanded.remove(id) {
            Ok(false)
        } else {
            self.expanded.insert(id.to_owned());
            Ok(true)
        }
    }

    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Expanded node ids in graph order.
    #[must_use]
    pub fn expanded_ids(&self) -> Vec<NodeId> {
        let Ok(graph) = self.graph() else {
            return Vec::new();
        };
        graph
            .nodes
            .iter()
            .filter(|n| self.is_expanded(&n.id))
            .map(|n| n.id.clone())
            .collect()
    }
}

impl Default for GraphEditor {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERVICE
// =============================================================================

/// Fetch the graph from the configured source and install it.
pub async fn load_graph(state: &AppState) -> LoadStatus {
    let result = state.graph_source.fetch_graph().await;
    let mut editor = state.mindmap.write().await;
    editor.finish_load(result);
    editor.status()
}

/// Spawn the one-shot startup load.
pub fn spawn_graph_load(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let status = load_graph(&state).await;
        debug!(?status, "startup mind map load finished");
    })
}

/// Add a child under `parent_id`. Validates against the current graph, asks
/// the source to create the node, then lays it out and appends it.
///
/// # Errors
///
/// Returns a [`GraphError`] on validation failure, a missing parent, or a
/// source failure. The graph is unchanged on error.
pub async fn add_child_node(
    state: &AppState,
    parent_id: &str,
    question: &str,
    answer: &str,
) -> Result<(Node, Edge), GraphError> {
    {
        let editor = state.mindmap.read().await;
        if let Err(e) = editor.check_child(parent_id, question) {
            debug!(parent = parent_id, error = %e, "mind map add rejected");
            return Err(e);
        }
    }

    let created = state
        .graph_source
        .add_node(parent_id, question.trim(), answer.trim())
        .await?;

    let mut editor = state.mindmap.write().await;
    editor.add_child(parent_id, created)
}

#[cfg(test)]
#[path = "mindmap_test.rs"]
mod tests;
