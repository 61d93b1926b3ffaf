//! Editor session — the operations the canvas performs on a graph.
//!
//! `EditorSession` owns the graph being edited, the automation catalog the
//! forms offer, and its own node id counter, so two sessions (or two tests)
//! never share id state.

use tracing::{debug, info};

use nodes::{AutomationCatalog, NodeError, NodeKind};

use crate::models::{Connection, Edge, Graph, Node, Position};
use crate::simulator::{simulate, SimulationReport};
use crate::validator::{validate_graph, ValidationResult};
use crate::EngineError;

// ---------------------------------------------------------------------------
// Id generation
// ---------------------------------------------------------------------------

const NODE_ID_PREFIX: &str = "node_";

/// Hands out `node_0`, `node_1`, … for one session.
#[derive(Debug, Clone, Default)]
pub struct NodeIdGenerator {
    next: u64,
}

impl NodeIdGenerator {
    pub fn next_id(&mut self) -> String {
        let id = format!("{NODE_ID_PREFIX}{}", self.next);
        self.next += 1;
        id
    }

    /// Make sure later ids never collide with `id` if it is one of ours.
    pub fn reserve(&mut self, id: &str) {
        if let Some(n) = id
            .strip_prefix(NODE_ID_PREFIX)
            .and_then(|suffix| suffix.parse::<u64>().ok())
        {
            self.next = self.next.max(n.saturating_add(1));
        }
    }
}

// ---------------------------------------------------------------------------
// EditorSession
// ---------------------------------------------------------------------------

/// A graph under edit.
#[derive(Debug, Clone)]
pub struct EditorSession {
    graph: Graph,
    catalog: AutomationCatalog,
    ids: NodeIdGenerator,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(AutomationCatalog::builtin())
    }
}

impl EditorSession {
    /// Empty session offering `catalog` to Automated steps.
    pub fn new(catalog: AutomationCatalog) -> Self {
        Self {
            graph: Graph::default(),
            catalog,
            ids: NodeIdGenerator::default(),
        }
    }

    /// Session editing an existing graph.
    pub fn with_graph(graph: Graph, catalog: AutomationCatalog) -> Self {
        let mut session = Self::new(catalog);
        session.replace_graph(graph);
        session
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn catalog(&self) -> &AutomationCatalog {
        &self.catalog
    }

    // -----------------------------------------------------------------------
    // Nodes
    // -----------------------------------------------------------------------

    /// Drop a new node of kind `kind_name` at `position`, with default attributes.
    ///
    /// # Errors
    /// [`EngineError::Node`] if `kind_name` is not a known node kind.
    pub fn add_node(&mut self, kind_name: &str, position: Position) -> Result<&Node, EngineError> {
        let kind = NodeKind::with_defaults(kind_name, &self.catalog)?;
        let mut node = Node::new(self.ids.next_id(), format!("{kind_name} title"), kind);
        node.position = position;

        debug!(node_id = %node.id, kind = kind_name, "node added");
        self.graph.nodes.push(node);
        Ok(&self.graph.nodes[self.graph.nodes.len() - 1])
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<Node, EngineError> {
        let pos = self
            .graph
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| EngineError::UnknownNode(id.to_owned()))?;

        let node = self.graph.nodes.remove(pos);
        let before = self.graph.edges.len();
        self.graph.edges.retain(|e| e.source != id && e.target != id);

        debug!(node_id = id, edges_removed = before - self.graph.edges.len(), "node removed");
        Ok(node)
    }

    pub fn set_title(&mut self, id: &str, title: impl Into<String>) -> Result<(), EngineError> {
        self.node_mut(id)?.data.title = title.into();
        Ok(())
    }

    /// Replace a node's kind and attributes wholesale.
    pub fn update_kind(&mut self, id: &str, kind: NodeKind) -> Result<(), EngineError> {
        self.node_mut(id)?.data.kind = kind;
        Ok(())
    }

    /// Point an Automated step at `action_id`, resetting its parameters to
    /// exactly the catalog's declared set with empty values.
    ///
    /// # Errors
    /// - [`EngineError::UnknownNode`] if there is no node `id`.
    /// - [`EngineError::Node`] if the node is not Automated or the action is unknown.
    pub fn select_automation(&mut self, id: &str, action_id: &str) -> Result<(), EngineError> {
        let params = self.catalog.blank_params(action_id)?;
        let node = self.node_mut(id)?;

        match &mut node.data.kind {
            NodeKind::Automated(attrs) => {
                attrs.automation_action = action_id.to_owned();
                attrs.action_params = params;
                Ok(())
            }
            other => Err(NodeError::NotAutomated(other.name()).into()),
        }
    }

    /// Fill in one parameter of an Automated step.
    pub fn set_action_param(
        &mut self,
        id: &str,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), EngineError> {
        match &mut self.node_mut(id)?.data.kind {
            NodeKind::Automated(attrs) => {
                attrs.action_params.insert(name.into(), value.into());
                Ok(())
            }
            other => Err(NodeError::NotAutomated(other.name()).into()),
        }
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut Node, EngineError> {
        self.graph
            .node_mut(id)
            .ok_or_else(|| EngineError::UnknownNode(id.to_owned()))
    }

    // -----------------------------------------------------------------------
    // Edges
    // -----------------------------------------------------------------------

    /// Wire two nodes together. Returns `None` when the same connection
    /// (endpoints and handles) already exists.
    pub fn connect(&mut self, conn: Connection) -> Option<&Edge> {
        if self.graph.edges.iter().any(|e| e.matches(&conn)) {
            debug!(source = %conn.source, target = %conn.target, "duplicate connection ignored");
            return None;
        }
        self.graph.edges.push(conn.into_edge());
        self.graph.edges.last()
    }

    pub fn remove_edge(&mut self, id: &str) -> Result<Edge, EngineError> {
        let pos = self
            .graph
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| EngineError::UnknownEdge(id.to_owned()))?;
        Ok(self.graph.edges.remove(pos))
    }

    // -----------------------------------------------------------------------
    // Engine
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> ValidationResult {
        validate_graph(&self.graph)
    }

    pub fn simulate(&self) -> SimulationReport {
        simulate(&self.graph)
    }

    // -----------------------------------------------------------------------
    // Import / export
    // -----------------------------------------------------------------------

    pub fn export_json(&self) -> Result<String, EngineError> {
        self.graph.to_json()
    }

    /// Replace the current graph with an exported document.
    ///
    /// On error the current graph is left untouched.
    pub fn import_json(&mut self, json: &str) -> Result<(), EngineError> {
        let graph = Graph::from_json(json)?;
        info!(nodes = graph.nodes.len(), edges = graph.edges.len(), "workflow imported");
        self.replace_graph(graph);
        Ok(())
    }

    fn replace_graph(&mut self, graph: Graph) {
        for node in &graph.nodes {
            self.ids.reserve(&node.id);
        }
        self.graph = graph;
    }
}
