//! Core domain models for the workflow designer.
//!
//! These types are the source of truth for what a workflow graph looks like
//! in memory, and their serde shape is the `{ nodes, edges }` JSON document
//! the editor imports and exports.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use nodes::NodeKind;

use crate::EngineError;

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// Canvas coordinates. Carried through import/export, ignored by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Display title plus the kind-specific attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeData {
    pub title: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// A missing or null `nodeType` loads as [`NodeKind::Unknown`] instead of
/// failing the whole document.
impl<'de> Deserialize<'de> for NodeData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::deserialize(deserializer)?;

        let title = match fields.remove("title") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(title)) => title,
            Some(other) => {
                return Err(de::Error::invalid_type(unexpected(&other), &"a string title"))
            }
        };

        let kind = match fields.get("nodeType") {
            None | Some(Value::Null) => NodeKind::Unknown,
            Some(_) => NodeKind::deserialize(Value::Object(fields)).map_err(de::Error::custom)?,
        };

        Ok(Self { title, kind })
    }
}

fn unexpected(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Bool(b) => de::Unexpected::Bool(*b),
        Value::Number(_) => de::Unexpected::Other("number"),
        Value::Array(_) => de::Unexpected::Seq,
        _ => de::Unexpected::Map,
    }
}

/// A single step in the workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier within this graph (referenced by edges).
    pub id: String,
    #[serde(default)]
    pub position: Position,
    pub data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            position: Position::default(),
            data: NodeData { title: title.into(), kind },
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.data.kind
    }

    pub fn title(&self) -> &str {
        &self.data.title
    }

    /// Label used in validation messages: the title, or the id when untitled.
    pub fn label(&self) -> &str {
        if self.data.title.is_empty() {
            &self.id
        } else {
            &self.data.title
        }
    }

    /// Title used in simulation steps: the title, or the kind name when untitled.
    pub fn display_title(&self) -> &str {
        if self.data.title.is_empty() {
            self.data.kind.name()
        } else {
            &self.data.title
        }
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// Directed edge from one node to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Edge {
    /// Handle-less edge with an id derived from its endpoints.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Connection::new(source, target).into_edge()
    }

    /// True when `conn` describes the same wire as this edge.
    pub fn matches(&self, conn: &Connection) -> bool {
        self.source == conn.source
            && self.source_handle == conn.source_handle
            && self.target == conn.target
            && self.target_handle == conn.target_handle
    }
}

/// A connection request coming from the canvas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            ..Default::default()
        }
    }

    /// Content-derived id, so identical wires always get identical ids.
    pub fn edge_id(&self) -> String {
        format!(
            "edge-{}{}-{}{}",
            self.source,
            self.source_handle.as_deref().unwrap_or_default(),
            self.target,
            self.target_handle.as_deref().unwrap_or_default(),
        )
    }

    pub fn into_edge(self) -> Edge {
        Edge {
            id: self.edge_id(),
            source: self.source,
            target: self.target,
            source_handle: self.source_handle,
            target_handle: self.target_handle,
        }
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A complete workflow graph, as exchanged with the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Parse an exported `{ nodes, edges }` document.
    ///
    /// # Errors
    /// [`EngineError::InvalidJson`] if the text is not JSON or lacks either array.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pretty-printed `{ nodes, edges }` document.
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
