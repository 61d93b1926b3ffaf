//! Engine-level error types.
//!
//! Structural problems in a graph are not errors at this level: they are
//! reported as data in [`crate::ValidationResult`]. `EngineError` covers the
//! editing and import surface only.

use thiserror::Error;

/// Errors produced by the editor session and JSON import/export.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The document is not JSON, or lacks the `nodes`/`edges` arrays.
    #[error("invalid workflow JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// An operation referenced a node ID that doesn't exist in the graph.
    #[error("unknown node ID: '{0}'")]
    UnknownNode(String),

    /// An operation referenced an edge ID that doesn't exist in the graph.
    #[error("unknown edge ID: '{0}'")]
    UnknownEdge(String),

    /// Building or reconfiguring a node failed.
    #[error(transparent)]
    Node(#[from] nodes::NodeError),
}
