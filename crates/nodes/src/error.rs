//! Node-level error type.

use thiserror::Error;

/// Errors raised while building or reconfiguring a node.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// The requested kind is not one of Start/Task/Approval/Automated/End.
    #[error("unknown node kind: '{0}'")]
    UnknownKind(String),

    /// The automation id is not present in the catalog.
    #[error("unknown automation: '{0}'")]
    UnknownAutomation(String),

    /// An automation was selected on a node that is not an Automated step.
    #[error("node kind '{0}' does not accept an automation")]
    NotAutomated(&'static str),
}
