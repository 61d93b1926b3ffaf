//! `nodes` crate — the closed set of workflow node kinds and the automation catalog.
//!
//! Every step a user can drop on the canvas is one variant of [`NodeKind`].
//! The engine crate dispatches per-kind behaviour (defaults, simulation log
//! messages) through this sum type.

pub mod catalog;
pub mod error;
pub mod kinds;

pub use catalog::{Automation, AutomationCatalog};
pub use error::NodeError;
pub use kinds::{
    ApprovalAttrs, AutomatedAttrs, EndAttrs, KeyValue, NodeKind, StartAttrs, TaskAttrs,
};
