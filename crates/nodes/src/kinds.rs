//! Node kinds and their attribute sets.
//!
//! The JSON shape mirrors what the editor exports: a `nodeType` tag next to
//! the kind's own camelCase attributes. Attribute structs default every
//! field so partially filled nodes still load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AutomationCatalog, NodeError};

/// Placeholder used in log messages for unset optional fields.
const NOT_SET: &str = "N/A";

// ---------------------------------------------------------------------------
// Attribute sets
// ---------------------------------------------------------------------------

/// Ordered key/value pair used for Start metadata and Task custom fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartAttrs {
    pub metadata: Vec<KeyValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskAttrs {
    pub description: String,
    pub assignee: String,
    /// Free-form date string as entered in the form.
    pub due_date: String,
    pub custom_fields: Vec<KeyValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApprovalAttrs {
    pub approver_role: String,
    pub auto_approve_threshold: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutomatedAttrs {
    /// Catalog id, or empty when no action is selected.
    pub automation_action: String,
    pub action_params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndAttrs {
    pub end_message: String,
    pub summary: bool,
}

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// What a node does, together with the attributes only that kind carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "nodeType")]
pub enum NodeKind {
    Start(StartAttrs),
    Task(TaskAttrs),
    Approval(ApprovalAttrs),
    Automated(AutomatedAttrs),
    End(EndAttrs),
    /// Any `nodeType` this build does not recognise. Traversed, never logged.
    #[serde(other)]
    Unknown,
}

impl NodeKind {
    /// Kind names accepted by [`NodeKind::with_defaults`].
    pub const NAMES: [&'static str; 5] = ["Start", "Task", "Approval", "Automated", "End"];

    /// Build a kind with the defaults a freshly dropped node gets.
    ///
    /// Automated steps pick the catalog's first action (or none) and start
    /// with an empty parameter map.
    ///
    /// # Errors
    /// [`NodeError::UnknownKind`] when `name` is not one of [`NodeKind::NAMES`].
    pub fn with_defaults(name: &str, catalog: &AutomationCatalog) -> Result<Self, NodeError> {
        let kind = match name {
            "Start" => NodeKind::Start(StartAttrs::default()),
            "Task" => NodeKind::Task(TaskAttrs::default()),
            "Approval" => NodeKind::Approval(ApprovalAttrs {
                approver_role: "Manager".into(),
                auto_approve_threshold: 0.0,
            }),
            "Automated" => NodeKind::Automated(AutomatedAttrs {
                automation_action: catalog.first().map(|a| a.id.clone()).unwrap_or_default(),
                action_params: BTreeMap::new(),
            }),
            "End" => NodeKind::End(EndAttrs::default()),
            other => return Err(NodeError::UnknownKind(other.to_owned())),
        };
        Ok(kind)
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Start(_) => "Start",
            NodeKind::Task(_) => "Task",
            NodeKind::Approval(_) => "Approval",
            NodeKind::Automated(_) => "Automated",
            NodeKind::End(_) => "End",
            NodeKind::Unknown => "Unknown",
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, NodeKind::Start(_))
    }

    /// Simulation log line for this node, or `None` for kinds that emit nothing.
    pub fn describe(&self) -> Option<String> {
        let message = match self {
            NodeKind::Start(a) => {
                format!("Workflow started. Metadata: {}", dump(&a.metadata))
            }
            NodeKind::Task(a) => format!(
                "Task assigned to {}, due {}. Custom fields: {}",
                or_not_set(&a.assignee),
                or_not_set(&a.due_date),
                dump(&a.custom_fields),
            ),
            NodeKind::Approval(a) => format!(
                "Approval by {}. Auto-approve threshold = {}",
                a.approver_role, a.auto_approve_threshold
            ),
            NodeKind::Automated(a) => format!(
                "Automated Action: {}. Params: {}",
                a.automation_action,
                dump(&a.action_params)
            ),
            NodeKind::End(a) => format!(
                "Workflow ended. Summary required: {}",
                if a.summary { "Yes" } else { "No" }
            ),
            NodeKind::Unknown => return None,
        };
        Some(message)
    }
}

fn or_not_set(value: &str) -> &str {
    if value.is_empty() {
        NOT_SET
    } else {
        value
    }
}

/// Compact JSON dump of attribute collections.
fn dump<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        tracing::warn!("failed to serialise node attributes: {e}");
        String::from("null")
    })
}
