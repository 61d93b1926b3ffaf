//! Automation catalog served by the mock backend.
//!
//! An Automated step references one [`Automation`] by id and is expected to
//! carry exactly the parameters that entry declares. The simulator never
//! checks this; the editor session uses [`AutomationCatalog::blank_params`]
//! to keep the two aligned when the action changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::NodeError;

/// One external action an Automated step can trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Automation {
    pub id: String,
    pub label: String,
    /// Parameter names the action expects, in display order.
    pub params: Vec<String>,
}

impl Automation {
    pub fn new(id: impl Into<String>, label: impl Into<String>, params: &[&str]) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Ordered list of available automations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AutomationCatalog {
    entries: Vec<Automation>,
}

impl AutomationCatalog {
    pub fn new(entries: Vec<Automation>) -> Self {
        Self { entries }
    }

    /// The three actions the mock backend ships with.
    pub fn builtin() -> Self {
        Self::new(vec![
            Automation::new("send_email", "Send Email", &["to", "subject", "body"]),
            Automation::new("generate_doc", "Generate Document", &["template", "recipient"]),
            Automation::new("call_webhook", "Call Webhook", &["url", "payload"]),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&Automation> {
        self.entries.iter().find(|a| a.id == id)
    }

    /// Default action for a freshly created Automated step.
    pub fn first(&self) -> Option<&Automation> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Automation> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parameter map with every declared param of `id` set to an empty value.
    ///
    /// # Errors
    /// [`NodeError::UnknownAutomation`] when `id` is not in the catalog.
    pub fn blank_params(&self, id: &str) -> Result<BTreeMap<String, String>, NodeError> {
        let automation = self
            .get(id)
            .ok_or_else(|| NodeError::UnknownAutomation(id.to_owned()))?;

        Ok(automation
            .params
            .iter()
            .map(|p| (p.clone(), String::new()))
            .collect())
    }
}
