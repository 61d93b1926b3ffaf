//! The `WorkflowBackend` trait and its mock implementation.
//!
//! The editor talks to a backend for the automation catalog and for running
//! workflows. `MockBackend` answers from memory after a configurable delay,
//! running the engine's validator and simulator synchronously underneath.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use engine::{simulate, validate_graph, Graph, SimulationReport, ValidationResult};
use nodes::AutomationCatalog;

use crate::config::BackendConfig;

/// A completed simulation, tagged with the id it was logged under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRun {
    pub run_id: Uuid,
    #[serde(flatten)]
    pub report: SimulationReport,
}

/// What the editor needs from a backend.
#[async_trait]
pub trait WorkflowBackend: Send + Sync {
    /// Available automations for Automated steps.
    async fn automations(&self) -> AutomationCatalog;

    async fn validate(&self, graph: &Graph) -> ValidationResult;

    /// Simulate without validating first.
    async fn simulate(&self, graph: &Graph) -> SimulationRun;
}

/// In-memory backend with artificial latency.
#[derive(Debug, Clone)]
pub struct MockBackend {
    catalog: AutomationCatalog,
    config: BackendConfig,
}

impl MockBackend {
    pub fn new(catalog: AutomationCatalog, config: BackendConfig) -> Self {
        Self { catalog, config }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new(AutomationCatalog::builtin(), BackendConfig::default())
    }
}

async fn pause(delay: std::time::Duration) {
    if !delay.is_zero() {
        debug!("delaying response by {delay:?}");
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl WorkflowBackend for MockBackend {
    async fn automations(&self) -> AutomationCatalog {
        pause(self.config.automations_delay).await;
        self.catalog.clone()
    }

    async fn validate(&self, graph: &Graph) -> ValidationResult {
        pause(self.config.validate_delay).await;
        validate_graph(graph)
    }

    async fn simulate(&self, graph: &Graph) -> SimulationRun {
        let run_id = Uuid::new_v4();
        info!(%run_id, nodes = graph.nodes.len(), "simulating workflow");

        pause(self.config.simulate_delay).await;
        let report = simulate(graph);

        info!(%run_id, steps = report.steps.len(), "simulation complete");
        SimulationRun { run_id, report }
    }
}
