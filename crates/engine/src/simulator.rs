//! Workflow simulation.
//!
//! Walks the graph depth-first from the Start node and records one
//! [`SimulationStep`] per visited node, using the per-kind message from
//! [`nodes::NodeKind::describe`]. Nothing is executed.
//!
//! The simulator does not validate. Callers are expected to run
//! [`crate::validate_graph`] first; on an invalid graph the walk still
//! terminates and visits each reachable node exactly once.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::index::GraphIndex;
use crate::models::Graph;

/// One line of the execution log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStep {
    pub node_id: String,
    pub title: String,
    pub message: String,
}

/// The result of simulating a full workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Always `true`; simulation itself cannot fail.
    pub ok: bool,
    pub steps: Vec<SimulationStep>,
}

/// Produce the execution log for `graph`.
///
/// The entry node is the first Start node, or the first node in the list
/// when there is none. An empty graph yields an empty log.
#[instrument(skip_all, fields(nodes = graph.nodes.len(), edges = graph.edges.len()))]
pub fn simulate(graph: &Graph) -> SimulationReport {
    let index = GraphIndex::build(graph);

    let entry = graph
        .nodes
        .iter()
        .find(|n| n.kind().is_start())
        .or_else(|| graph.nodes.first())
        .and_then(|n| index.position(&n.id));

    let Some(entry) = entry else {
        debug!("no entry node, nothing to simulate");
        return SimulationReport { ok: true, steps: Vec::new() };
    };

    let mut visited = vec![false; index.len()];
    let mut steps = Vec::new();

    // Marks `idx` visited and logs it; false if it was already visited.
    let mut enter = |idx: usize| -> bool {
        if visited[idx] {
            return false;
        }
        visited[idx] = true;
        let node = index.node(idx);
        if let Some(message) = node.kind().describe() {
            steps.push(SimulationStep {
                node_id: node.id.clone(),
                title: node.display_title().to_owned(),
                message,
            });
        }
        true
    };

    // Pre-order DFS; frames are `(node, next successor position)`.
    enter(entry);
    let mut stack: Vec<(usize, usize)> = vec![(entry, 0)];

    while let Some(frame) = stack.last_mut() {
        let (current, pos) = *frame;
        let Some(&next) = index.successors(current).get(pos) else {
            stack.pop();
            continue;
        };
        frame.1 += 1;

        if enter(next) {
            stack.push((next, 0));
        }
    }

    debug!(steps = steps.len(), "simulation finished");
    SimulationReport { ok: true, steps }
}
