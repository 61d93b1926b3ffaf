//! Graph validation — run this before simulating a workflow.
//!
//! Checks, all evaluated in one pass:
//! 1. Exactly one Start node, and it has no incoming edges.
//! 2. Every node is reachable from Start (only with exactly one Start).
//! 3. The graph is acyclic; every distinct cycle found is reported.
//!
//! Problems are returned as data in a [`ValidationResult`], in the order
//! above, so callers can render the complete list at once.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::index::GraphIndex;
use crate::models::{Graph, Node};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Category of a structural problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    NoStart,
    MultipleStart,
    StartHasIncoming,
    UnreachableNode,
    Cycle,
}

/// One structural problem, keyed by the node the editor should highlight.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub kind: ValidationErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

impl ValidationError {
    fn no_start() -> Self {
        Self {
            kind: ValidationErrorKind::NoStart,
            message: "No Start node found.".into(),
            node_id: None,
        }
    }

    fn multiple_start(count: usize) -> Self {
        Self {
            kind: ValidationErrorKind::MultipleStart,
            message: format!("More than one Start node found ({count})."),
            node_id: None,
        }
    }

    fn start_has_incoming(start: &Node) -> Self {
        Self {
            kind: ValidationErrorKind::StartHasIncoming,
            message: "Start node must not have incoming edges.".into(),
            node_id: Some(start.id.clone()),
        }
    }

    fn unreachable(node: &Node) -> Self {
        Self {
            kind: ValidationErrorKind::UnreachableNode,
            message: format!("Node \"{}\" is not reachable from Start.", node.label()),
            node_id: Some(node.id.clone()),
        }
    }

    fn cycle(path: &[String]) -> Self {
        Self {
            kind: ValidationErrorKind::Cycle,
            message: format!("Cycle detected: {}", path.join(" → ")),
            node_id: path.first().cloned(),
        }
    }
}

/// Supporting data gathered while validating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationDetails {
    pub unreachable_ids: Vec<String>,
    /// One closed example path per distinct cycle: first id == last id.
    pub cycles: Vec<Vec<String>>,
    pub start_id: Option<String>,
}

/// Outcome of [`validate_graph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub errors: Vec<ValidationError>,
    pub details: ValidationDetails,
}

impl ValidationResult {
    /// Errors of a single category, in report order.
    pub fn errors_of(&self, kind: ValidationErrorKind) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate the graph's structure.
///
/// Never fails. An id that edges name but no node carries is passed through
/// when computing reachability and is never reported itself. Cycle detection
/// skips such edges. An edge into the Start node counts as incoming whatever
/// its source.
#[instrument(skip_all, fields(nodes = graph.nodes.len(), edges = graph.edges.len()))]
pub fn validate_graph(graph: &Graph) -> ValidationResult {
    let index = GraphIndex::build(graph);
    let mut errors = Vec::new();
    let mut details = ValidationDetails::default();

    // -----------------------------------------------------------------------
    // 1. Start node cardinality
    // -----------------------------------------------------------------------
    let starts: Vec<&Node> = graph.nodes.iter().filter(|n| n.kind().is_start()).collect();

    match starts.as_slice() {
        [] => errors.push(ValidationError::no_start()),
        [start] => {
            details.start_id = Some(start.id.clone());
            if graph.edges.iter().any(|e| e.target == start.id) {
                errors.push(ValidationError::start_has_incoming(start));
            }
        }
        many => errors.push(ValidationError::multiple_start(many.len())),
    }

    // -----------------------------------------------------------------------
    // 2. Reachability from Start
    // -----------------------------------------------------------------------
    if let [start] = starts.as_slice() {
        let reachable = index
            .position(&start.id)
            .map(|root| reachable_from(&index, root))
            .unwrap_or_else(|| vec![false; index.slot_count()]);

        let mut reported = vec![false; index.len()];
        for node in &graph.nodes {
            let Some(idx) = index.position(&node.id) else { continue };
            if reachable[idx] || reported[idx] {
                continue;
            }
            reported[idx] = true;
            details.unreachable_ids.push(node.id.clone());
            errors.push(ValidationError::unreachable(node));
        }
    }

    // -----------------------------------------------------------------------
    // 3. Cycles
    // -----------------------------------------------------------------------
    for path in detect_cycles(&index) {
        errors.push(ValidationError::cycle(&path));
        details.cycles.push(path);
    }

    debug!(
        errors = errors.len(),
        unreachable = details.unreachable_ids.len(),
        cycles = details.cycles.len(),
        "graph validated"
    );

    ValidationResult { ok: errors.is_empty(), errors, details }
}

/// Flags every slot reachable from `root` via directed edges, walking
/// through missing ids.
fn reachable_from(index: &GraphIndex<'_>, root: usize) -> Vec<bool> {
    let mut visited = vec![false; index.slot_count()];
    let mut stack = vec![root];

    while let Some(current) = stack.pop() {
        if visited[current] {
            continue;
        }
        visited[current] = true;
        stack.extend(index.links(current).iter().filter(|&&next| !visited[next]));
    }

    visited
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Three-colour DFS from every unvisited node, one example cycle per back edge.
///
/// The work stack holds `(node, next successor position)`; the grey nodes
/// are exactly the stack frames, so a back edge `u → v` closes the cycle
/// formed by the frames from `v` up to `u`.
fn detect_cycles(index: &GraphIndex<'_>) -> Vec<Vec<String>> {
    let mut color = vec![Color::White; index.len()];
    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut cycles = Vec::new();

    for root in 0..index.len() {
        if color[root] != Color::White {
            continue;
        }
        color[root] = Color::Gray;
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (current, pos) = *frame;
            let successors = index.successors(current);

            if pos == successors.len() {
                color[current] = Color::Black;
                stack.pop();
                continue;
            }
            frame.1 += 1;

            let next = successors[pos];
            match color[next] {
                Color::White => {
                    color[next] = Color::Gray;
                    stack.push((next, 0));
                }
                Color::Gray => {
                    let Some(from) = stack.iter().rposition(|&(n, _)| n == next) else {
                        continue;
                    };
                    let mut path: Vec<usize> = stack[from..].iter().map(|&(n, _)| n).collect();
                    path.push(next);
                    if seen.insert(path.clone()) {
                        cycles.push(path.iter().map(|&n| index.node(n).id.clone()).collect());
                    }
                }
                Color::Black => {}
            }
        }
    }

    cycles
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Edge;
    use nodes::{EndAttrs, NodeKind, StartAttrs, TaskAttrs};

    fn start(id: &str) -> Node {
        Node::new(id, format!("{id} title"), NodeKind::Start(StartAttrs::default()))
    }

    fn task(id: &str) -> Node {
        Node::new(id, format!("{id} title"), NodeKind::Task(TaskAttrs::default()))
    }

    fn end(id: &str) -> Node {
        Node::new(id, "", NodeKind::End(EndAttrs::default()))
    }

    fn edges(pairs: &[(&str, &str)]) -> Vec<Edge> {
        pairs.iter().map(|(s, t)| Edge::new(*s, *t)).collect()
    }

    fn kinds(result: &ValidationResult) -> Vec<ValidationErrorKind> {
        result.errors.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn valid_linear_workflow_passes() {
        let graph = Graph::new(
            vec![start("s"), task("t"), end("e")],
            edges(&[("s", "t"), ("t", "e")]),
        );
        let result = validate_graph(&graph);
        assert!(result.ok);
        assert!(result.errors.is_empty());
        assert_eq!(result.details.start_id.as_deref(), Some("s"));
    }

    #[test]
    fn valid_diamond_workflow_passes() {
        //   s
        //  / \
        // a   b
        //  \ /
        //   e
        let graph = Graph::new(
            vec![start("s"), task("a"), task("b"), end("e")],
            edges(&[("s", "a"), ("s", "b"), ("a", "e"), ("b", "e")]),
        );
        assert!(validate_graph(&graph).ok);
    }

    #[test]
    fn missing_start_is_the_only_error_for_a_plain_chain() {
        let graph = Graph::new(vec![task("t1"), task("t2")], edges(&[("t1", "t2")]));
        let result = validate_graph(&graph);
        assert!(!result.ok);
        assert_eq!(kinds(&result), vec![ValidationErrorKind::NoStart]);
        assert_eq!(result.details.start_id, None);
    }

    #[test]
    fn multiple_starts_skip_reachability() {
        let graph = Graph::new(vec![start("s1"), start("s2"), task("t")], vec![]);
        let result = validate_graph(&graph);
        assert_eq!(kinds(&result), vec![ValidationErrorKind::MultipleStart]);
        assert!(result.details.unreachable_ids.is_empty());
    }

    #[test]
    fn back_edge_to_start_reports_incoming_and_cycle() {
        let graph = Graph::new(vec![start("s"), task("t")], edges(&[("s", "t"), ("t", "s")]));
        let result = validate_graph(&graph);

        assert_eq!(
            kinds(&result),
            vec![ValidationErrorKind::StartHasIncoming, ValidationErrorKind::Cycle]
        );
        assert_eq!(result.errors[0].node_id.as_deref(), Some("s"));
        assert_eq!(result.details.cycles, vec![vec!["s", "t", "s"]]);
        assert_eq!(result.errors[1].message, "Cycle detected: s → t → s");
        assert_eq!(result.errors[1].node_id.as_deref(), Some("s"));
    }

    #[test]
    fn unreachable_nodes_are_reported_individually_in_node_order() {
        let graph = Graph::new(
            vec![task("orphan"), start("s"), end("e"), end("lost")],
            edges(&[("s", "e")]),
        );
        let result = validate_graph(&graph);
        assert_eq!(result.details.unreachable_ids, vec!["orphan", "lost"]);

        let unreachable: Vec<&str> = result
            .errors_of(ValidationErrorKind::UnreachableNode)
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(
            unreachable,
            vec![
                "Node \"orphan title\" is not reachable from Start.",
                "Node \"lost\" is not reachable from Start.",
            ]
        );
    }

    #[test]
    fn dangling_edges_are_tolerated() {
        let graph = Graph::new(
            vec![start("s"), end("e")],
            edges(&[("s", "e"), ("s", "ghost"), ("ghost", "s")]),
        );
        let result = validate_graph(&graph);
        // The dangling edge into Start still counts as incoming.
        assert_eq!(kinds(&result), vec![ValidationErrorKind::StartHasIncoming]);
    }

    #[test]
    fn reachability_flows_through_missing_nodes() {
        let graph = Graph::new(
            vec![start("s"), end("x")],
            edges(&[("s", "ghost"), ("ghost", "x")]),
        );
        let result = validate_graph(&graph);
        assert!(result.ok);
        assert!(result.details.unreachable_ids.is_empty());
    }

    #[test]
    fn cycles_through_missing_nodes_are_not_reported() {
        let graph = Graph::new(
            vec![start("s"), task("a")],
            edges(&[("s", "a"), ("a", "ghost"), ("ghost", "a")]),
        );
        let result = validate_graph(&graph);
        assert!(result.ok);
        assert!(result.details.cycles.is_empty());
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let graph = Graph::new(
            vec![start("s"), task("t")],
            edges(&[("s", "t"), ("t", "t")]),
        );
        let result = validate_graph(&graph);
        assert_eq!(kinds(&result), vec![ValidationErrorKind::Cycle]);
        assert_eq!(result.details.cycles, vec![vec!["t", "t"]]);
    }

    #[test]
    fn cycles_unreachable_from_start_are_still_found() {
        let graph = Graph::new(
            vec![start("s"), end("e"), task("x"), task("y")],
            edges(&[("s", "e"), ("x", "y"), ("y", "x")]),
        );
        let result = validate_graph(&graph);
        assert_eq!(
            kinds(&result),
            vec![
                ValidationErrorKind::UnreachableNode,
                ValidationErrorKind::UnreachableNode,
                ValidationErrorKind::Cycle,
            ]
        );
        assert_eq!(result.details.cycles, vec![vec!["x", "y", "x"]]);
    }

    #[test]
    fn cycle_detection_runs_without_a_start_node() {
        let graph = Graph::new(
            vec![task("a"), task("b"), task("c")],
            edges(&[("a", "b"), ("b", "c"), ("c", "a")]),
        );
        let result = validate_graph(&graph);
        assert_eq!(kinds(&result), vec![ValidationErrorKind::NoStart, ValidationErrorKind::Cycle]);
        assert_eq!(result.details.cycles, vec![vec!["a", "b", "c", "a"]]);
    }

    #[test]
    fn two_back_edges_yield_two_cycles() {
        // s → a → b → a, b → s
        let graph = Graph::new(
            vec![start("s"), task("a"), task("b")],
            edges(&[("s", "a"), ("a", "b"), ("b", "a"), ("b", "s")]),
        );
        let result = validate_graph(&graph);
        assert_eq!(
            result.details.cycles,
            vec![vec!["a", "b", "a"], vec!["s", "a", "b", "s"]]
        );
        assert_eq!(result.errors_of(ValidationErrorKind::Cycle).count(), 2);
    }

    #[test]
    fn parallel_edges_do_not_duplicate_cycles() {
        let mut parallel = Edge::new("b", "a");
        parallel.id = "second".into();
        let mut wires = edges(&[("s", "a"), ("a", "b"), ("b", "a")]);
        wires.push(parallel);

        let graph = Graph::new(vec![start("s"), task("a"), task("b")], wires);
        let result = validate_graph(&graph);
        assert_eq!(result.details.cycles, vec![vec!["a", "b", "a"]]);
    }

    #[test]
    fn empty_graph_has_no_start() {
        let result = validate_graph(&Graph::default());
        assert_eq!(kinds(&result), vec![ValidationErrorKind::NoStart]);
    }

    #[test]
    fn long_chain_does_not_exhaust_the_stack() {
        let count = 50_000;
        let mut nodes = vec![start("n0")];
        nodes.extend((1..count).map(|i| task(&format!("n{i}"))));
        let wires = (1..count)
            .map(|i| Edge::new(format!("n{}", i - 1), format!("n{i}")))
            .collect();

        let result = validate_graph(&Graph::new(nodes, wires));
        assert!(result.ok);
    }

    #[test]
    fn result_serialises_with_editor_field_names() {
        let graph = Graph::new(vec![start("s"), task("t")], edges(&[("s", "t"), ("t", "s")]));
        let value = serde_json::to_value(validate_graph(&graph)).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["errors"][0]["type"], "start_has_incoming");
        assert_eq!(value["errors"][0]["nodeId"], "s");
        assert_eq!(value["details"]["startId"], "s");
        assert_eq!(value["details"]["unreachableIds"], serde_json::json!([]));
    }
}
