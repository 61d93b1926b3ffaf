//! Arena index over a graph's nodes.
//!
//! Maps each distinct node id to a dense `usize` so traversals can keep
//! colours and visited flags in flat vectors.
//!
//! Two adjacency views are kept. `successors` only links known nodes and
//! feeds cycle detection and simulation. `links` also gives every id that an
//! edge names but no node carries its own slot after the known nodes, so
//! reachability can pass through it.

use std::collections::HashMap;

use crate::models::{Graph, Node};

pub(crate) struct GraphIndex<'a> {
    /// First node carrying each id, in node-list order.
    nodes: Vec<&'a Node>,
    lookup: HashMap<&'a str, usize>,
    /// Successors per node, in edge-list order.
    successors: Vec<Vec<usize>>,
    /// Successors per slot, missing ids included.
    links: Vec<Vec<usize>>,
}

impl<'a> GraphIndex<'a> {
    pub(crate) fn build(graph: &'a Graph) -> Self {
        let mut nodes = Vec::with_capacity(graph.nodes.len());
        let mut lookup = HashMap::with_capacity(graph.nodes.len());

        for node in &graph.nodes {
            lookup.entry(node.id.as_str()).or_insert_with(|| {
                nodes.push(node);
                nodes.len() - 1
            });
        }

        let known = nodes.len();
        let mut successors = vec![Vec::new(); known];
        let mut links = vec![Vec::new(); known];
        let mut missing: HashMap<&'a str, usize> = HashMap::new();

        for edge in &graph.edges {
            let from = slot(&edge.source, &lookup, &mut missing, &mut links);
            let to = slot(&edge.target, &lookup, &mut missing, &mut links);
            links[from].push(to);
            if from < known && to < known {
                successors[from].push(to);
            }
        }

        Self { nodes, lookup, successors, links }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.lookup.get(id).copied()
    }

    pub(crate) fn node(&self, idx: usize) -> &'a Node {
        self.nodes[idx]
    }

    pub(crate) fn successors(&self, idx: usize) -> &[usize] {
        &self.successors[idx]
    }

    /// Known nodes plus one slot per missing edge endpoint.
    pub(crate) fn slot_count(&self) -> usize {
        self.links.len()
    }

    pub(crate) fn links(&self, slot: usize) -> &[usize] {
        &self.links[slot]
    }
}

/// Slot for `id`, allocating a fresh one the first time a missing id is seen.
fn slot<'a>(
    id: &'a str,
    lookup: &HashMap<&'a str, usize>,
    missing: &mut HashMap<&'a str, usize>,
    links: &mut Vec<Vec<usize>>,
) -> usize {
    if let Some(&idx) = lookup.get(id) {
        return idx;
    }
    *missing.entry(id).or_insert_with(|| {
        links.push(Vec::new());
        links.len() - 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Edge;
    use nodes::{NodeKind, TaskAttrs};

    fn task(id: &str) -> Node {
        Node::new(id, id, NodeKind::Task(TaskAttrs::default()))
    }

    #[test]
    fn dangling_edges_are_dropped_from_successors() {
        let graph = Graph::new(
            vec![task("a"), task("b")],
            vec![Edge::new("a", "b"), Edge::new("a", "ghost"), Edge::new("ghost", "b")],
        );
        let index = GraphIndex::build(&graph);
        assert_eq!(index.len(), 2);
        assert_eq!(index.successors(0), &[1]);
        assert!(index.successors(1).is_empty());
    }

    #[test]
    fn missing_endpoints_get_link_slots_after_known_nodes() {
        let graph = Graph::new(
            vec![task("a"), task("b")],
            vec![
                Edge::new("a", "ghost"),
                Edge::new("ghost", "b"),
                Edge::new("phantom", "ghost"),
            ],
        );
        let index = GraphIndex::build(&graph);
        assert_eq!(index.len(), 2);
        assert_eq!(index.slot_count(), 4);
        assert_eq!(index.links(0), &[2]);
        assert_eq!(index.links(2), &[1]);
        assert_eq!(index.links(3), &[2]);
        assert_eq!(index.position("ghost"), None);
    }

    #[test]
    fn duplicate_ids_resolve_to_first_node() {
        let mut second = task("a");
        second.data.title = "shadow".into();
        let graph = Graph::new(vec![task("a"), second, task("b")], vec![]);
        let index = GraphIndex::build(&graph);
        assert_eq!(index.len(), 2);
        assert_eq!(index.node(0).title(), "a");
        assert_eq!(index.position("b"), Some(1));
    }
}
