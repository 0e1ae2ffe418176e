//! Pull-based data-flow aggregation, independent of control-flow edges.
//!
//! A summary node never waits to be pushed values; when executed it walks
//! backwards along the connections entering its `points` inputs and reads
//! each source's current snapshot. Sources that have not executed yet
//! contribute their current (zero) value, deleted sources contribute
//! nothing at all.

use crate::graph::{GraphStore, Node};

/// Sums the snapshots of every source wired into one input socket.
/// Fan-in on a single input is summed; unresolvable sources are skipped.
pub fn pull_input(graph: &GraphStore, target: &str, input: &str) -> f64 {
    graph
        .connections_into(target, input)
        .filter_map(|c| graph.node(&c.source).and_then(|n| n.data(&c.source_output)))
        .sum()
}

/// Sums every `points`-typed input of a node.
pub fn sum_points(graph: &GraphStore, node_id: &str) -> f64 {
    let Some(node) = graph.node(node_id) else {
        return 0.0;
    };
    node.inputs
        .keys()
        .filter(|name| Node::is_points_input(name))
        .map(|name| pull_input(graph, node_id, name))
        .sum()
}
