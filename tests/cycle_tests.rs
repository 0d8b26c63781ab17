//! Cycle detector tests.
//!
//! The detector is checked against a brute-force reachability reference on
//! random graphs, plus the roleblock graphs the resolver actually builds.

use std::collections::{BTreeSet, HashMap, HashSet};

use mafia_engine::graph::{nodes_in_cycles, Graph};
use proptest::prelude::*;

/// Nodes that can reach themselves through at least one edge.
fn reference(edges: &[(u8, u8)]) -> BTreeSet<u8> {
    let mut adjacency: HashMap<u8, Vec<u8>> = HashMap::new();
    for &(from, to) in edges {
        adjacency.entry(from).or_default().push(to);
    }
    let mut cyclic = BTreeSet::new();
    for &start in adjacency.keys() {
        let mut seen = HashSet::new();
        let mut stack: Vec<u8> = adjacency[&start].clone();
        while let Some(node) = stack.pop() {
            if node == start {
                cyclic.insert(start);
                break;
            }
            if seen.insert(node) {
                if let Some(next) = adjacency.get(&node) {
                    stack.extend(next);
                }
            }
        }
    }
    cyclic
}

proptest! {
    /// Test agreement with the reachability reference.
    #[test]
    fn prop_matches_reference(edges in prop::collection::vec((0u8..12, 0u8..12), 0..40)) {
        prop_assert_eq!(nodes_in_cycles(edges.iter().copied()), reference(&edges));
    }

    /// Test that edge order does not affect the result.
    #[test]
    fn prop_order_independent(edges in prop::collection::vec((0u8..12, 0u8..12), 0..40)) {
        let forward = nodes_in_cycles(edges.iter().copied());
        let backward = nodes_in_cycles(edges.iter().rev().copied());
        prop_assert_eq!(forward, backward);
    }
}

/// Test the mutual-roleblock shape: a two-cycle with a tail into a third player.
#[test]
fn test_mutual_block_with_tail() {
    let cyclic = nodes_in_cycles([("Bob", "Eve"), ("Eve", "Bob"), ("Eve", "Alice")]);
    assert_eq!(cyclic.into_iter().collect::<Vec<_>>(), ["Bob", "Eve"]);
}

/// Test building a graph incrementally.
#[test]
fn test_incremental_graph() {
    let mut graph = Graph::new();
    graph.add_edge(1u32, 2);
    assert!(graph.nodes_in_cycles().is_empty());
    graph.add_edge(2, 1);
    assert_eq!(graph.nodes_in_cycles().len(), 2);
    assert_eq!(graph.node_count(), 2);
}

/// Test a graph of disjoint self-loops and an acyclic fan.
#[test]
fn test_self_loops_and_fan() {
    let edges = [(0, 0), (1, 2), (1, 3), (1, 4), (5, 5)];
    assert_eq!(nodes_in_cycles(edges).into_iter().collect::<Vec<_>>(), [0, 5]);
}
