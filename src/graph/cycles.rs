//! Cycle detection via Tarjan's strongly connected components.
//!
//! A node is "in a cycle" when its component has more than one node, or
//! when it is a single node with an edge to itself.
//!
//! The traversal is iterative, so graph depth is bounded by heap rather
//! than by the call stack.

use std::collections::BTreeSet;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Adjacency-list graph over caller-supplied node values.
///
/// Nodes are interned in order of first appearance; the interned index is
/// what the traversal works on.
#[derive(Clone, Debug)]
pub struct Graph<N> {
    nodes: Vec<N>,
    index: FxHashMap<N, usize>,
    edges: Vec<Vec<usize>>,
    self_loops: Vec<bool>,
}

impl<N: Copy + Eq + Hash> Graph<N> {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: FxHashMap::default(),
            edges: Vec::new(),
            self_loops: Vec::new(),
        }
    }

    /// Build a graph from `(from, to)` pairs.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut graph = Self::new();
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    fn intern(&mut self, node: N) -> usize {
        if let Some(&i) = self.index.get(&node) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(node);
        self.index.insert(node, i);
        self.edges.push(Vec::new());
        self.self_loops.push(false);
        i
    }

    /// Add a directed edge.
    pub fn add_edge(&mut self, from: N, to: N) {
        let a = self.intern(from);
        let b = self.intern(to);
        if a == b {
            self.self_loops[a] = true;
        }
        self.edges[a].push(b);
    }

    /// Number of distinct nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Strongly connected components, each as interned indices.
    fn components(&self) -> Vec<Vec<usize>> {
        let mut tarjan = Tarjan::new(self.nodes.len());
        for root in 0..self.nodes.len() {
            if tarjan.index[root].is_none() {
                tarjan.run(root, &self.edges);
            }
        }
        tarjan.components
    }

    /// Every node that lies on at least one cycle.
    pub fn nodes_in_cycles(&self) -> BTreeSet<N>
    where
        N: Ord,
    {
        self.components()
            .into_iter()
            .filter(|c| c.len() > 1 || c.first().is_some_and(|&n| self.self_loops[n]))
            .flatten()
            .map(|i| self.nodes[i])
            .collect()
    }
}

impl<N: Copy + Eq + Hash> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

struct Tarjan {
    next: usize,
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Vec<usize>>,
}

impl Tarjan {
    fn new(n: usize) -> Self {
        Self {
            next: 0,
            index: vec![None; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            components: Vec::new(),
        }
    }

    fn enter(&mut self, v: usize) {
        self.index[v] = Some(self.next);
        self.lowlink[v] = self.next;
        self.next += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
    }

    fn run(&mut self, root: usize, edges: &[Vec<usize>]) {
        // (node, position of the next outgoing edge to explore)
        let mut work: Vec<(usize, usize)> = vec![(root, 0)];
        self.enter(root);

        while let Some(&(v, pos)) = work.last() {
            if let Some(&w) = edges[v].get(pos) {
                if let Some(frame) = work.last_mut() {
                    frame.1 += 1;
                }
                match self.index[w] {
                    None => {
                        self.enter(w);
                        work.push((w, 0));
                    }
                    Some(iw) if self.on_stack[w] => {
                        self.lowlink[v] = self.lowlink[v].min(iw);
                    }
                    Some(_) => {}
                }
                continue;
            }

            work.pop();
            if let Some(&(parent, _)) = work.last() {
                self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[v]);
            }
            if self.index[v] == Some(self.lowlink[v]) {
                let mut component = Vec::new();
                while let Some(w) = self.stack.pop() {
                    self.on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                self.components.push(component);
            }
        }
    }
}

/// Return the set of nodes that participate in any cycle of the directed
/// graph described by `edges`.
///
/// ```
/// use mafia_engine::graph::nodes_in_cycles;
///
/// let cyclic = nodes_in_cycles([(1, 2), (2, 3), (3, 1), (3, 4), (5, 5), (6, 7)]);
/// assert_eq!(cyclic.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 5]);
/// ```
pub fn nodes_in_cycles<N, I>(edges: I) -> BTreeSet<N>
where
    N: Copy + Ord + Hash,
    I: IntoIterator<Item = (N, N)>,
{
    Graph::from_edges(edges).nodes_in_cycles()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(nodes: &[u32]) -> BTreeSet<u32> {
        nodes.iter().copied().collect()
    }

    #[test]
    fn test_triangle_with_tail_and_self_loop() {
        let edges = [(1, 2), (2, 3), (3, 1), (3, 4), (5, 5), (6, 7)];
        assert_eq!(nodes_in_cycles(edges), set(&[1, 2, 3, 5]));
    }

    #[test]
    fn test_cycle_reached_through_entry_node() {
        let edges = [(1, 2), (2, 3), (3, 4), (4, 2)];
        assert_eq!(nodes_in_cycles(edges), set(&[2, 3, 4]));
    }

    #[test]
    fn test_self_loops_only() {
        let edges = [(1, 1), (2, 2), (3, 3)];
        assert_eq!(nodes_in_cycles(edges), set(&[1, 2, 3]));
    }

    #[test]
    fn test_empty_graph() {
        let edges: [(u32, u32); 0] = [];
        assert!(nodes_in_cycles(edges).is_empty());
    }

    #[test]
    fn test_chain_has_no_cycle() {
        let edges = [(1, 2), (2, 3), (3, 4)];
        assert!(nodes_in_cycles(edges).is_empty());
    }

    #[test]
    fn test_two_disjoint_cycles() {
        let edges = [(1, 2), (2, 1), (10, 11), (11, 12), (12, 10), (2, 10)];
        assert_eq!(nodes_in_cycles(edges), set(&[1, 2, 10, 11, 12]));
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let edges: Vec<(u32, u32)> = (0..100_000).map(|i| (i, i + 1)).chain([(100_000, 0)]).collect();
        assert_eq!(nodes_in_cycles(edges).len(), 100_001);
    }

    #[test]
    fn test_node_count() {
        let graph = Graph::from_edges([(1, 2), (2, 1), (2, 3)]);
        assert_eq!(graph.node_count(), 3);
    }
}
