use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed edge at position {0}: expected a [from, to] pair, got {1} elements")]
    MalformedEdge(usize, usize),
    #[error("dependency cycle through module \"{0}\"")]
    Cycle(String),
}

/// Directed graph over module identifiers. An edge (a, b) means "b runs
/// on output reachable through a", so a must be decided before b.
///
/// Node and adjacency order is insertion order, which keeps traversals
/// and edge listings deterministic across runs.
#[derive(Debug, Clone, Default)]
pub struct DirectedGraph {
    nodes: Vec<String>,
    succs: FxHashMap<String, Vec<String>>,
}

impl DirectedGraph {
    /// Build a graph from a raw edge list. Nodes are created implicitly;
    /// repeated edges are collapsed.
    pub fn from_edges(edges: &[Vec<String>]) -> Result<Self, Error> {
        let mut graph = Self::default();
        for (i, edge) in edges.iter().enumerate() {
            match edge.as_slice() {
                [from, to] => graph.add_edge(from, to),
                other => return Err(Error::MalformedEdge(i, other.len())),
            }
        }
        Ok(graph)
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.add_node(from);
        self.add_node(to);
        let succs = self.succs.get_mut(from).unwrap();
        if !succs.iter().any(|s| s == to) {
            succs.push(to.to_owned());
        }
    }

    pub fn add_node(&mut self, node: &str) {
        if !self.succs.contains_key(node) {
            self.nodes.push(node.to_owned());
            self.succs.insert(node.to_owned(), Vec::new());
        }
    }

    /// Remove a node and every edge touching it. Removing an absent node
    /// is a no-op.
    pub fn remove_node(&mut self, node: &str) {
        if self.succs.remove(node).is_none() {
            return;
        }
        self.nodes.retain(|n| n != node);
        for succs in self.succs.values_mut() {
            succs.retain(|s| s != node);
        }
    }

    pub fn contains(&self, node: &str) -> bool {
        self.succs.contains_key(node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    pub fn successors(&self, node: &str) -> &[String] {
        self.succs.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn predecessors(&self, node: &str) -> Vec<&str> {
        self.nodes
            .iter()
            .map(String::as_str)
            .filter(|n| self.successors(n).iter().any(|s| s == node))
            .collect()
    }

    /// All edges, grouped by source node in insertion order.
    pub fn edges(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for n in &self.nodes {
            for s in self.successors(n) {
                out.push((n.clone(), s.clone()));
            }
        }
        out
    }

    /// Depth-first preorder of the nodes reachable from `from`,
    /// including `from` itself. Empty if `from` is not a node.
    pub fn dfs_preorder(&self, from: &str) -> Vec<String> {
        let mut out = Vec::new();
        if !self.contains(from) {
            return out;
        }
        let mut seen = FxHashSet::default();
        let mut stack = vec![from];
        while let Some(n) = stack.pop() {
            if !seen.insert(n) {
                continue;
            }
            out.push(n.to_owned());
            // reversed so the first successor is visited first
            for s in self.successors(n).iter().rev() {
                if !seen.contains(s.as_str()) {
                    stack.push(s.as_str());
                }
            }
        }
        out
    }

    /// Breadth-first order of the nodes reachable from `from`,
    /// including `from` itself.
    pub fn bfs_nodes(&self, from: &str) -> Vec<String> {
        let mut out = Vec::new();
        if !self.contains(from) {
            return out;
        }
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::new();
        seen.insert(from);
        queue.push_back(from);
        while let Some(n) = queue.pop_front() {
            out.push(n.to_owned());
            for s in self.successors(n) {
                if seen.insert(s.as_str()) {
                    queue.push_back(s.as_str());
                }
            }
        }
        out
    }

    /// Every node reachable from `node`, excluding `node` itself.
    pub fn descendants(&self, node: &str) -> Vec<String> {
        let mut all = self.bfs_nodes(node);
        if !all.is_empty() {
            all.remove(0);
        }
        all
    }

    /// Fail with the module closing the cycle if the graph is not a DAG.
    /// Traversals assume acyclicity, so this runs before every resolution.
    pub fn check_acyclic(&self) -> Result<(), Error> {
        let mut done = FxHashSet::default();
        let mut in_path = FxHashSet::default();
        for n in &self.nodes {
            if !done.contains(n.as_str()) {
                self.visit(n, &mut done, &mut in_path)?;
            }
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        node: &'a str,
        done: &mut FxHashSet<&'a str>,
        in_path: &mut FxHashSet<&'a str>,
    ) -> Result<(), Error> {
        if !in_path.insert(node) {
            return Err(Error::Cycle(node.to_owned()));
        }
        for s in self.successors(node) {
            if !done.contains(s.as_str()) {
                self.visit(s, done, in_path)?;
            }
        }
        in_path.remove(node);
        done.insert(node);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn edge(from: &str, to: &str) -> Vec<String> {
        vec![from.to_owned(), to.to_owned()]
    }

    fn diamond() -> DirectedGraph {
        // a -> b -> d, a -> c -> d
        DirectedGraph::from_edges(&[
            edge("a", "b"),
            edge("a", "c"),
            edge("b", "d"),
            edge("c", "d"),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_edges_malformed() {
        let err = DirectedGraph::from_edges(&[edge("a", "b"), vec!["x".to_owned()]]);
        assert!(matches!(err, Err(Error::MalformedEdge(1, 1))));
        let err = DirectedGraph::from_edges(&[vec![]]);
        assert!(matches!(err, Err(Error::MalformedEdge(0, 0))));
    }

    #[test]
    fn test_add_edge_idempotent() {
        let g = DirectedGraph::from_edges(&[edge("a", "b"), edge("a", "b")]).unwrap();
        assert_eq!(g.edges(), vec![("a".to_owned(), "b".to_owned())]);
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn test_dfs_preorder() {
        let g = diamond();
        assert_eq!(g.dfs_preorder("a"), vec!["a", "b", "d", "c"]);
        assert_eq!(g.dfs_preorder("b"), vec!["b", "d"]);
        assert!(g.dfs_preorder("nope").is_empty());
    }

    #[test]
    fn test_bfs_nodes() {
        let g = diamond();
        assert_eq!(g.bfs_nodes("a"), vec!["a", "b", "c", "d"]);
        assert_eq!(g.bfs_nodes("c"), vec!["c", "d"]);
    }

    #[test]
    fn test_descendants() {
        let g = diamond();
        assert_eq!(g.descendants("a"), vec!["b", "c", "d"]);
        assert_eq!(g.descendants("d"), Vec::<String>::new());
    }

    #[test]
    fn test_predecessors() {
        let g = diamond();
        assert_eq!(g.predecessors("d"), vec!["b", "c"]);
        assert!(g.predecessors("a").is_empty());
    }

    #[test]
    fn test_remove_node() {
        let mut g = diamond();
        g.remove_node("b");
        assert!(!g.contains("b"));
        assert_eq!(g.bfs_nodes("a"), vec!["a", "c", "d"]);
        assert_eq!(g.predecessors("d"), vec!["c"]);
        // absent node: no-op
        g.remove_node("b");
        assert_eq!(g.node_count(), 3);
    }

    #[test]
    fn test_restriction_idempotent() {
        // restricting to the set reachable from "b" twice changes
        // nothing the second time
        let mut g = diamond();
        for round in 0..2 {
            let reachable = g.dfs_preorder("b");
            let doomed: Vec<String> = g
                .nodes()
                .filter(|n| !reachable.contains(&n.to_string()))
                .map(str::to_owned)
                .collect();
            for n in &doomed {
                g.remove_node(n);
            }
            assert_eq!(g.bfs_nodes("b"), vec!["b", "d"], "round {round}");
            assert_eq!(g.edges(), vec![("b".to_owned(), "d".to_owned())]);
        }
    }

    #[test]
    fn test_check_acyclic() {
        assert!(diamond().check_acyclic().is_ok());
        let cyclic =
            DirectedGraph::from_edges(&[edge("a", "b"), edge("b", "c"), edge("c", "a")]).unwrap();
        assert!(matches!(cyclic.check_acyclic(), Err(Error::Cycle(_))));
    }
}
