//! Node implementation for the weighted graph

use super::edge::Edge;
use super::types::{Key, Weight};

/// A node in the graph
///
/// Nodes hold:
/// - The key identifying them
/// - Outgoing edges, in insertion order
/// - Incoming edges, in insertion order
#[derive(Debug, Clone)]
pub struct Node<K, W> {
    pub key: K,
    pub outgoing: Vec<Edge<K, W>>,
    pub incoming: Vec<Edge<K, W>>,
}

impl<K: Key, W: Weight> Node<K, W> {
    pub fn new(key: K) -> Self {
        Node {
            key,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Outgoing edge to `target`, if any
    pub fn edge_to(&self, target: &K) -> Option<&Edge<K, W>> {
        self.outgoing.iter().find(|edge| edge.connects(&self.key, target))
    }

    pub(crate) fn edge_to_mut(&mut self, target: &K) -> Option<&mut Edge<K, W>> {
        self.outgoing.iter_mut().find(|edge| edge.target == *target)
    }

    pub(crate) fn edge_from_mut(&mut self, source: &K) -> Option<&mut Edge<K, W>> {
        self.incoming.iter_mut().find(|edge| edge.source == *source)
    }

    /// Drop the outgoing edge to `target`; returns whether one existed
    pub(crate) fn detach_outgoing(&mut self, target: &K) -> bool {
        let before = self.outgoing.len();
        self.outgoing.retain(|edge| edge.target != *target);
        self.outgoing.len() != before
    }

    /// Drop the incoming edge from `source`; returns whether one existed
    pub(crate) fn detach_incoming(&mut self, source: &K) -> bool {
        let before = self.incoming.len();
        self.incoming.retain(|edge| edge.source != *source);
        self.incoming.len() != before
    }

    pub fn out_degree(&self) -> usize {
        self.outgoing.len()
    }

    pub fn in_degree(&self) -> usize {
        self.incoming.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node: Node<&str, f64> = Node::new("Memorial Union");
        assert_eq!(node.key, "Memorial Union");
        assert_eq!(node.out_degree(), 0);
        assert_eq!(node.in_degree(), 0);
    }

    #[test]
    fn test_edge_lookup_and_detach() {
        let mut node = Node::new("A");
        node.outgoing.push(Edge::new("A", "B", 1.0));
        node.outgoing.push(Edge::new("A", "C", 2.0));

        assert_eq!(node.edge_to(&"C").map(|e| e.weight), Some(2.0));
        assert!(node.edge_to(&"D").is_none());

        assert!(node.detach_outgoing(&"B"));
        assert!(!node.detach_outgoing(&"B"));
        assert_eq!(node.out_degree(), 1);
    }

    #[test]
    fn test_detach_incoming() {
        let mut node = Node::new(2u32);
        node.incoming.push(Edge::new(1u32, 2u32, 5u32));

        node.edge_from_mut(&1).unwrap().weight = 7;
        assert_eq!(node.incoming[0].weight, 7);

        assert!(node.detach_incoming(&1));
        assert_eq!(node.in_degree(), 0);
    }
}
