//! Edge implementation for the weighted graph
//!
//! Edges are directed and carry a single numeric weight. At most one edge
//! exists per ordered (source, target) pair.

use super::types::{Key, Weight};

/// A directed, weighted edge
///
/// The same edge is recorded twice: in the source node's outgoing list and in
/// the target node's incoming list. Both copies are kept in step by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<K, W> {
    /// Source node (edge goes FROM this node)
    pub source: K,

    /// Target node (edge goes TO this node)
    pub target: K,

    /// Traversal cost, never negative
    pub weight: W,
}

impl<K: Key, W: Weight> Edge<K, W> {
    /// Create a new directed edge
    pub fn new(source: K, target: K, weight: W) -> Self {
        Edge {
            source,
            target,
            weight,
        }
    }

    /// Weight read as a path cost
    pub fn cost(&self) -> f64 {
        self.weight.to_cost()
    }

    /// Check if this edge connects `source` to `target`, in that direction
    pub fn connects(&self, source: &K, target: &K) -> bool {
        self.source == *source && self.target == *target
    }

    /// Check if this is a self-loop (source == target)
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
