//! In-memory graph storage implementation
//!
//! Nodes live in a `HashtableMap` keyed by the application's node key. Each
//! node owns its outgoing and incoming edge lists, so adjacency lookups cost
//! one hashtable probe plus a scan of the node's own edges.

use super::edge::Edge;
use super::hashtable::{HashtableMap, StoreConfig, StoreError};
use super::node::Node;
use super::types::{Key, Weight};
use crate::algo::GraphView;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(String),

    #[error("Edge {0} -> {1} not found")]
    EdgeNotFound(String, String),

    #[error("No path from {0} to {1}")]
    PathNotFound(String, String),

    #[error("No nodes reachable from {0}")]
    NoReachableNodes(String),

    #[error("Invalid edge weight {0}: weights must be finite and non-negative")]
    InvalidWeight(f64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type GraphResult<T> = Result<T, GraphError>;

pub(crate) fn describe<K: fmt::Debug>(key: &K) -> String {
    format!("{:?}", key)
}

/// In-memory weighted directed graph
///
/// Not synchronized: mutation goes through `&mut self`, so sharing a store
/// across threads needs an external lock. For concurrent read-only queries,
/// take a `GraphView` snapshot instead.
#[derive(Debug, Clone)]
pub struct GraphStore<K, W> {
    /// Node index: key -> node record with its edge lists
    nodes: HashtableMap<K, Node<K, W>>,

    /// Number of distinct (source, target) edges
    edge_count: usize,
}

impl<K: Key, W: Weight> GraphStore<K, W> {
    /// Create a new empty graph store
    pub fn new() -> Self {
        GraphStore {
            nodes: HashtableMap::new(),
            edge_count: 0,
        }
    }

    /// Create an empty graph store whose node index uses `config`
    pub fn with_config(config: StoreConfig) -> GraphResult<Self> {
        Ok(GraphStore {
            nodes: HashtableMap::with_config(config)?,
            edge_count: 0,
        })
    }

    /// Add a node; returns `false` without changes if it already exists
    pub fn insert_node(&mut self, key: K) -> GraphResult<bool> {
        if self.nodes.contains_key(&key) {
            return Ok(false);
        }
        self.nodes.put(key.clone(), Node::new(key))?;
        Ok(true)
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, key: &K) -> bool {
        let node = match self.nodes.remove(key) {
            Ok(node) => node,
            Err(_) => return false,
        };

        for edge in node.outgoing.iter().filter(|edge| !edge.is_self_loop()) {
            if let Ok(target) = self.nodes.get_mut(&edge.target) {
                target.detach_incoming(key);
            }
        }
        for edge in node.incoming.iter().filter(|edge| !edge.is_self_loop()) {
            if let Ok(source) = self.nodes.get_mut(&edge.source) {
                source.detach_outgoing(key);
            }
        }

        // A self-loop sits in both lists but is one edge
        let removed = node.outgoing.len()
            + node.incoming.iter().filter(|edge| !edge.is_self_loop()).count();
        self.edge_count -= removed;

        debug!("Removed node {:?} and {} incident edges", key, removed);
        true
    }

    /// Insert an edge, or overwrite the weight of the existing edge for this
    /// ordered pair. Returns `true` only if a new edge was created.
    pub fn insert_edge(&mut self, source: K, target: K, weight: W) -> GraphResult<bool> {
        let cost = weight.to_cost();
        if !cost.is_finite() || cost < 0.0 {
            return Err(GraphError::InvalidWeight(cost));
        }
        if !self.nodes.contains_key(&source) {
            return Err(GraphError::NodeNotFound(describe(&source)));
        }
        if !self.nodes.contains_key(&target) {
            return Err(GraphError::NodeNotFound(describe(&target)));
        }

        let existing = self
            .nodes
            .get_mut(&source)?
            .edge_to_mut(&target)
            .map(|edge| edge.weight = weight)
            .is_some();
        if existing {
            if let Some(edge) = self.nodes.get_mut(&target)?.edge_from_mut(&source) {
                edge.weight = weight;
            }
            return Ok(false);
        }

        let edge = Edge::new(source.clone(), target.clone(), weight);
        self.nodes.get_mut(&source)?.outgoing.push(edge.clone());
        self.nodes.get_mut(&target)?.incoming.push(edge);
        self.edge_count += 1;
        Ok(true)
    }

    /// Remove the edge from `source` to `target`; returns whether one existed
    pub fn remove_edge(&mut self, source: &K, target: &K) -> bool {
        let removed = match self.nodes.get_mut(source) {
            Ok(node) => node.detach_outgoing(target),
            Err(_) => false,
        };
        if removed {
            if let Ok(node) = self.nodes.get_mut(target) {
                node.detach_incoming(source);
            }
            self.edge_count -= 1;
        }
        removed
    }

    /// Check if a node exists
    pub fn contains_node(&self, key: &K) -> bool {
        self.nodes.contains_key(key)
    }

    /// Check if an edge from `source` to `target` exists
    pub fn contains_edge(&self, source: &K, target: &K) -> bool {
        self.get_node(source)
            .map_or(false, |node| node.edge_to(target).is_some())
    }

    /// Weight of the edge from `source` to `target`
    pub fn get_edge(&self, source: &K, target: &K) -> GraphResult<W> {
        self.get_node(source)
            .and_then(|node| node.edge_to(target))
            .map(|edge| edge.weight)
            .ok_or_else(|| GraphError::EdgeNotFound(describe(source), describe(target)))
    }

    /// Get a node record by key
    pub fn get_node(&self, key: &K) -> Option<&Node<K, W>> {
        self.nodes.get(key).ok()
    }

    /// The key instance held by the store, borrowed for the store's lifetime
    pub fn stored_key(&self, key: &K) -> Option<&K> {
        self.nodes.get_key_value(key).ok().map(|(stored, _)| stored)
    }

    /// Get all outgoing edges from a node
    pub fn outgoing_edges(&self, key: &K) -> Vec<&Edge<K, W>> {
        self.get_node(key)
            .map(|node| node.outgoing.iter().collect())
            .unwrap_or_default()
    }

    /// Get all incoming edges to a node
    pub fn incoming_edges(&self, key: &K) -> Vec<&Edge<K, W>> {
        self.get_node(key)
            .map(|node| node.incoming.iter().collect())
            .unwrap_or_default()
    }

    /// Keys of every node in the graph, in no particular order
    pub fn all_nodes(&self) -> Vec<K> {
        self.nodes.keys().cloned().collect()
    }

    /// Iterate over node records
    pub fn nodes(&self) -> impl Iterator<Item = &Node<K, W>> + '_ {
        self.nodes.values()
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Bucket count of the node index
    pub fn index_capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Immutable CSR snapshot of the current topology, for concurrent queries
    pub fn snapshot(&self) -> GraphResult<GraphView<K>> {
        GraphView::new(self)
    }

    /// Clear all nodes and edges, keeping the node index capacity
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edge_count = 0;
    }
}

impl<K: Key, W: Weight> Default for GraphStore<K, W> {
    fn default() -> Self {
        Self::new()
    }
}
