//! Shared utilities for graph algorithms
//!
//! `Traversal` is the one adjacency primitive the search engine needs.
//! `GraphView` is a read-only, dense snapshot of a store that implements it.

use crate::graph::{GraphResult, GraphStore, HashtableMap, Key, Weight};

/// Read access to a graph's nodes and outgoing edges
pub trait Traversal {
    type Key: Key;

    /// The graph's own instance of `key`, or `None` if there is no such node
    fn lookup<'a>(&'a self, key: &Self::Key) -> Option<&'a Self::Key>;

    /// Every node key, in the graph's enumeration order
    fn node_keys(&self) -> Vec<Self::Key>;

    /// Outgoing edges of `key` as (successor, cost); empty for unknown nodes
    fn successors<'a>(&'a self, key: &Self::Key) -> impl Iterator<Item = (&'a Self::Key, f64)>;

    fn contains(&self, key: &Self::Key) -> bool {
        self.lookup(key).is_some()
    }
}

impl<K: Key, W: Weight> Traversal for GraphStore<K, W> {
    type Key = K;

    fn lookup<'a>(&'a self, key: &K) -> Option<&'a K> {
        self.stored_key(key)
    }

    fn node_keys(&self) -> Vec<K> {
        self.all_nodes()
    }

    fn successors<'a>(&'a self, key: &K) -> impl Iterator<Item = (&'a K, f64)> {
        self.get_node(key)
            .into_iter()
            .flat_map(|node| node.outgoing.iter().map(|edge| (&edge.target, edge.cost())))
    }
}

/// A dense, integer-indexed snapshot of the graph topology in Compressed
/// Sparse Row (CSR) format.
///
/// The view owns copies of the keys and never changes after construction, so
/// it can be shared across threads for concurrent shortest-path queries while
/// the source store stays untouched or is mutated elsewhere. Its arrays are
/// only reachable through the accessors:
///
/// ```compile_fail
/// use routegraph::GraphStore;
///
/// let store: GraphStore<u32, f64> = GraphStore::new();
/// let mut view = store.snapshot().unwrap();
/// view.out_targets.push(7);
/// ```
#[derive(Debug, Clone)]
pub struct GraphView<K> {
    /// Number of nodes
    pub(crate) node_count: usize,
    /// Mapping from dense index (0..N) back to the node key
    pub(crate) index_to_node: Vec<K>,
    /// Mapping from node key to dense index
    pub(crate) node_to_index: HashtableMap<K, usize>,

    /// Offsets into `out_targets`. Size = node_count + 1
    pub(crate) out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub(crate) out_targets: Vec<usize>,
    /// Edge costs, aligned with `out_targets`
    pub(crate) weights: Vec<f64>,

    /// Offsets into `in_sources`. Size = node_count + 1
    pub(crate) in_offsets: Vec<usize>,
    /// Contiguous array of source node indices
    pub(crate) in_sources: Vec<usize>,
}

impl<K: Key> GraphView<K> {
    /// Snapshot the current topology of `store`
    pub fn new<W: Weight>(store: &GraphStore<K, W>) -> GraphResult<Self> {
        let index_to_node = store.all_nodes();
        let node_count = index_to_node.len();

        // Sized so the index never resizes while it is filled
        let mut node_to_index = HashtableMap::with_capacity(node_count * 5 / 4 + 2);
        for (idx, key) in index_to_node.iter().enumerate() {
            node_to_index.put(key.clone(), idx)?;
        }

        let mut out_offsets = Vec::with_capacity(node_count + 1);
        let mut out_targets = Vec::with_capacity(store.edge_count());
        let mut weights = Vec::with_capacity(store.edge_count());
        out_offsets.push(0);
        for key in &index_to_node {
            for edge in store.outgoing_edges(key) {
                out_targets.push(*node_to_index.get(&edge.target)?);
                weights.push(edge.cost());
            }
            out_offsets.push(out_targets.len());
        }

        let mut in_offsets = Vec::with_capacity(node_count + 1);
        let mut in_sources = Vec::with_capacity(store.edge_count());
        in_offsets.push(0);
        for key in &index_to_node {
            for edge in store.incoming_edges(key) {
                in_sources.push(*node_to_index.get(&edge.source)?);
            }
            in_offsets.push(in_sources.len());
        }

        Ok(GraphView {
            node_count,
            index_to_node,
            node_to_index,
            out_offsets,
            out_targets,
            weights,
            in_offsets,
            in_sources,
        })
    }

    /// Number of nodes captured by the snapshot
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Key stored at a dense index
    pub fn key_at(&self, idx: usize) -> Option<&K> {
        self.index_to_node.get(idx)
    }

    /// Dense index of a node
    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.node_to_index.get(key).ok().copied()
    }

    /// Number of edges captured by the snapshot
    pub fn edge_count(&self) -> usize {
        self.out_targets.len()
    }

    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get the in-degree of a node (by index)
    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successor_indices(&self, idx: usize) -> &[usize] {
        &self.out_targets[self.out_offsets[idx]..self.out_offsets[idx + 1]]
    }

    /// Get incoming neighbors (predecessors) of a node
    pub fn predecessor_indices(&self, idx: usize) -> &[usize] {
        &self.in_sources[self.in_offsets[idx]..self.in_offsets[idx + 1]]
    }

    /// Get costs of the outgoing edges of a node
    pub fn edge_weights(&self, idx: usize) -> &[f64] {
        &self.weights[self.out_offsets[idx]..self.out_offsets[idx + 1]]
    }
}

impl<K: Key> Traversal for GraphView<K> {
    type Key = K;

    fn lookup<'a>(&'a self, key: &K) -> Option<&'a K> {
        self.node_to_index
            .get(key)
            .ok()
            .map(|&idx| &self.index_to_node[idx])
    }

    fn node_keys(&self) -> Vec<K> {
        self.index_to_node.clone()
    }

    fn successors<'a>(&'a self, key: &K) -> impl Iterator<Item = (&'a K, f64)> {
        self.index_of(key).into_iter().flat_map(move |idx| {
            self.successor_indices(idx)
                .iter()
                .zip(self.edge_weights(idx))
                .map(move |(&target, &cost)| (&self.index_to_node[target], cost))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> GraphStore<&'static str, u32> {
        let mut store = GraphStore::new();
        for key in ["n1", "n2", "n3"] {
            store.insert_node(key).unwrap();
        }
        // n1 -> n2 -> n3
        store.insert_edge("n1", "n2", 3).unwrap();
        store.insert_edge("n2", "n3", 5).unwrap();
        store
    }

    #[test]
    fn test_graph_view_projection() {
        let store = chain();
        let view = store.snapshot().unwrap();

        assert_eq!(view.node_count(), 3);
        assert_eq!(view.edge_count(), 2);

        let n1 = view.index_of(&"n1").unwrap();
        let n2 = view.index_of(&"n2").unwrap();
        let n3 = view.index_of(&"n3").unwrap();

        assert_eq!(view.successor_indices(n1), &[n2]);
        assert_eq!(view.successor_indices(n2), &[n3]);
        assert_eq!(view.edge_weights(n2), &[5.0]);
        assert_eq!(view.predecessor_indices(n3), &[n2]);

        assert_eq!(view.out_degree(n1), 1);
        assert_eq!(view.in_degree(n1), 0);
        assert_eq!(view.in_degree(n2), 1);
        assert_eq!(view.out_degree(n3), 0);
        assert_eq!(view.key_at(n3), Some(&"n3"));
        assert_eq!(view.key_at(3), None);
    }

    #[test]
    fn test_store_and_view_agree() {
        let store = chain();
        let view = GraphView::new(&store).unwrap();

        let from_store: Vec<_> = store.successors(&"n1").map(|(k, c)| (*k, c)).collect();
        let from_view: Vec<_> = view.successors(&"n1").map(|(k, c)| (*k, c)).collect();
        assert_eq!(from_store, vec![("n2", 3.0)]);
        assert_eq!(from_view, from_store);

        assert!(Traversal::contains(&view, &"n3"));
        assert!(!Traversal::contains(&store, &"n4"));
        assert_eq!(store.successors(&"n4").count(), 0);
        assert_eq!(view.successors(&"n4").count(), 0);
    }

    #[test]
    fn test_view_is_a_snapshot() {
        let mut store = chain();
        let view = GraphView::new(&store).unwrap();

        store.remove_node(&"n2");
        assert_eq!(view.node_count(), 3);
        assert_eq!(view.edge_count(), 2);
        assert_eq!(view.lookup(&"n2"), Some(&"n2"));
    }
}
