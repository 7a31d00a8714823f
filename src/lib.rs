//! Routegraph
//!
//! An in-memory weighted directed graph with Dijkstra shortest-path queries.
//!
//! # Architecture
//!
//! - `graph::hashtable`: a separate-chaining hashtable that doubles at a 0.8
//!   load factor; it is the graph's node index
//! - `graph::store`: node and edge mutation, adjacency lookups
//! - `algo::pathfinding`: Dijkstra search with an arena-backed search tree, plus
//!   path, cost, per-edge cost, and longest-shortest-path queries
//! - `algo::common`: the `Traversal` seam and the read-only `GraphView` snapshot
//!
//! The store is single-writer and has no internal locking. Parsing graph
//! descriptions and rendering results belong to the calling application.
//!
//! ## Example Usage
//!
//! ```rust
//! use routegraph::algo::{shortest_path_cost, shortest_path_data};
//! use routegraph::GraphStore;
//!
//! let mut store: GraphStore<&str, f64> = GraphStore::new();
//! for node in ["A", "B", "C"] {
//!     store.insert_node(node).unwrap();
//! }
//! store.insert_edge("A", "B", 4.0).unwrap();
//! store.insert_edge("A", "C", 2.0).unwrap();
//! store.insert_edge("C", "B", 1.0).unwrap();
//!
//! assert_eq!(shortest_path_data(&store, &"A", &"B").unwrap(), vec!["A", "C", "B"]);
//! assert_eq!(shortest_path_cost(&store, &"A", &"B").unwrap(), 3.0);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod graph;

// Re-export main types for convenience
pub use graph::{
    Edge, GraphError, GraphResult, GraphStore, HashtableMap, Key, Node, StoreConfig, StoreError,
    StoreResult, Weight,
};

pub use algo::{GraphView, PathResult, Traversal};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
