//! Core graph implementation
//!
//! This module implements the weighted directed graph with:
//! - A hand-built separate-chaining hashtable as the node index
//! - Nodes keyed by any `Key` type, each owning its edge lists
//! - Directed edges with non-negative numeric weights, one per ordered pair

pub mod edge;
pub mod hashtable;
pub mod node;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Edge;
pub use hashtable::{HashtableMap, StoreConfig, StoreError, StoreResult};
pub use node::Node;
pub use store::{GraphError, GraphResult, GraphStore};
pub use types::{Key, Weight};
