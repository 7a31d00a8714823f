//! Graph algorithms module
//!
//! Shortest-path search and the queries derived from it. Every algorithm is
//! written against `Traversal`, so it runs on a live `GraphStore` or on a
//! `GraphView` snapshot.

pub mod common;
pub mod pathfinding;

pub use common::{GraphView, Traversal};
pub use pathfinding::{
    compute_shortest_path, dijkstra, longest_shortest_path_from, reachable_from,
    shortest_path_cost, shortest_path_costs, shortest_path_data, PathResult, SearchTree,
};
