//! Pathfinding algorithms
//!
//! Dijkstra's shortest path over non-negative edge costs, the queries derived
//! from it, and breadth-first reachability.

use super::common::Traversal;
use crate::graph::store::describe;
use crate::graph::{GraphError, GraphResult, HashtableMap};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use tracing::trace;

/// Result of a shortest-path search
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult<K> {
    pub source: K,
    pub target: K,
    /// Node keys from `source` to `target`, both included
    pub path: Vec<K>,
    /// Cost of each hop; one entry fewer than `path`
    pub edge_costs: Vec<f64>,
    /// Sum of `edge_costs`
    pub cost: f64,
}

impl<K> PathResult<K> {
    /// Number of edges along the path
    pub fn hops(&self) -> usize {
        self.edge_costs.len()
    }
}

/// One path explored by the search: it ends at `node`, costs `cost` in total,
/// and continues from the search node at index `predecessor` in the arena.
#[derive(Debug)]
struct SearchNode<'g, K> {
    node: &'g K,
    cost: f64,
    /// Cost of the final edge, 0 at the root
    step: f64,
    predecessor: Option<usize>,
}

/// Priority queue entry pointing into the search arena
#[derive(Copy, Clone)]
struct State {
    cost: f64,
    index: usize,
}

// BinaryHeap is a max-heap, so order by cost reversed for min-heap behavior
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

/// The search tree left behind by one Dijkstra run
///
/// Search nodes live in an arena and refer to their predecessor by index, so
/// the whole tree is dropped at once with no dangling back references.
#[derive(Debug)]
pub struct SearchTree<'g, K> {
    arena: Vec<SearchNode<'g, K>>,
    end: usize,
}

impl<'g, K: Clone> SearchTree<'g, K> {
    /// Total cost of the shortest path
    pub fn cost(&self) -> f64 {
        self.arena[self.end].cost
    }

    /// Number of search nodes created during the search
    pub fn explored(&self) -> usize {
        self.arena.len()
    }

    fn chain(&self) -> impl Iterator<Item = &SearchNode<'g, K>> + '_ {
        let mut next = Some(self.end);
        std::iter::from_fn(move || {
            let current = &self.arena[next?];
            next = current.predecessor;
            Some(current)
        })
    }

    /// Node keys from start to end
    pub fn path(&self) -> Vec<K> {
        let mut path: Vec<K> = self.chain().map(|search| search.node.clone()).collect();
        path.reverse();
        path
    }

    /// Cost of each edge from start to end
    pub fn edge_costs(&self) -> Vec<f64> {
        let mut costs: Vec<f64> = self
            .chain()
            .filter(|search| search.predecessor.is_some())
            .map(|search| search.step)
            .collect();
        costs.reverse();
        costs
    }

    pub fn into_result(self) -> PathResult<K> {
        let path = self.path();
        PathResult {
            source: path[0].clone(),
            target: self.arena[self.end].node.clone(),
            edge_costs: self.edge_costs(),
            cost: self.cost(),
            path,
        }
    }
}

/// Run Dijkstra's search from `start` until `end` is popped from the queue.
///
/// Fails with `NodeNotFound` if `start` is not in the graph and with
/// `PathNotFound` if the queue drains without reaching `end`, which also
/// covers an `end` that does not exist.
pub fn compute_shortest_path<'g, G: Traversal>(
    graph: &'g G,
    start: &G::Key,
    end: &G::Key,
) -> GraphResult<SearchTree<'g, G::Key>> {
    let root = graph
        .lookup(start)
        .ok_or_else(|| GraphError::NodeNotFound(describe(start)))?;

    let mut arena = vec![SearchNode {
        node: root,
        cost: 0.0,
        step: 0.0,
        predecessor: None,
    }];
    let mut heap = BinaryHeap::new();
    let mut visited: HashtableMap<G::Key, ()> = HashtableMap::new();

    heap.push(State { cost: 0.0, index: 0 });

    while let Some(State { cost, index }) = heap.pop() {
        let node = arena[index].node;
        if node == end {
            trace!(
                "Shortest path {:?} -> {:?} found: cost {}, {} search nodes",
                start,
                end,
                cost,
                arena.len()
            );
            return Ok(SearchTree { arena, end: index });
        }

        // Stale entry: a cheaper path to this node was already finalized
        if visited.contains_key(node) {
            continue;
        }
        visited.put(node.clone(), ())?;

        for (successor, weight) in graph.successors(node) {
            let next_cost = cost + weight;
            arena.push(SearchNode {
                node: successor,
                cost: next_cost,
                step: weight,
                predecessor: Some(index),
            });
            heap.push(State {
                cost: next_cost,
                index: arena.len() - 1,
            });
        }
    }

    trace!(
        "No path {:?} -> {:?} after visiting {} nodes",
        start,
        end,
        visited.len()
    );
    Err(GraphError::PathNotFound(describe(start), describe(end)))
}

/// Dijkstra's Algorithm (Weighted Shortest Path)
pub fn dijkstra<G: Traversal>(
    graph: &G,
    start: &G::Key,
    end: &G::Key,
) -> GraphResult<PathResult<G::Key>> {
    compute_shortest_path(graph, start, end).map(SearchTree::into_result)
}

/// Node keys along the shortest path, start first. A node's path to itself
/// is just that node.
pub fn shortest_path_data<G: Traversal>(
    graph: &G,
    start: &G::Key,
    end: &G::Key,
) -> GraphResult<Vec<G::Key>> {
    compute_shortest_path(graph, start, end).map(|tree| tree.path())
}

/// Total cost of the shortest path
pub fn shortest_path_cost<G: Traversal>(
    graph: &G,
    start: &G::Key,
    end: &G::Key,
) -> GraphResult<f64> {
    compute_shortest_path(graph, start, end).map(|tree| tree.cost())
}

/// Cost of each edge along the shortest path, in travel order
pub fn shortest_path_costs<G: Traversal>(
    graph: &G,
    start: &G::Key,
    end: &G::Key,
) -> GraphResult<Vec<f64>> {
    compute_shortest_path(graph, start, end).map(|tree| tree.edge_costs())
}

/// Among the shortest paths from `start` to every other reachable node, the
/// one visiting the most nodes.
///
/// Ties keep the first path found in the graph's node enumeration order.
pub fn longest_shortest_path_from<G: Traversal>(
    graph: &G,
    start: &G::Key,
) -> GraphResult<Vec<G::Key>> {
    if !graph.contains(start) {
        return Err(GraphError::NodeNotFound(describe(start)));
    }

    let mut longest: Option<Vec<G::Key>> = None;
    for end in graph.node_keys() {
        if end == *start {
            continue;
        }
        let path = match shortest_path_data(graph, start, &end) {
            Ok(path) => path,
            Err(GraphError::PathNotFound(..)) => continue,
            Err(e) => return Err(e),
        };
        if longest.as_ref().map_or(true, |best| path.len() > best.len()) {
            longest = Some(path);
        }
    }

    longest.ok_or_else(|| GraphError::NoReachableNodes(describe(start)))
}

/// Every node reachable from `start`, excluding `start`, in breadth-first order
pub fn reachable_from<G: Traversal>(graph: &G, start: &G::Key) -> GraphResult<Vec<G::Key>> {
    let root = graph
        .lookup(start)
        .ok_or_else(|| GraphError::NodeNotFound(describe(start)))?;

    let mut queue = VecDeque::new();
    let mut visited: HashtableMap<G::Key, ()> = HashtableMap::new();
    let mut reached = Vec::new();

    visited.put(root.clone(), ())?;
    queue.push_back(root);

    while let Some(current) = queue.pop_front() {
        for (next, _) in graph.successors(current) {
            if !visited.contains_key(next) {
                visited.put(next.clone(), ())?;
                reached.push(next.clone());
                queue.push_back(next);
            }
        }
    }

    Ok(reached)
}
