//! Weighted precedence graph and single-source shortest-path relaxation.
//!
//! Vertices are keyed by string and created on demand by edge insertion; a
//! vertex may carry a work item payload so the graph can answer "which
//! option is currently installed at this node". Three relaxation algorithms
//! run over the same structure, each with its own precondition:
//!
//! - [`dijkstra`](WeightedGraph::dijkstra): non-negative edge costs,
//!   O(E log V) binary-heap relaxation
//! - [`negative`](WeightedGraph::negative): arbitrary edge costs, queue-based
//!   Bellman-Ford relaxation with negative-cycle detection
//! - [`acyclic`](WeightedGraph::acyclic): DAGs only, Kahn topological
//!   relaxation
//!
//! On inputs satisfying all the relevant preconditions the algorithms
//! produce identical distances; the duration evaluator exploits this by
//! storing negated durations and running [`negative`](WeightedGraph::negative)
//! to find the longest (critical) path.
//!
//! # References
//!
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 24
//! - Weiss (2012), "Data Structures and Algorithm Analysis", Ch. 9

use crate::models::WorkItem;
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::fmt;

/// Distance of a vertex after a relaxation run.
///
/// A vertex the algorithm never reached is reported as
/// [`Unreachable`](Distance::Unreachable), never as a zero-cost path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance {
    /// The vertex was reached with this total cost.
    Finite(f64),
    /// No path from the source reaches the vertex.
    Unreachable,
}

impl Distance {
    /// The cost when reached, `None` when unreachable.
    pub fn finite(self) -> Option<f64> {
        match self {
            Distance::Finite(d) => Some(d),
            Distance::Unreachable => None,
        }
    }
}

/// Failures of graph operations and relaxation preconditions.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The named vertex does not exist in the graph.
    VertexNotFound(String),
    /// Dijkstra relaxation met an edge with a negative cost.
    NegativeEdge {
        /// Source vertex of the offending edge.
        from: String,
        /// Destination vertex of the offending edge.
        to: String,
        /// The negative cost.
        cost: f64,
    },
    /// The relaxation iteration bound was exceeded (negative cycle) or the
    /// topological pass could not order every vertex (cycle).
    CycleDetected,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::VertexNotFound(name) => write!(f, "vertex '{name}' not found"),
            GraphError::NegativeEdge { from, to, cost } => {
                write!(f, "negative edge {from} -> {to} (cost {cost})")
            }
            GraphError::CycleDetected => write!(f, "cycle detected in precedence graph"),
        }
    }
}

impl std::error::Error for GraphError {}

#[derive(Debug, Clone, Copy)]
struct Edge {
    dest: usize,
    cost: f64,
}

#[derive(Debug, Clone)]
struct Vertex<T> {
    name: String,
    item: Option<T>,
    edges: Vec<Edge>,
    // per-run relaxation state
    dist: f64,
    prev: Option<usize>,
    scratch: usize,
    in_queue: bool,
}

impl<T> Vertex<T> {
    fn new(name: String, item: Option<T>) -> Self {
        Self {
            name,
            item,
            edges: Vec::new(),
            dist: f64::INFINITY,
            prev: None,
            scratch: 0,
            in_queue: false,
        }
    }
}

/// Directed weighted graph with string-keyed vertices.
#[derive(Debug, Clone)]
pub struct WeightedGraph<T> {
    vertices: Vec<Vertex<T>>,
    index: HashMap<String, usize>,
}

impl<T> WeightedGraph<T> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// True when the key names an existing vertex.
    pub fn contains_vertex(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Adds a directed edge, creating either endpoint on demand.
    pub fn add_edge(&mut self, from: &str, to: &str, cost: f64) {
        let v = self.vertex_or_insert(from, None);
        let w = self.vertex_or_insert(to, None);
        self.vertices[v].edges.push(Edge { dest: w, cost });
    }

    /// True when a `from -> to` edge already exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        let (Some(&v), Some(&w)) = (self.index.get(from), self.index.get(to)) else {
            return false;
        };
        self.vertices[v].edges.iter().any(|e| e.dest == w)
    }

    fn vertex_or_insert(&mut self, name: &str, item: Option<T>) -> usize {
        if let Some(&idx) = self.index.get(name) {
            if let Some(item) = item {
                self.vertices[idx].item.get_or_insert(item);
            }
            return idx;
        }
        let idx = self.vertices.len();
        self.vertices.push(Vertex::new(name.to_string(), item));
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Resets per-run relaxation state on every vertex.
    fn clear_state(&mut self) {
        for v in &mut self.vertices {
            v.dist = f64::INFINITY;
            v.prev = None;
            v.scratch = 0;
            v.in_queue = false;
        }
    }

    fn require(&self, key: &str) -> Result<usize, GraphError> {
        self.index
            .get(key)
            .copied()
            .ok_or_else(|| GraphError::VertexNotFound(key.to_string()))
    }

    /// Distance of `key` after a relaxation run.
    pub fn distance(&self, key: &str) -> Result<Distance, GraphError> {
        let idx = self.require(key)?;
        let dist = self.vertices[idx].dist;
        if dist.is_infinite() {
            Ok(Distance::Unreachable)
        } else {
            Ok(Distance::Finite(dist))
        }
    }

    /// Vertex names along the relaxed path from the source to `key`,
    /// source first. `None` when the vertex was not reached.
    pub fn path_to(&self, key: &str) -> Result<Option<Vec<String>>, GraphError> {
        let idx = self.require(key)?;
        if self.vertices[idx].dist.is_infinite() {
            return Ok(None);
        }
        let mut path = Vec::new();
        let mut cursor = Some(idx);
        while let Some(i) = cursor {
            path.push(self.vertices[i].name.clone());
            cursor = self.vertices[i].prev;
        }
        path.reverse();
        Ok(Some(path))
    }

    /// Single-source relaxation for graphs that may carry negative edge
    /// costs (queue-based Bellman-Ford).
    ///
    /// Fails with [`GraphError::CycleDetected`] once any vertex has been
    /// dequeued more than `2 × |V|` times, which can only happen when a
    /// negative cycle keeps improving distances indefinitely.
    pub fn negative(&mut self, start: &str) -> Result<(), GraphError> {
        let start = self.require(start)?;
        self.clear_state();
        let bound = 2 * self.vertices.len();

        let mut queue = VecDeque::new();
        self.vertices[start].dist = 0.0;
        self.vertices[start].in_queue = true;
        queue.push_back(start);

        while let Some(v) = queue.pop_front() {
            self.vertices[v].in_queue = false;
            self.vertices[v].scratch += 1;
            if self.vertices[v].scratch > bound {
                return Err(GraphError::CycleDetected);
            }

            for i in 0..self.vertices[v].edges.len() {
                let Edge { dest, cost } = self.vertices[v].edges[i];
                let candidate = self.vertices[v].dist + cost;
                if candidate < self.vertices[dest].dist {
                    self.vertices[dest].dist = candidate;
                    self.vertices[dest].prev = Some(v);
                    if !self.vertices[dest].in_queue {
                        self.vertices[dest].in_queue = true;
                        queue.push_back(dest);
                    }
                }
            }
        }
        Ok(())
    }

    /// Single-source relaxation for graphs with non-negative edge costs
    /// (binary-heap Dijkstra).
    ///
    /// Fails with [`GraphError::NegativeEdge`] the moment a negative cost is
    /// encountered; the precondition is checked, not assumed.
    pub fn dijkstra(&mut self, start: &str) -> Result<(), GraphError> {
        let start = self.require(start)?;
        self.clear_state();

        let mut heap = BinaryHeap::new();
        self.vertices[start].dist = 0.0;
        heap.push(HeapEntry {
            cost: 0.0,
            vertex: start,
        });

        let mut settled = 0;
        while let Some(HeapEntry { vertex: v, .. }) = heap.pop() {
            if self.vertices[v].scratch != 0 {
                continue; // stale heap entry
            }
            self.vertices[v].scratch = 1;
            settled += 1;
            if settled == self.vertices.len() {
                break;
            }

            for i in 0..self.vertices[v].edges.len() {
                let Edge { dest, cost } = self.vertices[v].edges[i];
                if cost < 0.0 {
                    return Err(GraphError::NegativeEdge {
                        from: self.vertices[v].name.clone(),
                        to: self.vertices[dest].name.clone(),
                        cost,
                    });
                }
                let candidate = self.vertices[v].dist + cost;
                if candidate < self.vertices[dest].dist {
                    self.vertices[dest].dist = candidate;
                    self.vertices[dest].prev = Some(v);
                    heap.push(HeapEntry {
                        cost: candidate,
                        vertex: dest,
                    });
                }
            }
        }
        Ok(())
    }

    /// Single-source relaxation for acyclic graphs (Kahn's algorithm).
    ///
    /// Processes vertices in topological order; fails with
    /// [`GraphError::CycleDetected`] when a cycle prevents ordering every
    /// vertex.
    pub fn acyclic(&mut self, start: &str) -> Result<(), GraphError> {
        let start = self.require(start)?;
        self.clear_state();
        self.vertices[start].dist = 0.0;

        // in-degrees into the scratch counter
        for v in 0..self.vertices.len() {
            for i in 0..self.vertices[v].edges.len() {
                let dest = self.vertices[v].edges[i].dest;
                self.vertices[dest].scratch += 1;
            }
        }

        let mut queue: VecDeque<usize> = (0..self.vertices.len())
            .filter(|&v| self.vertices[v].scratch == 0)
            .collect();

        let mut processed = 0;
        while let Some(v) = queue.pop_front() {
            processed += 1;
            for i in 0..self.vertices[v].edges.len() {
                let Edge { dest, cost } = self.vertices[v].edges[i];
                self.vertices[dest].scratch -= 1;
                if self.vertices[dest].scratch == 0 {
                    queue.push_back(dest);
                }
                if self.vertices[v].dist.is_infinite() {
                    continue;
                }
                let candidate = self.vertices[v].dist + cost;
                if candidate < self.vertices[dest].dist {
                    self.vertices[dest].dist = candidate;
                    self.vertices[dest].prev = Some(v);
                }
            }
        }

        if processed != self.vertices.len() {
            return Err(GraphError::CycleDetected);
        }
        Ok(())
    }
}

impl<T: WorkItem> WeightedGraph<T> {
    /// Adds a directed edge between two items, keyed by [`WorkItem::key`],
    /// storing the items as vertex payloads.
    pub fn add_item_edge(&mut self, from: &T, to: &T, cost: f64) {
        let v = self.vertex_or_insert(from.key(), Some(from.clone()));
        let w = self.vertex_or_insert(to.key(), Some(to.clone()));
        self.vertices[v].edges.push(Edge { dest: w, cost });
    }

    /// The item currently installed at a vertex, if any.
    pub fn item(&self, key: &str) -> Option<&T> {
        let idx = *self.index.get(key)?;
        self.vertices[idx].item.as_ref()
    }

    /// Replaces the item at `key` with an alternative option and rewrites
    /// every outgoing edge cost to the new item's negated duration, keeping
    /// the stored-cost sign convention of the duration evaluator intact.
    pub fn replace_item(&mut self, key: &str, item: T) -> Result<(), GraphError> {
        let idx = self.require(key)?;
        let cost = -item.duration().abs();
        self.vertices[idx].item = Some(item);
        for edge in &mut self.vertices[idx].edges {
            edge.cost = cost;
        }
        Ok(())
    }
}

/// Min-heap entry for Dijkstra relaxation; ordering is reversed so the
/// smallest cost pops first from `std`'s max-heap.
#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    cost: f64,
    vertex: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.cost.total_cmp(&self.cost)
    }
}
