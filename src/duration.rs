//! Critical-path duration evaluation.
//!
//! [`DurationEvaluator`] turns a set of chosen work items plus precedence
//! triples into a [`WeightedGraph`] anchored at the virtual
//! [`START`]/[`END`] sentinels, then computes the project's total duration
//! as the longest START→END path. Longest-path search is done by storing
//! every edge cost as the *negated* duration of its source item and running
//! the negative-weight relaxation; the duration is the absolute value of
//! the resulting END distance.
//!
//! Precedence data is not validated for acyclicity up front — a cycle in
//! the triples surfaces as [`DurationError::Graph`] wrapping
//! [`GraphError::CycleDetected`](crate::graph::GraphError::CycleDetected)
//! during relaxation.

use crate::graph::{Distance, GraphError, WeightedGraph};
use crate::models::{Precedence, WorkItem, END, START};
use std::collections::BTreeMap;
use std::fmt;

/// Failures of duration evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum DurationError {
    /// A precedence triple references a slot with no chosen item.
    UnknownItem(String),
    /// The END sentinel was never reached from START.
    Unreachable,
    /// Relaxation failed (cycle, missing sentinel vertex).
    Graph(GraphError),
}

impl fmt::Display for DurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationError::UnknownItem(slot) => {
                write!(f, "no chosen item for precedence slot '{slot}'")
            }
            DurationError::Unreachable => write!(f, "END is unreachable from START"),
            DurationError::Graph(err) => write!(f, "duration evaluation failed: {err}"),
        }
    }
}

impl std::error::Error for DurationError {}

impl From<GraphError> for DurationError {
    fn from(err: GraphError) -> Self {
        DurationError::Graph(err)
    }
}

/// Computes total project duration from precedence triples.
#[derive(Debug, Clone)]
pub struct DurationEvaluator {
    precedence: Vec<Precedence>,
}

impl DurationEvaluator {
    /// Creates an evaluator over the given precedence triples.
    pub fn new(precedence: Vec<Precedence>) -> Self {
        Self { precedence }
    }

    /// The precedence triples this evaluator applies.
    pub fn precedence(&self) -> &[Precedence] {
        &self.precedence
    }

    /// Materializes the precedence graph for a set of chosen items.
    ///
    /// Edge costs are stored negated: START-anchored edges cost 0, every
    /// other edge carries `-duration` of its source item. Duplicate edges
    /// from redundant triples are inserted once.
    pub fn build_graph<T: WorkItem>(
        &self,
        chosen: &BTreeMap<String, T>,
    ) -> Result<WeightedGraph<T>, DurationError> {
        let lookup = |slot: &str| {
            chosen
                .get(slot)
                .ok_or_else(|| DurationError::UnknownItem(slot.to_string()))
        };

        let mut graph = WeightedGraph::new();
        for triple in &self.precedence {
            let curr = lookup(&triple.item)?;

            if triple.starts_chain() {
                // anchoring edge carries no time of its own
                if !graph.has_edge(START, curr.key()) {
                    graph.add_edge(START, curr.key(), 0.0);
                }
            } else {
                let from = lookup(&triple.predecessor)?;
                if !graph.has_edge(from.key(), curr.key()) {
                    graph.add_item_edge(from, curr, -from.duration());
                }
            }

            if triple.ends_chain() {
                if !graph.has_edge(curr.key(), END) {
                    graph.add_edge(curr.key(), END, -curr.duration());
                }
            } else {
                let to = lookup(&triple.successor)?;
                if !graph.has_edge(curr.key(), to.key()) {
                    graph.add_item_edge(curr, to, -curr.duration());
                }
            }
        }
        Ok(graph)
    }

    /// Total duration of the chosen items: the longest START→END path.
    pub fn total_duration<T: WorkItem>(
        &self,
        chosen: &BTreeMap<String, T>,
    ) -> Result<f64, DurationError> {
        let mut graph = self.build_graph(chosen)?;
        graph.negative(START)?;
        match graph.distance(END)? {
            Distance::Finite(dist) => Ok(dist.abs()),
            Distance::Unreachable => Err(DurationError::Unreachable),
        }
    }
}
