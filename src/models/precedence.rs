//! Precedence relations.
//!
//! Precedence data arrives as `(item, predecessor, successor)` triples keyed
//! by slot name, with the reserved sentinels [`START`] and [`END`] anchoring
//! the virtual source and sink of the precedence graph. The triples are not
//! validated for acyclicity up front; a cycle surfaces as
//! [`GraphError::CycleDetected`](crate::graph::GraphError::CycleDetected)
//! during duration evaluation.

use serde::{Deserialize, Serialize};

/// Reserved key anchoring the virtual start of a precedence graph.
pub const START: &str = "<START>";

/// Reserved key anchoring the virtual end of a precedence graph.
pub const END: &str = "<END>";

/// One precedence triple: `item` comes after `predecessor` and before
/// `successor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precedence {
    /// Slot key of the constrained item.
    pub item: String,
    /// Slot key of the item (or [`START`]) that must come first.
    pub predecessor: String,
    /// Slot key of the item (or [`END`]) that must come after.
    pub successor: String,
}

impl Precedence {
    /// Creates a precedence triple.
    pub fn new(
        item: impl Into<String>,
        predecessor: impl Into<String>,
        successor: impl Into<String>,
    ) -> Self {
        Self {
            item: item.into(),
            predecessor: predecessor.into(),
            successor: successor.into(),
        }
    }

    /// True when the predecessor is the virtual start sentinel.
    pub fn starts_chain(&self) -> bool {
        self.predecessor.trim().eq_ignore_ascii_case(START)
    }

    /// True when the successor is the virtual end sentinel.
    pub fn ends_chain(&self) -> bool {
        self.successor.trim().eq_ignore_ascii_case(END)
    }
}
