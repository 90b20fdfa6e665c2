//! Domain models for the design-space search.
//!
//! A candidate solution picks one *work item* per slot: an [`Assembly`] when
//! optimizing a construction project, an [`Activity`] when optimizing a
//! schedule. Both carry the three quantities the objectives consume
//! (duration, cost, environmental impact) behind the [`WorkItem`] trait, so
//! the engine and the duration evaluator never need to know which variant
//! they are working with.

mod activity;
mod assembly;
mod precedence;

pub use activity::Activity;
pub use assembly::Assembly;
pub use precedence::{Precedence, END, START};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A selectable unit of work.
///
/// The capability surface shared by every item variant: a stable key
/// identifying its slot-independent identity, and the three objective
/// quantities. Implementors must keep all three non-negative.
pub trait WorkItem: Clone {
    /// Stable identity used as the vertex key in precedence graphs.
    fn key(&self) -> &str;

    /// Time to complete this item, in whatever unit the data set uses.
    fn duration(&self) -> f64;

    /// Monetary cost of this item.
    fn cost(&self) -> f64;

    /// Environmental impact (e.g. kg CO2 equivalent) of this item.
    fn environmental_impact(&self) -> f64;
}

/// Candidate options per slot: slot key → non-empty list of alternatives.
///
/// The option table is immutable once built and shared by every individual
/// in a population. Slots iterate in key order, which fixes the gene order
/// used by crossover and by [`gene_sequence`](crate::genome::ChoiceGenome::gene_sequence).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSet<T> {
    slots: BTreeMap<String, Vec<T>>,
}

/// Alias for the construction-project variant.
pub type AssemblySet = OptionSet<Assembly>;

impl<T> OptionSet<T> {
    /// Builds an option set, rejecting slots with no alternatives.
    pub fn new(slots: BTreeMap<String, Vec<T>>) -> Result<Self, EmptySlot> {
        for (key, options) in &slots {
            if options.is_empty() {
                return Err(EmptySlot(key.clone()));
            }
        }
        Ok(Self { slots })
    }

    /// Number of slots (genes per individual).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the set has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Options available for a slot.
    pub fn options(&self, slot: &str) -> Option<&[T]> {
        self.slots.get(slot).map(Vec::as_slice)
    }

    /// Slots in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// A slot was declared with an empty option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptySlot(pub String);

impl fmt::Display for EmptySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot '{}' has no candidate options", self.0)
    }
}

impl std::error::Error for EmptySlot {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_set_rejects_empty_slot() {
        let mut slots: BTreeMap<String, Vec<Assembly>> = BTreeMap::new();
        slots.insert("Footing".into(), vec![]);
        let err = OptionSet::new(slots).unwrap_err();
        assert_eq!(err, EmptySlot("Footing".into()));
    }

    #[test]
    fn test_option_set_iterates_in_key_order() {
        let mut slots = BTreeMap::new();
        slots.insert("b".to_string(), vec![Assembly::new("B1", "", 1.0, 1.0, 1.0)]);
        slots.insert("a".to_string(), vec![Assembly::new("A1", "", 1.0, 1.0, 1.0)]);
        let set = OptionSet::new(slots).unwrap();
        let keys: Vec<&str> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
