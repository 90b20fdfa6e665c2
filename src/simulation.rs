//! Simulation result lookup.
//!
//! Energy-aware objectives consult precomputed simulation results keyed by
//! an individual's gene sequence. The lookup itself is an external
//! collaborator; the crate only defines the contract plus an in-memory
//! table for tests and for callers that have already parsed their results
//! file.

use std::collections::HashMap;
use std::fmt;

/// A gene sequence that was expected to have a simulation result but does
/// not. Distinguishable from a zero result by design — fitness functions
/// map it to the worst possible value instead of silently continuing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoEnergyResultFound(pub String);

impl fmt::Display for NoEnergyResultFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no simulation result for gene sequence '{}'", self.0)
    }
}

impl std::error::Error for NoEnergyResultFound {}

/// Source of precomputed simulation results.
pub trait SimulationLookup {
    /// Annual electricity use (kWh) for the given gene sequence.
    fn lookup(&self, gene_sequence: &str) -> Result<f64, NoEnergyResultFound>;
}

/// In-memory lookup table: gene sequence → electricity use.
#[derive(Debug, Clone, Default)]
pub struct SimulationTable {
    results: HashMap<String, f64>,
}

impl SimulationTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a result for a gene sequence.
    pub fn insert(&mut self, gene_sequence: impl Into<String>, electricity_kwh: f64) {
        self.results.insert(gene_sequence.into(), electricity_kwh);
    }

    /// Number of recorded results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True when no results are recorded.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl FromIterator<(String, f64)> for SimulationTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl SimulationLookup for SimulationTable {
    fn lookup(&self, gene_sequence: &str) -> Result<f64, NoEnergyResultFound> {
        self.results
            .get(gene_sequence)
            .copied()
            .ok_or_else(|| NoEnergyResultFound(gene_sequence.to_string()))
    }
}
