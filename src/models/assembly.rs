//! Assembly model.
//!
//! An assembly is one concrete way to build a component of a construction
//! project (e.g. "Roofing 3"): a priced, quantified alternative carrying the
//! cost, embodied CO2, and installation duration that the objectives sum.

use super::WorkItem;
use serde::{Deserialize, Serialize};

/// A buildable component option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    /// Display name, unique within the data set.
    pub name: String,
    /// Catalog/estimating code (may be empty).
    pub code: String,
    /// Installed cost.
    pub cost: f64,
    /// Embodied CO2 (kg equivalent).
    pub co2: f64,
    /// Installation duration.
    pub duration: f64,
}

impl Assembly {
    /// Creates an assembly.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        cost: f64,
        co2: f64,
        duration: f64,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            cost,
            co2,
            duration,
        }
    }
}

impl WorkItem for Assembly {
    fn key(&self) -> &str {
        &self.name
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn cost(&self) -> f64 {
        self.cost
    }

    fn environmental_impact(&self) -> f64 {
        self.co2
    }
}
