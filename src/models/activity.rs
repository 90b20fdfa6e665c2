//! Activity model.
//!
//! The schedule-side counterpart of [`Assembly`](super::Assembly): one way to
//! carry out a scheduled piece of work, with its own time, cost, and
//! environmental impact.

use super::WorkItem;
use serde::{Deserialize, Serialize};

/// A schedulable activity option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Time to perform the activity.
    pub time: f64,
    /// Cost of performing the activity.
    pub cost: f64,
    /// Environmental impact of the activity.
    pub environmental_impact: f64,
}

impl Activity {
    /// Creates an activity.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        time: f64,
        cost: f64,
        environmental_impact: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            time,
            cost,
            environmental_impact,
        }
    }
}

impl WorkItem for Activity {
    fn key(&self) -> &str {
        &self.id
    }

    fn duration(&self) -> f64 {
        self.time
    }

    fn cost(&self) -> f64 {
        self.cost
    }

    fn environmental_impact(&self) -> f64 {
        self.environmental_impact
    }
}
