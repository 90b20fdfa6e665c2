//! Multi-objective design-space search for construction projects and
//! schedules.
//!
//! Searches a combinatorial design space (one work item chosen per slot)
//! for Pareto-optimal trade-offs between cost, environmental impact,
//! duration, and energy cost:
//!
//! - **NSGA-II** ([`nsga`]): elitist non-dominated sorting genetic
//!   algorithm, generic over a genome representation and an arbitrary set
//!   of minimized objectives.
//! - **Critical-path duration** ([`duration`], [`graph`]): total project
//!   duration as the longest path through the precedence graph, computed by
//!   negative-weight relaxation over negated edge costs.
//! - **Choice genomes** ([`genome`], [`models`]): one option index per
//!   slot, over [`Assembly`](models::Assembly) options for projects and
//!   [`Activity`](models::Activity) options for schedules.
//! - **Objectives** ([`objectives`], [`simulation`]): summed cost and
//!   environmental impact, critical-path duration, and simulation-backed
//!   energy cost.
//!
//! # Example
//!
//! ```
//! use paretoplan::duration::DurationEvaluator;
//! use paretoplan::genome::ProjectGenome;
//! use paretoplan::models::{Assembly, OptionSet, Precedence, END, START};
//! use paretoplan::nsga::{Nsga2, NsgaConfig, Objective};
//! use paretoplan::objectives::{CostObjective, DurationObjective};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! let mut slots = BTreeMap::new();
//! slots.insert("Wall".to_string(), vec![
//!     Assembly::new("Brick", "B10", 120.0, 40.0, 6.0),
//!     Assembly::new("Timber", "B20", 90.0, 25.0, 4.0),
//! ]);
//! slots.insert("Roof".to_string(), vec![
//!     Assembly::new("Tile", "B30", 80.0, 30.0, 5.0),
//!     Assembly::new("Steel", "B40", 150.0, 20.0, 3.0),
//! ]);
//! let options = Arc::new(OptionSet::new(slots).unwrap());
//! let evaluator = Arc::new(DurationEvaluator::new(vec![
//!     Precedence::new("Wall", START, "Roof"),
//!     Precedence::new("Roof", "Wall", END),
//! ]));
//!
//! let config = NsgaConfig::new(0.1, 0.9, 8, 20).unwrap().with_seed(42);
//! let objectives: Vec<Box<dyn Objective<ProjectGenome>>> =
//!     vec![Box::new(CostObjective), Box::new(DurationObjective)];
//! let mut nsga = Nsga2::new(config, objectives).unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let start = (0..8)
//!     .map(|_| ProjectGenome::random(Arc::clone(&options), Arc::clone(&evaluator), &mut rng))
//!     .collect();
//! let result = nsga.evolve(start).unwrap();
//! assert!(result.best.iter().all(|i| i.rank() == 1));
//! ```

pub mod duration;
pub mod genome;
pub mod graph;
pub mod models;
pub mod nsga;
pub mod objectives;
pub mod simulation;
