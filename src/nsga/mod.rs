//! NSGA-II multi-objective optimization.
//!
//! Elitist non-dominated-sorting genetic algorithm after Deb et al. (2002).
//! The engine is generic over a [`Genome`] representation and minimizes an
//! arbitrary set of boxed [`Objective`]s; rank and crowding distance drive
//! both parent selection (binary tournaments under the crowded-comparison
//! operator) and the elitist truncation of each parent/offspring union.
//!
//! # Example
//!
//! ```
//! use paretoplan::nsga::{Nsga2, NsgaConfig, Genome, Objective, ObjectiveError};
//! use rand::Rng;
//!
//! #[derive(Clone)]
//! struct Value(f64);
//!
//! impl Genome for Value {
//!     fn crossover<R: Rng>(&mut self, other: &mut Self, _rng: &mut R) {
//!         std::mem::swap(&mut self.0, &mut other.0);
//!     }
//!     fn mutate<R: Rng>(&mut self, probability: f64, rng: &mut R) -> bool {
//!         if rng.random::<f64>() < probability {
//!             self.0 = rng.random_range(0.0..100.0);
//!             return true;
//!         }
//!         false
//!     }
//! }
//!
//! struct Magnitude;
//! impl Objective<Value> for Magnitude {
//!     fn evaluate(&self, genome: &Value) -> Result<f64, ObjectiveError> {
//!         Ok(genome.0.abs())
//!     }
//!     fn name(&self) -> &str {
//!         "magnitude"
//!     }
//! }
//!
//! let config = NsgaConfig::new(0.1, 0.9, 8, 20).unwrap().with_seed(7);
//! let mut nsga = Nsga2::new(config, vec![Box::new(Magnitude)]).unwrap();
//! let start = (0..8).map(|i| Value(i as f64 * 10.0)).collect();
//! let result = nsga.evolve(start).unwrap();
//! assert!(result.best.iter().all(|i| i.rank() == 1));
//! ```

mod config;
mod pareto;
mod runner;
mod types;

pub use config::{ConfigError, NsgaConfig};
pub use pareto::{crowding_distance_assignment, fast_nondominated_sort};
pub use runner::{Nsga2, NsgaError, NsgaResult};
pub use types::{GenerationListener, Genome, Individual, Objective, ObjectiveError};
