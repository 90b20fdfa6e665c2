//! NSGA-II configuration.
//!
//! [`NsgaConfig`] holds the numeric parameters of the evolutionary loop.
//! Construction validates every parameter immediately; an invalid value
//! never produces a partially usable configuration.

use std::fmt;

/// Invalid NSGA-II parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Mutation probability outside `[0, 1]` (or NaN).
    MutationProbabilityOutOfRange(f64),
    /// Crossover probability outside `[0, 1]` (or NaN).
    CrossoverProbabilityOutOfRange(f64),
    /// Population size of zero.
    PopulationSizeNotPositive,
    /// Population size not divisible by four, as required by the paired
    /// binary-tournament scheme.
    PopulationSizeNotDivisibleByFour(usize),
    /// Generation count of zero.
    GenerationsNotPositive,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MutationProbabilityOutOfRange(p) => {
                write!(f, "mutation probability {p} must be within [0, 1]")
            }
            ConfigError::CrossoverProbabilityOutOfRange(p) => {
                write!(f, "crossover probability {p} must be within [0, 1]")
            }
            ConfigError::PopulationSizeNotPositive => {
                write!(f, "population size must be positive")
            }
            ConfigError::PopulationSizeNotDivisibleByFour(n) => {
                write!(f, "population size {n} must be divisible by four")
            }
            ConfigError::GenerationsNotPositive => {
                write!(f, "number of generations must be positive")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validated parameters for an NSGA-II run.
///
/// # Example
///
/// ```
/// use paretoplan::nsga::NsgaConfig;
///
/// let config = NsgaConfig::new(0.05, 0.9, 40, 100).unwrap().with_seed(42);
/// assert_eq!(config.population_size(), 40);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NsgaConfig {
    mutation_probability: f64,
    crossover_probability: f64,
    population_size: usize,
    generations: usize,
    seed: Option<u64>,
}

impl NsgaConfig {
    /// Creates a configuration, failing fast on any invalid parameter.
    pub fn new(
        mutation_probability: f64,
        crossover_probability: f64,
        population_size: usize,
        generations: usize,
    ) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&mutation_probability) {
            return Err(ConfigError::MutationProbabilityOutOfRange(
                mutation_probability,
            ));
        }
        if !(0.0..=1.0).contains(&crossover_probability) {
            return Err(ConfigError::CrossoverProbabilityOutOfRange(
                crossover_probability,
            ));
        }
        if population_size == 0 {
            return Err(ConfigError::PopulationSizeNotPositive);
        }
        if population_size % 4 != 0 {
            return Err(ConfigError::PopulationSizeNotDivisibleByFour(
                population_size,
            ));
        }
        if generations == 0 {
            return Err(ConfigError::GenerationsNotPositive);
        }
        Ok(Self {
            mutation_probability,
            crossover_probability,
            population_size,
            generations,
            seed: None,
        })
    }

    /// Sets the random seed for a reproducible run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Per-gene mutation probability.
    pub fn mutation_probability(&self) -> f64 {
        self.mutation_probability
    }

    /// Per-pair crossover probability.
    pub fn crossover_probability(&self) -> f64 {
        self.crossover_probability
    }

    /// Population size (constant across generations).
    pub fn population_size(&self) -> usize {
        self.population_size
    }

    /// Number of generations to run.
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Configured seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}
