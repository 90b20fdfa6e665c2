//! Core contracts of the NSGA-II engine.
//!
//! - [`Genome`]: the representation capability a solution type must provide
//!   (crossover and per-gene mutation)
//! - [`Objective`]: one minimized fitness function
//! - [`GenerationListener`]: per-generation observer of the best front
//! - [`Individual`]: a genome plus its eagerly computed objective vector,
//!   domination rank, and crowding distance

use crate::duration::DurationError;
use rand::Rng;
use std::fmt;

/// A solution representation the engine can evolve.
///
/// The engine rolls the crossover probability itself and calls
/// [`crossover`](Genome::crossover) only when the roll succeeds; mutation is
/// called unconditionally and the implementation rolls `probability` per
/// gene, reporting whether anything changed so the engine knows to
/// re-evaluate fitness.
pub trait Genome: Clone {
    /// Recombines this genome with `other` in place, altering both.
    fn crossover<R: Rng>(&mut self, other: &mut Self, rng: &mut R);

    /// Mutates genes independently with the given probability. Returns
    /// `true` when at least one gene changed.
    fn mutate<R: Rng>(&mut self, probability: f64, rng: &mut R) -> bool;
}

/// Failure of an objective evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectiveError {
    /// Duration evaluation failed (malformed precedence data).
    Duration(DurationError),
}

impl fmt::Display for ObjectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveError::Duration(err) => write!(f, "duration objective failed: {err}"),
        }
    }
}

impl std::error::Error for ObjectiveError {}

impl From<DurationError> for ObjectiveError {
    fn from(err: DurationError) -> Self {
        ObjectiveError::Duration(err)
    }
}

/// One minimized objective.
///
/// Evaluation must be deterministic for a given genome state. Failures
/// signalling malformed input data (a cyclic precedence graph, say)
/// propagate out of the evolutionary loop; recoverable conditions like a
/// missing simulation result are mapped to the worst possible fitness by
/// the objective itself.
pub trait Objective<G> {
    /// Evaluates the genome, lower is better.
    fn evaluate(&self, genome: &G) -> Result<f64, ObjectiveError>;

    /// Objective name for reporting.
    fn name(&self) -> &str;
}

/// Observer notified with the current rank-1 front.
///
/// Called synchronously before each generation body runs and once more
/// after the final generation. The front slice is shared state owned by the
/// engine; listeners must not assume it survives the call.
pub trait GenerationListener<G> {
    /// `generation` counts completed generations (0 for the start
    /// population).
    fn on_generation(&mut self, generation: usize, best_front: &[Individual<G>]);
}

/// A candidate solution with its objective vector and NSGA-II bookkeeping.
///
/// Fitness is computed eagerly at construction and recomputed by the engine
/// whenever crossover or mutation changes the genome. Rank (1 = best,
/// 0 = unset) and crowding distance are per-generation scratch values
/// assigned by the non-dominated sort; a bred child starts with both unset.
#[derive(Debug, Clone)]
pub struct Individual<G> {
    id: u64,
    genome: G,
    objectives: Vec<f64>,
    rank: usize,
    crowding_distance: f64,
}

impl<G: Clone> Individual<G> {
    /// Duplicates genome and objectives for breeding; rank and crowding
    /// distance are re-derived per generation and deliberately not copied.
    pub(crate) fn child_clone(&self, id: u64) -> Self {
        Self::from_parts(id, self.genome.clone(), self.objectives.clone())
    }
}

impl<G> Individual<G> {
    pub(crate) fn from_parts(id: u64, genome: G, objectives: Vec<f64>) -> Self {
        Self {
            id,
            genome,
            objectives,
            rank: 0,
            crowding_distance: 0.0,
        }
    }

    pub(crate) fn evaluate(
        id: u64,
        genome: G,
        objectives: &[Box<dyn Objective<G>>],
    ) -> Result<Self, ObjectiveError> {
        let values = objectives
            .iter()
            .map(|obj| obj.evaluate(&genome))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_parts(id, genome, values))
    }

    pub(crate) fn reevaluate(
        &mut self,
        objectives: &[Box<dyn Objective<G>>],
    ) -> Result<(), ObjectiveError> {
        for (value, obj) in self.objectives.iter_mut().zip(objectives) {
            *value = obj.evaluate(&self.genome)?;
        }
        Ok(())
    }

    /// Session-unique identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The underlying representation.
    pub fn genome(&self) -> &G {
        &self.genome
    }

    pub(crate) fn genome_mut(&mut self) -> &mut G {
        &mut self.genome
    }

    /// All objective values, in configured objective order.
    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    /// The `index`-th objective value.
    pub fn objective(&self, index: usize) -> f64 {
        self.objectives[index]
    }

    /// Domination rank, 1-based; 0 until the first non-dominated sort.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Crowding distance within this individual's front.
    pub fn crowding_distance(&self) -> f64 {
        self.crowding_distance
    }

    pub(crate) fn set_rank(&mut self, rank: usize) {
        debug_assert!(rank >= 1, "rank is 1-based");
        self.rank = rank;
    }

    pub(crate) fn set_crowding_distance(&mut self, distance: f64) {
        debug_assert!(distance >= 0.0, "crowding distance must not be negative");
        self.crowding_distance = distance;
    }

    /// Pareto domination (minimization).
    ///
    /// An individual with any NaN objective dominates nothing; an
    /// individual with no NaN dominates one that has any. Otherwise `self`
    /// dominates `other` iff it is no worse in every objective and strictly
    /// better in at least one.
    ///
    /// # Panics
    /// Panics if the objective vectors have different lengths (individuals
    /// from differently configured optimizers are not comparable).
    pub fn dominates(&self, other: &Self) -> bool {
        assert_eq!(
            self.objectives.len(),
            other.objectives.len(),
            "individuals must share the same objective set"
        );

        let self_nan = self.objectives.iter().any(|v| v.is_nan());
        let other_nan = other.objectives.iter().any(|v| v.is_nan());
        if self_nan {
            return false;
        }
        if other_nan {
            return true;
        }

        let mut strictly_better = false;
        for (a, b) in self.objectives.iter().zip(&other.objectives) {
            if a > b {
                return false;
            }
            if a < b {
                strictly_better = true;
            }
        }
        strictly_better
    }

    /// Crowded-comparison order: lower rank wins; equal ranks are broken by
    /// greater crowding distance. Requires rank and crowding distance to be
    /// assigned for the current generation.
    pub fn crowded_better(&self, other: &Self) -> bool {
        self.rank < other.rank
            || (self.rank == other.rank && self.crowding_distance > other.crowding_distance)
    }
}
