//! NSGA-II generational loop.
//!
//! [`Nsga2`] owns the validated configuration, the boxed objectives, the
//! listeners, and a single seeded RNG threaded through every stochastic
//! decision (tournament tie-breaks, crossover rolls, per-gene mutation).
//! Each generation: sort and rank the current population, notify listeners
//! with the rank-1 front, breed an equally sized offspring population via
//! paired binary tournaments, then truncate the 2N union elitistically back
//! to N.
//!
//! Termination is purely generation-count driven; callers wanting adaptive
//! stopping can layer it in a [`GenerationListener`] and re-run with a
//! smaller budget.

use super::config::NsgaConfig;
use super::pareto::{crowding_distance_assignment, fast_nondominated_sort};
use super::types::{GenerationListener, Genome, Individual, Objective, ObjectiveError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::fmt;

/// Failures of an NSGA-II run.
#[derive(Debug, Clone, PartialEq)]
pub enum NsgaError {
    /// No objectives were supplied.
    NoObjectives,
    /// The start population does not match the configured size.
    WrongStartPopulationSize {
        /// Configured population size.
        expected: usize,
        /// Size of the supplied start population.
        actual: usize,
    },
    /// An objective evaluation failed.
    Objective(ObjectiveError),
}

impl fmt::Display for NsgaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NsgaError::NoObjectives => write!(f, "at least one objective is required"),
            NsgaError::WrongStartPopulationSize { expected, actual } => {
                write!(f, "start population has {actual} individuals, expected {expected}")
            }
            NsgaError::Objective(err) => write!(f, "objective evaluation failed: {err}"),
        }
    }
}

impl std::error::Error for NsgaError {}

impl From<ObjectiveError> for NsgaError {
    fn from(err: ObjectiveError) -> Self {
        NsgaError::Objective(err)
    }
}

/// Result of an NSGA-II run.
#[derive(Debug, Clone)]
pub struct NsgaResult<G> {
    /// The rank-1 (Pareto-best) individuals of the final population.
    pub best: Vec<Individual<G>>,
    /// The full final population (configured size).
    pub population: Vec<Individual<G>>,
    /// Generations executed.
    pub generations: usize,
}

/// The NSGA-II optimizer.
pub struct Nsga2<G> {
    config: NsgaConfig,
    objectives: Vec<Box<dyn Objective<G>>>,
    listeners: Vec<Box<dyn GenerationListener<G>>>,
    rng: StdRng,
    next_id: u64,
}

impl<G> fmt::Debug for Nsga2<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nsga2")
            .field("config", &self.config)
            .field("objectives", &self.objectives.len())
            .field("listeners", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl<G: Genome> Nsga2<G> {
    /// Creates an optimizer from a validated configuration and at least one
    /// objective.
    pub fn new(
        config: NsgaConfig,
        objectives: Vec<Box<dyn Objective<G>>>,
    ) -> Result<Self, NsgaError> {
        if objectives.is_empty() {
            return Err(NsgaError::NoObjectives);
        }
        let rng = StdRng::seed_from_u64(match config.seed() {
            Some(seed) => seed,
            None => rand::random(),
        });
        Ok(Self {
            config,
            objectives,
            listeners: Vec::new(),
            rng,
            next_id: 0,
        })
    }

    /// The configuration this optimizer runs with.
    pub fn config(&self) -> &NsgaConfig {
        &self.config
    }

    /// Number of objectives (fitness vector length of every individual).
    pub fn objective_count(&self) -> usize {
        self.objectives.len()
    }

    /// Registers a per-generation listener.
    pub fn add_listener(&mut self, listener: Box<dyn GenerationListener<G>>) {
        self.listeners.push(listener);
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Runs the configured number of generations over the start population
    /// and returns the final population with its Pareto-best front.
    ///
    /// Fitness vectors are computed eagerly for every start genome before
    /// the first generation.
    pub fn evolve(&mut self, start: Vec<G>) -> Result<NsgaResult<G>, NsgaError> {
        let size = self.config.population_size();
        if start.len() != size {
            return Err(NsgaError::WrongStartPopulationSize {
                expected: size,
                actual: start.len(),
            });
        }

        let mut population = start
            .into_iter()
            .map(|genome| {
                let id = self.fresh_id();
                Individual::evaluate(id, genome, &self.objectives)
            })
            .collect::<Result<Vec<_>, _>>()?;

        for generation in 0..self.config.generations() {
            let fronts = fast_nondominated_sort(&mut population);
            for front in &fronts {
                crowding_distance_assignment(&mut population, front);
            }
            self.notify(generation, &population, &fronts[0]);

            let offspring = self.breed(&population)?;
            population.extend(offspring);

            let fronts = fast_nondominated_sort(&mut population);
            population = self.truncate(population, fronts);
        }

        let fronts = fast_nondominated_sort(&mut population);
        for front in &fronts {
            crowding_distance_assignment(&mut population, front);
        }
        self.notify(self.config.generations(), &population, &fronts[0]);

        let best = fronts[0].iter().map(|&i| population[i].clone()).collect();
        Ok(NsgaResult {
            best,
            population,
            generations: self.config.generations(),
        })
    }

    fn notify(&mut self, generation: usize, population: &[Individual<G>], front: &[usize]) {
        if self.listeners.is_empty() {
            return;
        }
        let best: Vec<Individual<G>> = front.iter().map(|&i| population[i].clone()).collect();
        for listener in &mut self.listeners {
            listener.on_generation(generation, &best);
        }
    }

    /// Produces an offspring population of the same size via two
    /// independent permutations, each partitioned into groups of four with
    /// two binary tournaments per group.
    fn breed(&mut self, population: &[Individual<G>]) -> Result<Vec<Individual<G>>, NsgaError> {
        let n = population.len();
        let mut offspring = Vec::with_capacity(n);

        let mut perm1: Vec<usize> = (0..n).collect();
        let mut perm2: Vec<usize> = (0..n).collect();
        perm1.shuffle(&mut self.rng);
        perm2.shuffle(&mut self.rng);

        for base in (0..n).step_by(4) {
            for perm in [&perm1, &perm2] {
                let parent1 = self.binary_tournament(population, perm[base], perm[base + 1]);
                let parent2 = self.binary_tournament(population, perm[base + 2], perm[base + 3]);

                let id1 = self.fresh_id();
                let id2 = self.fresh_id();
                let mut child1 = population[parent1].child_clone(id1);
                let mut child2 = population[parent2].child_clone(id2);

                if self.rng.random::<f64>() < self.config.crossover_probability() {
                    child1
                        .genome_mut()
                        .crossover(child2.genome_mut(), &mut self.rng);
                    child1.reevaluate(&self.objectives)?;
                    child2.reevaluate(&self.objectives)?;
                }

                for child in [&mut child1, &mut child2] {
                    let mutated = child
                        .genome_mut()
                        .mutate(self.config.mutation_probability(), &mut self.rng);
                    if mutated {
                        child.reevaluate(&self.objectives)?;
                    }
                }

                offspring.push(child1);
                offspring.push(child2);
            }
        }
        Ok(offspring)
    }

    fn binary_tournament(&mut self, population: &[Individual<G>], a: usize, b: usize) -> usize {
        if population[a].crowded_better(&population[b]) {
            a
        } else if population[b].crowded_better(&population[a]) {
            b
        } else if self.rng.random_bool(0.5) {
            a
        } else {
            b
        }
    }

    /// Elitist truncation of the 2N union back to N: whole fronts in rank
    /// order, with the overflowing front cut by descending crowded
    /// comparison.
    fn truncate(
        &mut self,
        mut population: Vec<Individual<G>>,
        fronts: Vec<Vec<usize>>,
    ) -> Vec<Individual<G>> {
        let size = self.config.population_size();
        let mut selected: Vec<usize> = Vec::with_capacity(size);

        for front in fronts {
            crowding_distance_assignment(&mut population, &front);
            if selected.len() + front.len() <= size {
                selected.extend(front);
                if selected.len() == size {
                    break;
                }
            } else {
                let mut boundary = front;
                boundary.sort_by(|&a, &b| {
                    if population[a].crowded_better(&population[b]) {
                        Ordering::Less
                    } else if population[b].crowded_better(&population[a]) {
                        Ordering::Greater
                    } else {
                        Ordering::Equal
                    }
                });
                selected.extend(boundary.into_iter().take(size - selected.len()));
                break;
            }
        }

        let mut slots: Vec<Option<Individual<G>>> = population.into_iter().map(Some).collect();
        let next: Vec<Individual<G>> = selected
            .into_iter()
            .map(|i| slots[i].take().expect("front indices are unique"))
            .collect();
        debug_assert_eq!(next.len(), size);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        x: f64,
        y: f64,
    }

    impl Genome for Point {
        fn crossover<R: Rng>(&mut self, other: &mut Self, _rng: &mut R) {
            std::mem::swap(&mut self.y, &mut other.y);
        }

        fn mutate<R: Rng>(&mut self, probability: f64, rng: &mut R) -> bool {
            let mut changed = false;
            if rng.random::<f64>() < probability {
                self.x = rng.random_range(0.0..10.0);
                changed = true;
            }
            if rng.random::<f64>() < probability {
                self.y = rng.random_range(0.0..10.0);
                changed = true;
            }
            changed
        }
    }

    struct XObjective;
    struct YObjective;

    impl Objective<Point> for XObjective {
        fn evaluate(&self, genome: &Point) -> Result<f64, ObjectiveError> {
            Ok(genome.x)
        }
        fn name(&self) -> &str {
            "x"
        }
    }

    impl Objective<Point> for YObjective {
        fn evaluate(&self, genome: &Point) -> Result<f64, ObjectiveError> {
            Ok(genome.y)
        }
        fn name(&self) -> &str {
            "y"
        }
    }

    fn objectives() -> Vec<Box<dyn Objective<Point>>> {
        vec![Box::new(XObjective), Box::new(YObjective)]
    }

    fn start_points(n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| Point {
                x: i as f64,
                y: (n - i) as f64,
            })
            .collect()
    }

    fn fitness_set(individuals: &[Individual<Point>]) -> Vec<(u64, u64)> {
        let mut set: Vec<(u64, u64)> = individuals
            .iter()
            .map(|i| (i.objective(0).to_bits(), i.objective(1).to_bits()))
            .collect();
        set.sort_unstable();
        set.dedup();
        set
    }

    #[test]
    fn test_final_population_has_configured_size() {
        let config = NsgaConfig::new(0.2, 0.8, 8, 10).unwrap().with_seed(1);
        let mut nsga = Nsga2::new(config, objectives()).unwrap();
        let result = nsga.evolve(start_points(8)).unwrap();
        assert_eq!(result.population.len(), 8);
        assert_eq!(result.generations, 10);
        assert!(result.best.iter().all(|i| i.rank() == 1));
        assert!(!result.best.is_empty());
    }

    #[test]
    fn test_wrong_start_population_size() {
        let config = NsgaConfig::new(0.2, 0.8, 8, 10).unwrap();
        let mut nsga = Nsga2::new(config, objectives()).unwrap();
        assert_eq!(
            nsga.evolve(start_points(6)).unwrap_err(),
            NsgaError::WrongStartPopulationSize {
                expected: 8,
                actual: 6
            }
        );
    }

    #[test]
    fn test_objectives_required() {
        let config = NsgaConfig::new(0.2, 0.8, 8, 10).unwrap();
        assert_eq!(
            Nsga2::<Point>::new(config, Vec::new()).unwrap_err(),
            NsgaError::NoObjectives
        );
    }

    /// With zero mutation and crossover probability no genome ever changes,
    /// so the final best front equals the rank-1 front of the start
    /// population as a set of fitness vectors.
    #[test]
    fn test_zero_probabilities_preserve_start_front() {
        let start = start_points(8);

        let mut reference: Vec<Individual<Point>> = start
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, p)| Individual::from_parts(i as u64, p.clone(), vec![p.x, p.y]))
            .collect();
        let fronts = fast_nondominated_sort(&mut reference);
        let expected: Vec<Individual<Point>> =
            fronts[0].iter().map(|&i| reference[i].clone()).collect();

        let config = NsgaConfig::new(0.0, 0.0, 8, 5).unwrap().with_seed(99);
        let mut nsga = Nsga2::new(config, objectives()).unwrap();
        let result = nsga.evolve(start).unwrap();

        assert_eq!(fitness_set(&result.best), fitness_set(&expected));
    }

    #[test]
    fn test_listener_called_once_per_generation_boundary() {
        let calls: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));

        struct Recorder(Rc<RefCell<Vec<usize>>>);
        impl GenerationListener<Point> for Recorder {
            fn on_generation(&mut self, generation: usize, best_front: &[Individual<Point>]) {
                assert!(!best_front.is_empty());
                assert!(best_front.iter().all(|i| i.rank() == 1));
                self.0.borrow_mut().push(generation);
            }
        }

        let config = NsgaConfig::new(0.1, 0.9, 8, 3).unwrap().with_seed(7);
        let mut nsga = Nsga2::new(config, objectives()).unwrap();
        nsga.add_listener(Box::new(Recorder(Rc::clone(&calls))));
        nsga.evolve(start_points(8)).unwrap();

        assert_eq!(*calls.borrow(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let config = NsgaConfig::new(0.3, 0.9, 8, 8).unwrap().with_seed(4242);
            let mut nsga = Nsga2::new(config, objectives()).unwrap();
            let result = nsga.evolve(start_points(8)).unwrap();
            fitness_set(&result.best)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_individual_ids_are_unique() {
        let config = NsgaConfig::new(0.2, 0.8, 8, 4).unwrap().with_seed(11);
        let mut nsga = Nsga2::new(config, objectives()).unwrap();
        let result = nsga.evolve(start_points(8)).unwrap();
        let mut ids: Vec<u64> = result.population.iter().map(|i| i.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), result.population.len());
    }
}
