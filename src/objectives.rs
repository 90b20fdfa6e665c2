//! Fitness functions over choice genomes.
//!
//! Each objective minimizes one quantity of the chosen work items. The
//! duration objective propagates structural failures (cyclic precedence
//! data, unreachable END) out of the run; the energy-cost objective maps a
//! missing simulation result to the worst possible fitness so the affected
//! individual is dominated away instead of aborting the search.

use crate::genome::ChoiceGenome;
use crate::models::WorkItem;
use crate::nsga::{Objective, ObjectiveError};
use crate::simulation::SimulationLookup;

/// Average US residential electricity price, dollars per kWh.
pub const US_AVG_COST_DOLLARS_PER_KWH: f64 = 0.1251;

/// Minimizes the summed cost of the chosen items.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostObjective;

impl<T: WorkItem> Objective<ChoiceGenome<T>> for CostObjective {
    fn evaluate(&self, genome: &ChoiceGenome<T>) -> Result<f64, ObjectiveError> {
        Ok(genome.total_cost())
    }

    fn name(&self) -> &str {
        "cost"
    }
}

/// Minimizes the summed environmental impact of the chosen items.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentalImpactObjective;

impl<T: WorkItem> Objective<ChoiceGenome<T>> for EnvironmentalImpactObjective {
    fn evaluate(&self, genome: &ChoiceGenome<T>) -> Result<f64, ObjectiveError> {
        Ok(genome.total_environmental_impact())
    }

    fn name(&self) -> &str {
        "environmental-impact"
    }
}

/// Minimizes the critical-path duration of the chosen items.
///
/// Failures here mean the input data is malformed for *every* individual
/// (the precedence triples do not depend on the genome's choices), so they
/// abort the run rather than being folded into fitness.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationObjective;

impl<T: WorkItem> Objective<ChoiceGenome<T>> for DurationObjective {
    fn evaluate(&self, genome: &ChoiceGenome<T>) -> Result<f64, ObjectiveError> {
        Ok(genome.total_duration()?)
    }

    fn name(&self) -> &str {
        "duration"
    }
}

/// Minimizes construction cost plus annual electricity cost.
///
/// Electricity use comes from a precomputed simulation keyed by the gene
/// sequence. A gene sequence without a result yields [`f64::MAX`]: the
/// individual survives the generation but loses every domination
/// comparison.
#[derive(Debug, Clone)]
pub struct EnergyCostObjective<L> {
    lookup: L,
}

impl<L: SimulationLookup> EnergyCostObjective<L> {
    /// Creates the objective over a simulation result source.
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }
}

impl<T: WorkItem, L: SimulationLookup> Objective<ChoiceGenome<T>> for EnergyCostObjective<L> {
    fn evaluate(&self, genome: &ChoiceGenome<T>) -> Result<f64, ObjectiveError> {
        match self.lookup.lookup(&genome.gene_sequence()) {
            Ok(kwh) => Ok(genome.total_cost() + kwh * US_AVG_COST_DOLLARS_PER_KWH),
            Err(_) => Ok(f64::MAX),
        }
    }

    fn name(&self) -> &str {
        "energy-cost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::DurationEvaluator;
    use crate::genome::ProjectGenome;
    use crate::models::{Assembly, OptionSet, Precedence, END, START};
    use crate::nsga::{Nsga2, NsgaConfig};
    use crate::simulation::SimulationTable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn assembly(name: &str, cost: f64, co2: f64, duration: f64) -> Assembly {
        Assembly::new(name, "", cost, co2, duration)
    }

    fn fixture() -> (Arc<OptionSet<Assembly>>, Arc<DurationEvaluator>) {
        let mut slots = BTreeMap::new();
        slots.insert(
            "Roof".to_string(),
            vec![
                assembly("R0", 120.0, 40.0, 6.0),
                assembly("R1", 180.0, 25.0, 4.0),
            ],
        );
        slots.insert(
            "Wall".to_string(),
            vec![
                assembly("W0", 90.0, 30.0, 5.0),
                assembly("W1", 140.0, 10.0, 7.0),
            ],
        );
        let options = Arc::new(OptionSet::new(slots).unwrap());
        let evaluator = Arc::new(DurationEvaluator::new(vec![
            Precedence::new("Wall", START, "Roof"),
            Precedence::new("Roof", "Wall", END),
        ]));
        (options, evaluator)
    }

    /// Genome with explicit choices, `indices` in slot order (Roof, Wall).
    fn genome(indices: &[usize]) -> ProjectGenome {
        let (options, evaluator) = fixture();
        let choices: BTreeMap<String, usize> = options
            .iter()
            .map(|(slot, _)| slot.to_string())
            .zip(indices.iter().copied())
            .collect();
        ProjectGenome::from_choices(options, evaluator, choices).unwrap()
    }

    #[test]
    fn test_cost_objective_sums_chosen() {
        let g = genome(&[0, 1]);
        let value = CostObjective.evaluate(&g).unwrap();
        assert!((value - (120.0 + 140.0)).abs() < 1e-9);
    }

    #[test]
    fn test_environmental_impact_objective() {
        let g = genome(&[1, 0]);
        let value = EnvironmentalImpactObjective.evaluate(&g).unwrap();
        assert!((value - (25.0 + 30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_duration_objective_is_critical_path() {
        // Wall W0 (5) then Roof R0 (6)
        let g = genome(&[0, 0]);
        let value = DurationObjective.evaluate(&g).unwrap();
        assert!((value - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_energy_cost_combines_cost_and_electricity() {
        let mut table = SimulationTable::new();
        table.insert("00", 1000.0);
        let objective = EnergyCostObjective::new(table);

        let g = genome(&[0, 0]);
        let value = objective.evaluate(&g).unwrap();
        let expected = (120.0 + 90.0) + 1000.0 * US_AVG_COST_DOLLARS_PER_KWH;
        assert!((value - expected).abs() < 1e-9);
    }

    #[test]
    fn test_missing_simulation_result_is_worst_fitness() {
        let objective = EnergyCostObjective::new(SimulationTable::new());
        let g = genome(&[0, 0]);
        assert_eq!(objective.evaluate(&g).unwrap(), f64::MAX);
    }

    /// End-to-end: a small run over the assembly design space finds the
    /// cheap-and-fast corner solutions on its Pareto front.
    #[test]
    fn test_small_project_run() {
        let (options, evaluator) = fixture();
        let config = NsgaConfig::new(0.1, 0.9, 8, 25).unwrap().with_seed(17);
        let objectives: Vec<Box<dyn crate::nsga::Objective<ProjectGenome>>> = vec![
            Box::new(CostObjective),
            Box::new(EnvironmentalImpactObjective),
            Box::new(DurationObjective),
        ];
        let mut nsga = Nsga2::new(config, objectives).unwrap();

        let mut rng = StdRng::seed_from_u64(17);
        let start: Vec<ProjectGenome> = (0..8)
            .map(|_| ProjectGenome::random(Arc::clone(&options), Arc::clone(&evaluator), &mut rng))
            .collect();

        let result = nsga.evolve(start).unwrap();
        assert_eq!(result.population.len(), 8);
        assert!(!result.best.is_empty());
        assert!(result.best.iter().all(|i| i.rank() == 1));
        // every fitness vector is finite: the duration objective never
        // failed and nothing degenerated to worst fitness
        assert!(result
            .best
            .iter()
            .all(|i| i.objectives().iter().all(|v| v.is_finite())));
    }
}
