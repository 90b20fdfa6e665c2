//! Choice genome: one option index per slot.
//!
//! [`ChoiceGenome`] is the shared representation for both optimization
//! variants. Each gene picks one alternative out of the slot's option list;
//! the option table and the precedence evaluator are immutable and shared
//! across the whole population via [`Arc`]. Gene order is the option set's
//! key order, which makes crossover points and the gene sequence string
//! deterministic.

use crate::duration::{DurationError, DurationEvaluator};
use crate::models::{Activity, Assembly, OptionSet, WorkItem};
use crate::nsga::Genome;
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

/// A candidate solution selecting one work item per slot.
#[derive(Debug, Clone)]
pub struct ChoiceGenome<T> {
    options: Arc<OptionSet<T>>,
    evaluator: Arc<DurationEvaluator>,
    chosen: BTreeMap<String, usize>,
}

/// Construction-project genome over [`Assembly`] options.
pub type ProjectGenome = ChoiceGenome<Assembly>;

/// Schedule genome over [`Activity`] options.
pub type ScheduleGenome = ChoiceGenome<Activity>;

/// Invalid explicit choice set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceError {
    /// A slot in the option set was given no choice.
    MissingSlot(String),
    /// A choice names a slot absent from the option set.
    UnknownSlot(String),
    /// A chosen index is out of range for its slot.
    IndexOutOfRange {
        /// The offending slot.
        slot: String,
        /// The chosen index.
        index: usize,
        /// Number of alternatives the slot actually has.
        available: usize,
    },
}

impl fmt::Display for ChoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceError::MissingSlot(slot) => write!(f, "no choice for slot '{slot}'"),
            ChoiceError::UnknownSlot(slot) => write!(f, "unknown slot '{slot}'"),
            ChoiceError::IndexOutOfRange {
                slot,
                index,
                available,
            } => write!(
                f,
                "choice {index} for slot '{slot}' exceeds its {available} alternatives"
            ),
        }
    }
}

impl std::error::Error for ChoiceError {}

impl<T: WorkItem> ChoiceGenome<T> {
    /// Creates a genome with a uniformly random choice in every slot.
    pub fn random<R: Rng>(
        options: Arc<OptionSet<T>>,
        evaluator: Arc<DurationEvaluator>,
        rng: &mut R,
    ) -> Self {
        let chosen = options
            .iter()
            .map(|(slot, alternatives)| {
                (slot.to_string(), rng.random_range(0..alternatives.len()))
            })
            .collect();
        Self {
            options,
            evaluator,
            chosen,
        }
    }

    /// Creates a genome from explicit per-slot choices.
    ///
    /// Every slot must be chosen exactly once, with an index inside its
    /// option list.
    pub fn from_choices(
        options: Arc<OptionSet<T>>,
        evaluator: Arc<DurationEvaluator>,
        choices: BTreeMap<String, usize>,
    ) -> Result<Self, ChoiceError> {
        for (slot, &index) in &choices {
            let available = options
                .options(slot)
                .ok_or_else(|| ChoiceError::UnknownSlot(slot.clone()))?
                .len();
            if index >= available {
                return Err(ChoiceError::IndexOutOfRange {
                    slot: slot.clone(),
                    index,
                    available,
                });
            }
        }
        if let Some((slot, _)) = options.iter().find(|(slot, _)| !choices.contains_key(*slot)) {
            return Err(ChoiceError::MissingSlot(slot.to_string()));
        }
        Ok(Self {
            options,
            evaluator,
            chosen: choices,
        })
    }

    /// The shared option table this genome draws from.
    pub fn options(&self) -> &OptionSet<T> {
        &self.options
    }

    /// Chosen option index for a slot.
    pub fn chosen_index(&self, slot: &str) -> Option<usize> {
        self.chosen.get(slot).copied()
    }

    /// Chosen work item for a slot.
    pub fn chosen_item(&self, slot: &str) -> Option<&T> {
        let index = self.chosen_index(slot)?;
        self.options.options(slot).map(|alternatives| &alternatives[index])
    }

    /// All chosen items keyed by slot, for duration evaluation.
    pub fn chosen_items(&self) -> BTreeMap<String, T> {
        self.chosen
            .iter()
            .map(|(slot, &index)| {
                let item = self.options.options(slot).map(|a| a[index].clone());
                (slot.clone(), item.expect("chosen slot exists in option set"))
            })
            .collect()
    }

    /// Chosen option indices concatenated in slot key order.
    ///
    /// This string keys external simulation result lookups, so it must stay
    /// stable for a given set of choices.
    pub fn gene_sequence(&self) -> String {
        let mut sequence = String::with_capacity(self.chosen.len());
        for index in self.chosen.values() {
            let _ = write!(sequence, "{index}");
        }
        sequence
    }

    /// Sum of the chosen items' costs.
    pub fn total_cost(&self) -> f64 {
        self.chosen
            .keys()
            .filter_map(|slot| self.chosen_item(slot))
            .map(WorkItem::cost)
            .sum()
    }

    /// Sum of the chosen items' environmental impacts.
    pub fn total_environmental_impact(&self) -> f64 {
        self.chosen
            .keys()
            .filter_map(|slot| self.chosen_item(slot))
            .map(WorkItem::environmental_impact)
            .sum()
    }

    /// Critical-path duration of the chosen items.
    pub fn total_duration(&self) -> Result<f64, DurationError> {
        self.evaluator.total_duration(&self.chosen_items())
    }
}

impl<T: WorkItem> Genome for ChoiceGenome<T> {
    /// Single-point crossover over the ordered slots: both genomes keep
    /// their genes before the point and swap everything from the point on.
    /// Genomes with fewer than two slots are left untouched.
    fn crossover<R: Rng>(&mut self, other: &mut Self, rng: &mut R) {
        debug_assert!(
            Arc::ptr_eq(&self.options, &other.options),
            "crossover partners must share one option set"
        );
        let len = self.chosen.len();
        if len < 2 {
            return;
        }
        let point = rng.random_range(1..len);
        let slots: Vec<String> = self.chosen.keys().skip(point).cloned().collect();
        for slot in slots {
            let mine = self.chosen[&slot];
            let theirs = other.chosen[&slot];
            self.chosen.insert(slot.clone(), theirs);
            other.chosen.insert(slot, mine);
        }
    }

    /// Rolls `probability` independently per slot; a successful roll
    /// re-picks a *different* option, uniformly among the alternatives.
    /// Single-option slots never change.
    fn mutate<R: Rng>(&mut self, probability: f64, rng: &mut R) -> bool {
        let mut changed = false;
        let slots: Vec<String> = self.chosen.keys().cloned().collect();
        for slot in slots {
            let count = self
                .options
                .options(&slot)
                .map(<[T]>::len)
                .unwrap_or(0);
            if count < 2 || rng.random::<f64>() >= probability {
                continue;
            }
            let current = self.chosen[&slot];
            let replacement = (current + 1 + rng.random_range(0..count - 1)) % count;
            self.chosen.insert(slot, replacement);
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Precedence, END, START};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assembly(name: &str, cost: f64, co2: f64, duration: f64) -> Assembly {
        Assembly::new(name, "", cost, co2, duration)
    }

    fn fixture() -> (Arc<OptionSet<Assembly>>, Arc<DurationEvaluator>) {
        let mut slots = BTreeMap::new();
        slots.insert(
            "A".to_string(),
            vec![assembly("A0", 10.0, 1.0, 5.0), assembly("A1", 20.0, 2.0, 3.0)],
        );
        slots.insert(
            "B".to_string(),
            vec![
                assembly("B0", 5.0, 3.0, 4.0),
                assembly("B1", 8.0, 1.0, 2.0),
                assembly("B2", 2.0, 9.0, 6.0),
            ],
        );
        slots.insert("C".to_string(), vec![assembly("C0", 1.0, 1.0, 1.0)]);

        let options = Arc::new(OptionSet::new(slots).unwrap());
        let evaluator = Arc::new(DurationEvaluator::new(vec![
            Precedence::new("A", START, "B"),
            Precedence::new("B", "A", "C"),
            Precedence::new("C", "B", END),
        ]));
        (options, evaluator)
    }

    fn genome_with(indices: &[(&str, usize)]) -> ChoiceGenome<Assembly> {
        let (options, evaluator) = fixture();
        let choices = indices
            .iter()
            .map(|(slot, index)| (slot.to_string(), *index))
            .collect();
        ChoiceGenome::from_choices(options, evaluator, choices).unwrap()
    }

    #[test]
    fn test_random_genome_stays_in_bounds() {
        let (options, evaluator) = fixture();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let genome = ChoiceGenome::random(Arc::clone(&options), Arc::clone(&evaluator), &mut rng);
            for (slot, alternatives) in options.iter() {
                assert!(genome.chosen_index(slot).unwrap() < alternatives.len());
            }
        }
    }

    #[test]
    fn test_from_choices_validates_slots_and_indices() {
        let (options, evaluator) = fixture();

        let mut choices: BTreeMap<String, usize> =
            [("A", 0), ("B", 5), ("C", 0)].map(|(s, i)| (s.to_string(), i)).into();
        assert_eq!(
            ChoiceGenome::from_choices(Arc::clone(&options), Arc::clone(&evaluator), choices.clone())
                .unwrap_err(),
            ChoiceError::IndexOutOfRange {
                slot: "B".into(),
                index: 5,
                available: 3
            }
        );

        choices.remove("B");
        assert_eq!(
            ChoiceGenome::from_choices(Arc::clone(&options), Arc::clone(&evaluator), choices.clone())
                .unwrap_err(),
            ChoiceError::MissingSlot("B".into())
        );

        choices.insert("B".into(), 0);
        choices.insert("Z".into(), 0);
        assert_eq!(
            ChoiceGenome::from_choices(options, evaluator, choices).unwrap_err(),
            ChoiceError::UnknownSlot("Z".into())
        );
    }

    #[test]
    fn test_gene_sequence_is_slot_ordered() {
        let genome = genome_with(&[("A", 1), ("B", 2), ("C", 0)]);
        assert_eq!(genome.gene_sequence(), "120");
    }

    #[test]
    fn test_totals_sum_chosen_items() {
        let genome = genome_with(&[("A", 0), ("B", 1), ("C", 0)]);
        assert!((genome.total_cost() - (10.0 + 8.0 + 1.0)).abs() < 1e-9);
        assert!((genome.total_environmental_impact() - (1.0 + 1.0 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_total_duration_follows_critical_path() {
        // chain A0(5) -> B0(4) -> C0(1)
        let genome = genome_with(&[("A", 0), ("B", 0), ("C", 0)]);
        assert!((genome.total_duration().unwrap() - 10.0).abs() < 1e-9);

        // swapping in the faster options changes the path length
        let genome = genome_with(&[("A", 1), ("B", 1), ("C", 0)]);
        assert!((genome.total_duration().unwrap() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_crossover_swaps_tail_genes() {
        let (options, evaluator) = fixture();
        let choices_from = |indices: &[(&str, usize)]| {
            indices
                .iter()
                .map(|(slot, index)| (slot.to_string(), *index))
                .collect()
        };
        let mut left = ChoiceGenome::from_choices(
            Arc::clone(&options),
            Arc::clone(&evaluator),
            choices_from(&[("A", 0), ("B", 0), ("C", 0)]),
        )
        .unwrap();
        let mut right = ChoiceGenome::from_choices(
            options,
            evaluator,
            choices_from(&[("A", 1), ("B", 2), ("C", 0)]),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        left.crossover(&mut right, &mut rng);

        // whatever the point, genes at each slot are a swap or untouched,
        // and the multiset of genes per slot is preserved
        for slot in ["A", "B", "C"] {
            let mut pair = [
                left.chosen_index(slot).unwrap(),
                right.chosen_index(slot).unwrap(),
            ];
            pair.sort_unstable();
            let expected = match slot {
                "A" => [0, 1],
                "B" => [0, 2],
                _ => [0, 0],
            };
            assert_eq!(pair, expected);
        }
        // single-point over A, B, C admits exactly two outcomes: point
        // after A (B and C swap) or point after B (only C swaps, which is
        // invisible here since both parents chose C0)
        let outcome = (left.gene_sequence(), right.gene_sequence());
        assert!(
            outcome == ("020".to_string(), "100".to_string())
                || outcome == ("000".to_string(), "120".to_string()),
            "unexpected crossover outcome: {outcome:?}"
        );
    }

    #[test]
    fn test_mutation_picks_a_different_option() {
        let mut genome = genome_with(&[("A", 0), ("B", 1), ("C", 0)]);
        let mut rng = StdRng::seed_from_u64(21);
        let changed = genome.mutate(1.0, &mut rng);
        assert!(changed);
        // multi-option slots must have moved, the single-option slot cannot
        assert_ne!(genome.chosen_index("A").unwrap(), 0);
        assert_ne!(genome.chosen_index("B").unwrap(), 1);
        assert_eq!(genome.chosen_index("C").unwrap(), 0);
    }

    #[test]
    fn test_zero_probability_never_mutates() {
        let mut genome = genome_with(&[("A", 0), ("B", 1), ("C", 0)]);
        let before = genome.gene_sequence();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            assert!(!genome.mutate(0.0, &mut rng));
        }
        assert_eq!(genome.gene_sequence(), before);
    }
}
