//! Fast non-dominated sorting and crowding distance.
//!
//! The two rank/diversity primitives of NSGA-II, operating on index fronts
//! over a population slice.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic
//!   Algorithm: NSGA-II", IEEE Trans. Evolutionary Computation 6(2)

use super::types::Individual;
use std::cmp::Ordering;

/// Fast non-dominated sort.
///
/// Partitions the population into domination fronts and sets every
/// individual's rank (1 = Pareto-best) as a side effect. Fronts are
/// returned as index lists in ascending rank order.
///
/// # Complexity
///
/// O(M · N²) comparisons for N individuals and M objectives.
///
/// # Panics
///
/// Panics if `population` is empty.
pub fn fast_nondominated_sort<G>(population: &mut [Individual<G>]) -> Vec<Vec<usize>> {
    let n = population.len();
    assert!(n > 0, "population must not be empty");

    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut domination_count = vec![0usize; n];
    let mut first_front = Vec::new();

    for p in 0..n {
        for q in (p + 1)..n {
            if population[p].dominates(&population[q]) {
                dominated_by[p].push(q);
                domination_count[q] += 1;
            } else if population[q].dominates(&population[p]) {
                dominated_by[q].push(p);
                domination_count[p] += 1;
            }
        }
        if domination_count[p] == 0 {
            population[p].set_rank(1);
            first_front.push(p);
        }
    }

    let mut fronts = vec![first_front];
    loop {
        let current = fronts.last().expect("seeded with the first front");
        let mut next_front = Vec::new();
        for &p in current {
            for &q in &dominated_by[p] {
                domination_count[q] -= 1;
                if domination_count[q] == 0 {
                    population[q].set_rank(fronts.len() + 1);
                    next_front.push(q);
                }
            }
        }
        if next_front.is_empty() {
            break;
        }
        fronts.push(next_front);
    }
    fronts
}

/// Crowding-distance assignment for one front.
///
/// Resets every front member's distance to 0, then for each objective sets
/// the two boundary members to +∞ and adds the normalized neighbor gap to
/// each interior member. When an objective's minimum and maximum coincide
/// across the front, that objective contributes nothing (no division by
/// zero).
pub fn crowding_distance_assignment<G>(population: &mut [Individual<G>], front: &[usize]) {
    if front.is_empty() {
        return;
    }

    for &i in front {
        population[i].set_crowding_distance(0.0);
    }

    let objective_count = population[front[0]].objectives().len();
    let mut sorted: Vec<usize> = front.to_vec();

    for m in 0..objective_count {
        sorted.sort_by(|&a, &b| {
            population[a]
                .objective(m)
                .partial_cmp(&population[b].objective(m))
                .unwrap_or(Ordering::Equal)
        });

        let first = sorted[0];
        let last = sorted[sorted.len() - 1];
        population[first].set_crowding_distance(f64::INFINITY);
        population[last].set_crowding_distance(f64::INFINITY);

        let min = population[first].objective(m);
        let max = population[last].objective(m);
        if min == max {
            continue;
        }
        let range = max - min;

        for w in 1..sorted.len() - 1 {
            let gap = population[sorted[w + 1]].objective(m)
                - population[sorted[w - 1]].objective(m);
            let updated = population[sorted[w]].crowding_distance() + gap / range;
            population[sorted[w]].set_crowding_distance(updated);
        }
    }
}
