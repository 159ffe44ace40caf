//! Selection: roulette-wheel parent choice and hall-of-fame elitism.
//!
//! Both work on a slice of fitness values indexed by population slot.
//! Negative values are treated as 0.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, ch. 1 (roulette wheel)
//! - De Jong (1975), elitist strategy

use super::types::Fitness;
use rand::Rng;

/// Fitness-proportionate selection.
///
/// Each slot owns a share of the wheel equal to its own fitness (tied
/// values are not merged). A uniform draw in `[0, total)` is taken and the
/// first slot whose running sum reaches the draw is returned; a zero-fitness
/// slot at the front of the wheel is therefore reachable on a draw of 0.
///
/// When the total is zero every slot is equally likely. Returns `None` for
/// an empty slice.
///
/// The wheel is summed in `u128`, so any `Fitness` values are accepted.
///
/// # Complexity
/// O(n) per selection (linear scan)
pub fn roulette<R: Rng>(fitnesses: &[Fitness], rng: &mut R) -> Option<usize> {
    let n = fitnesses.len();
    if n == 0 {
        return None;
    }

    let total: u128 = fitnesses.iter().map(|&f| share(f)).sum();
    if total == 0 {
        return Some(rng.random_range(0..n));
    }

    let draw = rng.random_range(0..total);
    let mut running = 0u128;
    for (i, &f) in fitnesses.iter().enumerate() {
        running += share(f);
        if running >= draw {
            return Some(i);
        }
    }

    Some(n - 1) // unreachable: running ends at total > draw
}

fn share(fitness: Fitness) -> u128 {
    fitness.max(0) as u128
}

/// Slots of the elite: the `size` fittest individuals plus every other
/// individual tied with the weakest of them. Returned in slot order.
pub fn hall_of_fame(fitnesses: &[Fitness], size: usize) -> Vec<usize> {
    if size == 0 || fitnesses.is_empty() {
        return Vec::new();
    }

    let mut sorted = fitnesses.to_vec();
    sorted.sort_unstable();
    let cutoff = sorted[sorted.len() - size.min(sorted.len())];

    fitnesses
        .iter()
        .enumerate()
        .filter(|(_, &f)| f >= cutoff)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn counts(fitnesses: &[Fitness], draws: usize, seed: u64) -> Vec<u32> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut counts = vec![0u32; fitnesses.len()];
        for _ in 0..draws {
            counts[roulette(fitnesses, &mut rng).unwrap()] += 1;
        }
        counts
    }

    #[test]
    fn test_roulette_proportional() {
        let c = counts(&[10, 30, 60], 10_000, 42);
        assert!(c[2] > c[1] && c[1] > c[0], "not proportional: {c:?}");
        assert!((5000..7000).contains(&c[2]), "share off: {c:?}");
    }

    #[test]
    fn test_roulette_ties_weighted_by_count() {
        // Two slots at 50 together weigh as much as one slot at 100.
        let c = counts(&[50, 50, 100], 20_000, 7);
        let tied = c[0] + c[1];
        assert!(
            (tied as i64 - c[2] as i64).abs() < 1000,
            "tied slots should match the single slot: {c:?}"
        );
    }

    #[test]
    fn test_roulette_zero_total_is_uniform() {
        let c = counts(&[0, 0, 0, 0], 10_000, 3);
        for &x in &c {
            assert!(x > 2000, "expected uniform, got {c:?}");
        }
    }

    #[test]
    fn test_roulette_reaches_zero_fitness_front_slot() {
        let c = counts(&[0, 3], 10_000, 11);
        assert!(c[0] > 0, "front zero slot never chosen: {c:?}");
        assert!(c[1] > c[0]);
    }

    #[test]
    fn test_roulette_negative_treated_as_zero() {
        let c = counts(&[-100, 5], 1000, 5);
        assert!(c[1] > 0);
    }

    #[test]
    fn test_roulette_near_max_fitness() {
        let c = counts(&[Fitness::MAX, Fitness::MAX / 2, Fitness::MAX / 2, Fitness::MAX], 4000, 13);
        assert_eq!(c.iter().sum::<u32>(), 4000);
        assert!(c.iter().all(|&x| x > 0), "{c:?}");
        assert!(c[0] > c[1] && c[3] > c[2], "{c:?}");
    }

    #[test]
    fn test_roulette_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(roulette(&[], &mut rng), None);
    }

    #[test]
    fn test_hall_of_fame_top_k() {
        assert_eq!(hall_of_fame(&[5, 9, 1, 7], 2), vec![1, 3]);
        assert_eq!(hall_of_fame(&[5, 9, 1, 7], 0), Vec::<usize>::new());
        assert_eq!(hall_of_fame(&[5, 9], 10), vec![0, 1]);
    }

    #[test]
    fn test_hall_of_fame_ties_grow_elite() {
        // Cutoff value 7 is shared by three slots.
        assert_eq!(hall_of_fame(&[7, 9, 7, 1, 7], 2), vec![0, 1, 2, 4]);
    }
}
