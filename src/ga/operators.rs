//! Bit-level genetic operators on [`Genome`]s.
//!
//! Both operators work on the raw IEEE-754 bit patterns of the weights, so a
//! single flipped bit may turn a weight into NaN, an infinity or a denormal.
//! Downstream code (the fitness function in particular) must tolerate that.
//!
//! # Crossover
//!
//! - [`crossover`]: single-point crossover at bit resolution, or a whole
//!   copy of one parent
//!
//! # Mutation
//!
//! - [`mutate`]: independent per-bit flip
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*, ch. 6

use crate::genome::Genome;
use rand::Rng;

/// Produces one child from two parents.
///
/// With probability `rate` the child starts as the mother and takes every bit
/// from a uniformly drawn offset onward from the father. Otherwise the child
/// is a copy of one parent picked 50/50.
///
/// # Panics
/// Panics if the parents have different lengths.
pub fn crossover<R: Rng>(mother: &Genome, father: &Genome, rate: f64, rng: &mut R) -> Genome {
    assert_eq!(mother.len(), father.len(), "parents must have equal length");

    if mother.is_empty() {
        return mother.clone();
    }

    if rate > 0.0 && rng.random_bool(rate.min(1.0)) {
        let offset = rng.random_range(0..mother.bit_len());
        let mut child = mother.clone();
        child.splice_from(father, offset);
        child
    } else if rng.random_bool(0.5) {
        mother.clone()
    } else {
        father.clone()
    }
}

/// Flips every bit independently with probability `rate`.
///
/// # Complexity
/// O(bits)
pub fn mutate<R: Rng>(genome: &mut Genome, rate: f64, rng: &mut R) {
    if rate <= 0.0 {
        return;
    }
    let rate = rate.min(1.0);
    for bit in 0..genome.bit_len() {
        if rng.random_bool(rate) {
            genome.flip_bit(bit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ones(len: usize) -> Genome {
        Genome::from_words(vec![u64::MAX; len])
    }

    #[test]
    fn test_full_mutation_complements() {
        let parent = Genome::from_values(&[0.5, 0.5, 0.5]);
        let mut child = parent.clone();
        mutate(&mut child, 1.0, &mut StdRng::seed_from_u64(1));
        for (c, p) in child.words().iter().zip(parent.words()) {
            assert_eq!(*c, !*p);
        }
    }

    #[test]
    fn test_zero_mutation_is_identity() {
        let parent = Genome::from_values(&[1.25, -3.0]);
        let mut child = parent.clone();
        mutate(&mut child, 0.0, &mut StdRng::seed_from_u64(1));
        assert_eq!(child, parent);
    }

    #[test]
    fn test_no_crossover_copies_a_parent() {
        let mother = ones(2);
        let father = Genome::zeroed(2);
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = (false, false);
        for _ in 0..64 {
            let child = crossover(&mother, &father, 0.0, &mut rng);
            if child == mother {
                seen.0 = true;
            } else {
                assert_eq!(child, father);
                seen.1 = true;
            }
        }
        assert!(seen.0 && seen.1, "both parents should be picked");
    }

    #[test]
    fn test_empty_genome() {
        let empty = Genome::zeroed(0);
        let child = crossover(&empty, &empty, 1.0, &mut StdRng::seed_from_u64(0));
        assert!(child.is_empty());
    }

    proptest! {
        #[test]
        fn prop_crossover_single_boundary(seed in any::<u64>(), len in 1usize..5) {
            let mother = ones(len);
            let father = Genome::zeroed(len);
            let child = crossover(&mother, &father, 1.0, &mut StdRng::seed_from_u64(seed));

            // Mother prefix of ones, father suffix of zeros.
            prop_assert!(child.transitions() <= 1);
            prop_assert!(!child.bit(child.bit_len() - 1));
            let boundary = (0..child.bit_len()).find(|&i| !child.bit(i)).unwrap();
            prop_assert!((boundary..child.bit_len()).all(|i| !child.bit(i)));
        }
    }
}
