//! Core trait and value types for the GA.
//!
//! The [`FitnessEvaluator`] is the contract between the generic generation
//! loop and the problem being solved: it scores a network, with negative
//! scores marking an individual as not viable.

use crate::network::Network;

/// Fitness score. Higher is better; negative means "not viable".
pub type Fitness = i64;

/// Scores networks for the genetic algorithm.
///
/// The evaluator receives the network mutably so it can feed inputs, run
/// forward passes and let lazy weight initialization happen.
///
/// # Implementing
///
/// ```
/// use routed_evo::ga::{Fitness, FitnessEvaluator};
/// use routed_evo::network::Network;
///
/// struct OutputsOne;
///
/// impl FitnessEvaluator for OutputsOne {
///     fn score_fitness(&self, network: &mut Network) -> Fitness {
///         match network.evaluate(&[1.0]) {
///             Ok(out) if out[0].is_finite() => (100.0 - (1.0 - out[0]).abs()).max(0.0) as Fitness,
///             _ => -1,
///         }
///     }
/// }
/// ```
///
/// Closures of type `Fn(&mut Network) -> Fitness` implement this trait too.
///
/// # Thread Safety
///
/// `FitnessEvaluator` must be `Send + Sync` because individuals may be
/// scored in parallel using rayon.
pub trait FitnessEvaluator: Send + Sync {
    /// Scores one network. Negative values mean the individual is not
    /// viable and must be replaced.
    fn score_fitness(&self, network: &mut Network) -> Fitness;
}

impl<F> FitnessEvaluator for F
where
    F: Fn(&mut Network) -> Fitness + Send + Sync,
{
    fn score_fitness(&self, network: &mut Network) -> Fitness {
        self(network)
    }
}

/// Identity of a network inside a population.
///
/// Ids are never reused within one [`GeneticAlgorithm`](super::GeneticAlgorithm).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkId(pub(crate) u64);

impl NetworkId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// One population slot.
#[derive(Debug, Clone)]
pub(crate) struct Member {
    pub(crate) id: NetworkId,
    pub(crate) network: Network,
    /// Last viable fitness; never negative.
    pub(crate) fitness: Fitness,
}
