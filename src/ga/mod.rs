//! Genetic algorithm over network weights.
//!
//! A population of structurally identical [`Network`](crate::network::Network)s
//! is evolved by rewriting their chromosomes: the bit patterns of every
//! weight and bias. Users supply the problem by implementing
//! [`FitnessEvaluator`] (or passing a closure).
//!
//! # Key Types
//!
//! - [`GeneticAlgorithm`]: population ownership and generation stepping
//! - [`GaConfig`]: operator rates, elitism, repair ceiling, seeding
//! - [`NetworkId`]: stable identity of a population member
//!
//! # Submodules
//!
//! - [`operators`]: bit-level crossover and mutation
//! - [`selection`]: roulette-wheel selection and hall-of-fame elitism
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Montana & Davis (1989), "Training Feedforward Neural Networks Using
//!   Genetic Algorithms"

mod config;
pub mod operators;
mod runner;
pub mod selection;
mod types;

pub use config::GaConfig;
pub use runner::GeneticAlgorithm;
pub use types::{Fitness, FitnessEvaluator, NetworkId};
