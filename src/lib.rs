//! Evolvable routed feedforward networks.
//!
//! A feedforward neural network whose per-neuron connectivity is an explicit,
//! editable routing graph rather than a fixed dense map, trainable two ways:
//!
//! - **Backpropagation** with momentum, generalized to arbitrary routing
//!   ([`network::Network::propagate_error`], [`learner::SupervisedLearner`]).
//! - **Genetic algorithm** over the raw IEEE-754 bit patterns of the weights
//!   ([`ga::GeneticAlgorithm`]), with roulette selection, hall-of-fame
//!   elitism, bit-resolution single-point crossover and per-bit mutation.
//!
//! Both meet at the [`genome::Genome`]: every weight and bias of a network,
//! in a fixed (layer, neuron, weight, bias) order, bit-cast to `u64` words.
//!
//! # Modules
//!
//! - [`network`]: units, activations, routing, lazy weight reconciliation,
//!   forward pass, backpropagation, binary persistence
//! - [`genome`]: bit-level chromosome
//! - [`ga`]: population and generation stepping
//! - [`learner`]: supervised training loop with a held-out error check
//! - [`error`]: error types
//!
//! # Features
//!
//! - `parallel`: score GA populations with rayon
//! - `serde`: `Serialize`/`Deserialize` on configs and genomes
//!
//! The crate logs through the [`log`] facade and never installs a logger.

pub mod error;
pub mod ga;
pub mod genome;
pub mod learner;
pub mod network;
