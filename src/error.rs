//! Error types.
//!
//! Structural problems (wrong counts, bad indices) and configuration
//! problems (missing activation, empty population) are both reported as
//! values; nothing in this crate aborts the process on bad input.

use crate::ga::NetworkId;
use crate::network::Network;
use thiserror::Error;

/// Errors raised by [`Network`](crate::network::Network) and its units.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NetworkError {
    /// A vector did not have the length the operation required.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A layer index was out of range (or addressed the input layer where
    /// that is not allowed).
    #[error("invalid layer index {0}")]
    InvalidLayer(usize),

    #[error("invalid neuron {neuron} in layer {layer}")]
    InvalidNeuron { layer: usize, neuron: usize },

    /// A route points past the end of the next layer.
    #[error("route from layer {layer} neuron {neuron} targets missing neuron {destination}")]
    InvalidRoute {
        layer: usize,
        neuron: usize,
        destination: usize,
    },

    /// Input and output are never wired directly; evaluation needs at least
    /// one hidden layer.
    #[error("network has no hidden layers")]
    NoHiddenLayers,

    #[error("neuron {neuron} in layer {layer} has no activation function")]
    MissingActivation { layer: usize, neuron: usize },

    /// Weights could not be reconciled into a usable state.
    #[error("network weights are not initialized")]
    NotInitialized,

    #[error("chromosome size mismatch: expected {expected}, got {actual}")]
    ChromosomeSize { expected: usize, actual: usize },

    /// An internal invariant was broken. This indicates a defect rather than
    /// bad input.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

/// Errors raised by the [`GeneticAlgorithm`](crate::ga::GeneticAlgorithm).
#[derive(Debug, Error)]
pub enum GaError {
    #[error("population is empty")]
    EmptyPopulation,

    /// The network could not produce a chromosome (not initialized).
    #[error("network has an empty chromosome")]
    ZeroChromosome,

    #[error("chromosome size {actual} does not match population size {expected}")]
    ChromosomeSizeMismatch { expected: usize, actual: usize },

    #[error("network {0:?} is not in the population")]
    UnknownNetwork(NetworkId),

    /// Some individuals never produced a viable fitness within the retry
    /// ceiling. They were kept with fitness 0.
    #[error("{failures} individual(s) still not viable after {attempts} repair attempts")]
    RepairExhausted { failures: usize, attempts: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// A network refused by
/// [`GeneticAlgorithm::add_network`](crate::ga::GeneticAlgorithm::add_network).
/// The network is handed back unchanged apart from the lazy weight
/// initialization its scoring may have triggered.
#[derive(Debug, Error)]
#[error("network rejected: {reason}")]
pub struct AdmissionError {
    #[source]
    pub reason: GaError,
    pub network: Network,
}

impl AdmissionError {
    pub fn into_network(self) -> Network {
        self.network
    }
}

impl From<AdmissionError> for GaError {
    fn from(err: AdmissionError) -> Self {
        err.reason
    }
}

/// Errors raised while reading or writing the persisted network format.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("corrupt network data: {0}")]
    Corrupt(String),
}

/// Errors raised by the [`SupervisedLearner`](crate::learner::SupervisedLearner).
#[derive(Debug, Error)]
pub enum LearnError {
    #[error("no training data")]
    NoData,

    #[error("sample has {actual} values, network expects {expected}")]
    SampleArity { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Network(#[from] NetworkError),
}
