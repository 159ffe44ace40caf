//! Routed feedforward networks.
//!
//! A [`Network`] is an ordered stack of layers (input, hidden, output) of
//! [`Unit`]s. Instead of a fixed dense map between layers, every layer owns a
//! [`RoutingGraph`] saying which neurons of the next layer each of its
//! neurons feeds. Default routing is complete bipartite; any neuron's route
//! can be overridden to build sparse or irregular topologies.
//!
//! # Core Types
//!
//! - [`Unit`]: bias, weights and activation of one neuron
//! - [`Activation`] / [`ActivationFn`]: scalar transfer functions
//! - [`RoutingGraph`] / [`Layer`]: per-layer connectivity
//! - [`Network`]: structure, lazy weight reconciliation, forward pass,
//!   backpropagation, chromosome encoding and persistence
//! - [`WeightInit`] / [`NetworkConfig`]: weight policy and training parameters
//!
//! # Lifecycle
//!
//! Structural edits (adding/removing hidden layers, re-routing, changing the
//! weight policy) invalidate weights ([`WeightState::Dirty`]). They are
//! reconciled against each unit's fan-in on the next evaluation, keeping as
//! many existing weights as possible.
//!
//! # References
//!
//! - Rumelhart, Hinton & Williams (1986), "Learning representations by
//!   back-propagating errors"

mod activation;
mod backprop;
mod config;
mod feedforward;
mod persist;
mod routing;
mod unit;

pub use activation::{Activation, ActivationFn};
pub use config::{NetworkConfig, WeightInit};
pub use feedforward::{Network, WeightState};
pub use routing::{Layer, RoutingGraph};
pub use unit::Unit;
