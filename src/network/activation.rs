//! Activation functions.
//!
//! An activation is a stateless scalar transform applied to a unit's
//! weighted sum. Derivatives are taken with respect to the pre-activation
//! input but expressed in terms of the unit's last *output*, which is what
//! a unit has on hand during backpropagation (e.g. sigmoid: `y·(1 − y)`).

use std::fmt;
use std::sync::Arc;

/// A user-defined activation function.
///
/// # Implementing
///
/// ```
/// use routed_evo::network::ActivationFn;
///
/// #[derive(Debug)]
/// struct Relu;
///
/// impl ActivationFn for Relu {
///     fn evaluate(&self, x: f64) -> f64 {
///         x.max(0.0)
///     }
///     fn derivative(&self, y: f64) -> Option<f64> {
///         Some(if y > 0.0 { 1.0 } else { 0.0 })
///     }
/// }
/// ```
pub trait ActivationFn: Send + Sync + fmt::Debug {
    /// Maps the weighted sum to the unit's output.
    fn evaluate(&self, x: f64) -> f64;

    /// Slope at the point that produced output `y`, or `None` if the
    /// function is not differentiable.
    ///
    /// The default implementation reports "not differentiable".
    fn derivative(&self, _y: f64) -> Option<f64> {
        None
    }
}

/// Activation function attached to a [`Unit`](super::Unit).
#[derive(Debug, Clone)]
pub enum Activation {
    /// Passes the weighted sum through unchanged. Not differentiable for
    /// training purposes.
    Identity,

    /// Outputs 1 if the sum is at or above the threshold, 0 otherwise.
    Threshold(f64),

    /// Logistic function `1 / (1 + e^-x)`.
    Sigmoid,

    /// Hyperbolic tangent.
    TanH,

    /// A user-supplied function.
    Custom(Arc<dyn ActivationFn>),
}

impl Activation {
    /// Wraps a user-defined function.
    pub fn custom<F: ActivationFn + 'static>(f: F) -> Self {
        Activation::Custom(Arc::new(f))
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Activation::Identity => x,
            Activation::Threshold(t) => {
                if x >= *t {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::TanH => x.tanh(),
            Activation::Custom(f) => f.evaluate(x),
        }
    }

    /// Derivative expressed in terms of the last output `y`.
    pub fn derivative(&self, y: f64) -> Option<f64> {
        match self {
            Activation::Identity | Activation::Threshold(_) => None,
            Activation::Sigmoid => Some(y * (1.0 - y)),
            Activation::TanH => Some(1.0 - y * y),
            Activation::Custom(f) => f.derivative(y),
        }
    }

    pub fn is_differentiable(&self) -> bool {
        self.derivative(0.0).is_some()
    }
}
