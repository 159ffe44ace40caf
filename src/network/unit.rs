//! The computational neuron.

use super::activation::Activation;
use crate::error::NetworkError;

/// A single neuron: bias, one weight per connected input, and the state of
/// its most recent evaluation.
///
/// Besides the forward computation, a unit keeps what backpropagation needs:
/// a snapshot of the weights that produced the last output (taken before any
/// update) and a reverse cursor over that snapshot. The owning network pops
/// weights off the cursor in the exact reverse of the order the inputs were
/// fed, which is how error is attributed along arbitrary routes.
#[derive(Debug, Clone, Default)]
pub struct Unit {
    activation: Option<Activation>,
    bias: f64,
    weights: Vec<f64>,
    inputs: Vec<f64>,
    last_output: f64,
    // Momentum terms, one per weight.
    deltas: Vec<f64>,
    // Weights as they were when `last_output` was computed.
    snapshot: Vec<f64>,
    // Number of snapshot entries not yet popped.
    cursor: usize,
}

impl Unit {
    /// A unit with no weights, zero bias and no activation function.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_activation(activation: Activation) -> Self {
        Self {
            activation: Some(activation),
            ..Self::default()
        }
    }

    pub fn activation(&self) -> Option<&Activation> {
        self.activation.as_ref()
    }

    pub fn set_activation(&mut self, activation: Activation) {
        self.activation = Some(activation);
    }

    /// Removes the activation. The unit then evaluates as identity but
    /// cannot be trained by backpropagation.
    pub fn clear_activation(&mut self) {
        self.activation = None;
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Replaces the weight vector.
    ///
    /// Momentum terms are zeroed and the replay cursor is reset to "not
    /// started" over the new weights.
    pub fn set_weights(&mut self, values: Vec<f64>) {
        self.deltas = vec![0.0; values.len()];
        self.snapshot = values.clone();
        self.cursor = values.len();
        self.weights = values;
    }

    pub fn weight_count(&self) -> usize {
        self.weights.len()
    }

    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    pub fn set_inputs(&mut self, values: Vec<f64>) {
        self.inputs = values;
    }

    /// The output produced by the last successful [`output`](Self::output).
    pub fn last_output(&self) -> f64 {
        self.last_output
    }

    /// Computes `activation(bias + Σ wᵢ·xᵢ)`.
    ///
    /// On success the pre-update weight snapshot is refreshed and the replay
    /// cursor rewound, ready for a backward sweep.
    pub fn output(&mut self) -> Result<f64, NetworkError> {
        if self.weights.len() != self.inputs.len() {
            return Err(NetworkError::DimensionMismatch {
                expected: self.weights.len(),
                actual: self.inputs.len(),
            });
        }

        let sum = self.bias
            + self
                .weights
                .iter()
                .zip(&self.inputs)
                .map(|(w, x)| w * x)
                .sum::<f64>();
        let out = match &self.activation {
            Some(a) => a.evaluate(sum),
            None => sum,
        };

        self.last_output = out;
        self.snapshot.clone_from(&self.weights);
        self.cursor = self.snapshot.len();
        Ok(out)
    }

    /// Applies one gradient step with momentum.
    ///
    /// `signal` is the error already multiplied by the activation slope.
    /// For each weight, `Δ = rate·signal·xᵢ + momentum·Δ_prev`; the bias moves
    /// by `rate·signal`.
    pub fn adjust_weights(
        &mut self,
        learning_rate: f64,
        momentum: f64,
        signal: f64,
    ) -> Result<(), NetworkError> {
        if self.weights.len() != self.inputs.len() {
            return Err(NetworkError::DimensionMismatch {
                expected: self.weights.len(),
                actual: self.inputs.len(),
            });
        }
        if self.deltas.len() != self.weights.len() {
            self.deltas = vec![0.0; self.weights.len()];
        }

        self.bias += learning_rate * signal;
        for ((w, d), x) in self
            .weights
            .iter_mut()
            .zip(self.deltas.iter_mut())
            .zip(&self.inputs)
        {
            let delta = learning_rate * signal * x + momentum * *d;
            *w += delta;
            *d = delta;
        }
        Ok(())
    }

    /// Pops the next `(weight, input)` pair in reverse order from the
    /// pre-update snapshot, or `None` once the sweep is exhausted.
    pub fn pop_last_weight(&mut self) -> Option<(f64, f64)> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        let weight = self.snapshot[self.cursor];
        let input = self.inputs.get(self.cursor).copied().unwrap_or(0.0);
        Some((weight, input))
    }
}
