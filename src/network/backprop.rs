//! Backpropagation over arbitrary routing.
//!
//! Layers are visited from output to input and neurons from last to first.
//! A hidden neuron's error is the sum, over its routed destinations, of the
//! destination's error times the weight on that connection. The weight is
//! obtained from the destination's replay cursor: inputs were appended to
//! each destination in ascending source order during the forward pass, so
//! visiting sources in descending order and popping one weight per route
//! pairs every connection with its own weight, whatever the routing looks
//! like.

use super::feedforward::Network;
use crate::error::NetworkError;

impl Network {
    /// Runs a forward pass on the current inputs, then propagates the error
    /// against `targets` back through the network, adjusting weights with
    /// the configured learning rate and momentum.
    pub fn propagate_error(&mut self, targets: &[f64]) -> Result<(), NetworkError> {
        let outputs = self.outputs()?;
        self.propagate_error_from(targets, &outputs)
    }

    /// Like [`propagate_error`](Self::propagate_error) but reuses `outputs`
    /// from a forward pass the caller has just run on the same inputs.
    ///
    /// Every non-input unit must have an activation function; otherwise the
    /// network is not ready for training and nothing is modified. Units
    /// whose activation is not differentiable pass error upstream but keep
    /// their weights.
    pub fn propagate_error_from(
        &mut self,
        targets: &[f64],
        outputs: &[f64],
    ) -> Result<(), NetworkError> {
        let n_out = self.output_count();
        for len in [targets.len(), outputs.len()] {
            if len != n_out {
                return Err(NetworkError::DimensionMismatch {
                    expected: n_out,
                    actual: len,
                });
            }
        }
        for (layer_i, layer) in self.layers.iter().enumerate().skip(1) {
            if let Some(neuron) = layer.units.iter().position(|u| u.activation().is_none()) {
                return Err(NetworkError::MissingActivation {
                    layer: layer_i,
                    neuron,
                });
            }
        }

        let learning_rate = self.config.learning_rate;
        let momentum = self.config.momentum;

        // Errors of the layer after the one being processed.
        let mut downstream: Vec<f64> = targets.iter().zip(outputs).map(|(t, o)| t - o).collect();
        let last = self.layers.len() - 1;

        for layer_i in (1..=last).rev() {
            let (front, back) = self.layers.split_at_mut(layer_i + 1);
            let layer = &mut front[layer_i];
            let mut errors = vec![0.0; layer.len()];

            for neuron_i in (0..layer.len()).rev() {
                let error = if layer_i == last {
                    downstream[neuron_i]
                } else {
                    let next = &mut back[0];
                    let mut sum = 0.0;
                    for &dest in layer.routes.destinations(neuron_i) {
                        let (weight, _) = next.units[dest].pop_last_weight().ok_or_else(|| {
                            NetworkError::InvariantViolation(format!(
                                "neuron {dest} of layer {} ran out of weights during backpropagation",
                                layer_i + 1
                            ))
                        })?;
                        sum += weight * downstream[dest];
                    }
                    sum
                };
                errors[neuron_i] = error;

                let unit = &mut layer.units[neuron_i];
                let slope = unit
                    .activation()
                    .and_then(|a| a.derivative(unit.last_output()));
                if let Some(slope) = slope {
                    unit.adjust_weights(learning_rate, momentum, error * slope)?;
                }
            }
            downstream = errors;
        }
        Ok(())
    }
}
