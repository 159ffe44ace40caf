//! Multilayer feedforward network with explicit per-layer routing.
//!
//! Layers are stored in order: input, zero or more hidden layers, output.
//! Neurons are addressed by `(layer, index)`; a layer's [`RoutingGraph`]
//! only ever points into the immediately following layer.
//!
//! Weights are lazily valid. Structural and routing changes mark the
//! network [`WeightState::Dirty`]; the next evaluation (or an explicit
//! [`Network::force_weight_update`]) reconciles every unit's weight count
//! with its current fan-in according to the configured [`WeightInit`].

use super::activation::Activation;
use super::config::{NetworkConfig, WeightInit};
use super::routing::{Layer, RoutingGraph};
use super::unit::Unit;
use crate::error::NetworkError;
use crate::genome::Genome;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Where a network's weights stand relative to its topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightState {
    /// Freshly constructed; weights have never been reconciled.
    Uninitialized,
    /// Topology, routing or weight policy changed since the last
    /// reconciliation.
    Dirty,
    /// Every unit has one weight per incoming connection.
    Ready,
}

/// A routed multilayer feedforward network.
///
/// # Usage
///
/// ```
/// use routed_evo::network::{Activation, Network};
///
/// let mut net = Network::new(2, 1, 3).with_seed(7);
/// net.add_hidden_layer();
/// net.set_random_weights(-1, 1);
/// net.set_activations(Activation::Sigmoid);
///
/// let out = net.evaluate(&[0.5, -0.5]).unwrap();
/// assert_eq!(out.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Network {
    input_count: usize,
    output_count: usize,
    layer_size: usize,
    pub(crate) layers: Vec<Layer>,
    pub(crate) weight_init: WeightInit,
    pub(crate) config: NetworkConfig,
    pub(crate) state: WeightState,
    pending_inputs: Vec<f64>,
    rng: StdRng,
}

impl Network {
    /// Creates a network with `inputs` input neurons, `outputs` output
    /// neurons and no hidden layers. `layer_size` is the default width of
    /// hidden layers added later.
    pub fn new(inputs: usize, outputs: usize, layer_size: usize) -> Self {
        let mut input = Layer::with_units(inputs);
        for unit in &mut input.units {
            // The input layer is a pass-through stage.
            unit.set_weights(vec![1.0]);
        }
        input.refresh_default_routing(outputs);

        let mut output = Layer::with_units(outputs);
        output.routes = RoutingGraph::identity(outputs);

        Self {
            input_count: inputs,
            output_count: outputs,
            layer_size,
            layers: vec![input, output],
            weight_init: WeightInit::None,
            config: NetworkConfig::default(),
            state: WeightState::Uninitialized,
            pending_inputs: Vec::new(),
            rng: StdRng::seed_from_u64(rand::random()),
        }
    }

    /// Seeds the generator used by [`WeightInit::Random`].
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_config(mut self, config: NetworkConfig) -> Self {
        self.config = config;
        self
    }

    // ---- Shape ----

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Default width of hidden layers.
    pub fn layer_size(&self) -> usize {
        self.layer_size
    }

    /// Number of layers including input and output.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn hidden_layer_count(&self) -> usize {
        self.layers.len() - 2
    }

    /// Total number of neurons in all layers.
    pub fn neuron_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn weight_state(&self) -> WeightState {
        self.state
    }

    pub fn weight_init(&self) -> WeightInit {
        self.weight_init
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    // ---- Structure ----

    /// Appends a hidden layer of the default width just before the output.
    pub fn add_hidden_layer(&mut self) {
        self.add_hidden_layer_sized(self.layer_size);
    }

    pub fn add_hidden_layers(&mut self, count: usize) {
        for _ in 0..count {
            self.add_hidden_layer();
        }
    }

    /// Appends a hidden layer of `size` neurons just before the output.
    pub fn add_hidden_layer_sized(&mut self, size: usize) {
        let position = self.layers.len() - 1;
        self.place_layer(position, size);
    }

    /// Inserts a hidden layer so that it ends up at layer index `position`.
    ///
    /// Valid positions run from 1 (right after the input) to
    /// `layer_count() - 1` (right before the output).
    pub fn insert_hidden_layer(&mut self, position: usize, size: usize) -> Result<(), NetworkError> {
        if position == 0 || position >= self.layers.len() {
            return Err(NetworkError::InvalidLayer(position));
        }
        self.place_layer(position, size);
        Ok(())
    }

    fn place_layer(&mut self, position: usize, size: usize) {
        let mut layer = Layer::with_units(size);
        layer.refresh_default_routing(self.layers[position].len());
        self.layers.insert(position, layer);
        // The layer in front now feeds the new one.
        self.layers[position - 1].refresh_default_routing(size);
        self.mark_dirty();
    }

    /// Removes the hidden layer at `index`.
    ///
    /// The preceding layer is re-routed to the new next layer if it still
    /// uses default routing; custom routes are kept as they are.
    pub fn remove_hidden_layer(&mut self, index: usize) -> Result<(), NetworkError> {
        if index == 0 || index + 1 >= self.layers.len() {
            return Err(NetworkError::InvalidLayer(index));
        }
        self.layers.remove(index);
        let next_len = self.layers[index].len();
        let previous = &mut self.layers[index - 1];
        if previous.default_routing {
            previous.refresh_default_routing(next_len);
        } else {
            debug!("layer {} keeps custom routing after removal of layer {index}", index - 1);
        }
        self.mark_dirty();
        Ok(())
    }

    /// Routes neuron `neuron` of layer `layer` to `destinations` in the
    /// next layer, replacing its previous route.
    ///
    /// The layer stops using default routing. The output layer's routing is
    /// fixed and cannot be changed.
    pub fn set_route(
        &mut self,
        layer: usize,
        neuron: usize,
        destinations: Vec<usize>,
    ) -> Result<(), NetworkError> {
        if layer + 1 >= self.layers.len() {
            return Err(NetworkError::InvalidLayer(layer));
        }
        if neuron >= self.layers[layer].len() {
            return Err(NetworkError::InvalidNeuron { layer, neuron });
        }
        let next_len = self.layers[layer + 1].len();
        if let Some(&bad) = destinations.iter().find(|&&d| d >= next_len) {
            return Err(NetworkError::InvalidRoute {
                layer,
                neuron,
                destination: bad,
            });
        }

        let target = &mut self.layers[layer];
        target.routes.set_route(neuron, destinations);
        target.default_routing = false;
        self.mark_dirty();
        Ok(())
    }

    /// Copies the routing of `source`, which must have the same shape.
    /// Weights are left untouched.
    pub fn copy_layout(&mut self, source: &Network) -> Result<(), NetworkError> {
        for (expected, actual) in [
            (self.input_count, source.input_count),
            (self.output_count, source.output_count),
            (self.layer_size, source.layer_size),
        ] {
            if expected != actual {
                return Err(NetworkError::DimensionMismatch { expected, actual });
            }
        }
        if source.layers.len() != self.layers.len() {
            return Err(NetworkError::DimensionMismatch {
                expected: self.layers.len(),
                actual: source.layers.len(),
            });
        }
        if let Some(i) = self
            .layers
            .iter()
            .zip(&source.layers)
            .position(|(a, b)| a.len() != b.len())
        {
            return Err(NetworkError::InvalidLayer(i));
        }

        for (mine, theirs) in self.layers.iter_mut().zip(&source.layers) {
            mine.routes = theirs.routes.clone();
            mine.default_routing = theirs.default_routing;
        }
        self.mark_dirty();
        Ok(())
    }

    // ---- Units ----

    /// The unit at `(layer, neuron)`. The input layer is not addressable.
    pub fn unit(&self, layer: usize, neuron: usize) -> Option<&Unit> {
        if layer == 0 {
            return None;
        }
        self.layers.get(layer)?.units.get(neuron)
    }

    pub fn unit_mut(&mut self, layer: usize, neuron: usize) -> Option<&mut Unit> {
        if layer == 0 {
            return None;
        }
        self.layers.get_mut(layer)?.units.get_mut(neuron)
    }

    fn layer_mut(&mut self, layer: usize) -> Result<&mut Layer, NetworkError> {
        if layer == 0 {
            return Err(NetworkError::InvalidLayer(layer));
        }
        self.layers
            .get_mut(layer)
            .ok_or(NetworkError::InvalidLayer(layer))
    }

    /// Gives every unit of `layer` the weight vector `values`.
    pub fn set_layer_weights(&mut self, layer: usize, values: &[f64]) -> Result<(), NetworkError> {
        for unit in &mut self.layer_mut(layer)?.units {
            unit.set_weights(values.to_vec());
        }
        Ok(())
    }

    /// Sets the activation of every non-input unit.
    pub fn set_activations(&mut self, activation: Activation) {
        for layer in self.layers.iter_mut().skip(1) {
            for unit in &mut layer.units {
                unit.set_activation(activation.clone());
            }
        }
    }

    pub fn set_layer_activations(
        &mut self,
        layer: usize,
        activation: Activation,
    ) -> Result<(), NetworkError> {
        for unit in &mut self.layer_mut(layer)?.units {
            unit.set_activation(activation.clone());
        }
        Ok(())
    }

    /// Sets the bias of every non-input unit.
    pub fn set_biases(&mut self, bias: f64) {
        for layer in self.layers.iter_mut().skip(1) {
            for unit in &mut layer.units {
                unit.set_bias(bias);
            }
        }
    }

    pub fn set_layer_biases(&mut self, layer: usize, bias: f64) -> Result<(), NetworkError> {
        for unit in &mut self.layer_mut(layer)?.units {
            unit.set_bias(bias);
        }
        Ok(())
    }

    // ---- Weight policy ----

    pub fn set_weight_init(&mut self, init: WeightInit) {
        self.weight_init = init;
        self.mark_dirty();
    }

    /// New weights are drawn uniformly from `[lower, upper]`.
    pub fn set_random_weights(&mut self, lower: i32, upper: i32) {
        self.set_weight_init(WeightInit::Random { lower, upper });
    }

    /// New weights are all `value`.
    pub fn set_fixed_weights(&mut self, value: f64) {
        self.set_weight_init(WeightInit::Fixed(value));
    }

    pub fn set_learning_rate(&mut self, rate: f64) {
        self.config.learning_rate = rate;
    }

    pub fn set_momentum(&mut self, momentum: f64) {
        self.config.momentum = momentum;
    }

    fn mark_dirty(&mut self) {
        if self.state == WeightState::Ready {
            self.state = WeightState::Dirty;
        }
    }

    /// Per-layer fan-in of every unit under the current routing.
    pub(crate) fn fan_ins(&self) -> Vec<Vec<usize>> {
        let mut fan_ins = Vec::with_capacity(self.layers.len());
        fan_ins.push(vec![1; self.layers[0].len()]);
        for pair in self.layers.windows(2) {
            fan_ins.push(pair[0].routes.fan_in(pair[1].len()));
        }
        fan_ins
    }

    /// Checks every non-output layer's routes against the next layer.
    pub(crate) fn validate_routing(&self) -> Result<(), NetworkError> {
        for (i, pair) in self.layers.windows(2).enumerate() {
            pair[0].routes.validate(i, pair[1].len())?;
        }
        Ok(())
    }

    /// Resizes every unit's weights to its fan-in using `init` for new
    /// weights. Does nothing for [`WeightInit::None`].
    fn reconcile(&mut self, init: WeightInit) -> Result<(), NetworkError> {
        if init == WeightInit::None {
            return Ok(());
        }
        self.validate_routing()?;
        let fan_ins = self.fan_ins();
        for (layer_i, (layer, fan_in)) in self.layers.iter_mut().zip(&fan_ins).enumerate() {
            for (unit, &wanted) in layer.units.iter_mut().zip(fan_in) {
                if unit.weight_count() == wanted {
                    continue;
                }
                let mut weights = unit.weights().to_vec();
                weights.truncate(wanted);
                while weights.len() < wanted {
                    let w = if layer_i == 0 {
                        1.0
                    } else {
                        init.draw(&mut self.rng).unwrap_or(0.0)
                    };
                    weights.push(w);
                }
                unit.set_weights(weights);
            }
        }
        Ok(())
    }

    /// Reconciles weights with the current topology immediately, whatever
    /// the current [`WeightState`].
    pub fn force_weight_update(&mut self) -> Result<(), NetworkError> {
        self.reconcile(self.weight_init)?;
        self.check_weights()
    }

    /// Makes sure weights are consistent with the topology, reconciling if
    /// needed. Fails with [`NetworkError::NotInitialized`] if the policy is
    /// [`WeightInit::None`] and some unit's weights do not match its fan-in.
    pub fn ensure_initialized(&mut self) -> Result<(), NetworkError> {
        if self.state == WeightState::Ready {
            return Ok(());
        }
        debug!("reconciling weights from state {:?}", self.state);
        self.force_weight_update()
    }

    fn check_weights(&mut self) -> Result<(), NetworkError> {
        self.validate_routing()?;
        let fan_ins = self.fan_ins();
        let consistent = self
            .layers
            .iter()
            .zip(&fan_ins)
            .all(|(layer, fan_in)| {
                layer
                    .units
                    .iter()
                    .zip(fan_in)
                    .all(|(unit, &n)| unit.weight_count() == n)
            });
        if consistent {
            self.state = WeightState::Ready;
            Ok(())
        } else {
            Err(NetworkError::NotInitialized)
        }
    }

    // ---- Forward evaluation ----

    /// Stores the values fed to the input layer on the next
    /// [`outputs`](Self::outputs) call.
    pub fn set_inputs(&mut self, values: &[f64]) -> Result<(), NetworkError> {
        if values.len() != self.input_count {
            return Err(NetworkError::DimensionMismatch {
                expected: self.input_count,
                actual: values.len(),
            });
        }
        self.pending_inputs = values.to_vec();
        Ok(())
    }

    /// Runs a forward pass over the last inputs given to
    /// [`set_inputs`](Self::set_inputs).
    ///
    /// A network without hidden layers always fails: input and output are
    /// never wired directly.
    pub fn outputs(&mut self) -> Result<Vec<f64>, NetworkError> {
        if self.hidden_layer_count() == 0 {
            return Err(NetworkError::NoHiddenLayers);
        }
        if self.pending_inputs.len() != self.input_count {
            return Err(NetworkError::DimensionMismatch {
                expected: self.input_count,
                actual: self.pending_inputs.len(),
            });
        }
        self.validate_routing()?;
        if self.state != WeightState::Ready {
            self.reconcile(self.weight_init)?;
        }

        // Inputs collected for each neuron of the layer being evaluated.
        let mut buffer: Vec<Vec<f64>> = self.pending_inputs.iter().map(|&x| vec![x]).collect();
        let last = self.layers.len() - 1;

        for layer_i in 0..=last {
            let next_len = if layer_i == last {
                self.output_count
            } else {
                self.layers[layer_i + 1].len()
            };
            let layer = &mut self.layers[layer_i];

            let mut outputs = Vec::with_capacity(layer.len());
            for (neuron_i, unit) in layer.units.iter_mut().enumerate() {
                let inputs = buffer.get_mut(neuron_i).map(std::mem::take).unwrap_or_default();
                unit.set_inputs(inputs);
                outputs.push(unit.output()?);
            }

            let mut next: Vec<Vec<f64>> = vec![Vec::new(); next_len];
            for (source, destinations) in layer.routes.iter() {
                let Some(&value) = outputs.get(source) else {
                    continue;
                };
                for &d in destinations {
                    next[d].push(value);
                }
            }
            buffer = next;
        }

        // The output layer's identity routing guarantees one value per slot.
        let mut result = Vec::with_capacity(self.output_count);
        for (slot, values) in buffer.iter().enumerate() {
            match values.as_slice() {
                [v] => result.push(*v),
                _ => {
                    return Err(NetworkError::InvariantViolation(format!(
                        "output slot {slot} received {} values",
                        values.len()
                    )))
                }
            }
        }

        self.state = WeightState::Ready;
        Ok(result)
    }

    /// [`set_inputs`](Self::set_inputs) followed by
    /// [`outputs`](Self::outputs).
    pub fn evaluate(&mut self, inputs: &[f64]) -> Result<Vec<f64>, NetworkError> {
        self.set_inputs(inputs)?;
        self.outputs()
    }

    // ---- Chromosome ----

    /// Number of words in the chromosome: one per weight plus one bias per
    /// non-input unit. Returns 0 if the weights cannot be brought into a
    /// consistent state.
    pub fn chromosome_size(&mut self) -> usize {
        if self.ensure_initialized().is_err() {
            return 0;
        }
        self.layers
            .iter()
            .skip(1)
            .flat_map(|l| &l.units)
            .map(|u| u.weight_count() + 1)
            .sum()
    }

    /// Encodes all weights and biases, in (layer, neuron, weights, bias)
    /// order, as raw `f64` bit patterns.
    pub fn chromosome(&mut self) -> Result<Genome, NetworkError> {
        self.ensure_initialized()?;
        let mut words = Vec::new();
        for unit in self.layers.iter().skip(1).flat_map(|l| &l.units) {
            words.extend(unit.weights().iter().map(|w| w.to_bits()));
            words.push(unit.bias().to_bits());
        }
        Ok(Genome::from_words(words))
    }

    /// Decodes `genome` back into weights and biases.
    ///
    /// Unit fan-ins are recomputed from the routing first, so the genome
    /// must match the current topology exactly. Values are bit-cast, never
    /// numerically converted.
    pub fn set_chromosome(&mut self, genome: &Genome) -> Result<(), NetworkError> {
        self.validate_routing()?;
        let fan_ins = self.fan_ins();
        let expected: usize = fan_ins.iter().skip(1).flatten().map(|n| n + 1).sum();
        if genome.len() != expected {
            return Err(NetworkError::ChromosomeSize {
                expected,
                actual: genome.len(),
            });
        }

        let words = genome.words();
        let mut pos = 0;
        for (layer_i, (layer, fan_in)) in self.layers.iter_mut().zip(&fan_ins).enumerate() {
            for (unit, &n) in layer.units.iter_mut().zip(fan_in) {
                if layer_i == 0 {
                    if unit.weight_count() != n {
                        unit.set_weights(vec![1.0; n]);
                    }
                    continue;
                }
                let weights = words[pos..pos + n].iter().map(|&w| f64::from_bits(w)).collect();
                unit.set_weights(weights);
                unit.set_bias(f64::from_bits(words[pos + n]));
                pos += n + 1;
            }
        }
        self.state = WeightState::Ready;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn xor_network() -> Network {
        // 2 inputs, 3 hidden, 1 output. Hidden neuron 1 is an AND gate,
        // the others pass their single input through.
        let mut net = Network::new(2, 1, 3);
        net.add_hidden_layer();
        net.set_activations(Activation::Identity);
        net.set_layer_activations(1, Activation::Threshold(1.0)).unwrap();
        net.unit_mut(1, 1)
            .unwrap()
            .set_activation(Activation::Threshold(2.0));

        net.set_layer_weights(1, &[1.0]).unwrap();
        net.set_layer_weights(2, &[1.0, -2.0, 1.0]).unwrap();
        net.unit_mut(1, 1).unwrap().set_weights(vec![1.0, 1.0]);

        net.set_route(0, 0, vec![0, 1]).unwrap();
        net.set_route(0, 1, vec![1, 2]).unwrap();
        net
    }

    #[test]
    fn test_construction() {
        let mut net = Network::new(3, 2, 4);
        assert_eq!(net.layer_count(), 2);
        assert_eq!(net.hidden_layer_count(), 0);
        assert_eq!(net.neuron_count(), 5);
        assert_eq!(net.weight_state(), WeightState::Uninitialized);
        assert_eq!(net.evaluate(&[1.0, 2.0, 3.0]), Err(NetworkError::NoHiddenLayers));
    }

    #[test]
    fn test_add_and_remove_layers() {
        let mut net = Network::new(1, 1, 2);
        net.add_hidden_layer();
        assert_eq!(net.hidden_layer_count(), 1);
        net.add_hidden_layers(2);
        assert_eq!(net.hidden_layer_count(), 3);
        net.insert_hidden_layer(1, 5).unwrap();
        assert_eq!(net.layers()[1].len(), 5);
        assert_eq!(net.layers()[0].routes().destinations(0), &[0, 1, 2, 3, 4]);
        assert_eq!(net.layers()[1].routes().destinations(4), &[0, 1]);

        net.remove_hidden_layer(1).unwrap();
        assert_eq!(net.hidden_layer_count(), 3);
        assert_eq!(net.layers()[0].routes().destinations(0), &[0, 1]);

        assert_eq!(net.remove_hidden_layer(0), Err(NetworkError::InvalidLayer(0)));
        assert_eq!(net.remove_hidden_layer(4), Err(NetworkError::InvalidLayer(4)));
        assert_eq!(net.insert_hidden_layer(0, 1), Err(NetworkError::InvalidLayer(0)));
    }

    #[test]
    fn test_full_pass_with_random_weights() {
        let mut net = Network::new(1, 1, 2).with_seed(42);
        net.add_hidden_layers(2);
        net.set_random_weights(-5, 10);

        let out = net.evaluate(&[10.0]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(net.weight_state(), WeightState::Ready);

        net.set_activations(Activation::Threshold(1.0));
        let out = net.evaluate(&[10.0]).unwrap();
        assert!(out[0] == 0.0 || out[0] == 1.0);
    }

    #[test]
    fn test_fixed_weights_forward() {
        let mut net = Network::new(2, 1, 2);
        net.add_hidden_layer();
        net.set_fixed_weights(0.5);
        net.set_biases(1.0);
        // hidden: 1 + 0.5·(1 + 3) = 3, output: 1 + 0.5·(3 + 3) = 4
        assert_eq!(net.evaluate(&[1.0, 3.0]).unwrap(), vec![4.0]);
    }

    #[test]
    fn test_xor_routing() {
        let mut net = xor_network();
        assert_eq!(net.evaluate(&[1.0, 0.0]).unwrap(), vec![1.0]);
        assert_eq!(net.evaluate(&[0.0, 1.0]).unwrap(), vec![1.0]);
        assert_eq!(net.evaluate(&[0.0, 0.0]).unwrap(), vec![0.0]);
        assert_eq!(net.evaluate(&[1.0, 1.0]).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_no_policy_mismatch_is_error() {
        let mut net = Network::new(1, 1, 2);
        net.add_hidden_layer();
        assert!(matches!(
            net.evaluate(&[1.0]),
            Err(NetworkError::DimensionMismatch { .. })
        ));
        assert_eq!(net.chromosome_size(), 0);
        assert_eq!(net.chromosome(), Err(NetworkError::NotInitialized));
    }

    #[test]
    fn test_wrong_input_count() {
        let mut net = Network::new(2, 1, 1);
        net.add_hidden_layer();
        assert_eq!(
            net.set_inputs(&[1.0]),
            Err(NetworkError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_set_route_validation() {
        let mut net = Network::new(2, 1, 2);
        net.add_hidden_layer();
        assert_eq!(net.set_route(2, 0, vec![0]), Err(NetworkError::InvalidLayer(2)));
        assert_eq!(
            net.set_route(0, 2, vec![0]),
            Err(NetworkError::InvalidNeuron { layer: 0, neuron: 2 })
        );
        assert_eq!(
            net.set_route(0, 0, vec![0, 2]),
            Err(NetworkError::InvalidRoute {
                layer: 0,
                neuron: 0,
                destination: 2
            })
        );
        net.set_route(0, 0, vec![1]).unwrap();
        assert!(!net.layers()[0].uses_default_routing());
    }

    #[test]
    fn test_custom_routing_survives_layer_add() {
        let mut net = Network::new(2, 1, 2);
        net.add_hidden_layer();
        net.set_route(0, 0, vec![0]).unwrap();
        net.add_hidden_layer_sized(4);
        // Input routing was customized, so it still targets the first
        // hidden layer; that layer is default-routed into the new one.
        assert_eq!(net.layers()[0].routes().destinations(0), &[0]);
        assert_eq!(net.layers()[1].routes().destinations(0), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_stale_route_is_reported() {
        let mut net = Network::new(1, 1, 3);
        net.add_hidden_layer();
        net.add_hidden_layer_sized(1);
        net.set_route(1, 0, vec![0]).unwrap();
        net.set_fixed_weights(1.0);
        net.remove_hidden_layer(2).unwrap();
        // Layer 1 now feeds the output directly; its routes still fit.
        assert!(net.evaluate(&[1.0]).is_ok());

        let mut net = Network::new(1, 1, 1);
        net.add_hidden_layer_sized(3);
        net.add_hidden_layer_sized(1);
        net.set_route(0, 0, vec![2]).unwrap();
        net.set_fixed_weights(1.0);
        net.remove_hidden_layer(1).unwrap();
        assert!(matches!(
            net.evaluate(&[1.0]),
            Err(NetworkError::InvalidRoute { destination: 2, .. })
        ));
    }

    #[test]
    fn test_reconcile_preserves_weights() {
        let mut net = Network::new(1, 1, 2);
        net.add_hidden_layer();
        net.set_fixed_weights(1.0);
        net.force_weight_update().unwrap();
        net.unit_mut(2, 0).unwrap().set_weights(vec![3.0, 4.0]);

        net.add_hidden_layer_sized(3);
        net.set_fixed_weights(9.0);
        net.force_weight_update().unwrap();
        // Output fan-in grew from 2 to 3.
        assert_eq!(net.unit(3, 0).unwrap().weights(), &[3.0, 4.0, 9.0]);

        net.remove_hidden_layer(2).unwrap();
        net.force_weight_update().unwrap();
        assert_eq!(net.unit(2, 0).unwrap().weights(), &[3.0, 4.0]);
    }

    #[test]
    fn test_chromosome_layout() {
        let mut net = Network::new(1, 1, 2);
        net.add_hidden_layer();
        net.set_fixed_weights(1.0);
        net.set_biases(1.0);
        // hidden: 2 × (1 weight + bias), output: 2 weights + bias
        assert_eq!(net.chromosome_size(), 7);

        let values: Vec<f64> = (0..7).map(f64::from).collect();
        net.set_chromosome(&Genome::from_values(&values)).unwrap();
        assert_eq!(net.unit(1, 0).unwrap().weights(), &[0.0]);
        assert_eq!(net.unit(1, 0).unwrap().bias(), 1.0);
        assert_eq!(net.unit(1, 1).unwrap().weights(), &[2.0]);
        assert_eq!(net.unit(2, 0).unwrap().weights(), &[4.0, 5.0]);
        assert_eq!(net.unit(2, 0).unwrap().bias(), 6.0);
    }

    #[test]
    fn test_set_chromosome_wrong_size() {
        let mut net = Network::new(1, 1, 2);
        net.add_hidden_layer();
        net.set_fixed_weights(0.0);
        let before = net.chromosome().unwrap();
        assert_eq!(
            net.set_chromosome(&Genome::zeroed(3)),
            Err(NetworkError::ChromosomeSize {
                expected: 7,
                actual: 3
            })
        );
        assert_eq!(net.chromosome().unwrap(), before);
    }

    #[test]
    fn test_set_chromosome_initializes_policyless_network() {
        let mut net = Network::new(2, 2, 2);
        net.add_hidden_layer();
        assert_eq!(net.chromosome_size(), 0);
        net.set_chromosome(&Genome::zeroed(12)).unwrap();
        assert_eq!(net.chromosome_size(), 12);
        assert_eq!(net.evaluate(&[1.0, 1.0]).unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_unit_addressing() {
        let mut net = Network::new(1, 1, 1);
        net.add_hidden_layer();
        assert!(net.unit(0, 0).is_none());
        assert!(net.unit(1, 0).is_some());
        assert!(net.unit(1, 1).is_none());
        assert!(net.unit(3, 0).is_none());
        assert_eq!(net.set_layer_biases(0, 1.0), Err(NetworkError::InvalidLayer(0)));
        assert_eq!(net.set_layer_biases(9, 1.0), Err(NetworkError::InvalidLayer(9)));
    }

    #[test]
    fn test_copy_layout() {
        let mut source = xor_network();
        source.set_fixed_weights(1.0);
        let mut copy = Network::new(2, 1, 3);
        copy.add_hidden_layer();
        copy.copy_layout(&source).unwrap();
        assert_eq!(copy.layers()[0].routes(), source.layers()[0].routes());
        assert!(!copy.layers()[0].uses_default_routing());

        let mut other = Network::new(2, 1, 4);
        other.add_hidden_layer();
        assert_eq!(
            other.copy_layout(&source),
            Err(NetworkError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        );

        let mut other = Network::new(2, 2, 3);
        other.add_hidden_layer();
        assert_eq!(
            other.copy_layout(&source),
            Err(NetworkError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    proptest! {
        #[test]
        fn prop_chromosome_set_get_is_identity(words in proptest::collection::vec(any::<u64>(), 10)) {
            // 1 input, 2 hidden (fan-in 1), 2 outputs (fan-in 2): 2·2 + 2·3 = 10
            let mut net = Network::new(1, 2, 2);
            net.add_hidden_layer();
            let genome = Genome::from_words(words);
            net.set_chromosome(&genome).unwrap();
            prop_assert_eq!(net.chromosome().unwrap(), genome);
        }
    }
}
