//! Epoch loop for supervised backpropagation training.

use super::config::LearnerConfig;
use crate::error::LearnError;
use crate::network::Network;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Outcome of a [`SupervisedLearner::learn`] call.
#[derive(Debug, Clone)]
pub struct LearnReport {
    /// Number of completed epochs.
    pub epochs: usize,

    /// Held-out error after the last epoch.
    pub final_error: f64,

    /// Whether the error fell below the target.
    pub converged: bool,

    /// Held-out error after every epoch.
    pub error_history: Vec<f64>,
}

#[derive(Debug, Clone)]
struct Sample {
    input: Vec<f64>,
    expected: Vec<f64>,
}

/// Trains a network by backpropagation on (input, expected output) pairs.
///
/// Each [`learn`](Self::learn) call shuffles the samples, splits them into a
/// training and a held-out set, then repeats epochs of backpropagation over
/// the (reshuffled) training set until the held-out error is below the
/// target.
///
/// ```
/// use routed_evo::learner::{LearnerConfig, SupervisedLearner};
/// use routed_evo::network::{Activation, Network};
///
/// let mut net = Network::new(1, 1, 3).with_seed(5);
/// net.add_hidden_layer();
/// net.set_random_weights(-1, 1);
/// net.set_activations(Activation::Sigmoid);
///
/// let config = LearnerConfig::new(1e-3).with_max_iterations(100).with_seed(1);
/// let mut learner = SupervisedLearner::new(net, config).unwrap();
/// learner.add_training_data(&[0.2], &[0.6]).unwrap();
/// let report = learner.learn().unwrap();
/// assert!(report.epochs <= 100);
/// ```
#[derive(Debug)]
pub struct SupervisedLearner {
    network: Network,
    config: LearnerConfig,
    samples: Vec<Sample>,
    rng: StdRng,
}

impl SupervisedLearner {
    /// Takes ownership of the network to train.
    pub fn new(network: Network, config: LearnerConfig) -> Result<Self, LearnError> {
        config.validate().map_err(LearnError::InvalidConfig)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Ok(Self {
            network,
            config,
            samples: Vec::new(),
            rng,
        })
    }

    /// Adds one sample. Both slices must match the network's arity.
    pub fn add_training_data(&mut self, input: &[f64], expected: &[f64]) -> Result<(), LearnError> {
        check_arity(self.network.input_count(), input.len())?;
        check_arity(self.network.output_count(), expected.len())?;
        self.samples.push(Sample {
            input: input.to_vec(),
            expected: expected.to_vec(),
        });
        Ok(())
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    /// Trains until the held-out error is below `target_error` or
    /// `max_iterations` epochs have run.
    pub fn learn(&mut self) -> Result<LearnReport, LearnError> {
        if self.samples.is_empty() {
            return Err(LearnError::NoData);
        }

        let (mut training, held_out) = self.split();
        debug!(
            "training on {} samples, checking on {}",
            training.len(),
            held_out.len()
        );

        let mut error_history = Vec::new();
        let mut converged = false;
        while !self.config.max_iterations.is_some_and(|max| error_history.len() >= max) {
            training.shuffle(&mut self.rng);
            for &i in &training {
                let sample = &self.samples[i];
                self.network.set_inputs(&sample.input)?;
                self.network.propagate_error(&sample.expected)?;
            }

            let error = self.held_out_error(&held_out)?;
            error_history.push(error);
            trace!("epoch {}: error {error}", error_history.len());
            if error < self.config.target_error {
                converged = true;
                break;
            }
        }

        let epochs = error_history.len();
        let final_error = error_history.last().copied().unwrap_or(f64::INFINITY);
        info!("training stopped after {epochs} epochs, error {final_error}, converged: {converged}");
        Ok(LearnReport {
            epochs,
            final_error,
            converged,
            error_history,
        })
    }

    /// Shuffled sample indices split into (training, held-out). A single
    /// sample is used for both.
    fn split(&mut self) -> (Vec<usize>, Vec<usize>) {
        let n = self.samples.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut self.rng);
        if n == 1 {
            return (order.clone(), order);
        }
        let cut = ((n as f64 * self.config.train_fraction) as usize).clamp(1, n - 1);
        let held_out = order.split_off(cut);
        (order, held_out)
    }

    fn held_out_error(&mut self, held_out: &[usize]) -> Result<f64, LearnError> {
        let mut total = 0.0;
        for &i in held_out {
            let sample = &self.samples[i];
            let outputs = self.network.evaluate(&sample.input)?;
            total += sample
                .expected
                .iter()
                .zip(&outputs)
                .map(|(e, o)| (e - o).powi(2))
                .sum::<f64>();
        }
        Ok(total / 2.0)
    }
}

fn check_arity(expected: usize, actual: usize) -> Result<(), LearnError> {
    if expected == actual {
        Ok(())
    } else {
        Err(LearnError::SampleArity { expected, actual })
    }
}
