//! Supervised training configuration.

/// Configuration for the [`SupervisedLearner`](super::SupervisedLearner).
///
/// # Builder Pattern
///
/// ```
/// use routed_evo::learner::LearnerConfig;
///
/// let config = LearnerConfig::new(1e-4)
///     .with_max_iterations(5_000)
///     .with_train_fraction(0.75)
///     .with_seed(3);
/// assert_eq!(config.max_iterations, Some(5_000));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearnerConfig {
    /// Training stops once the held-out error `½·Σ(expected − actual)²`
    /// drops below this value.
    pub target_error: f64,

    /// Maximum number of epochs.
    ///
    /// `None` trains until the target error is reached, which may never
    /// happen.
    pub max_iterations: Option<usize>,

    /// Share of the samples used for training (0.0–1.0]; the rest is held
    /// out for the error check. Both sets keep at least one sample.
    pub train_fraction: f64,

    /// Seed for shuffling. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            target_error: 1e-5,
            max_iterations: None,
            train_fraction: 0.8,
            seed: None,
        }
    }
}

impl LearnerConfig {
    pub fn new(target_error: f64) -> Self {
        Self {
            target_error,
            ..Self::default()
        }
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Sets the training share, clamped to `[0, 1]`.
    pub fn with_train_fraction(mut self, fraction: f64) -> Self {
        self.train_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.target_error >= 0.0) {
            return Err("target_error must be non-negative".into());
        }
        if !(self.train_fraction > 0.0 && self.train_fraction <= 1.0) {
            return Err("train_fraction must be within (0, 1]".into());
        }
        Ok(())
    }
}
