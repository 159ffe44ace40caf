//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control generation stepping.

/// Configuration for the [`GeneticAlgorithm`](super::GeneticAlgorithm).
///
/// # Defaults
///
/// ```
/// use routed_evo::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.hall_of_fame_size, 0);
/// assert_eq!(config.max_repair_attempts, Some(10_000));
/// ```
///
/// # Builder Pattern
///
/// ```
/// use routed_evo::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_crossover_rate(0.7)
///     .with_mutation_rate(0.01)
///     .with_hall_of_fame_size(2)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Probability that a child is produced by single-point crossover
    /// (0.0–1.0). Otherwise the child is a copy of one parent chosen at
    /// random.
    pub crossover_rate: f64,

    /// Independent per-bit flip probability applied to every child
    /// (0.0–1.0).
    pub mutation_rate: f64,

    /// Number of top individuals carried over unchanged each generation.
    ///
    /// Every individual whose fitness equals the fitness at the cutoff is
    /// included, so the elite set can be larger than this when ties
    /// straddle the boundary. 0 disables elitism.
    pub hall_of_fame_size: usize,

    /// Maximum number of matings tried to replace one non-viable individual.
    ///
    /// `None` retries forever, which never returns if the fitness function
    /// cannot produce a viable score.
    pub max_repair_attempts: Option<usize>,

    /// Whether to score individuals in parallel using rayon (requires the
    /// `parallel` feature; ignored otherwise). Results are identical either
    /// way.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            crossover_rate: 0.5,
            mutation_rate: 0.006,
            hall_of_fame_size: 0,
            max_repair_attempts: Some(10_000),
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Shorthand for the two operator rates.
    pub fn new(crossover_rate: f64, mutation_rate: f64) -> Self {
        Self::default()
            .with_crossover_rate(crossover_rate)
            .with_mutation_rate(mutation_rate)
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_hall_of_fame_size(mut self, size: usize) -> Self {
        self.hall_of_fame_size = size;
        self
    }

    /// Sets the repair ceiling. `None` disables it.
    pub fn with_max_repair_attempts(mut self, attempts: Option<usize>) -> Self {
        self.max_repair_attempts = attempts;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err("crossover_rate must be within [0, 1]".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err("mutation_rate must be within [0, 1]".into());
        }
        if self.max_repair_attempts == Some(0) {
            return Err("max_repair_attempts must be positive or None".into());
        }
        Ok(())
    }
}
