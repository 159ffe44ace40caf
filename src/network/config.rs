//! Network configuration: training hyperparameters and the policy used to
//! fill in missing weights.

use rand::Rng;

/// Resolution of random weights: draws are multiples of `1 / RANDOM_SCALE`.
const RANDOM_SCALE: i64 = 1000;

/// How weights are created when a unit's fan-in grows.
///
/// Reconciliation keeps as many existing weights as possible: surplus
/// weights are trimmed from the end and missing ones are appended using
/// this policy. Input-layer units always get weight 1 regardless.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeightInit {
    /// No reconciliation. Mismatched fan-ins surface as evaluation errors.
    #[default]
    None,

    /// Uniform draw from the inclusive range `[lower, upper]`, in steps of
    /// 0.001.
    Random { lower: i32, upper: i32 },

    /// A single constant.
    Fixed(f64),
}

impl WeightInit {
    /// Numeric tag used by the persisted format.
    pub(crate) fn code(&self) -> i32 {
        match self {
            WeightInit::None => 0,
            WeightInit::Random { .. } => 1,
            WeightInit::Fixed(_) => 2,
        }
    }

    /// Produces one new weight, or `None` for [`WeightInit::None`].
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Option<f64> {
        match *self {
            WeightInit::None => None,
            WeightInit::Random { lower, upper } => {
                let (lo, hi) = if lower <= upper { (lower, upper) } else { (upper, lower) };
                let lo = i64::from(lo) * RANDOM_SCALE;
                let hi = i64::from(hi) * RANDOM_SCALE;
                Some(rng.random_range(lo..=hi) as f64 / RANDOM_SCALE as f64)
            }
            WeightInit::Fixed(v) => Some(v),
        }
    }
}

/// Backpropagation hyperparameters.
///
/// # Defaults
///
/// ```
/// use routed_evo::network::NetworkConfig;
///
/// let config = NetworkConfig::default();
/// assert_eq!(config.learning_rate, 0.01);
/// assert_eq!(config.momentum, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkConfig {
    /// Step size for weight updates.
    pub learning_rate: f64,

    /// Fraction of the previous update carried into the next one.
    pub momentum: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            momentum: 0.5,
        }
    }
}

impl NetworkConfig {
    pub fn with_learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err("learning_rate must be a positive finite number".into());
        }
        if !self.momentum.is_finite() || self.momentum < 0.0 {
            return Err("momentum must be a non-negative finite number".into());
        }
        Ok(())
    }
}
