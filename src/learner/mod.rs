//! Supervised backpropagation training driver.
//!
//! - [`SupervisedLearner`]: owns a network and a sample set, runs epochs
//! - [`LearnerConfig`]: stopping criteria, split ratio, seeding
//! - [`LearnReport`]: per-run statistics

mod config;
mod runner;

pub use config::LearnerConfig;
pub use runner::{LearnReport, SupervisedLearner};
