//! Training hyperparameters.

use crate::error::NetworkError;

use serde::{Deserialize, Serialize};

/// Hyperparameters for a training run.
///
/// Every field has a default, so a partial JSON document is enough to
/// override a single value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of hidden nodes, excluding the bias node.
    pub hidden_nodes: usize,
    pub learning_rate: f64,
    /// Number of passes over the training set.
    pub max_epochs: usize,
    /// Seed for the generator that shuffles the training set.
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            hidden_nodes: 5,
            learning_rate: 0.01,
            max_epochs: 100,
            seed: 0,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.hidden_nodes == 0 {
            return Err(NetworkError::EmptyLayer { layer: "hidden" });
        }
        check_learning_rate(self.learning_rate)
    }
}

pub(crate) fn check_learning_rate(rate: f64) -> Result<(), NetworkError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(NetworkError::InvalidLearningRate(rate))
    }
}
