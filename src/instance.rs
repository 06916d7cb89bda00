//! Labelled training examples.

use crate::error::NetworkError;
use crate::utils::argmax;

use serde::{Deserialize, Serialize};

/// A labelled example: a feature vector and a target distribution over
/// classes.
///
/// Instances are immutable once built. Training only reorders them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    features: Vec<f64>,
    targets: Vec<f64>,
}

impl Instance {
    /// Creates an instance from raw feature and target vectors.
    ///
    /// Targets are usually one-hot, but any distribution is accepted.
    pub fn new(features: Vec<f64>, targets: Vec<f64>) -> Self {
        Instance { features, targets }
    }

    /// Creates an instance whose target is one-hot on `class`.
    pub fn one_hot(
        features: Vec<f64>,
        class: usize,
        classes: usize,
    ) -> Result<Self, NetworkError> {
        if class >= classes {
            return Err(NetworkError::ClassOutOfRange { class, classes });
        }
        let mut targets = vec![0.0; classes];
        targets[class] = 1.0;
        Ok(Instance { features, targets })
    }

    pub fn features(&self) -> &[f64] {
        &self.features
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Returns the index of the largest target value, ties going to the
    /// lowest index.
    pub fn label(&self) -> usize {
        argmax(&self.targets)
    }
}
