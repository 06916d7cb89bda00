//! Activation function types.

use serde::{Deserialize, Serialize};

/// [Activation function](https://en.wikipedia.org/wiki/Activation_function)
/// applied by a layer of computed nodes.
///
/// Activation is a two-phase protocol. The layer first collects the logit of
/// every node, then asks the activator for a layer-wide `normalizer`, and
/// finally evaluates [`Activator::f`] per node with that shared value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activator {
    /// Rectified Linear Unit
    ReLU,
    /// Softmax, normalized across every node of the layer.
    Softmax,
}

impl Activator {
    /// Returns the value every logit of the layer is normalized by.
    ///
    /// ReLU is element-wise and always returns `1.0`. Softmax returns the sum
    /// of `exp(logit)` over the whole layer. Logits are exponentiated as-is,
    /// so very large logits overflow to infinity.
    pub fn normalizer(&self, logits: &[f64]) -> f64 {
        match self {
            Activator::ReLU => 1.0,
            Activator::Softmax => logits.iter().map(|z| z.exp()).sum(),
        }
    }

    /// Evaluates the activation of a single `logit`.
    pub fn f(&self, logit: f64, normalizer: f64) -> f64 {
        match self {
            Activator::ReLU => logit.max(0.0),
            Activator::Softmax => logit.exp() / normalizer,
        }
    }

    /// Converts the `error` arriving at a node into its delta, given the
    /// node's activated output `y`.
    ///
    /// ReLU passes the error through only when `y > 0`. Softmax deltas are
    /// computed directly against the target, so the error passes unchanged.
    pub fn gate(&self, y: f64, error: f64) -> f64 {
        match self {
            Activator::ReLU => {
                if y <= 0.0 {
                    0.0
                } else {
                    error
                }
            }
            Activator::Softmax => error,
        }
    }
}
