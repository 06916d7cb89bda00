//! Error types for network construction and training.

/// Errors raised when externally supplied shapes or hyperparameters do not
/// agree with the network.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// A layer was configured with no nodes.
    #[error("{layer} layer must contain at least one node")]
    EmptyLayer { layer: &'static str },

    /// A weight matrix does not match the layer sizes.
    #[error("{matrix} weights have shape {actual:?}, expected {expected:?}")]
    WeightShape {
        matrix: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A matrix row has a different length than the first row.
    #[error("matrix row {row} has {actual} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// An instance's feature vector does not match the input layer.
    #[error("instance has {actual} features, expected {expected}")]
    FeatureLength { expected: usize, actual: usize },

    /// An instance's target vector does not match the output layer.
    #[error("instance has {actual} targets, expected {expected}")]
    TargetLength { expected: usize, actual: usize },

    /// Training was requested without any instances.
    #[error("training set is empty")]
    EmptyTrainingSet,

    /// The learning rate is not a positive finite number.
    #[error("learning rate must be positive and finite, got {0}")]
    InvalidLearningRate(f64),

    /// A class index does not fit in the target vector.
    #[error("class {class} out of range for {classes} classes")]
    ClassOutOfRange { class: usize, classes: usize },
}
