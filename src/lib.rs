//! A single hidden layer classifier trained with online backpropagation.
//!
//! The network is a node graph: an input layer and a hidden layer, each
//! closed by a bias node, feeding a softmax output layer. Hidden nodes use
//! ReLU. Training minimizes cross-entropy with one weight update per
//! instance.
//!
//! # Example
//!
//! ```
//! # use backprop::{Instance, Mat, Network, Trainer};
//! # use rand::SeedableRng;
//! # use rand_xoshiro::Xoshiro256PlusPlus;
//! let examples = vec![
//!     Instance::one_hot(vec![1.0, 0.5], 0, 2).unwrap(),
//!     Instance::one_hot(vec![2.0, -0.3], 0, 2).unwrap(),
//!     Instance::one_hot(vec![-1.0, 0.4], 1, 2).unwrap(),
//!     Instance::one_hot(vec![-1.5, -0.2], 1, 2).unwrap(),
//! ];
//! let hidden = Mat::from_rows(vec![vec![0.5, 0.1, 0.1], vec![-0.5, 0.1, 0.1]]).unwrap();
//! let output = Mat::from_rows(vec![vec![0.1, -0.1, 0.0], vec![-0.1, 0.1, 0.0]]).unwrap();
//! let network = Network::new(2, &hidden, &output).unwrap();
//!
//! let mut losses = Vec::new();
//! let mut trainer = Trainer::new(network, examples.clone(), Xoshiro256PlusPlus::seed_from_u64(1))
//!     .unwrap()
//!     .learning_rate(0.1)
//!     .max_epochs(50);
//! trainer
//!     .train_with(&mut |_: usize, loss: f64| losses.push(loss))
//!     .unwrap();
//! assert_eq!(losses.len(), 50);
//!
//! let network = trainer.network_mut();
//! for example in &examples {
//!     assert_eq!(network.predict(example).unwrap(), example.label());
//! }
//! ```

pub mod activator;
pub mod config;
pub mod error;
pub mod instance;
pub mod matrix;
pub mod network;
pub mod node;
pub mod trainer;

mod utils;

pub use activator::Activator;
pub use config::TrainingConfig;
pub use error::NetworkError;
pub use instance::Instance;
pub use matrix::Mat;
pub use network::{Network, Weights};
pub use node::{Node, NodeKind, NodeWeightPair};
pub use trainer::{format_loss, LogReport, Report, Trainer};
