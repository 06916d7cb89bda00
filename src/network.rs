//! The three-layer node graph and its forward and backward passes.

use crate::activator::Activator;
use crate::error::NetworkError;
use crate::instance::Instance;
use crate::matrix::Mat;
use crate::node::{BiasTarget, Node};
use crate::utils::argmax;

use itertools::Itertools;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A snapshot of every weight in a network.
///
/// `hidden` has one row per hidden node and one column per input node plus
/// the input bias. `output` has one row per output node and one column per
/// hidden node plus the hidden bias.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub hidden: Mat,
    pub output: Mat,
}

/// A fully connected network with one ReLU hidden layer and a softmax output
/// layer.
///
/// The last node of the input layer and the last node of the hidden layer
/// are bias nodes. Node outputs and deltas are scratch values overwritten on
/// every pass.
#[derive(Clone, Debug)]
pub struct Network {
    input_layer: Vec<Node>,
    hidden_layer: Vec<Node>,
    output_layer: Vec<Node>,
}

impl Network {
    /// Builds a network for `input_len` features from its initial weights.
    ///
    /// The hidden and output layer sizes are the row counts of
    /// `hidden_weights` and `output_weights`. Column counts must account for
    /// the bias node of the preceding layer.
    pub fn new(
        input_len: usize,
        hidden_weights: &Mat,
        output_weights: &Mat,
    ) -> Result<Self, NetworkError> {
        let hidden_len = hidden_weights.rows();
        let output_len = output_weights.rows();
        if input_len == 0 {
            return Err(NetworkError::EmptyLayer { layer: "input" });
        }
        if hidden_len == 0 {
            return Err(NetworkError::EmptyLayer { layer: "hidden" });
        }
        if output_len == 0 {
            return Err(NetworkError::EmptyLayer { layer: "output" });
        }
        if hidden_weights.cols() != input_len + 1 {
            return Err(NetworkError::WeightShape {
                matrix: "hidden",
                expected: (hidden_len, input_len + 1),
                actual: hidden_weights.shape(),
            });
        }
        if output_weights.cols() != hidden_len + 1 {
            return Err(NetworkError::WeightShape {
                matrix: "output",
                expected: (output_len, hidden_len + 1),
                actual: output_weights.shape(),
            });
        }

        let mut input_layer: Vec<Node> = (0..input_len).map(|_| Node::input()).collect();
        input_layer.push(Node::bias(BiasTarget::Hidden));

        let mut hidden_layer: Vec<Node> = (0..hidden_len)
            .map(|i| Node::hidden(hidden_weights.row(i)))
            .collect();
        hidden_layer.push(Node::bias(BiasTarget::Output));

        let output_layer = (0..output_len)
            .map(|i| Node::output(output_weights.row(i)))
            .collect();

        debug!(
            "built network with {} inputs, {} hidden nodes, {} outputs",
            input_len, hidden_len, output_len
        );
        Ok(Network {
            input_layer,
            hidden_layer,
            output_layer,
        })
    }

    /// Builds a network from a weight snapshot.
    pub fn from_weights(input_len: usize, weights: &Weights) -> Result<Self, NetworkError> {
        Network::new(input_len, &weights.hidden, &weights.output)
    }

    /// Returns the number of features, excluding the bias node.
    pub fn input_len(&self) -> usize {
        self.input_layer.len() - 1
    }

    /// Returns the number of hidden nodes, excluding the bias node.
    pub fn hidden_len(&self) -> usize {
        self.hidden_layer.len() - 1
    }

    /// Returns the number of classes.
    pub fn output_len(&self) -> usize {
        self.output_layer.len()
    }

    pub fn input_layer(&self) -> &[Node] {
        &self.input_layer
    }

    pub fn hidden_layer(&self) -> &[Node] {
        &self.hidden_layer
    }

    pub fn output_layer(&self) -> &[Node] {
        &self.output_layer
    }

    /// Returns the output layer values cached by the last forward pass.
    pub fn outputs(&self) -> Vec<f64> {
        self.output_layer.iter().map(Node::output_value).collect()
    }

    /// Returns the hidden layer values cached by the last forward pass,
    /// excluding the bias node.
    pub fn hidden_outputs(&self) -> Vec<f64> {
        self.hidden_layer[..self.hidden_len()]
            .iter()
            .map(Node::output_value)
            .collect()
    }

    /// Returns a copy of every weight in the network.
    pub fn weights(&self) -> Weights {
        Weights {
            hidden: layer_weights(&self.hidden_layer[..self.hidden_len()], self.input_layer.len()),
            output: layer_weights(&self.output_layer, self.hidden_layer.len()),
        }
    }

    /// Feeds `features` forward through the network, returning the class
    /// probabilities.
    pub fn run(&mut self, features: &[f64]) -> Result<Vec<f64>, NetworkError> {
        self.check_features(features)?;
        self.feed_forward(features);
        Ok(self.outputs())
    }

    /// Returns the most likely class for `instance`, ties going to the lowest
    /// index.
    pub fn predict(&mut self, instance: &Instance) -> Result<usize, NetworkError> {
        self.check_features(instance.features())?;
        self.feed_forward(instance.features());
        Ok(argmax(&self.outputs()))
    }

    /// Returns the cross-entropy loss of the network on `instance`.
    ///
    /// A probability of exactly zero on a target class yields an infinite
    /// loss.
    pub fn loss(&mut self, instance: &Instance) -> Result<f64, NetworkError> {
        self.check_instance(instance)?;
        Ok(self.cross_entropy(instance))
    }

    /// Returns the fraction of `instances` whose predicted class matches
    /// their label.
    pub fn accuracy(&mut self, instances: &[Instance]) -> Result<f64, NetworkError> {
        if instances.is_empty() {
            return Ok(0.0);
        }
        let mut correct = 0;
        for instance in instances {
            if self.predict(instance)? == instance.label() {
                correct += 1;
            }
        }
        Ok(correct as f64 / instances.len() as f64)
    }

    /// Runs one forward and backward pass on `instance` and applies the
    /// resulting weight update immediately.
    pub fn train_instance(
        &mut self,
        instance: &Instance,
        learning_rate: f64,
    ) -> Result<(), NetworkError> {
        self.check_instance(instance)?;
        self.feed_forward(instance.features());
        self.feed_backwards(instance.targets(), learning_rate);
        Ok(())
    }

    /// Trains for one epoch, returning the mean loss over `instances`.
    ///
    /// The instances are shuffled in place with `rng`, each one then updates
    /// the weights in turn. The loss is measured afterwards, with a second
    /// pass over the whole set using the updated weights.
    pub fn train_epoch<R>(
        &mut self,
        instances: &mut [Instance],
        learning_rate: f64,
        rng: &mut R,
    ) -> Result<f64, NetworkError>
    where
        R: Rng + ?Sized,
    {
        if instances.is_empty() {
            return Err(NetworkError::EmptyTrainingSet);
        }
        for instance in instances.iter() {
            self.check_instance(instance)?;
        }
        Ok(self.epoch(instances, learning_rate, rng))
    }

    /// `train_epoch` without shape checks, for callers that already validated
    /// the instances.
    pub(crate) fn epoch<R>(
        &mut self,
        instances: &mut [Instance],
        learning_rate: f64,
        rng: &mut R,
    ) -> f64
    where
        R: Rng + ?Sized,
    {
        instances.shuffle(rng);
        for instance in instances.iter() {
            self.feed_forward(instance.features());
            self.feed_backwards(instance.targets(), learning_rate);
        }
        let total: f64 = instances.iter().map(|i| self.cross_entropy(i)).sum();
        total / instances.len() as f64
    }

    pub(crate) fn check_instance(&self, instance: &Instance) -> Result<(), NetworkError> {
        self.check_features(instance.features())?;
        if instance.targets().len() != self.output_len() {
            return Err(NetworkError::TargetLength {
                expected: self.output_len(),
                actual: instance.targets().len(),
            });
        }
        Ok(())
    }

    fn check_features(&self, features: &[f64]) -> Result<(), NetworkError> {
        if features.len() != self.input_len() {
            return Err(NetworkError::FeatureLength {
                expected: self.input_len(),
                actual: features.len(),
            });
        }
        Ok(())
    }

    /// Assigns `features` to the input layer and recomputes every hidden and
    /// output node.
    fn feed_forward(&mut self, features: &[f64]) {
        let input_len = self.input_len();
        for (node, &value) in self.input_layer[..input_len].iter_mut().zip_eq(features) {
            node.set_input(value);
        }
        let hidden_len = self.hidden_len();
        activate_layer(&self.input_layer, &mut self.hidden_layer[..hidden_len], Activator::ReLU);
        activate_layer(&self.hidden_layer, &mut self.output_layer, Activator::Softmax);
    }

    /// Computes deltas for the last forward pass against `targets`, then
    /// updates the output weights followed by the hidden weights.
    fn feed_backwards(&mut self, targets: &[f64], learning_rate: f64) {
        for (node, &target) in self.output_layer.iter_mut().zip_eq(targets) {
            let delta = target - node.output_value();
            node.set_delta(delta);
        }
        let hidden_len = self.hidden_len();
        for (h, node) in self.hidden_layer[..hidden_len].iter_mut().enumerate() {
            let error: f64 = self
                .output_layer
                .iter()
                .map(|o| o.weight_from(h) * o.delta())
                .sum();
            node.backpropagate(error);
        }

        for node in &mut self.output_layer {
            node.update_weights(learning_rate, &self.hidden_layer);
        }
        for node in &mut self.hidden_layer[..hidden_len] {
            node.update_weights(learning_rate, &self.input_layer);
        }
    }

    fn cross_entropy(&mut self, instance: &Instance) -> f64 {
        self.feed_forward(instance.features());
        let mut loss = 0.0;
        for (node, &target) in self.output_layer.iter().zip_eq(instance.targets()) {
            loss -= target * node.output_value().ln();
        }
        loss
    }
}

/// Recomputes every node of `layer` from `parents` in two phases: gather all
/// logits, then finalize outputs against the layer normalizer.
fn activate_layer(parents: &[Node], layer: &mut [Node], activator: Activator) {
    let logits: Vec<f64> = layer.iter().map(|node| node.logit(parents)).collect();
    let normalizer = activator.normalizer(&logits);
    for (node, logit) in layer.iter_mut().zip(logits) {
        node.compute_output(logit, normalizer);
    }
}

fn layer_weights(layer: &[Node], cols: usize) -> Mat {
    let mut weights = Mat::zeros(layer.len(), cols);
    for (row, node) in layer.iter().enumerate() {
        for edge in node.parents() {
            weights.set(row, edge.source, edge.weight);
        }
    }
    weights
}
