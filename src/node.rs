//! Nodes and weighted edges of the network graph.

use crate::activator::Activator;

/// The five roles a node can play, fixed when the network is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Input,
    BiasToHidden,
    Hidden,
    BiasToOutput,
    Output,
}

/// A weighted edge into a computed node.
///
/// `source` indexes the node in the preceding layer. The consuming node owns
/// the weight and is the only one that updates it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NodeWeightPair {
    pub source: usize,
    pub weight: f64,
}

/// Which layer boundary a bias node feeds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BiasTarget {
    Hidden,
    Output,
}

/// A node with incoming edges and an activation policy.
#[derive(Clone, Debug)]
pub struct ComputeNode {
    activator: Activator,
    parents: Vec<NodeWeightPair>,
    output: f64,
    delta: f64,
}

/// A single unit of the network.
///
/// Input nodes hold an externally assigned value, bias nodes always output
/// `1.0`, and compute nodes derive their output from their parents. Calling
/// an operation on a node kind that does not support it panics: kinds never
/// change after construction, so such a call is a programming error.
#[derive(Clone, Debug)]
pub enum Node {
    Input(f64),
    Bias(BiasTarget),
    Compute(ComputeNode),
}

impl Node {
    pub fn input() -> Self {
        Node::Input(0.0)
    }

    pub fn bias(target: BiasTarget) -> Self {
        Node::Bias(target)
    }

    /// Creates a hidden node with one edge per entry of `weights`, where
    /// `weights[i]` connects node `i` of the preceding layer.
    pub fn hidden(weights: &[f64]) -> Self {
        Node::compute(Activator::ReLU, weights)
    }

    /// Creates an output node, wired like [`Node::hidden`].
    pub fn output(weights: &[f64]) -> Self {
        Node::compute(Activator::Softmax, weights)
    }

    fn compute(activator: Activator, weights: &[f64]) -> Self {
        let parents = weights
            .iter()
            .enumerate()
            .map(|(source, &weight)| NodeWeightPair { source, weight })
            .collect();
        Node::Compute(ComputeNode {
            activator,
            parents,
            output: 0.0,
            delta: 0.0,
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Input(_) => NodeKind::Input,
            Node::Bias(BiasTarget::Hidden) => NodeKind::BiasToHidden,
            Node::Bias(BiasTarget::Output) => NodeKind::BiasToOutput,
            Node::Compute(node) => match node.activator {
                Activator::ReLU => NodeKind::Hidden,
                Activator::Softmax => NodeKind::Output,
            },
        }
    }

    /// Assigns the value of an input node.
    pub fn set_input(&mut self, value: f64) {
        match self {
            Node::Input(input) => *input = value,
            _ => panic!("set_input called on a {:?} node", self.kind()),
        }
    }

    /// Returns the cached output without recomputing anything.
    pub fn output_value(&self) -> f64 {
        match self {
            Node::Input(value) => *value,
            Node::Bias(_) => 1.0,
            Node::Compute(node) => node.output,
        }
    }

    /// Returns the weighted sum of the parents' outputs.
    ///
    /// `parents` is the preceding layer. Nothing is mutated, so the logits of
    /// a whole layer can be gathered before any output in it changes.
    pub fn logit(&self, parents: &[Node]) -> f64 {
        self.compute_ref("logit")
            .parents
            .iter()
            .map(|edge| edge.weight * parents[edge.source].output_value())
            .sum()
    }

    /// Stores the activated output for `logit`, given the layer-wide
    /// `normalizer` produced by [`Activator::normalizer`].
    pub fn compute_output(&mut self, logit: f64, normalizer: f64) {
        let node = self.compute_mut("compute_output");
        node.output = node.activator.f(logit, normalizer);
    }

    pub fn delta(&self) -> f64 {
        self.compute_ref("delta").delta
    }

    /// Overwrites the delta.
    pub fn set_delta(&mut self, delta: f64) {
        self.compute_mut("set_delta").delta = delta;
    }

    /// Sets the delta from the error backpropagated into this node, gated by
    /// the derivative of its activation.
    pub fn backpropagate(&mut self, error: f64) {
        let node = self.compute_mut("backpropagate");
        node.delta = node.activator.gate(node.output, error);
    }

    /// Moves every incoming weight by `rate * source output * delta`.
    pub fn update_weights(&mut self, learning_rate: f64, parents: &[Node]) {
        let node = self.compute_mut("update_weights");
        let delta = node.delta;
        for edge in &mut node.parents {
            edge.weight +=
                learning_rate * parents[edge.source].output_value() * delta;
        }
    }

    /// Returns the incoming edges. Input and bias nodes have none.
    pub fn parents(&self) -> &[NodeWeightPair] {
        match self {
            Node::Compute(node) => &node.parents,
            _ => &[],
        }
    }

    /// Returns the weight of the edge arriving from `source`.
    pub fn weight_from(&self, source: usize) -> f64 {
        self.compute_ref("weight_from").parents[source].weight
    }

    fn compute_ref(&self, op: &str) -> &ComputeNode {
        match self {
            Node::Compute(node) => node,
            _ => panic!("{} called on a {:?} node", op, self.kind()),
        }
    }

    fn compute_mut(&mut self, op: &str) -> &mut ComputeNode {
        let kind = self.kind();
        match self {
            Node::Compute(node) => node,
            _ => panic!("{} called on a {:?} node", op, kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_layer(values: &[f64]) -> Vec<Node> {
        let mut layer: Vec<Node> = values
            .iter()
            .map(|&v| {
                let mut node = Node::input();
                node.set_input(v);
                node
            })
            .collect();
        layer.push(Node::bias(BiasTarget::Hidden));
        layer
    }

    #[test]
    fn kinds() {
        assert_eq!(Node::input().kind(), NodeKind::Input);
        assert_eq!(Node::bias(BiasTarget::Hidden).kind(), NodeKind::BiasToHidden);
        assert_eq!(Node::bias(BiasTarget::Output).kind(), NodeKind::BiasToOutput);
        assert_eq!(Node::hidden(&[1.0]).kind(), NodeKind::Hidden);
        assert_eq!(Node::output(&[1.0]).kind(), NodeKind::Output);
    }

    #[test]
    fn bias_always_outputs_one() {
        assert_eq!(Node::bias(BiasTarget::Output).output_value(), 1.0);
        assert!(Node::bias(BiasTarget::Hidden).parents().is_empty());
    }

    #[test]
    fn hidden_output_is_relu_of_weighted_sum() {
        let parents = input_layer(&[2.0, -1.0]);
        let mut node = Node::hidden(&[0.5, 1.0, 0.25]);
        let logit = node.logit(&parents);
        assert_eq!(logit, 0.25);
        node.compute_output(logit, 1.0);
        assert_eq!(node.output_value(), 0.25);

        let mut negative = Node::hidden(&[-1.0, 0.0, 0.0]);
        let logit = negative.logit(&parents);
        negative.compute_output(logit, 1.0);
        assert_eq!(negative.output_value(), 0.0);
    }

    #[test]
    fn update_moves_weights_along_delta() {
        let parents = input_layer(&[2.0, -1.0]);
        let mut node = Node::hidden(&[0.5, 1.0, 0.25]);
        node.set_delta(0.5);
        node.update_weights(0.1, &parents);
        assert_eq!(node.weight_from(0), 0.5 + 0.1 * 2.0 * 0.5);
        assert_eq!(node.weight_from(1), 1.0 + 0.1 * -1.0 * 0.5);
        assert_eq!(node.weight_from(2), 0.25 + 0.1 * 1.0 * 0.5);
    }

    #[test]
    fn set_delta_overwrites() {
        let mut node = Node::output(&[1.0]);
        node.set_delta(0.3);
        node.set_delta(-0.2);
        assert_eq!(node.delta(), -0.2);
    }

    #[test]
    fn backpropagate_gates_inactive_hidden_nodes() {
        let mut node = Node::hidden(&[1.0]);
        node.compute_output(-3.0, 1.0);
        node.backpropagate(0.7);
        assert_eq!(node.delta(), 0.0);
        node.compute_output(3.0, 1.0);
        node.backpropagate(0.7);
        assert_eq!(node.delta(), 0.7);
    }

    #[test]
    #[should_panic(expected = "set_input called on a Hidden node")]
    fn set_input_on_hidden_node_panics() {
        Node::hidden(&[1.0]).set_input(1.0);
    }

    #[test]
    #[should_panic(expected = "update_weights called on a BiasToOutput node")]
    fn update_on_bias_node_panics() {
        Node::bias(BiasTarget::Output).update_weights(0.1, &[]);
    }

    #[test]
    #[should_panic(expected = "set_delta called on a Input node")]
    fn set_delta_on_input_node_panics() {
        Node::input().set_delta(1.0);
    }
}
