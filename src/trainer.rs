//! Utilities for training networks.

use crate::config::{check_learning_rate, TrainingConfig};
use crate::error::NetworkError;
use crate::instance::Instance;
use crate::network::Network;

use log::{debug, info};
use rand::Rng;
use std::time::Instant;

/// Receives the mean training loss once per epoch.
pub trait Report {
    /// Called after `epoch` (counting from zero) with the mean cross-entropy
    /// over the whole training set.
    fn epoch(&mut self, epoch: usize, average_loss: f64);
}

impl<F> Report for F
where
    F: FnMut(usize, f64),
{
    fn epoch(&mut self, epoch: usize, average_loss: f64) {
        self(epoch, average_loss)
    }
}

/// Logs every epoch at `info` as `Epoch: <n>, Loss: <loss>`.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogReport;

impl Report for LogReport {
    fn epoch(&mut self, epoch: usize, average_loss: f64) {
        info!("Epoch: {}, Loss: {}", epoch, format_loss(average_loss));
    }
}

/// Formats a loss in scientific notation with three fractional digits, a
/// signed exponent and at least two exponent digits, e.g. `2.310e-01`.
pub fn format_loss(loss: f64) -> String {
    if loss.is_nan() {
        return "NaN".to_string();
    }
    if loss.is_infinite() {
        return if loss > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let formatted = format!("{:.3e}", loss);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => formatted,
    }
}

/// Trains a `Network` with online stochastic gradient descent.
///
/// The trainer owns the training set and the random generator used to
/// shuffle it, so a fixed seed reproduces the same run bit for bit.
#[derive(Debug)]
pub struct Trainer<R> {
    network: Network,
    training_set: Vec<Instance>,
    learning_rate: f64,
    max_epochs: usize,
    rng: R,
}

impl<R: Rng> Trainer<R> {
    /// Creates a new Trainer instance.
    ///
    /// Every instance must match the network's input and output layers.
    /// The trainer is initialized with some default values. These defaults
    /// are:
    ///
    /// * A learning rate of 0.1.
    /// * Stops after 1000 epochs.
    pub fn new(
        network: Network,
        training_set: Vec<Instance>,
        rng: R,
    ) -> Result<Self, NetworkError> {
        if training_set.is_empty() {
            return Err(NetworkError::EmptyTrainingSet);
        }
        for instance in &training_set {
            network.check_instance(instance)?;
        }
        Ok(Trainer {
            network,
            training_set,
            learning_rate: 0.1,
            max_epochs: 1000,
            rng,
        })
    }

    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the number of epochs `train` runs.
    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    /// Applies the learning rate and epoch count of `config`.
    pub fn configure(self, config: &TrainingConfig) -> Self {
        self.learning_rate(config.learning_rate)
            .max_epochs(config.max_epochs)
    }

    /// Trains for the configured number of epochs, logging each epoch's loss.
    pub fn train(&mut self) -> Result<(), NetworkError> {
        self.train_with(&mut LogReport)
    }

    /// Trains for the configured number of epochs, sending each epoch's mean
    /// loss to `report` in order.
    ///
    /// Returns an error, before touching any weight, if the learning rate is
    /// not a positive finite number.
    pub fn train_with<P>(&mut self, report: &mut P) -> Result<(), NetworkError>
    where
        P: Report + ?Sized,
    {
        check_learning_rate(self.learning_rate)?;
        debug!(
            "training on {} instances for {} epochs at rate {}",
            self.training_set.len(),
            self.max_epochs,
            self.learning_rate
        );
        let start_time = Instant::now();
        for epoch in 0..self.max_epochs {
            let loss = self.network.epoch(
                &mut self.training_set,
                self.learning_rate,
                &mut self.rng,
            );
            report.epoch(epoch, loss);
        }
        debug!(
            "ran {} epochs in {:.3} seconds",
            self.max_epochs,
            start_time.elapsed().as_secs_f64()
        );
        Ok(())
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    /// Returns the training set in its current, possibly shuffled, order.
    pub fn training_set(&self) -> &[Instance] {
        &self.training_set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Mat;

    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn network() -> Network {
        let hidden = Mat::from_rows(vec![
            vec![0.4, -0.2, 0.1],
            vec![-0.3, 0.6, 0.2],
            vec![0.1, 0.1, -0.1],
        ])
        .unwrap();
        let output =
            Mat::from_rows(vec![vec![0.3, -0.2, 0.1, 0.0], vec![-0.1, 0.2, 0.3, 0.1]])
                .unwrap();
        Network::new(2, &hidden, &output).unwrap()
    }

    fn examples() -> Vec<Instance> {
        vec![
            Instance::one_hot(vec![1.0, 0.2], 0, 2).unwrap(),
            Instance::one_hot(vec![0.8, -0.4], 0, 2).unwrap(),
            Instance::one_hot(vec![-0.9, 0.3], 1, 2).unwrap(),
            Instance::one_hot(vec![-1.2, -0.1], 1, 2).unwrap(),
            Instance::one_hot(vec![0.5, 0.9], 0, 2).unwrap(),
            Instance::one_hot(vec![-0.4, -0.8], 1, 2).unwrap(),
        ]
    }

    fn trainer(seed: u64) -> Trainer<Xoshiro256PlusPlus> {
        Trainer::new(network(), examples(), Xoshiro256PlusPlus::seed_from_u64(seed))
            .unwrap()
            .learning_rate(0.05)
    }

    fn run(seed: u64, epochs: usize) -> (Vec<(usize, f64)>, Trainer<Xoshiro256PlusPlus>) {
        let mut reports = Vec::new();
        let mut trainer = trainer(seed).max_epochs(epochs);
        trainer
            .train_with(&mut |epoch: usize, loss: f64| reports.push((epoch, loss)))
            .unwrap();
        (reports, trainer)
    }

    #[test]
    fn zero_epochs_changes_nothing() {
        let before = network().weights();
        let (reports, trainer) = run(1, 0);
        assert!(reports.is_empty());
        assert_eq!(trainer.network().weights(), before);
        assert_eq!(trainer.training_set(), &examples()[..]);
    }

    #[test]
    fn reports_once_per_epoch_in_order() {
        let (reports, _) = run(1, 5);
        let epochs: Vec<usize> = reports.iter().map(|&(e, _)| e).collect();
        assert_eq!(epochs, vec![0, 1, 2, 3, 4]);
        assert!(reports.iter().all(|&(_, loss)| loss >= 0.0));
    }

    #[test]
    fn same_seed_reproduces_the_run() {
        let (first_reports, first) = run(42, 20);
        let (second_reports, second) = run(42, 20);
        assert_eq!(first_reports, second_reports);
        assert_eq!(first.network().weights(), second.network().weights());
        assert_eq!(first.training_set(), second.training_set());
    }

    #[test]
    fn reported_loss_matches_network_loss() {
        let (reports, mut trainer) = run(7, 3);
        let set = trainer.training_set().to_vec();
        let network = trainer.network_mut();
        let mut total = 0.0;
        for instance in &set {
            total += network.loss(instance).unwrap();
        }
        let (_, last) = reports[2];
        assert_eq!(last, total / set.len() as f64);
    }

    #[test]
    fn training_lowers_loss() {
        let (reports, _) = run(3, 100);
        assert!(reports[99].1 < reports[0].1);
    }

    #[test]
    fn invalid_learning_rate_fails_before_training() {
        let before = network().weights();
        let mut calls = 0;
        let mut trainer = trainer(1).learning_rate(-1.0).max_epochs(3);
        assert_eq!(
            trainer.train_with(&mut |_: usize, _: f64| calls += 1),
            Err(NetworkError::InvalidLearningRate(-1.0))
        );
        assert_eq!(calls, 0);
        assert_eq!(trainer.network().weights(), before);
    }

    #[test]
    fn new_rejects_bad_training_sets() {
        let rng = Xoshiro256PlusPlus::seed_from_u64(0);
        assert_eq!(
            Trainer::new(network(), Vec::new(), rng.clone()).unwrap_err(),
            NetworkError::EmptyTrainingSet
        );
        let mut set = examples();
        set.push(Instance::one_hot(vec![1.0], 0, 2).unwrap());
        assert_eq!(
            Trainer::new(network(), set, rng).unwrap_err(),
            NetworkError::FeatureLength {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn configure_applies_config() {
        let config = TrainingConfig {
            learning_rate: 0.2,
            max_epochs: 4,
            ..TrainingConfig::default()
        };
        let mut calls = Vec::new();
        let mut trainer = trainer(1).configure(&config);
        assert_eq!(trainer.learning_rate, 0.2);
        trainer.train_with(&mut |epoch: usize, _: f64| calls.push(epoch)).unwrap();
        assert_eq!(calls, vec![0, 1, 2, 3]);
    }

    #[test]
    fn formats_loss_like_fixed_precision_scientific() {
        assert_eq!(format_loss(0.2309), "2.309e-01");
        assert_eq!(format_loss(1.0), "1.000e+00");
        assert_eq!(format_loss(0.0), "0.000e+00");
        assert_eq!(format_loss(12346.0), "1.235e+04");
        assert_eq!(format_loss(1.5e-10), "1.500e-10");
        assert_eq!(format_loss(9.9996), "1.000e+01");
        assert_eq!(format_loss(f64::NAN), "NaN");
        assert_eq!(format_loss(f64::INFINITY), "Infinity");
    }
}
