//! train - trains a classifier and reports its accuracy
//!
//! Datasets are JSON arrays of `{"features": [...], "targets": [...]}`.
//! Weights are JSON objects `{"hidden": [[...]], "output": [[...]]}`.
//!
//! ```bash
//! # Train on a generated quadrant dataset
//! cargo run --bin train -- --epochs 50 --seed 7
//!
//! # Train on files and keep the result
//! cargo run --bin train -- --train train.json --test test.json \
//!   --weights initial.json --save trained.json
//! ```

use anyhow::{Context, Result};
use backprop::{Instance, Mat, Network, Trainer, TrainingConfig, Weights};
use clap::Parser;
use log::info;
use rand::distributions::Uniform;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "train", version, about = "Train a one hidden layer softmax classifier")]
struct Cli {
    /// Training set (JSON). A generated dataset is used when omitted.
    #[arg(long)]
    train: Option<PathBuf>,

    /// Test set (JSON)
    #[arg(long)]
    test: Option<PathBuf>,

    /// Initial weights (JSON). Drawn uniformly from [-1, 1) when omitted.
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Training configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of hidden nodes
    #[arg(long)]
    hidden: Option<usize>,

    #[arg(long)]
    learning_rate: Option<f64>,

    /// Number of epochs
    #[arg(long)]
    epochs: Option<usize>,

    /// Seed for weight initialization and shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the trained weights (JSON)
    #[arg(long)]
    save: Option<PathBuf>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// Points on the unit circle with uniform noise, labelled by whether they
/// fall in the first and third quadrants.
fn generate_data<R: Rng>(num_samples: usize, rng: &mut R) -> Result<Vec<Instance>> {
    let radians = Uniform::new(0.0, 2.0 * std::f64::consts::PI);
    let noise = Uniform::new(-0.1, 0.1);
    (0..num_samples)
        .map(|_| {
            let theta = rng.sample(radians);
            let point = vec![theta.cos() + rng.sample(noise), theta.sin() + rng.sample(noise)];
            let class = if point[0] * point[1] > 0.0 { 0 } else { 1 };
            Instance::one_hot(point, class, 2)
        })
        .collect::<Result<_, _>>()
        .map_err(Into::into)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config: TrainingConfig = match &cli.config {
        Some(path) => read_json(path)?,
        None => TrainingConfig::default(),
    };
    if let Some(hidden) = cli.hidden {
        config.hidden_nodes = hidden;
    }
    if let Some(rate) = cli.learning_rate {
        config.learning_rate = rate;
    }
    if let Some(epochs) = cli.epochs {
        config.max_epochs = epochs;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    config.validate()?;
    info!("{:?}", config);

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
    let (training_set, test_set) = match &cli.train {
        Some(path) => {
            let test_set = match &cli.test {
                Some(test) => read_json(test)?,
                None => Vec::new(),
            };
            (read_json::<Vec<Instance>>(path)?, test_set)
        }
        None => (generate_data(1_000, &mut rng)?, generate_data(200, &mut rng)?),
    };
    let first = training_set.first().context("training set is empty")?;
    let input_len = first.features().len();
    let output_len = first.targets().len();

    let weights = match &cli.weights {
        Some(path) => read_json(path)?,
        None => {
            let range = Uniform::new(-1.0, 1.0);
            Weights {
                hidden: Mat::random(range, config.hidden_nodes, input_len + 1, &mut rng),
                output: Mat::random(range, output_len, config.hidden_nodes + 1, &mut rng),
            }
        }
    };
    let network = Network::from_weights(input_len, &weights)?;
    info!(
        "training on {} instances with {} hidden nodes",
        training_set.len(),
        network.hidden_len()
    );

    let mut trainer = Trainer::new(network, training_set, rng)?.configure(&config);
    trainer.train()?;

    let training_set = trainer.training_set().to_vec();
    let network = trainer.network_mut();
    info!("training accuracy: {:.4}", network.accuracy(&training_set)?);
    if !test_set.is_empty() {
        info!("test accuracy: {:.4}", network.accuracy(&test_set)?);
    }

    if let Some(path) = &cli.save {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &network.weights())?;
        info!("saved weights to {}", path.display());
    }
    Ok(())
}
