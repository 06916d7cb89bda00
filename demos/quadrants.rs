use backprop::{format_loss, Instance, Mat, Network, NetworkError, Trainer};

use rand::distributions::Uniform;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const SECTORS: usize = 3;

/// Points on the unit circle, labelled by which third of the circle they
/// lie in.
fn generate_data<R: Rng>(num_samples: usize, rng: &mut R) -> Vec<Instance> {
    let radians = Uniform::new(0.0, 2.0 * std::f64::consts::PI);
    let noise = Uniform::new(-0.05, 0.05);
    let mut data = Vec::with_capacity(num_samples);
    for _ in 0..num_samples {
        let theta: f64 = rng.sample(radians);
        let point = vec![theta.cos() + rng.sample(noise), theta.sin() + rng.sample(noise)];
        let sector = (theta / (2.0 * std::f64::consts::PI) * SECTORS as f64) as usize;
        match Instance::one_hot(point, sector.min(SECTORS - 1), SECTORS) {
            Ok(instance) => data.push(instance),
            Err(e) => eprintln!("skipping sample: {}", e),
        }
    }
    data
}

fn score(set_name: &str, network: &mut Network, data: &[Instance]) {
    match network.accuracy(data) {
        Ok(accuracy) => println!(
            "{} set results: {:.1}% of {} correct",
            set_name,
            accuracy * 100.0,
            data.len()
        ),
        Err(e) => eprintln!("{} set rejected: {}", set_name, e),
    }
}

fn main() -> Result<(), NetworkError> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(2024);
    let training_data = generate_data(2_000, &mut rng);
    let test_data = generate_data(500, &mut rng);

    let range = Uniform::new(-0.5, 0.5);
    let hidden = Mat::random(range, 8, 3, &mut rng);
    let output = Mat::random(range, SECTORS, 9, &mut rng);
    let network = Network::new(2, &hidden, &output)?;

    let mut trainer = Trainer::new(network, training_data, rng)?
        .learning_rate(0.01)
        .max_epochs(40);
    trainer.train_with(&mut |epoch: usize, loss: f64| {
        if epoch % 10 == 0 {
            println!("Epoch {}:\tloss={}", epoch, format_loss(loss));
        }
    })?;

    println!();
    let training_data = trainer.training_set().to_vec();
    let network = trainer.network_mut();
    score("Training", network, &training_data);
    score("Test", network, &test_data);
    Ok(())
}
