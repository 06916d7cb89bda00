use backprop::{Instance, Mat, Network, Trainer};

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Four points split into two classes by the sign of the first feature.
fn separable() -> Vec<Instance> {
    vec![
        Instance::one_hot(vec![1.0, 0.5], 0, 2).unwrap(),
        Instance::one_hot(vec![2.0, -0.3], 0, 2).unwrap(),
        Instance::one_hot(vec![-1.0, 0.4], 1, 2).unwrap(),
        Instance::one_hot(vec![-1.5, -0.2], 1, 2).unwrap(),
    ]
}

fn network() -> Network {
    let hidden = Mat::from_rows(vec![vec![0.5, 0.1, 0.1], vec![-0.5, 0.1, 0.1]]).unwrap();
    let output = Mat::from_rows(vec![vec![0.1, -0.1, 0.0], vec![-0.1, 0.1, 0.0]]).unwrap();
    Network::new(2, &hidden, &output).unwrap()
}

fn train(seed: u64, epochs: usize) -> (Vec<f64>, Trainer<Xoshiro256PlusPlus>) {
    let mut losses = Vec::new();
    let mut trainer = Trainer::new(network(), separable(), Xoshiro256PlusPlus::seed_from_u64(seed))
        .unwrap()
        .learning_rate(0.1)
        .max_epochs(epochs);
    trainer
        .train_with(&mut |_: usize, loss: f64| losses.push(loss))
        .unwrap();
    (losses, trainer)
}

#[test]
fn converges_on_separable_data() {
    for seed in [0, 1, 2] {
        let (losses, mut trainer) = train(seed, 200);
        assert_eq!(losses.len(), 200);
        assert!(losses.iter().all(|&loss| loss >= 0.0));
        assert!(losses[199] < losses[0]);
        assert!(losses[199] < 0.01, "final loss {}", losses[199]);

        // Allow a little SGD noise in the tail.
        for pair in losses[100..].windows(2) {
            assert!(pair[1] <= pair[0] * 1.01, "{:?}", pair);
        }

        let network = trainer.network_mut();
        for instance in &separable() {
            assert_eq!(network.predict(instance).unwrap(), instance.label());
        }
        assert_eq!(network.accuracy(&separable()).unwrap(), 1.0);
    }
}

#[test]
fn identical_seeds_give_identical_runs() {
    let (first_losses, first) = train(11, 30);
    let (second_losses, second) = train(11, 30);
    let first_bits: Vec<u64> = first_losses.iter().map(|l| l.to_bits()).collect();
    let second_bits: Vec<u64> = second_losses.iter().map(|l| l.to_bits()).collect();
    assert_eq!(first_bits, second_bits);
    assert_eq!(first.network().weights(), second.network().weights());
}

#[test]
fn zero_epochs_leave_weights_untouched() {
    let (losses, trainer) = train(5, 0);
    assert!(losses.is_empty());
    assert_eq!(trainer.into_network().weights(), network().weights());
}

#[test]
fn trained_weights_survive_serialization() {
    let (_, trainer) = train(4, 20);
    let mut network = trainer.into_network();
    let json = serde_json::to_string(&network.weights()).unwrap();
    let mut restored = Network::from_weights(2, &serde_json::from_str(&json).unwrap()).unwrap();
    for instance in &separable() {
        assert_eq!(
            restored.run(instance.features()).unwrap(),
            network.run(instance.features()).unwrap()
        );
    }
}
