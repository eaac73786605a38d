//! End-to-end training runs over the XOR dataset.

use rand::rngs::StdRng;
use rand::SeedableRng;

use backprop::history::TrainingHistory;
use backprop::layer::Layer;
use backprop::network::Network;
use backprop::trainer::Trainer;

const MAX_EPOCHS: usize = 10_000;
const TARGET_ERROR: f64 = 0.05;

fn xor_inputs() -> Vec<Vec<f64>> {
    vec![
        vec![0.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 1.0],
    ]
}

fn xor_expected() -> Vec<Vec<f64>> {
    vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]]
}

fn xor_network(seed: u64) -> Network {
    let mut network = Network::new();
    network.add_layer(Layer::sigmoid(2));
    network.add_layer(Layer::sigmoid(4));
    network.add_layer(Layer::sigmoid(1));
    network.reset_with(&mut StdRng::seed_from_u64(seed), -0.5, 0.5);
    network
}

/// All four XOR outputs within 0.2 of their targets, the acceptance a
/// trained network has to meet.
fn learned_xor(network: &mut Network) -> bool {
    xor_inputs().iter().zip(xor_expected()).all(|(input, want)| {
        let output = network.compute_outputs(input).unwrap()[0];
        (output - want[0]).abs() < 0.2
    })
}

/// Trains a fresh network from `seed`, stopping at the error target.
/// Returns the trained network and its history once it meets the
/// acceptance above.
fn train_from_seed(seed: u64) -> Option<(Network, TrainingHistory)> {
    let mut trainer = Trainer::new(
        xor_network(seed),
        xor_inputs(),
        xor_expected(),
        0.2,
        0.9,
    )
    .unwrap();
    let mut history = TrainingHistory::new();

    for epoch in 1..=MAX_EPOCHS {
        let error = trainer.train().unwrap();
        history.record(epoch, error);
        if error <= TARGET_ERROR {
            let mut network = trainer.into_network();
            if learned_xor(&mut network) {
                return Some((network, history));
            }
            return None;
        }
    }
    None
}

/// Some starting weights stall in a flat error region, so try a handful
/// of fixed seeds. One of them learning XOR is enough.
fn train_xor() -> (Network, TrainingHistory) {
    (0..5u64)
        .find_map(train_from_seed)
        .expect("no seed learned XOR within the epoch budget")
}

#[test]
fn learns_xor_within_the_epoch_budget() {
    let (mut network, history) = train_xor();

    let last = history.last().unwrap();
    assert!(last.error <= TARGET_ERROR);
    assert!(last.epoch <= MAX_EPOCHS);

    for (input, want) in xor_inputs().iter().zip(xor_expected()) {
        let output = network.compute_outputs(input).unwrap()[0];
        assert!(
            (output - want[0]).abs() < 0.2,
            "{:?} -> {} but wanted {}",
            input,
            output,
            want[0]
        );
    }
}

#[test]
fn training_error_trends_downward() {
    let (_, history) = train_xor();
    assert!(history.len() >= 2);
    let first = history.records()[0].error;
    let last = history.last().unwrap().error;
    assert!(last < first, "error went from {} to {}", first, last);
}

#[test]
fn a_saved_model_predicts_like_the_original() {
    let (mut network, _) = train_xor();
    let path = std::env::temp_dir().join(format!("backprop-xor-{}.json", std::process::id()));
    network.save(&path).unwrap();
    let mut restored = Network::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    for input in xor_inputs() {
        let want = network.compute_outputs(&input).unwrap().to_vec();
        let got = restored.compute_outputs(&input).unwrap();
        assert_eq!(got, &want[..]);
    }
}
