use backprop::error::Result;
use backprop::history::TrainingHistory;
use backprop::layer::Layer;
use backprop::network::Network;
use backprop::trainer::{Logging, Trainer};

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

fn main() -> Result<()> {
    let mut network = Network::new();
    network.add_layer(Layer::sigmoid(2));
    network.add_layer(Layer::sigmoid(4));
    network.add_layer(Layer::sigmoid(1));
    network.reset(-0.5, 0.5);

    let mut trainer = Trainer::new(network, xor_inputs(), xor_expected(), 0.2, 0.9)?;
    let logging = Logging::Epochs(100);
    let mut history = TrainingHistory::new();

    let mut epoch = 0;
    let mut error = f64::INFINITY;
    while epoch < MAX_EPOCHS && error > TARGET_ERROR {
        error = trainer.train()?;
        epoch += 1;
        history.record(epoch, error);
        logging.epoch(epoch, error);
    }
    logging.completion(epoch, error);

    let mut network = trainer.into_network();
    println!();
    println!("Results:");
    for (input, expected) in xor_inputs().iter().zip(xor_expected()) {
        let actual = network.compute_outputs(input)?[0];
        println!(
            "{:?} -> actual={:.4}, expected={}",
            input, actual, expected[0]
        );
    }

    history.save_csv("xor-error.csv")?;
    network.save("xor-network.json")?;
    Ok(())
}
