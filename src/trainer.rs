//! Backpropagation training with momentum.
//!
//! # Example
//!
//! Let's train a small network to compute the XOR function:
//!
//! ```
//! use backprop::layer::Layer;
//! use backprop::network::Network;
//! use backprop::trainer::Trainer;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! # fn main() -> backprop::error::Result<()> {
//! let inputs = vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![1.0, 0.0],
//!     vec![1.0, 1.0],
//! ];
//! let expected = vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]];
//!
//! // Gradient descent can stall in a flat region for an unlucky starting
//! // point, so retry with freshly randomized weights until the error
//! // target is reached.
//! let mut trained = None;
//! for seed in 0..5 {
//!     let mut network = Network::new();
//!     network.add_layer(Layer::sigmoid(2));
//!     network.add_layer(Layer::sigmoid(4));
//!     network.add_layer(Layer::sigmoid(1));
//!     network.reset_with(&mut StdRng::seed_from_u64(seed), -0.5, 0.5);
//!
//!     let mut trainer =
//!         Trainer::new(network, inputs.clone(), expected.clone(), 0.2, 0.9)?;
//!     for _ in 0..10_000 {
//!         if trainer.train()? <= 0.05 {
//!             trained = Some(trainer.into_network());
//!             break;
//!         }
//!     }
//!     if trained.is_some() {
//!         break;
//!     }
//! }
//!
//! // And verify the network correctly computes XOR!
//! let mut network = trained.expect("training converged");
//! for (input, want) in inputs.iter().zip(&expected) {
//!     let output = network.compute_outputs(input)?[0];
//!     assert_eq!(output > 0.5, want[0] > 0.5);
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use crate::gradient::LayerGradient;
use crate::network::Network;

/// Trains a [`Network`] on a fixed set of labelled patterns.
///
/// The trainer owns the network for the duration of training and keeps one
/// [`LayerGradient`] per layer beside it. Each [`train`](Trainer::train)
/// call runs a single epoch; the caller decides how many epochs to run and
/// when the error is good enough.
#[derive(Debug)]
pub struct Trainer {
    network: Network,
    inputs: Vec<Vec<f64>>,
    expected: Vec<Vec<f64>>,
    learning_rate: f64,
    momentum: f64,
    gradients: Vec<LayerGradient>,
}

impl Trainer {
    /// Creates a new Trainer instance.
    ///
    /// Arguments:
    ///
    ///  * `network` - the network to train, with its weights already
    ///                initialized.
    ///  * `inputs` - one input pattern per training sample.
    ///  * `expected` - the expected output pattern for each sample.
    ///  * `learning_rate` - scales each weight update. Must be positive
    ///                      and finite.
    ///  * `momentum` - scales how much of the previous update is carried
    ///                 into the next one. Must be non-negative and finite.
    ///
    /// Fails if the configuration is inconsistent: an empty network,
    /// datasets of different lengths, pattern rows that disagree with the
    /// network's input or output width, or out-of-range coefficients.
    pub fn new(
        network: Network,
        inputs: Vec<Vec<f64>>,
        expected: Vec<Vec<f64>>,
        learning_rate: f64,
        momentum: f64,
    ) -> Result<Self> {
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(Error::InvalidLearningRate(learning_rate));
        }
        if !momentum.is_finite() || momentum < 0.0 {
            return Err(Error::InvalidMomentum(momentum));
        }
        if network.is_empty() {
            return Err(Error::EmptyNetwork);
        }
        if inputs.len() != expected.len() {
            return Err(Error::DatasetSizeMismatch {
                inputs: inputs.len(),
                expected: expected.len(),
            });
        }
        for (index, row) in inputs.iter().enumerate() {
            if row.len() != network.input_len() {
                return Err(Error::InvalidInputRow {
                    index,
                    expected: network.input_len(),
                    found: row.len(),
                });
            }
        }
        for (index, row) in expected.iter().enumerate() {
            if row.len() != network.output_len() {
                return Err(Error::InvalidExpectedRow {
                    index,
                    expected: network.output_len(),
                    found: row.len(),
                });
            }
        }
        let gradients = network.layers().iter().map(LayerGradient::for_layer).collect();
        Ok(Trainer {
            network,
            inputs,
            expected,
            learning_rate,
            momentum,
            gradients,
        })
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    /// The network in its current state of training.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Consumes the trainer, returning the trained network.
    pub fn into_network(self) -> Network {
        self.network
    }

    /// Runs one training epoch over the whole dataset.
    ///
    /// Every sample is processed in order: a forward pass, a backward pass
    /// from the output layer towards the input layer and an immediate
    /// weight update. Returns the squared error summed over every output
    /// neuron of every sample, measured before each sample's update.
    pub fn train(&mut self) -> Result<f64> {
        let mut total_error = 0.0;
        for sample in 0..self.inputs.len() {
            let outputs = self.network.compute_outputs(&self.inputs[sample])?;
            for (&output, &want) in outputs.iter().zip(&self.expected[sample]) {
                let diff = output - want;
                total_error += diff * diff;
            }
            self.backward(sample)?;
            self.learn();
        }
        Ok(total_error)
    }

    /// Output-to-input error pass for one sample.
    fn backward(&mut self, sample: usize) -> Result<()> {
        for gradient in &mut self.gradients {
            gradient.clear_error();
        }
        let count = self.gradients.len();
        for index in (0..count).rev() {
            let layer = &self.network.layers()[index];
            if index + 1 == count {
                self.gradients[index].calc_output_error(layer, &self.expected[sample]);
            } else {
                let (current, rest) = self.gradients[index..].split_at_mut(1);
                current[0].calc_error(layer, rest[0].error_delta(), index > 0)?;
            }
        }
        Ok(())
    }

    /// Applies every layer's pending update to its weight matrix.
    fn learn(&mut self) {
        let rate = self.learning_rate;
        let momentum = self.momentum;
        for (layer, gradient) in self
            .network
            .layers_mut()
            .iter_mut()
            .zip(&mut self.gradients)
        {
            gradient.learn(layer, rate, momentum);
        }
    }
}

/// Logging frequency to use during an epoch loop.
#[derive(Copy, Clone, Debug)]
pub enum Logging {
    /// No logs will be printed.
    Silent,
    /// A summary will be printed once training stops.
    Completion,
    /// A progress line will be printed after every `n` epochs, plus the
    /// summary.
    Epochs(usize),
}

impl Logging {
    /// Performs logging for a finished `epoch`.
    pub fn epoch(&self, epoch: usize, error: f64) {
        if let Logging::Epochs(freq) = *self {
            if freq > 0 && epoch % freq == 0 {
                println!("Epoch {}:\terror={}", epoch, error);
            }
        }
    }

    /// Performs logging at the end of training.
    pub fn completion(&self, epochs: usize, error: f64) {
        if let Logging::Silent = self {
            return;
        }
        println!("Training stopped after {} epochs.", epochs);
        println!("Final error: {}", error);
    }
}
