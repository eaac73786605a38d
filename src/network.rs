//! A [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network) built as an
//! ordered chain of layers.

use std::fs;
use std::path::Path;

use rand::Rng;
use serde_derive::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layer::Layer;

/// A feedforward neural network.
///
/// Layers sit in insertion order: the first is the input layer, the last
/// is the output layer and everything between is hidden. Appending a layer
/// connects the previous output layer to it, so the structure is always a
/// single chain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    /// Creates a network with no layers.
    pub fn new() -> Self {
        Network { layers: Vec::new() }
    }

    /// Appends `layer` to the chain.
    ///
    /// The layer that was the output so far gains its weight matrix
    /// towards the newcomer; the newcomer becomes the output layer.
    pub fn add_layer(&mut self, layer: Layer) {
        if let Some(last) = self.layers.last_mut() {
            last.connect(layer.neuron_count());
        }
        self.layers.push(layer);
    }

    /// The layers in input-to-output order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    /// Returns the number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Returns the size of the input layer to the network.
    ///
    /// # Panics
    ///
    /// Panics if the network has no layers.
    pub fn input_len(&self) -> usize {
        self.layers[0].neuron_count()
    }

    /// Returns the size of the output layer from the network.
    ///
    /// # Panics
    ///
    /// Panics if the network has no layers.
    pub fn output_len(&self) -> usize {
        self.layers[self.layers.len() - 1].neuron_count()
    }

    /// True if the layer at `index` is the input layer.
    pub fn is_input(&self, index: usize) -> bool {
        index == 0
    }

    /// True if the layer at `index` sits between the input and output
    /// layers.
    pub fn is_hidden(&self, index: usize) -> bool {
        !self.is_input(index) && !self.is_output(index)
    }

    /// True if the layer at `index` is the output layer.
    pub fn is_output(&self, index: usize) -> bool {
        index + 1 == self.layers.len()
    }

    /// Feeds `input` through the network and returns the output layer's
    /// values.
    ///
    /// The returned slice borrows the output layer's live state; callers
    /// that need the values beyond the next forward pass must copy them
    /// out.
    pub fn compute_outputs(&mut self, input: &[f64]) -> Result<&[f64]> {
        if self.layers.is_empty() {
            return Err(Error::EmptyNetwork);
        }
        if input.len() != self.input_len() {
            return Err(Error::InputSizeMismatch {
                expected: self.input_len(),
                found: input.len(),
            });
        }
        self.layers[0].set_values(input);
        for index in 0..self.layers.len() - 1 {
            let (feeding, rest) = self.layers[index..].split_at_mut(1);
            feeding[0].feed(&mut rest[0])?;
        }
        Ok(self.layers[self.layers.len() - 1].values())
    }

    /// Resets every weight matrix to independent uniform samples from
    /// `[lower, upper]`, using the thread-local RNG.
    pub fn reset(&mut self, lower: f64, upper: f64) {
        self.reset_with(&mut rand::thread_rng(), lower, upper);
    }

    /// Same as [`reset`](Network::reset), drawing from a caller-supplied
    /// RNG.
    pub fn reset_with<R: Rng + ?Sized>(&mut self, rng: &mut R, lower: f64, upper: f64) {
        for layer in &mut self.layers {
            layer.reset(rng, lower, upper);
        }
    }

    /// Writes the layer structure and every weight matrix to `path` as
    /// JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reads a network previously written by [`save`](Network::save).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Network> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
