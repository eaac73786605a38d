//! A single fully connected layer and its outgoing weight matrix.

use rand::Rng;
use serde_derive::{Deserialize, Serialize};

use crate::activator::Activator;
use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// One layer of a feedforward network.
///
/// A layer stores the output of each of its neurons from the most recent
/// forward pass and, for every layer but the last, the weight matrix
/// leading to the next layer. The matrix has one row per neuron plus a
/// final bias row and one column per neuron of the next layer; the bias
/// row is fed by a constant `1.0` appended to the layer's outputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    values: Vec<f64>,
    matrix: Option<Matrix>,
    activator: Activator,
}

impl Layer {
    /// Initializes a new, unconnected layer.
    ///
    /// Arguments:
    ///
    ///  * `activator` - the activation function applied to the sums this
    ///                  layer pushes into its successor.
    ///  * `neuron_count` - the number of neurons in this layer.
    ///
    /// # Panics
    ///
    /// Panics if `neuron_count` is zero.
    pub fn new(activator: Activator, neuron_count: usize) -> Self {
        assert!(neuron_count > 0, "a layer needs at least one neuron");
        Layer {
            values: vec![0.0; neuron_count],
            matrix: None,
            activator,
        }
    }

    /// Shorthand for a sigmoid layer of `neuron_count` neurons.
    pub fn sigmoid(neuron_count: usize) -> Self {
        Layer::new(Activator::default(), neuron_count)
    }

    /// Returns the number of neurons in this layer.
    pub fn neuron_count(&self) -> usize {
        self.values.len()
    }

    /// The neuron outputs from the most recent forward pass.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn activator(&self) -> Activator {
        self.activator
    }

    /// The weight matrix towards the next layer, if this layer has one.
    pub fn matrix(&self) -> Option<&Matrix> {
        self.matrix.as_ref()
    }

    pub fn matrix_mut(&mut self) -> Option<&mut Matrix> {
        self.matrix.as_mut()
    }

    pub fn has_matrix(&self) -> bool {
        self.matrix.is_some()
    }

    /// Randomizes the weight matrix in place with independent uniform
    /// samples from `[lower, upper]`. Layers without a matrix are left
    /// untouched.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R, lower: f64, upper: f64) {
        if let Some(matrix) = &mut self.matrix {
            matrix.randomize(rng, lower, upper);
        }
    }

    /// Allocates the zeroed weight matrix towards a successor layer of
    /// `next_neuron_count` neurons.
    pub(crate) fn connect(&mut self, next_neuron_count: usize) {
        self.matrix = Some(Matrix::zeros(self.neuron_count() + 1, next_neuron_count));
    }

    /// Row index of the bias weights inside this layer's matrix.
    pub(crate) fn bias_row(&self) -> usize {
        self.neuron_count()
    }

    /// Overwrites this layer's values with an input pattern.
    pub(crate) fn set_values(&mut self, pattern: &[f64]) {
        self.values.copy_from_slice(pattern);
    }

    /// Computes the successor's outputs from this layer's values.
    ///
    /// Builds the bias-augmented row `[values.., 1.0]`, takes its dot
    /// product with each matrix column and stores the activated sums as
    /// `next`'s values.
    pub(crate) fn feed(&self, next: &mut Layer) -> Result<()> {
        let matrix = self.matrix.as_ref().ok_or(Error::DisconnectedLayer)?;
        let input = self.values_with_bias();
        for neuron in 0..next.neuron_count() {
            let sum = matrix.column(neuron)?.dot(&input)?;
            next.values[neuron] = self.activator.activation(sum);
        }
        Ok(())
    }

    /// This layer's values as a single row with the constant bias input
    /// appended.
    fn values_with_bias(&self) -> Matrix {
        let mut input = Matrix::zeros(1, self.neuron_count() + 1);
        for (neuron, &value) in self.values.iter().enumerate() {
            input.set(0, neuron, value);
        }
        input.set(0, self.neuron_count(), 1.0);
        input
    }
}
