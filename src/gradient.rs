//! Per-layer backpropagation state.

use itertools::multizip;

use crate::error::{Error, Result};
use crate::layer::Layer;
use crate::matrix::Matrix;

/// Training-time companion to one [`Layer`].
///
/// Holds the error and error-delta vectors for the sample currently being
/// processed plus, for layers that own a weight matrix, the accumulator of
/// pending weight deltas and the previously applied update. The previous
/// update seeds the momentum term of the next one.
#[derive(Debug)]
pub(crate) struct LayerGradient {
    error: Vec<f64>,
    error_delta: Vec<f64>,
    accumulated: Option<Matrix>,
    previous: Option<Matrix>,
}

impl LayerGradient {
    /// Creates zeroed gradient state shaped after `layer`.
    pub(crate) fn for_layer(layer: &Layer) -> Self {
        let deltas = layer
            .matrix()
            .map(|matrix| Matrix::zeros(matrix.rows(), matrix.cols()));
        LayerGradient {
            error: vec![0.0; layer.neuron_count()],
            error_delta: vec![0.0; layer.neuron_count()],
            accumulated: deltas.clone(),
            previous: deltas,
        }
    }

    pub(crate) fn error_delta(&self) -> &[f64] {
        &self.error_delta
    }

    /// Zeroes the error vector ahead of a backward pass.
    ///
    /// The error-delta vector is rewritten by the pass itself and the
    /// previous-update matrix must survive to carry momentum across
    /// samples, so neither is touched here.
    pub(crate) fn clear_error(&mut self) {
        for error in &mut self.error {
            *error = 0.0;
        }
    }

    /// Backward step for the output layer.
    ///
    /// The error is the difference between the expected and actual
    /// outputs; scaling it by the activation derivative yields the
    /// error-delta that drives the rest of the pass.
    pub(crate) fn calc_output_error(&mut self, layer: &Layer, expected: &[f64]) {
        let activator = layer.activator();
        for (error, delta, &want, &got) in multizip((
            self.error.iter_mut(),
            self.error_delta.iter_mut(),
            expected.iter(),
            layer.values().iter(),
        )) {
            *error = want - got;
            *delta = *error * activator.derivative(got);
        }
    }

    /// Backward step for a layer with a successor.
    ///
    /// Accumulates weight and bias deltas from the successor's error-delta
    /// and folds that delta back through the weight matrix into this
    /// layer's error. When `propagate` is set (hidden layers), the layer's
    /// own error-delta is derived so the signal continues towards the
    /// input layer.
    pub(crate) fn calc_error(
        &mut self,
        layer: &Layer,
        next_delta: &[f64],
        propagate: bool,
    ) -> Result<()> {
        let matrix = layer.matrix().ok_or(Error::DisconnectedLayer)?;
        let accumulated = self
            .accumulated
            .as_mut()
            .ok_or(Error::DisconnectedLayer)?;
        let bias_row = layer.bias_row();
        let values = layer.values();
        for (next_neuron, &delta) in next_delta.iter().enumerate() {
            for (neuron, &value) in values.iter().enumerate() {
                accumulated.accumulate(neuron, next_neuron, delta * value);
                self.error[neuron] += matrix.get(neuron, next_neuron) * delta;
            }
            accumulated.accumulate(bias_row, next_neuron, delta);
        }
        if propagate {
            let activator = layer.activator();
            for (delta, &error, &value) in multizip((
                self.error_delta.iter_mut(),
                self.error.iter(),
                values.iter(),
            )) {
                *delta = error * activator.derivative(value);
            }
        }
        Ok(())
    }

    /// Applies the accumulated deltas to the layer's weight matrix.
    ///
    /// The update is `accumulated * rate + previous * momentum`. It is
    /// added onto the live matrix, retained as the next momentum seed and
    /// the accumulator is cleared for the next sample. Layers without a
    /// matrix have nothing to learn.
    pub(crate) fn learn(&mut self, layer: &mut Layer, rate: f64, momentum: f64) {
        let (accumulated, previous, matrix) = match (
            self.accumulated.as_mut(),
            self.previous.as_mut(),
            layer.matrix_mut(),
        ) {
            (Some(accumulated), Some(previous), Some(matrix)) => (accumulated, previous, matrix),
            _ => return,
        };
        let mut update = accumulated.scaled(rate);
        update += &previous.scaled(momentum);
        *matrix += &update;
        *previous = update;
        accumulated.clear();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::activator::Activator;

    use super::*;

    fn connected_layer(neurons: usize, next: usize) -> Layer {
        let mut layer = Layer::new(Activator::Sigmoid, neurons);
        layer.connect(next);
        layer
    }

    #[test]
    fn for_layer_mirrors_the_matrix_shape() {
        let connected = connected_layer(2, 3);
        let gradient = LayerGradient::for_layer(&connected);
        let accumulated = gradient.accumulated.as_ref().unwrap();
        assert_eq!((accumulated.rows(), accumulated.cols()), (3, 3));
        assert!(gradient.previous.is_some());

        let output = Layer::new(Activator::Sigmoid, 3);
        let gradient = LayerGradient::for_layer(&output);
        assert!(gradient.accumulated.is_none());
        assert!(gradient.previous.is_none());
        assert_eq!(gradient.error_delta().len(), 3);
    }

    #[test]
    fn output_error_is_difference_times_derivative() {
        let mut layer = Layer::new(Activator::Sigmoid, 2);
        layer.set_values(&[0.8, 0.2]);
        let mut gradient = LayerGradient::for_layer(&layer);

        gradient.calc_output_error(&layer, &[1.0, 0.0]);
        assert_relative_eq!(gradient.error[0], 0.2, epsilon = 1e-12);
        assert_relative_eq!(gradient.error[1], -0.2, epsilon = 1e-12);
        assert_relative_eq!(gradient.error_delta()[0], 0.2 * 0.8 * 0.2, epsilon = 1e-12);
        assert_relative_eq!(gradient.error_delta()[1], -0.2 * 0.2 * 0.8, epsilon = 1e-12);
    }

    #[test]
    fn clear_error_keeps_deltas_and_momentum_state() {
        let mut layer = Layer::new(Activator::Sigmoid, 1);
        layer.set_values(&[0.5]);
        let mut gradient = LayerGradient::for_layer(&layer);
        gradient.calc_output_error(&layer, &[1.0]);
        assert!(gradient.error[0] != 0.0);

        gradient.clear_error();
        assert_eq!(gradient.error[0], 0.0);
        assert!(gradient.error_delta()[0] != 0.0);
    }

    #[test]
    fn calc_error_accumulates_weight_and_bias_deltas() {
        let mut layer = connected_layer(2, 1);
        layer.set_values(&[0.5, 0.25]);
        layer.matrix_mut().unwrap().set(0, 0, 2.0);
        layer.matrix_mut().unwrap().set(1, 0, -1.0);
        let mut gradient = LayerGradient::for_layer(&layer);

        gradient.calc_error(&layer, &[0.1], true).unwrap();

        let accumulated = gradient.accumulated.as_ref().unwrap();
        assert_relative_eq!(accumulated.get(0, 0), 0.1 * 0.5, epsilon = 1e-12);
        assert_relative_eq!(accumulated.get(1, 0), 0.1 * 0.25, epsilon = 1e-12);
        assert_relative_eq!(accumulated.get(2, 0), 0.1, epsilon = 1e-12);

        assert_relative_eq!(gradient.error[0], 2.0 * 0.1, epsilon = 1e-12);
        assert_relative_eq!(gradient.error[1], -1.0 * 0.1, epsilon = 1e-12);
        assert_relative_eq!(gradient.error_delta()[0], 0.2 * 0.5 * 0.5, epsilon = 1e-12);
        assert_relative_eq!(gradient.error_delta()[1], -0.1 * 0.25 * 0.75, epsilon = 1e-12);
    }

    #[test]
    fn calc_error_without_propagation_leaves_deltas_alone() {
        let mut layer = connected_layer(1, 1);
        layer.set_values(&[0.5]);
        layer.matrix_mut().unwrap().set(0, 0, 2.0);
        let mut gradient = LayerGradient::for_layer(&layer);
        gradient.calc_error(&layer, &[0.3], false).unwrap();
        assert_eq!(gradient.error_delta()[0], 0.0);
        assert_relative_eq!(gradient.error[0], 2.0 * 0.3, epsilon = 1e-12);
    }

    #[test]
    fn calc_error_needs_a_weight_matrix() {
        let layer = Layer::new(Activator::Sigmoid, 1);
        let mut gradient = LayerGradient::for_layer(&layer);
        assert!(matches!(
            gradient.calc_error(&layer, &[0.1], false),
            Err(Error::DisconnectedLayer)
        ));
    }

    #[test]
    fn learn_applies_scaled_deltas_and_carries_momentum() {
        let mut layer = connected_layer(1, 1);
        layer.set_values(&[1.0]);
        let mut gradient = LayerGradient::for_layer(&layer);

        gradient.calc_error(&layer, &[0.4], false).unwrap();
        gradient.learn(&mut layer, 0.5, 0.9);

        // First update has no momentum seed: update = acc * rate.
        let matrix = layer.matrix().unwrap();
        assert_relative_eq!(matrix.get(0, 0), 0.4 * 0.5, epsilon = 1e-12);
        assert_relative_eq!(matrix.get(1, 0), 0.4 * 0.5, epsilon = 1e-12);
        let accumulated = gradient.accumulated.as_ref().unwrap();
        assert!(accumulated.as_slice().iter().all(|&v| v == 0.0));

        gradient.clear_error();
        gradient.calc_error(&layer, &[0.4], false).unwrap();
        gradient.learn(&mut layer, 0.5, 0.9);

        // Second update adds momentum: acc * rate + previous * momentum.
        let expected_second = 0.4 * 0.5 + 0.9 * (0.4 * 0.5);
        let matrix = layer.matrix().unwrap();
        assert_relative_eq!(matrix.get(0, 0), 0.4 * 0.5 + expected_second, epsilon = 1e-12);
    }

    #[test]
    fn learn_without_a_matrix_is_a_no_op() {
        let mut layer = Layer::new(Activator::Sigmoid, 2);
        let mut gradient = LayerGradient::for_layer(&layer);
        gradient.learn(&mut layer, 0.5, 0.9);
        assert!(!layer.has_matrix());
    }
}
