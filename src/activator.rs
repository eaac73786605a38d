//! Activation function types.

use serde_derive::{Deserialize, Serialize};

/// The nonlinearity applied to a neuron's weighted input sum.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Activator {
    /// Logistic sigmoid, `1 / (1 + e^-x)`.
    Sigmoid,
    /// Hyperbolic tangent.
    TanH,
    /// Rectified linear unit.
    ReLU,
    /// Leaky rectified linear unit.
    ///
    /// Takes an `alpha` slope to use for negative inputs.
    LeakyReLU(f64),
}

impl Activator {
    /// Applies the activation function to a weighted input sum.
    pub fn activation(&self, x: f64) -> f64 {
        match *self {
            Activator::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activator::TanH => x.tanh(),
            Activator::ReLU => {
                if x > 0.0 {
                    x
                } else {
                    0.0
                }
            }
            Activator::LeakyReLU(alpha) => {
                if x > 0.0 {
                    x
                } else {
                    alpha * x
                }
            }
        }
    }

    /// Evaluates the derivative at the point that produced `output`.
    ///
    /// Note that this function takes the *output* of the activation
    /// function rather than the input. Every variant's derivative can be
    /// written in terms of its own output (for the sigmoid,
    /// `f'(x) = f(x) * (1 - f(x))`), so the backward pass never needs the
    /// pre-activation sums.
    pub fn derivative(&self, output: f64) -> f64 {
        match *self {
            Activator::Sigmoid => output * (1.0 - output),
            Activator::TanH => 1.0 - output * output,
            Activator::ReLU => {
                if output > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activator::LeakyReLU(alpha) => {
                if output > 0.0 {
                    1.0
                } else {
                    alpha
                }
            }
        }
    }
}

impl Default for Activator {
    fn default() -> Self {
        Activator::Sigmoid
    }
}
