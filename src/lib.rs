//! Feedforward neural networks trained by backpropagation with momentum.

pub mod activator;
pub mod error;
pub mod history;
pub mod layer;
pub mod matrix;
pub mod network;
pub mod trainer;

mod gradient;
