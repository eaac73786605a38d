//! Error types for network construction, training and persistence.

use std::io;

use thiserror::Error;

/// Shorthand for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong building, training or storing a network.
#[derive(Debug, Error)]
pub enum Error {
    /// Elementwise arithmetic between differently shaped matrices.
    #[error(
        "cannot combine a {left_rows}x{left_cols} matrix with a {right_rows}x{right_cols} matrix"
    )]
    DimensionMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    /// Dot product between matrices holding different cell counts.
    #[error("dot product needs equally sized operands, got {left} and {right} cells")]
    SizeMismatch { left: usize, right: usize },

    /// Column access past the right edge of a matrix.
    #[error("column {column} does not exist in a matrix with {cols} columns")]
    ColumnOutOfRange { column: usize, cols: usize },

    /// A grid constructor row with the wrong width.
    #[error("grid row {row} holds {found} values, expected {expected}")]
    RaggedGrid {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// A forward or backward pass over a network with no layers.
    #[error("the network has no layers")]
    EmptyNetwork,

    /// A layer that must feed a successor but owns no weight matrix.
    #[error("a layer that feeds a successor owns no weight matrix")]
    DisconnectedLayer,

    /// An input vector whose width disagrees with the input layer.
    #[error("input holds {found} values but the input layer has {expected} neurons")]
    InputSizeMismatch { expected: usize, found: usize },

    /// Training input and expected-output datasets of different lengths.
    #[error("got {inputs} input rows but {expected} expected rows")]
    DatasetSizeMismatch { inputs: usize, expected: usize },

    /// A training input row whose width disagrees with the input layer.
    #[error("input row {index} holds {found} values but the input layer has {expected} neurons")]
    InvalidInputRow {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// An expected-output row whose width disagrees with the output layer.
    #[error(
        "expected row {index} holds {found} values but the output layer has {expected} neurons"
    )]
    InvalidExpectedRow {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// A zero, negative or non-finite learning rate.
    #[error("learning rate must be positive and finite, got {0}")]
    InvalidLearningRate(f64),

    /// A negative or non-finite momentum coefficient.
    #[error("momentum must be non-negative and finite, got {0}")]
    InvalidMomentum(f64),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed network file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("history export failed: {0}")]
    Csv(#[from] csv::Error),
}
