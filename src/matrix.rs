//! Dense matrix storage for weights, biases and their pending updates.

use std::ops::AddAssign;

use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use serde_derive::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A dense `rows` by `cols` matrix of `f64` values, stored row-major.
///
/// Weight matrices, their update accumulators and the bias-augmented input
/// rows of the forward pass are all `Matrix` values. Operations combining
/// two matrices check shapes up front and report exactly which dimensions
/// disagreed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>, // row-major
}

impl Matrix {
    /// Creates a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Creates a matrix from a grid of rows.
    ///
    /// Fails if the rows do not all have the same length. An empty grid
    /// yields a 0x0 matrix.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(Error::RaggedGrid {
                    row: index,
                    found: row.len(),
                    expected: cols,
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Matrix {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "cell out of range");
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.rows && col < self.cols, "cell out of range");
        self.data[row * self.cols + col] = value;
    }

    /// Adds `value` onto the cell at (`row`, `col`) in place.
    pub fn accumulate(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.rows && col < self.cols, "cell out of range");
        self.data[row * self.cols + col] += value;
    }

    /// Extracts one column as a `rows` by 1 matrix.
    pub fn column(&self, col: usize) -> Result<Matrix> {
        if col >= self.cols {
            return Err(Error::ColumnOutOfRange {
                column: col,
                cols: self.cols,
            });
        }
        let data = (0..self.rows).map(|row| self.get(row, col)).collect();
        Ok(Matrix {
            rows: self.rows,
            cols: 1,
            data,
        })
    }

    /// Dot product of two matrices treated as flat vectors.
    ///
    /// Fails unless both matrices hold the same number of cells.
    pub fn dot(&self, other: &Matrix) -> Result<f64> {
        if self.size() != other.size() {
            return Err(Error::SizeMismatch {
                left: self.size(),
                right: other.size(),
            });
        }
        Ok(self.data.iter().zip(&other.data).map(|(a, b)| a * b).sum())
    }

    /// Returns a new matrix with every cell multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|value| value * factor).collect(),
        }
    }

    /// Returns the elementwise sum of two matrices.
    ///
    /// Fails unless both row and column counts match.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.check_shape(other)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a + b)
            .collect();
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Overwrites every cell with an independent uniform sample from
    /// `[lower, upper]`.
    ///
    /// # Panics
    ///
    /// Panics if `lower > upper`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, lower: f64, upper: f64) {
        assert!(
            lower <= upper,
            "reversed randomize bounds: {} > {}",
            lower,
            upper
        );
        let range = Uniform::new_inclusive(lower, upper);
        for value in &mut self.data {
            *value = range.sample(rng);
        }
    }

    /// Sets every cell back to zero in place.
    pub fn clear(&mut self) {
        for value in &mut self.data {
            *value = 0.0;
        }
    }

    /// All cells in row-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn check_shape(&self, other: &Matrix) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(Error::DimensionMismatch {
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: other.rows,
                right_cols: other.cols,
            });
        }
        Ok(())
    }
}

impl<'a> AddAssign<&'a Matrix> for Matrix {
    /// # Panics
    ///
    /// Panics if the shapes differ. Fallible callers should reach for
    /// [`Matrix::add`] instead.
    fn add_assign(&mut self, other: &Matrix) {
        assert_eq!(
            (self.rows, self.cols),
            (other.rows, other.cols),
            "cannot add-assign between differently shaped matrices"
        );
        for (l, r) in self.data.iter_mut().zip(&other.data) {
            *l += *r;
        }
    }
}

/// Parses the same shape [`Serialize`] writes and rejects any input whose
/// `data` length disagrees with `rows * cols`.
impl<'de> serde::Deserialize<'de> for Matrix {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as DeError;

        #[derive(Deserialize)]
        struct Cells {
            rows: usize,
            cols: usize,
            data: Vec<f64>,
        }

        let cells = <Cells as serde::Deserialize>::deserialize(deserializer)?;
        if cells.rows.checked_mul(cells.cols) != Some(cells.data.len()) {
            return Err(DeError::custom(format!(
                "a {}x{} matrix cannot hold {} cells",
                cells.rows,
                cells.cols,
                cells.data.len()
            )));
        }
        Ok(Matrix {
            rows: cells.rows,
            cols: cells.cols,
            data: cells.data,
        })
    }
}
