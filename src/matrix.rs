use crate::error::NetworkError;

use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A dense row-major matrix of weights.
///
/// Serializes as a list of rows, and deserialization rejects ragged rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Mat {
    rows: usize,
    cols: usize,
    data: Vec<f64>, // row-major array
}

impl Mat {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Mat {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix from its rows. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, NetworkError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(NetworkError::RaggedMatrix {
                    row: i,
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Mat {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Samples every element independently from `distribution`.
    pub fn random<D, R>(
        distribution: D,
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> Self
    where
        D: Distribution<f64>,
        R: Rng + ?Sized,
    {
        let data = distribution
            .sample_iter(rng)
            .take(rows * cols)
            .collect();
        Mat { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        assert!(row < self.rows);
        &self.data[row * self.cols..(row + 1) * self.cols]
    }
}

impl TryFrom<Vec<Vec<f64>>> for Mat {
    type Error = NetworkError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Mat::from_rows(rows)
    }
}

impl From<Mat> for Vec<Vec<f64>> {
    fn from(mat: Mat) -> Self {
        (0..mat.rows).map(|r| mat.row(r).to_vec()).collect()
    }
}
