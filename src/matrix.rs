//! Row-major storage for sample paths

use crate::{RandPhaseError, Result};

/// N x M matrix of process values: one row per sample path, one column per
/// time point.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl SampleMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from row-major data.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(RandPhaseError::LengthMismatch {
                context: "sample matrix data",
                expected: rows * cols,
                got: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// One sample path.
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on zero; a zero-width matrix has no rows to yield
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }
}
