//! Ensemble statistics across sample paths
//!
//! Both estimators reduce along the sample axis, independently per time index,
//! and report the population variance (denominator N).

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::grid::TimeGrid;
use crate::matrix::SampleMatrix;
use crate::process::RandomPhaseProcess;
use crate::{invalid, RandPhaseError, Result};

/// Per-time-point mean and population variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleStats {
    pub mean: Vec<f64>,
    pub variance: Vec<f64>,
}

impl EnsembleStats {
    /// Two-pass column reduction of a full sample matrix.
    pub fn from_matrix(samples: &SampleMatrix) -> Result<Self> {
        if samples.rows() == 0 {
            return Err(invalid("sample count must be at least 1"));
        }
        if samples.cols() == 0 {
            return Err(invalid("time grid must contain at least one point"));
        }

        let n = samples.rows() as f64;
        let mut mean = vec![0.0; samples.cols()];
        for row in samples.iter_rows() {
            for (acc, &x) in mean.iter_mut().zip(row) {
                *acc += x;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut variance = vec![0.0; samples.cols()];
        for row in samples.iter_rows() {
            for ((acc, &x), &m) in variance.iter_mut().zip(row).zip(&mean) {
                let d = x - m;
                *acc += d * d;
            }
        }
        for v in &mut variance {
            *v /= n;
        }

        Ok(Self { mean, variance })
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

/// Streaming (Welford) reducer: feed sample paths one at a time, keep O(M) state.
#[derive(Debug, Clone)]
pub struct EnsembleAccumulator {
    count: usize,
    mean: Vec<f64>,
    m2: Vec<f64>,
}

impl EnsembleAccumulator {
    pub fn new(num_points: usize) -> Self {
        Self {
            count: 0,
            mean: vec![0.0; num_points],
            m2: vec![0.0; num_points],
        }
    }

    /// Fold one sample path into the running moments.
    pub fn push(&mut self, path: &[f64]) -> Result<()> {
        if path.len() != self.mean.len() {
            return Err(RandPhaseError::LengthMismatch {
                context: "sample path",
                expected: self.mean.len(),
                got: path.len(),
            });
        }

        self.count += 1;
        let n = self.count as f64;
        for ((mean, m2), &x) in self.mean.iter_mut().zip(&mut self.m2).zip(path) {
            let delta = x - *mean;
            *mean += delta / n;
            *m2 += delta * (x - *mean);
        }
        Ok(())
    }

    pub fn finish(self) -> Result<EnsembleStats> {
        if self.count == 0 {
            return Err(invalid("sample count must be at least 1"));
        }
        if self.mean.is_empty() {
            return Err(invalid("time grid must contain at least one point"));
        }

        let n = self.count as f64;
        let variance = self.m2.into_iter().map(|m2| (m2 / n).max(0.0)).collect();
        Ok(EnsembleStats {
            mean: self.mean,
            variance,
        })
    }
}

/// Estimate the ensemble statistics without materializing the sample matrix.
///
/// Draws the same phases, in the same order, as [`RandomPhaseProcess::simulate`]
/// for the same seed.
pub fn estimate_streaming(
    process: &RandomPhaseProcess,
    grid: &TimeGrid,
    n: usize,
    seed: u64,
) -> Result<EnsembleStats> {
    process.check_grid(grid)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let phases = process.sample_phases(&mut rng, n)?;

    let mut acc = EnsembleAccumulator::new(grid.len());
    let mut path = vec![0.0; grid.len()];
    for &theta in phases.as_slice() {
        for (x, &t) in path.iter_mut().zip(grid.points()) {
            *x = process.value(t, theta);
        }
        acc.push(&path)?;
    }
    acc.finish()
}
