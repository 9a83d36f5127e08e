//! Evenly spaced time grids

use serde::Serialize;

use crate::{invalid, Result};

/// Ordered time points spanning the closed interval `[start, end]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeGrid {
    points: Vec<f64>,
}

impl TimeGrid {
    /// Build `num_points` evenly spaced points from `start` to `end`, both included.
    ///
    /// A single-point grid holds only `start`.
    pub fn linspace(start: f64, end: f64, num_points: usize) -> Result<Self> {
        if num_points == 0 {
            return Err(invalid("time grid must contain at least one point"));
        }
        if !start.is_finite() || !end.is_finite() {
            return Err(invalid("time grid bounds must be finite"));
        }
        if end < start {
            return Err(invalid(format!(
                "time grid end ({end}) must be >= start ({start})"
            )));
        }

        if num_points == 1 {
            return Ok(Self {
                points: vec![start],
            });
        }

        let span = end - start;
        if !span.is_finite() {
            return Err(invalid(format!(
                "time grid span from {start} to {end} overflows"
            )));
        }

        let denom = (num_points - 1) as f64;
        let mut points: Vec<f64> = (0..num_points)
            .map(|idx| start + span * (idx as f64 / denom))
            .collect();
        // pin the endpoint against rounding
        points[num_points - 1] = end;

        Ok(Self { points })
    }

    /// Wrap explicit time points. They must be non-empty, finite and non-decreasing.
    pub fn from_points(points: Vec<f64>) -> Result<Self> {
        if points.is_empty() {
            return Err(invalid("time grid must contain at least one point"));
        }
        if points.iter().any(|t| !t.is_finite()) {
            return Err(invalid("time grid points must be finite"));
        }
        if points.windows(2).any(|w| w[1] < w[0]) {
            return Err(invalid("time grid points must be in non-decreasing order"));
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }
}
