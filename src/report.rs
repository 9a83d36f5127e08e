//! Time-dependence verdict on estimated mean and variance curves

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::grid::TimeGrid;
use crate::process::RandomPhaseProcess;
use crate::stats::EnsembleStats;
use crate::{invalid, RandPhaseError, Result};

/// Largest spread either curve may show and still count as time-independent.
pub const DEFAULT_VARIATION_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    ApproximatelyTimeIndependent,
    TimeDependent,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Verdict::ApproximatelyTimeIndependent => "approximately time-independent",
            Verdict::TimeDependent => "time-dependent",
        }
    }
}

/// Closed range `[min, max]` of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    fn of(values: &[f64]) -> Self {
        values.iter().fold(
            Range {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |r, &v| Range {
                min: r.min.min(v),
                max: r.max.max(v),
            },
        )
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationarityReport {
    pub mean_range: Range,
    pub variance_range: Range,
    pub mean_variation: f64,
    pub var_variation: f64,
    pub threshold: f64,
    pub verdict: Verdict,
    /// Largest `|mean[j] - E[X(t_j)]|`, when analytic moments were supplied.
    pub max_mean_deviation: Option<f64>,
    /// Largest `|variance[j] - Var[X(t_j)]|`, when analytic moments were supplied.
    pub max_variance_deviation: Option<f64>,
}

impl StationarityReport {
    /// Classify the curves: time-independent only when both variations are
    /// strictly below `threshold`.
    pub fn classify(stats: &EnsembleStats, threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(invalid(format!(
                "variation threshold must be finite and > 0, got {threshold}"
            )));
        }
        if stats.is_empty() {
            return Err(invalid("statistics must contain at least one time point"));
        }
        if stats.variance.len() != stats.mean.len() {
            return Err(RandPhaseError::LengthMismatch {
                context: "variance sequence",
                expected: stats.mean.len(),
                got: stats.variance.len(),
            });
        }

        if let Some(j) = stats
            .mean
            .iter()
            .zip(&stats.variance)
            .position(|(m, v)| !m.is_finite() || !v.is_finite())
        {
            return Err(invalid(format!("statistics are not finite at time index {j}")));
        }

        let mean_range = Range::of(&stats.mean);
        let variance_range = Range::of(&stats.variance);
        let mean_variation = mean_range.width();
        let var_variation = variance_range.width();

        let verdict = if mean_variation < threshold && var_variation < threshold {
            Verdict::ApproximatelyTimeIndependent
        } else {
            Verdict::TimeDependent
        };

        info!(
            verdict = verdict.label(),
            mean_variation, var_variation, threshold, "stationarity verdict"
        );

        Ok(Self {
            mean_range,
            variance_range,
            mean_variation,
            var_variation,
            threshold,
            verdict,
            max_mean_deviation: None,
            max_variance_deviation: None,
        })
    }

    /// Record the largest gaps between the estimates and the analytic moments.
    pub fn with_expected(
        mut self,
        stats: &EnsembleStats,
        process: &RandomPhaseProcess,
        grid: &TimeGrid,
    ) -> Result<Self> {
        if grid.len() != stats.len() {
            return Err(RandPhaseError::LengthMismatch {
                context: "time grid",
                expected: stats.len(),
                got: grid.len(),
            });
        }

        let mut mean_dev = 0.0_f64;
        let mut var_dev = 0.0_f64;
        for ((&t, &m), &v) in grid.points().iter().zip(&stats.mean).zip(&stats.variance) {
            mean_dev = mean_dev.max((m - process.expected_mean(t)).abs());
            var_dev = var_dev.max((v - process.expected_variance(t)).abs());
        }

        self.max_mean_deviation = Some(mean_dev);
        self.max_variance_deviation = Some(var_dev);
        Ok(self)
    }

    pub fn is_time_independent(&self) -> bool {
        self.verdict == Verdict::ApproximatelyTimeIndependent
    }
}

impl fmt::Display for StationarityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mean Analysis:")?;
        writeln!(
            f,
            "  Mean range: [{:.6}, {:.6}]",
            self.mean_range.min, self.mean_range.max
        )?;
        writeln!(f, "Variance Analysis:")?;
        writeln!(
            f,
            "  Variance range: [{:.6}, {:.6}]",
            self.variance_range.min, self.variance_range.max
        )?;
        writeln!(f, "Time-Dependence Analysis:")?;
        writeln!(f, "  Mean variation across time: {:.6}", self.mean_variation)?;
        writeln!(f, "  Variance variation across time: {:.6}", self.var_variation)?;
        match self.verdict {
            Verdict::ApproximatelyTimeIndependent => write!(
                f,
                "Conclusion: The process appears to be approximately time-independent"
            ),
            Verdict::TimeDependent => {
                write!(f, "Conclusion: The process shows time-dependent behavior")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(mean: Vec<f64>, variance: Vec<f64>) -> EnsembleStats {
        EnsembleStats { mean, variance }
    }

    #[test]
    fn flat_curves_are_time_independent() {
        let report =
            StationarityReport::classify(&stats(vec![0.01, 0.02], vec![0.5, 0.52]), 0.1).unwrap();
        assert_eq!(report.verdict, Verdict::ApproximatelyTimeIndependent);
        assert_eq!(report.mean_range, Range { min: 0.01, max: 0.02 });
        assert!(report.is_time_independent());
    }

    #[test]
    fn either_variation_at_threshold_is_time_dependent() {
        let mean_moves =
            StationarityReport::classify(&stats(vec![0.0, 0.1], vec![0.5, 0.5]), 0.1).unwrap();
        assert_eq!(mean_moves.verdict, Verdict::TimeDependent);

        let var_moves =
            StationarityReport::classify(&stats(vec![0.0, 0.0], vec![0.2, 0.5]), 0.1).unwrap();
        assert_eq!(var_moves.verdict, Verdict::TimeDependent);
    }

    #[test]
    fn bad_threshold_or_lengths_are_rejected() {
        let s = stats(vec![0.0], vec![0.0]);
        assert!(StationarityReport::classify(&s, 0.0).is_err());
        assert!(StationarityReport::classify(&s, f64::NAN).is_err());
        assert!(StationarityReport::classify(&stats(vec![0.0], vec![]), 0.1).is_err());
        assert!(StationarityReport::classify(&stats(vec![], vec![]), 0.1).is_err());
    }

    #[test]
    fn non_finite_curves_are_rejected() {
        let all_nan = stats(vec![f64::NAN; 3], vec![f64::NAN; 3]);
        assert!(matches!(
            StationarityReport::classify(&all_nan, 0.1),
            Err(RandPhaseError::InvalidArgument(_))
        ));

        let partly_nan = stats(vec![0.687, f64::NAN, f64::NAN], vec![0.0, 0.0, 0.0]);
        assert!(StationarityReport::classify(&partly_nan, 0.1).is_err());

        let infinite_variance = stats(vec![0.0, 0.0], vec![0.5, f64::INFINITY]);
        assert!(StationarityReport::classify(&infinite_variance, 0.1).is_err());
    }

    #[test]
    fn display_prints_conclusion() {
        let report =
            StationarityReport::classify(&stats(vec![-0.6, 0.6], vec![0.1, 0.5]), 0.1).unwrap();
        let text = report.to_string();
        assert!(text.contains("Mean range: [-0.600000, 0.600000]"));
        assert!(text.contains("Mean variation across time: 1.200000"));
        assert!(text.ends_with("shows time-dependent behavior"));
    }
}
