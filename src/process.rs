//! Random-phase cosine process
//!
//! `X(t) = cos(omega * t + theta)` with a single phase `theta` per sample path,
//! drawn uniformly from `[-pi/2, pi/2]`.

use std::f64::consts::{FRAC_PI_2, PI};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::TimeGrid;
use crate::matrix::SampleMatrix;
use crate::{invalid, Result};

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Lower edge of the phase law.
pub const PHASE_LOW: f64 = -FRAC_PI_2;
/// Upper edge of the phase law.
pub const PHASE_HIGH: f64 = FRAC_PI_2;

/// Phases drawn for one realization, one per sample path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSamples(Vec<f64>);

impl PhaseSamples {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Sample matrix together with the phases that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Realization {
    pub samples: SampleMatrix,
    pub phases: PhaseSamples,
}

/// Cosine waveform with angular frequency `omega` and a uniform random phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomPhaseProcess {
    omega: f64,
}

impl RandomPhaseProcess {
    pub fn new(omega: f64) -> Result<Self> {
        if !omega.is_finite() {
            return Err(invalid(format!("omega must be finite, got {omega}")));
        }
        Ok(Self { omega })
    }

    /// Value of one sample path at time `t`.
    pub fn value(&self, t: f64, theta: f64) -> f64 {
        (self.omega * t + theta).cos()
    }

    /// The grid must be non-empty and keep `omega * t` finite at every point.
    pub(crate) fn check_grid(&self, grid: &TimeGrid) -> Result<()> {
        if grid.is_empty() {
            return Err(invalid("time grid must contain at least one point"));
        }
        if let Some(&t) = grid
            .points()
            .iter()
            .find(|&&t| !(self.omega * t).is_finite())
        {
            return Err(invalid(format!(
                "omega * t overflows at t = {t} (omega = {})",
                self.omega
            )));
        }
        Ok(())
    }

    /// Draw `n` independent phases from `[-pi/2, pi/2]`.
    pub fn sample_phases<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Result<PhaseSamples> {
        if n == 0 {
            return Err(invalid("sample count must be at least 1"));
        }
        let dist = Uniform::new_inclusive(PHASE_LOW, PHASE_HIGH);
        Ok(PhaseSamples(dist.sample_iter(rng).take(n).collect()))
    }

    /// Evaluate every sample path on the grid.
    pub fn sample_matrix(&self, grid: &TimeGrid, phases: &PhaseSamples) -> Result<SampleMatrix> {
        self.check_grid(grid)?;
        if phases.is_empty() {
            return Err(invalid("sample count must be at least 1"));
        }

        let mut samples = SampleMatrix::zeros(phases.len(), grid.len());
        for (i, &theta) in phases.as_slice().iter().enumerate() {
            for (x, &t) in samples.row_mut(i).iter_mut().zip(grid.points()) {
                *x = self.value(t, theta);
            }
        }
        Ok(samples)
    }

    /// Run one realization from a freshly seeded generator.
    ///
    /// Equal seeds give bit-identical realizations.
    pub fn simulate(&self, grid: &TimeGrid, n: usize, seed: u64) -> Result<Realization> {
        debug!(
            samples = n,
            points = grid.len(),
            omega = self.omega,
            seed,
            "simulating random-phase process"
        );
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.simulate_with_rng(grid, n, &mut rng)
    }

    /// Run one realization drawing phases from a caller-owned generator.
    pub fn simulate_with_rng<R: Rng + ?Sized>(
        &self,
        grid: &TimeGrid,
        n: usize,
        rng: &mut R,
    ) -> Result<Realization> {
        self.check_grid(grid)?;
        let phases = self.sample_phases(rng, n)?;
        let samples = self.sample_matrix(grid, &phases)?;
        Ok(Realization { samples, phases })
    }

    /// Ensemble mean at time `t`: `(2/pi) cos(omega t)`.
    pub fn expected_mean(&self, t: f64) -> f64 {
        2.0 / PI * (self.omega * t).cos()
    }

    /// Ensemble variance at time `t`: `1/2 - (4/pi^2) cos^2(omega t)`.
    ///
    /// `E[cos(2 theta)]` vanishes on `[-pi/2, pi/2]`, so the second moment is
    /// exactly 1/2 and the time dependence comes only from the squared mean.
    pub fn expected_variance(&self, t: f64) -> f64 {
        let m = self.expected_mean(t);
        0.5 - m * m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn grid() -> TimeGrid {
        TimeGrid::linspace(0.0, 10.0, 50).unwrap()
    }

    #[test]
    fn phases_stay_inside_the_interval() {
        let process = RandomPhaseProcess::new(1.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(DEFAULT_SEED);
        let phases = process.sample_phases(&mut rng, 5_000).unwrap();
        assert_eq!(phases.len(), 5_000);
        assert!(phases
            .as_slice()
            .iter()
            .all(|&theta| (PHASE_LOW..=PHASE_HIGH).contains(&theta)));
    }

    #[test]
    fn matrix_entries_follow_the_waveform() {
        let process = RandomPhaseProcess::new(2.0 * PI).unwrap();
        let grid = grid();
        let run = process.simulate(&grid, 7, DEFAULT_SEED).unwrap();
        assert_eq!(run.samples.rows(), 7);
        assert_eq!(run.samples.cols(), grid.len());

        let theta = run.phases.as_slice()[3];
        let t = grid.points()[11];
        assert_eq!(run.samples.get(3, 11), (2.0 * PI * t + theta).cos());
    }

    #[test]
    fn same_seed_gives_identical_realizations() {
        let process = RandomPhaseProcess::new(2.0 * PI).unwrap();
        let a = process.simulate(&grid(), 32, 42).unwrap();
        let b = process.simulate(&grid(), 32, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_give_different_phases() {
        let process = RandomPhaseProcess::new(2.0 * PI).unwrap();
        let a = process.simulate(&grid(), 32, 42).unwrap();
        let b = process.simulate(&grid(), 32, 43).unwrap();
        assert_ne!(a.phases, b.phases);
    }

    #[test]
    fn zero_samples_is_invalid() {
        let process = RandomPhaseProcess::new(1.0).unwrap();
        assert!(process.simulate(&grid(), 0, 1).is_err());
    }

    #[test]
    fn overflowing_phase_argument_is_invalid() {
        let process = RandomPhaseProcess::new(f64::MAX).unwrap();
        let grid = TimeGrid::linspace(0.0, 10.0, 10).unwrap();
        let err = process.simulate(&grid, 10, DEFAULT_SEED).unwrap_err();
        assert!(matches!(err, crate::RandPhaseError::InvalidArgument(_)));
    }

    #[test]
    fn non_finite_omega_is_invalid() {
        assert!(RandomPhaseProcess::new(f64::NAN).is_err());
        assert!(RandomPhaseProcess::new(f64::INFINITY).is_err());
    }

    #[test]
    fn analytic_moments_match_closed_form() {
        let process = RandomPhaseProcess::new(2.0 * PI).unwrap();
        assert_abs_diff_eq!(process.expected_mean(0.0), 2.0 / PI, epsilon = 1e-15);
        assert_abs_diff_eq!(process.expected_mean(0.25), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(process.expected_variance(0.25), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(
            process.expected_variance(0.0),
            0.5 - 4.0 / (PI * PI),
            epsilon = 1e-15
        );
    }
}
