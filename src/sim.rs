//! Simulation harness
//!
//! Builds the grid, draws a realization, reduces it and classifies the result.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::grid::TimeGrid;
use crate::process::{RandomPhaseProcess, Realization, DEFAULT_SEED};
use crate::report::{StationarityReport, DEFAULT_VARIATION_THRESHOLD};
use crate::stats::EnsembleStats;
use crate::{invalid, Result};

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// First grid point
    pub t_start: f64,
    /// Last grid point (included)
    pub t_end: f64,
    /// Number of grid points (M)
    pub num_points: usize,
    /// Number of sample paths (N)
    pub num_samples: usize,
    /// Angular frequency
    pub omega: f64,
    pub seed: u64,
    /// Variation below which a curve counts as flat
    pub threshold: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            t_start: 0.0,
            t_end: 10.0,
            num_points: 1000,
            num_samples: 1000,
            omega: TAU,
            seed: DEFAULT_SEED,
            threshold: DEFAULT_VARIATION_THRESHOLD,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_points == 0 {
            return Err(invalid("num_points must be greater than zero"));
        }
        if self.num_samples == 0 {
            return Err(invalid("num_samples must be greater than zero"));
        }
        if !self.t_start.is_finite() || !self.t_end.is_finite() {
            return Err(invalid("t_start and t_end must be finite"));
        }
        if self.t_end < self.t_start {
            return Err(invalid("t_end must be greater than or equal to t_start"));
        }
        if !(self.t_end - self.t_start).is_finite() {
            return Err(invalid("t_end - t_start overflows"));
        }
        if !self.omega.is_finite() {
            return Err(invalid("omega must be finite"));
        }
        if !(self.omega * self.t_start).is_finite() || !(self.omega * self.t_end).is_finite() {
            return Err(invalid("omega * t must stay finite over [t_start, t_end]"));
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(invalid("threshold must be finite and greater than zero"));
        }
        Ok(())
    }

    pub fn time_grid(&self) -> Result<TimeGrid> {
        TimeGrid::linspace(self.t_start, self.t_end, self.num_points)
    }
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub grid: TimeGrid,
    pub process: RandomPhaseProcess,
    pub realization: Realization,
    pub stats: EnsembleStats,
    pub report: StationarityReport,
}

/// Run the full estimation pipeline for `config`.
pub fn run_simulation(config: &SimConfig) -> Result<SimulationRun> {
    config.validate()?;

    let grid = config.time_grid()?;
    let process = RandomPhaseProcess::new(config.omega)?;
    let realization = process.simulate(&grid, config.num_samples, config.seed)?;
    let stats = EnsembleStats::from_matrix(&realization.samples)?;
    let report = StationarityReport::classify(&stats, config.threshold)?
        .with_expected(&stats, &process, &grid)?;

    Ok(SimulationRun {
        grid,
        process,
        realization,
        stats,
        report,
    })
}
