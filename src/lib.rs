//! randphase - random-phase process estimation
//!
//! Monte-Carlo estimation of the ensemble mean and variance of the process
//! `X(t) = cos(omega * t + theta)` with `theta` drawn uniformly from
//! `[-pi/2, pi/2]`, plus a time-dependence verdict on the estimated curves.

pub mod grid;
pub mod matrix;
pub mod process;
pub mod report;
pub mod sim;
pub mod stats;

use thiserror::Error;

// Re-export main types
pub use grid::TimeGrid;
pub use matrix::SampleMatrix;
pub use process::{PhaseSamples, RandomPhaseProcess, Realization, DEFAULT_SEED};
pub use report::{StationarityReport, Verdict, DEFAULT_VARIATION_THRESHOLD};
pub use sim::{run_simulation, SimConfig, SimulationRun};
pub use stats::{estimate_streaming, EnsembleAccumulator, EnsembleStats};

#[derive(Debug, Error)]
pub enum RandPhaseError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{context} length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },
}

pub type Result<T> = std::result::Result<T, RandPhaseError>;

pub(crate) fn invalid(message: impl Into<String>) -> RandPhaseError {
    RandPhaseError::InvalidArgument(message.into())
}
