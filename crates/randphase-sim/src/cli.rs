//! Command-line flags layered over the loaded run configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::config::RunConfig;

#[derive(Debug, Parser)]
#[command(author, version, about = "Monte-Carlo moments of X(t) = cos(omega t + theta)")]
pub struct Cli {
    /// TOML config with [simulation] and [output] tables
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output base directory; each run gets a timestamped subdirectory
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of sample paths (N)
    #[arg(long)]
    pub samples: Option<usize>,

    /// Number of time-grid points (M)
    #[arg(long)]
    pub points: Option<usize>,

    /// Angular frequency
    #[arg(long)]
    pub omega: Option<f64>,

    /// Last time-grid point
    #[arg(long)]
    pub t_end: Option<f64>,

    /// Variation threshold for the time-independence verdict
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Number of sample paths written to sample_paths.csv
    #[arg(long)]
    pub sample_paths: Option<usize>,
}

impl Cli {
    /// Overwrite every field of `cfg` that was given on the command line.
    pub fn apply_overrides(&self, cfg: &mut RunConfig) {
        let sim = &mut cfg.simulation;
        if let Some(v) = self.seed {
            sim.seed = v;
        }
        if let Some(v) = self.samples {
            sim.num_samples = v;
        }
        if let Some(v) = self.points {
            sim.num_points = v;
        }
        if let Some(v) = self.omega {
            sim.omega = v;
        }
        if let Some(v) = self.t_end {
            sim.t_end = v;
        }
        if let Some(v) = self.threshold {
            sim.threshold = v;
        }
        if let Some(v) = self.sample_paths {
            cfg.output.sample_paths = v;
        }
    }
}
