//! Command-line runner for `randphase`.
//!
//! Runs one estimation, writes its artifacts into a timestamped run directory
//! and returns the run summary.

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;

use std::path::{Path, PathBuf};

use anyhow::Context;
use randphase::run_simulation;
use tracing::info;

use crate::config::RunConfig;
use crate::output::{
    create_timestamped_run_dir, write_matrix_csv, write_moments_csv, write_phases_csv,
    write_sample_paths_csv, write_summary, OutputFiles, Summary,
};

pub fn run(cfg: &RunConfig, output_base_dir: &Path) -> anyhow::Result<Summary> {
    cfg.validate()?;
    let run = run_simulation(&cfg.simulation).context("simulation failed")?;

    let output_dir = create_timestamped_run_dir(output_base_dir)?;
    let files = OutputFiles::in_dir(&output_dir, cfg.output.write_matrix);

    write_moments_csv(&files.moments_path, &run.grid, &run.stats, &run.process)?;
    write_sample_paths_csv(
        &files.sample_paths_path,
        &run.grid,
        &run.realization.samples,
        cfg.output.sample_paths,
    )?;
    write_phases_csv(&files.phases_path, &run.realization.phases)?;
    if let Some(path) = &files.samples_path {
        write_matrix_csv(path, &run.realization.samples)?;
    }

    let summary = Summary {
        config: cfg.clone(),
        report: run.report,
        outputs: files,
    };
    write_summary(&summary.outputs.summary_path, &summary)?;

    info!(output_dir = %output_dir.display(), "run artifacts written");
    Ok(summary)
}

pub fn default_output_base_dir() -> PathBuf {
    PathBuf::from("output-randphase")
}
