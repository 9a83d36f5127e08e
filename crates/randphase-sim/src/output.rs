use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use chrono::Utc;
use csv::Writer;
use randphase::{
    EnsembleStats, PhaseSamples, RandomPhaseProcess, SampleMatrix, StationarityReport, TimeGrid,
};
use serde::Serialize;

use crate::config::RunConfig;

#[derive(Debug, Clone, Serialize)]
pub struct OutputFiles {
    pub output_dir: PathBuf,
    pub moments_path: PathBuf,
    pub sample_paths_path: PathBuf,
    pub phases_path: PathBuf,
    pub samples_path: Option<PathBuf>,
    pub summary_path: PathBuf,
}

impl OutputFiles {
    pub fn in_dir(output_dir: &Path, write_matrix: bool) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            moments_path: output_dir.join("moments.csv"),
            sample_paths_path: output_dir.join("sample_paths.csv"),
            phases_path: output_dir.join("phases.csv"),
            samples_path: write_matrix.then(|| output_dir.join("samples.csv")),
            summary_path: output_dir.join("summary.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub config: RunConfig,
    pub report: StationarityReport,
    pub outputs: OutputFiles,
}

#[derive(Debug, Serialize)]
struct MomentRow {
    t: f64,
    mean: f64,
    variance: f64,
    expected_mean: f64,
    expected_variance: f64,
}

#[derive(Debug, Serialize)]
struct PhaseRow {
    index: usize,
    theta: f64,
}

fn fmt_f64(value: f64) -> String {
    format!("{value:.10}")
}

/// Fresh `<base>/<UTC timestamp>[-NN]` directory for one run.
pub fn create_timestamped_run_dir(base_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(base_dir).with_context(|| {
        format!(
            "failed to create output base directory {}",
            base_dir.display()
        )
    })?;

    let timestamp = Utc::now().format("%Y%m%d-%H%M%S").to_string();
    let mut run_dir = base_dir.join(&timestamp);
    let mut counter = 1_u32;
    while run_dir.exists() {
        run_dir = base_dir.join(format!("{timestamp}-{counter:02}"));
        counter += 1;
    }

    fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create run directory {}", run_dir.display()))?;
    Ok(run_dir)
}

pub fn write_moments_csv(
    path: &Path,
    grid: &TimeGrid,
    stats: &EnsembleStats,
    process: &RandomPhaseProcess,
) -> Result<()> {
    ensure!(
        grid.len() == stats.len(),
        "moments length mismatch: grid has {} points, statistics have {}",
        grid.len(),
        stats.len()
    );

    let mut writer = Writer::from_path(path)
        .with_context(|| format!("failed to open CSV path {}", path.display()))?;
    for (j, &t) in grid.points().iter().enumerate() {
        writer.serialize(MomentRow {
            t,
            mean: stats.mean[j],
            variance: stats.variance[j],
            expected_mean: process.expected_mean(t),
            expected_variance: process.expected_variance(t),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// `t,path_1..path_K` for the first `count` sample paths.
pub fn write_sample_paths_csv(
    path: &Path,
    grid: &TimeGrid,
    samples: &SampleMatrix,
    count: usize,
) -> Result<()> {
    ensure!(
        grid.len() == samples.cols(),
        "sample paths length mismatch: grid has {} points, matrix has {} columns",
        grid.len(),
        samples.cols()
    );
    let count = count.min(samples.rows());

    let mut writer = Writer::from_path(path)
        .with_context(|| format!("failed to open CSV path {}", path.display()))?;

    let mut header = vec!["t".to_string()];
    header.extend((1..=count).map(|k| format!("path_{k}")));
    writer.write_record(&header)?;

    for (j, &t) in grid.points().iter().enumerate() {
        let mut record = Vec::with_capacity(count + 1);
        record.push(fmt_f64(t));
        record.extend((0..count).map(|i| fmt_f64(samples.get(i, j))));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_phases_csv(path: &Path, phases: &PhaseSamples) -> Result<()> {
    let mut writer = Writer::from_path(path)
        .with_context(|| format!("failed to open CSV path {}", path.display()))?;
    for (index, &theta) in phases.as_slice().iter().enumerate() {
        writer.serialize(PhaseRow { index, theta })?;
    }
    writer.flush()?;
    Ok(())
}

/// Full matrix, one row per sample path, no header.
pub fn write_matrix_csv(path: &Path, samples: &SampleMatrix) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to open CSV path {}", path.display()))?;
    for row in samples.iter_rows() {
        writer.write_record(row.iter().map(|&x| fmt_f64(x)))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_summary(path: &Path, summary: &Summary) -> Result<()> {
    let data = serde_json::to_string_pretty(summary)?;
    fs::write(path, data)
        .with_context(|| format!("failed to write summary {}", path.display()))?;
    Ok(())
}
