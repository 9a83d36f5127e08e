use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use randphase::SimConfig;
use serde::{Deserialize, Serialize};

/// Artifact options for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Number of leading sample paths written to `sample_paths.csv`
    pub sample_paths: usize,
    /// Also write the full N x M matrix to `samples.csv`
    pub write_matrix: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            sample_paths: 5,
            write_matrix: false,
        }
    }
}

/// Runtime configuration: `[simulation]` and `[output]` TOML tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub simulation: SimConfig,
    pub output: OutputOptions,
}

impl RunConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let cfg: RunConfig = toml::from_str(&raw)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        ensure!(
            self.output.sample_paths <= self.simulation.num_samples,
            "output.sample_paths ({}) must not exceed simulation.num_samples ({})",
            self.output.sample_paths,
            self.simulation.num_samples
        );
        Ok(())
    }
}

/// `configs/default.toml` from the working directory, then from the crate.
pub fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from("configs").join("default.toml");
    if local.exists() {
        return Some(local);
    }

    let bundled = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("configs")
        .join("default.toml");
    bundled.exists().then_some(bundled)
}

/// Load `path`, else the default config file, else built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    if let Some(path) = path {
        return RunConfig::from_toml_file(path);
    }

    match default_config_path() {
        Some(path) => RunConfig::from_toml_file(&path),
        None => Ok(RunConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let cfg: RunConfig = toml::from_str("[simulation]\nseed = 7\n").unwrap();
        assert_eq!(cfg.simulation.seed, 7);
        assert_eq!(cfg.simulation.num_samples, 1000);
        assert_eq!(cfg.output, OutputOptions::default());
    }

    #[test]
    fn bundled_default_matches_builtin_defaults() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("configs")
            .join("default.toml");
        let cfg = RunConfig::from_toml_file(&path).unwrap();
        assert_eq!(cfg, RunConfig::default());
    }

    #[test]
    fn too_many_sample_paths_is_rejected() {
        let mut cfg = RunConfig::default();
        cfg.simulation.num_samples = 3;
        cfg.output.sample_paths = 4;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn invalid_simulation_section_is_rejected() {
        let mut cfg = RunConfig::default();
        cfg.simulation.num_points = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("num_points"));
    }
}
