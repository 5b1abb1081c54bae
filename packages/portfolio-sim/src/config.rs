//! Simulator settings.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PORTFOLIO_SIM_CONFIG";

/// Settings for a simulation run.
///
/// Every field has a default, so a config file only needs the keys it wants
/// to change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Benchmark ticker fetched alongside the basket
    pub benchmark_symbol: String,
    /// Directory the CSV files are written to
    pub output_dir: PathBuf,
    /// File name of the portfolio value CSV
    pub value_file: String,
    /// File name of the benchmark value CSV
    pub benchmark_file: String,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            benchmark_symbol: "SPY".to_string(),
            output_dir: PathBuf::from("."),
            value_file: "portfolio_value.csv".to_string(),
            benchmark_file: "benchmark_value.csv".to_string(),
        }
    }
}

impl SimulatorConfig {
    /// Load settings from the default location.
    ///
    /// Looks at `PORTFOLIO_SIM_CONFIG` first, then
    /// `<config dir>/portfolio-sim/config.json`. A missing file yields the
    /// defaults; an unreadable or malformed one is an error.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Get the default config file path, if one can be determined.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("portfolio-sim").join("config.json"))
    }

    /// Load settings from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Full path of the portfolio value CSV.
    pub fn value_path(&self) -> PathBuf {
        self.output_dir.join(&self.value_file)
    }

    /// Full path of the benchmark value CSV.
    pub fn benchmark_path(&self) -> PathBuf {
        self.output_dir.join(&self.benchmark_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = SimulatorConfig::load_from_path(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, SimulatorConfig::default());
        assert_eq!(config.benchmark_symbol, "SPY");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"benchmark_symbol": "QQQ", "output_dir": "/tmp/out"}"#).unwrap();

        let config = SimulatorConfig::load_from_path(&path).unwrap();
        assert_eq!(config.benchmark_symbol, "QQQ");
        assert_eq!(config.value_path(), PathBuf::from("/tmp/out/portfolio_value.csv"));
        assert_eq!(config.benchmark_file, "benchmark_value.csv");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            SimulatorConfig::load_from_path(&path),
            Err(Error::Json(_))
        ));
    }
}
