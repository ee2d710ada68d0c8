//! Analysis configuration.
//!
//! ## Environment variables
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `RNA_SWEEP_FILE` | `sweep_file` | none |
//! | `RNA_START_TEMP` | `start_temp` | 37 |
//! | `RNA_END_TEMP` | `end_temp` | 37 |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::temporal::{InMemoryTemperatureProvider, ProviderError, SweepInput};

/// Default sweep temperature (°C).
pub const DEFAULT_TEMPERATURE: i32 = 37;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable holds an unparsable value.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },
    /// A setting is outside its domain.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    /// No sweep file configured.
    #[error("No sweep file configured (set RNA_SWEEP_FILE)")]
    MissingSweepFile,
    /// The sweep file could not be read.
    #[error("Failed to read sweep file {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The sweep file is not valid sweep JSON.
    #[error("Failed to parse sweep file: {0}")]
    Parse(#[from] serde_json::Error),
    /// A folding in the sweep file is not a valid hypergraph.
    #[error("Invalid sweep: {0}")]
    Sweep(#[from] ProviderError),
}

/// Settings for one sensitivity analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// JSON sweep file (see [`SweepInput`]).
    pub sweep_file: Option<PathBuf>,
    /// First temperature of the sweep.
    pub start_temp: i32,
    /// Last temperature of the sweep (inclusive).
    pub end_temp: i32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sweep_file: None,
            start_temp: DEFAULT_TEMPERATURE,
            end_temp: DEFAULT_TEMPERATURE,
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
    }
}

impl AnalysisConfig {
    /// Load from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup("RNA_SWEEP_FILE") {
            config.sweep_file = Some(PathBuf::from(path));
        }
        if let Some(t) = parse_var(&lookup, "RNA_START_TEMP")? {
            config.start_temp = t;
        }
        if let Some(t) = parse_var(&lookup, "RNA_END_TEMP")? {
            config.end_temp = t;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value domains.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_temp > self.end_temp {
            return Err(ConfigError::Invalid(format!(
                "start_temp {} is above end_temp {}",
                self.start_temp, self.end_temp
            )));
        }
        Ok(())
    }

    /// Load the configured sweep file into an in-memory provider.
    pub fn load_sweep(&self) -> Result<InMemoryTemperatureProvider, ConfigError> {
        let path = self.sweep_file.as_deref().ok_or(ConfigError::MissingSweepFile)?;
        load_sweep_file(path)
    }
}

/// Read a JSON sweep file into an in-memory provider.
pub fn load_sweep_file(path: &Path) -> Result<InMemoryTemperatureProvider, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let input: SweepInput = serde_json::from_str(&raw)?;
    Ok(InMemoryTemperatureProvider::from_sweep(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.start_temp, 37);
        assert_eq!(config.end_temp, 37);
        assert!(config.sweep_file.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AnalysisConfig::from_lookup(lookup(&[
            ("RNA_SWEEP_FILE", "/tmp/sweep.json"),
            ("RNA_START_TEMP", "30"),
            ("RNA_END_TEMP", " 60 "),
        ]))
        .unwrap();
        assert_eq!(config.sweep_file, Some(PathBuf::from("/tmp/sweep.json")));
        assert_eq!((config.start_temp, config.end_temp), (30, 60));
    }

    #[test]
    fn test_invalid_values() {
        let err = AnalysisConfig::from_lookup(lookup(&[("RNA_START_TEMP", "warm")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: "RNA_START_TEMP", .. }));

        let err = AnalysisConfig::from_lookup(lookup(&[("RNA_START_TEMP", "50")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_sweep_file() {
        let config = AnalysisConfig::default();
        assert!(matches!(config.load_sweep(), Err(ConfigError::MissingSweepFile)));

        let err = load_sweep_file(Path::new("/nonexistent/sweep.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
