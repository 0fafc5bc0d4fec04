use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use plansym_core::{ErrorInfo, SymError};
use serde::{Deserialize, Serialize};

/// Settings for launching the external automorphism engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Executable to spawn; resolved through `PATH` when relative.
    #[serde(default = "EngineConfig::default_program")]
    pub program: PathBuf,
    /// Extra command line arguments.
    #[serde(default)]
    pub args: Vec<String>,
    /// Echo every line read from the engine to the log.
    #[serde(default)]
    pub verbose: bool,
    /// Kill the engine after this many milliseconds. `None` waits forever.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl EngineConfig {
    fn default_program() -> PathBuf {
        PathBuf::from("dreadnaut")
    }

    /// Configuration running `program` with defaults for everything else.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Timeout as a [`Duration`], if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Parses a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, SymError> {
        serde_yaml::from_str(text).map_err(|err| {
            SymError::Serde(
                ErrorInfo::new("yaml_deserialize", err.to_string())
                    .with_context("target", "engine-config"),
            )
        })
    }

    /// Reads and parses a YAML file.
    pub fn load(path: &Path) -> Result<Self, SymError> {
        let text = fs::read_to_string(path).map_err(|err| {
            SymError::Serde(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&text)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: Self::default_program(),
            args: Vec::new(),
            verbose: false,
            timeout_ms: None,
        }
    }
}

/// Switches for the detection pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectOptions {
    /// Also derive symmetries from consecutive steps of the same schema.
    #[serde(default = "DetectOptions::default_include_schema_swaps")]
    pub include_schema_swaps: bool,
}

impl DetectOptions {
    const fn default_include_schema_swaps() -> bool {
        true
    }
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            include_schema_swaps: Self::default_include_schema_swaps(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = EngineConfig::from_yaml_str("verbose: true\n").unwrap();
        assert_eq!(config.program, PathBuf::from("dreadnaut"));
        assert!(config.verbose);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn timeout_is_read_in_milliseconds() {
        let config =
            EngineConfig::from_yaml_str("program: /opt/nauty/dreadnaut\ntimeout_ms: 1500\n").unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_millis(1500)));
        assert!(EngineConfig::from_yaml_str("timeout_ms: soon").is_err());
    }
}
