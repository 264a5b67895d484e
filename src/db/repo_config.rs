//! Backend configuration file support.
//!
//! This module provides utilities for reading repository and solver
//! settings from TOML configuration files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Backend configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub solver: SolverSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// External solver service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Base URL of the timetable solver service.
    #[serde(default = "default_solver_base_url")]
    pub base_url: String,
    /// Seconds between status polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Poll attempts before the job is declared timed out.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            base_url: default_solver_base_url(),
            poll_interval_secs: default_poll_interval_secs(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

impl SolverSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn default_solver_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_max_poll_attempts() -> u32 {
    60
}

impl BackendConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(BackendConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: BackendConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `classtime.toml` in:
    /// 1. Current directory
    /// 2. Parent directory
    ///
    /// # Returns
    /// * `Ok(BackendConfig)` if found and parsed successfully
    /// * `Err(RepositoryError)` if no config file found or parse error
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = vec![
            PathBuf::from("classtime.toml"),
            PathBuf::from("../classtime.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No classtime.toml found in standard locations".to_string(),
        ))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let toml = r#"
[repository]
type = "local"
"#;

        let config: BackendConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert_eq!(config.solver.poll_interval_secs, 5);
        assert_eq!(config.solver.max_poll_attempts, 60);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[repository]
type = "local"

[solver]
base_url = "http://solver.internal:8000"
poll_interval_secs = 2
max_poll_attempts = 10
"#;

        let config: BackendConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.solver.base_url, "http://solver.internal:8000");
        assert_eq!(config.solver.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.solver.max_poll_attempts, 10);
    }

    #[test]
    fn test_from_file_roundtrip() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[repository]\ntype = \"local\"").unwrap();

        let config = BackendConfig::from_file(file.path()).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = BackendConfig::from_file("/nonexistent/classtime.toml").unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::ConfigurationError { .. }
        ));
    }
}
