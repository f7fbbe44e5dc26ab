//! Pipeline configuration.
//!
//! Every input and output location is explicit configuration; nothing in the
//! pipeline assumes a fixed filesystem layout.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Configuration for one reporting run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// cppcheck XML output to ingest.
    #[serde(default = "default_violations_file")]
    pub violations_file: PathBuf,

    /// Plain-text MISRA rule catalog.
    #[serde(default = "default_catalog_file")]
    pub catalog_file: PathBuf,

    /// Directory the artifacts are written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name of the flat per-violation CSV.
    #[serde(default = "default_violations_csv")]
    pub violations_csv: String,

    /// File name of the per-rule compliance-count CSV.
    #[serde(default = "default_compliance_csv")]
    pub compliance_csv: String,

    /// Fully-qualified violation ids excluded before any counting.
    #[serde(default)]
    pub ignored_ids: HashSet<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            violations_file: default_violations_file(),
            catalog_file: default_catalog_file(),
            output_dir: default_output_dir(),
            violations_csv: default_violations_csv(),
            compliance_csv: default_compliance_csv(),
            ignored_ids: HashSet::new(),
        }
    }
}

impl ReportConfig {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Resolved path of the flat violation CSV.
    #[must_use]
    pub fn violations_csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.violations_csv)
    }

    /// Resolved path of the compliance-count CSV.
    #[must_use]
    pub fn compliance_csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.compliance_csv)
    }
}

fn default_violations_file() -> PathBuf {
    PathBuf::from("cppcheck.xml")
}

fn default_catalog_file() -> PathBuf {
    PathBuf::from("misra_rules.txt")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_violations_csv() -> String {
    "errors.csv".to_string()
}

fn default_compliance_csv() -> String {
    "compliance_report.csv".to_string()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}
