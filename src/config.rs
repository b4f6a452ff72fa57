//! Report configuration: a JSON file merged with command-line overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_TOP: usize = 10;
pub const DEFAULT_HISTOGRAM_SIZE: (u32, u32) = (1024, 640);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("No input dataset given (use --input or set \"input\" in the config file)")]
    MissingInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Storm event CSV.
    pub input: Option<PathBuf>,
    /// Rows shown per ranked table.
    pub top: usize,
    /// PNG path for the decade histogram; no chart when unset.
    pub histogram: Option<PathBuf>,
    pub histogram_size: (u32, u32),
    /// JSON path for the full report; no export when unset.
    pub json: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: None,
            top: DEFAULT_TOP,
            histogram: None,
            histogram_size: DEFAULT_HISTOGRAM_SIZE,
            json: None,
        }
    }
}

/// Values given on the command line; each one set replaces the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub top: Option<usize>,
    pub histogram: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

impl ReportConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if overrides.input.is_some() {
            self.input = overrides.input;
        }
        if let Some(top) = overrides.top {
            self.top = top;
        }
        if overrides.histogram.is_some() {
            self.histogram = overrides.histogram;
        }
        if overrides.json.is_some() {
            self.json = overrides.json;
        }
        self
    }

    pub fn input(&self) -> Result<&Path, ConfigError> {
        self.input.as_deref().ok_or(ConfigError::MissingInput)
    }
}
