use std::{fs::File, io::BufReader, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::formatter::FormatterKind;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to open config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeckleConfig {
    #[serde(default)]
    pub formatter: FormatterKind,

    /// Extra matchers in string form, registered after the built-ins in order.
    #[serde(default)]
    pub matchers: IndexMap<String, String>,

    #[serde(default = "default_true")]
    pub show_passes: bool,

    /// Default tracing directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for SpeckleConfig {
    fn default() -> Self {
        Self {
            formatter: FormatterKind::default(),
            matchers: IndexMap::new(),
            show_passes: default_true(),
            log_filter: default_log_filter(),
        }
    }
}

impl SpeckleConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Loads `path` when it exists, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}
