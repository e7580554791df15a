//! # Results Formatting
//!
//! The results consumer boundary. After a run, the [`System`](crate::system::System)
//! snapshots its suites and counters into a [`Report`] and hands it to a
//! [`Formatter`]. Formatters never see live run state, so a failing formatter
//! cannot corrupt it.

pub mod json;
pub mod terminal;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    assertion::Stats,
    ast::{Spec, SuiteRegistry},
};

pub use json::JsonFormatter;
pub use terminal::TerminalFormatter;

#[derive(Error, Debug)]
pub enum ReportingError {
    #[error("formatter '{0}' is not available")]
    Unavailable(String),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg_attr(test, mockall::automock)]
pub trait Formatter {
    fn render(&self, report: &Report) -> Result<String, ReportingError>;
}

/// Available formatters, by configuration name.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FormatterKind {
    #[default]
    Terminal,
    Json,
}

impl FormatterKind {
    /// Looks a formatter up by name.
    pub fn from_name(name: &str) -> Result<Self, ReportingError> {
        name.parse()
            .map_err(|_| ReportingError::Unavailable(name.to_string()))
    }

    pub fn build(self, show_passes: bool) -> Box<dyn Formatter> {
        match self {
            FormatterKind::Terminal => Box::new(TerminalFormatter::new(show_passes)),
            FormatterKind::Json => Box::new(JsonFormatter::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SpecStatus {
    Passed,
    Failed,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecReport {
    pub description: String,
    pub status: SpecStatus,
    pub assertions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl From<&Spec> for SpecReport {
    fn from(spec: &Spec) -> Self {
        let status = if spec.requires_implementation() {
            SpecStatus::Pending
        } else if spec.passed() {
            SpecStatus::Passed
        } else {
            SpecStatus::Failed
        };
        Self {
            description: spec.description.clone(),
            status,
            assertions: spec.assertions().len(),
            failure: spec.failure().map(|a| a.message().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    pub description: String,
    pub ran: bool,
    pub specs: Vec<SpecReport>,
}

/// Snapshot of a run, detached from the registry it was taken from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub suites: Vec<SuiteReport>,
    pub stats: Stats,
}

impl Report {
    pub fn new(registry: &SuiteRegistry, stats: Stats) -> Self {
        let suites = registry
            .iter()
            .map(|suite| SuiteReport {
                description: suite.description.clone(),
                ran: suite.ran,
                specs: suite.specs().iter().map(SpecReport::from).collect(),
            })
            .collect();
        Self { suites, stats }
    }

    pub fn pending(&self) -> usize {
        self.count(SpecStatus::Pending)
    }

    pub fn failed(&self) -> usize {
        self.count(SpecStatus::Failed)
    }

    fn count(&self, status: SpecStatus) -> usize {
        self.suites
            .iter()
            .flat_map(|suite| &suite.specs)
            .filter(|spec| spec.status == status)
            .count()
    }
}
