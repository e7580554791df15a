use super::{Formatter, Report, ReportingError};

/// Machine-readable report.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    compact: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact() -> Self {
        Self { compact: true }
    }
}

impl Formatter for JsonFormatter {
    fn render(&self, report: &Report) -> Result<String, ReportingError> {
        let json = if self.compact {
            serde_json::to_string(report)?
        } else {
            serde_json::to_string_pretty(report)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assertion::Stats,
        formatter::{SpecReport, SpecStatus, SuiteReport},
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_shape() {
        let report = Report {
            suites: vec![SuiteReport {
                description: "s".into(),
                ran: true,
                specs: vec![SpecReport {
                    description: "p".into(),
                    status: SpecStatus::Pending,
                    assertions: 0,
                    failure: None,
                }],
            }],
            stats: Stats {
                specs: 1,
                ..Stats::default()
            },
        };
        let json = JsonFormatter::compact().render(&report).unwrap();
        assert_eq!(
            json,
            r#"{"suites":[{"description":"s","ran":true,"specs":[{"description":"p","status":"pending","assertions":0}]}],"stats":{"specs":1,"assertions":0,"passes":0,"failures":0}}"#
        );
    }
}
