use std::fmt::Write as _;

use super::{Formatter, Report, ReportingError, SpecReport, SpecStatus, SuiteReport};

const INDENT_SPACES: usize = 2;

/// Plain-text report for a terminal.
#[derive(Debug, Clone)]
pub struct TerminalFormatter {
    show_passes: bool,
}

impl Default for TerminalFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TerminalFormatter {
    pub fn new(show_passes: bool) -> Self {
        Self { show_passes }
    }
}

impl Formatter for TerminalFormatter {
    fn render(&self, report: &Report) -> Result<String, ReportingError> {
        let mut writer = ReportWriter::default();
        for suite in report.suites.iter().filter(|suite| suite.ran) {
            writer.suite(suite, self.show_passes);
        }
        writer.summary(report);
        Ok(writer.output)
    }
}

#[derive(Default)]
struct ReportWriter {
    indent_level: usize,
    output: String,
}

impl ReportWriter {
    fn suite(&mut self, suite: &SuiteReport, show_passes: bool) {
        self.line(&suite.description);
        self.indent();
        for spec in &suite.specs {
            if spec.status == SpecStatus::Passed && !show_passes {
                continue;
            }
            self.spec(spec);
        }
        self.dedent();
        self.line("");
    }

    fn spec(&mut self, spec: &SpecReport) {
        let line = match spec.status {
            SpecStatus::Passed => format!("pass  {} ({})", spec.description, spec.assertions),
            SpecStatus::Pending => format!("todo  {}", spec.description),
            SpecStatus::Failed => format!(
                "FAIL  {} ({}): {}",
                spec.description,
                spec.assertions,
                spec.failure.as_deref().unwrap_or_default()
            ),
        };
        self.line(&line);
    }

    fn summary(&mut self, report: &Report) {
        let stats = report.stats;
        let _ = write!(
            self.output,
            "Specs: {}  Assertions: {}  Passes: {}  Failures: {}",
            stats.specs, stats.assertions, stats.passes, stats.failures
        );
        if report.pending() > 0 {
            let _ = write!(self.output, "  Pending: {}", report.pending());
        }
        self.output.push('\n');
    }

    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            self.output
                .push_str(&" ".repeat(self.indent_level * INDENT_SPACES));
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}
