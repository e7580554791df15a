use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    ast::Spec,
    eval::Value,
    matcher::{MatcherError, MatcherRegistry},
};

/// One evaluated matcher invocation. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Assertion {
    matcher: String,
    actual: Value,
    expected: Value,
    negate: bool,
    passed: bool,
    message: String,
}

impl Assertion {
    pub fn matcher(&self) -> &str {
        &self.matcher
    }

    pub fn actual(&self) -> &Value {
        &self.actual
    }

    pub fn expected(&self) -> &Value {
        &self.expected
    }

    pub fn negate(&self) -> bool {
        self.negate
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub specs: usize,
    pub assertions: usize,
    pub passes: usize,
    pub failures: usize,
}

/// Resolves matchers, runs them and keeps the counters.
#[derive(Debug, Clone, Default)]
pub struct AssertionEngine {
    registry: MatcherRegistry,
    stats: Stats,
}

impl AssertionEngine {
    pub fn new(registry: MatcherRegistry) -> Self {
        Self {
            registry,
            stats: Stats::default(),
        }
    }

    pub fn registry(&self) -> &MatcherRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut MatcherRegistry {
        &mut self.registry
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Evaluates `matcher` and counts the outcome. Boxed values are compared by the
    /// primitive they wrap.
    pub fn evaluate(
        &mut self,
        matcher: &str,
        actual: Value,
        expected: Value,
        negate: bool,
    ) -> Result<Assertion, MatcherError> {
        let rule = self.registry.resolve(matcher)?;
        let actual = actual.unboxed();
        let expected = expected.unboxed();

        let passed = rule.matches(&expected, &actual) != negate;
        let message = rule
            .message(&expected, &actual, negate)
            .unwrap_or_else(|| default_message(matcher, &actual, &expected, negate));

        if passed {
            self.stats.passes += 1;
        } else {
            self.stats.failures += 1;
        }
        debug!(matcher, passed, "{}", message);

        Ok(Assertion {
            matcher: matcher.to_string(),
            actual,
            expected,
            negate,
            passed,
            message,
        })
    }

    /// Counts a finished spec and the assertions it made.
    pub fn record_spec(&mut self, assertions: usize) {
        self.stats.specs += 1;
        self.stats.assertions += assertions;
    }
}

fn default_message(matcher: &str, actual: &Value, expected: &Value, negate: bool) -> String {
    format!(
        "expected {} to {}{} {}",
        actual.printed(),
        if negate { "not " } else { "" },
        matcher.replace('_', " "),
        expected.printed()
    )
    .trim_end()
    .to_string()
}

/// An `(actual, spec)` pair waiting for a matcher.
pub struct AssertionBuilder<'a> {
    engine: &'a mut AssertionEngine,
    spec: &'a mut Spec,
    actual: Value,
}

impl<'a> AssertionBuilder<'a> {
    pub fn new(engine: &'a mut AssertionEngine, spec: &'a mut Spec, actual: Value) -> Self {
        Self {
            engine,
            spec,
            actual,
        }
    }

    /// Records the assertion on the spec and returns whether it passed.
    pub fn should(self, matcher: &str, expected: Value) -> Result<bool, MatcherError> {
        self.record(matcher, expected, false)
    }

    pub fn should_not(self, matcher: &str, expected: Value) -> Result<bool, MatcherError> {
        self.record(matcher, expected, true)
    }

    fn record(self, matcher: &str, expected: Value, negate: bool) -> Result<bool, MatcherError> {
        let assertion = self.engine.evaluate(matcher, self.actual, expected, negate)?;
        let passed = assertion.passed();
        self.spec.record(assertion);
        Ok(passed)
    }
}
