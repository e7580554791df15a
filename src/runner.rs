use thiserror::Error;
use tracing::{error, info};

use crate::{
    assertion::AssertionEngine,
    ast::{HookKind, Suite, SuiteRegistry},
    eval::{BodyExecutor, EvalError, ExecutionContext, Scope},
    matcher::MatcherError,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunError {
    #[error("Error in hook '{hook}', suite '{suite}': {source}")]
    HookExecution {
        suite: String,
        hook: HookKind,
        source: EvalError,
    },
    #[error("Error in spec '{spec}', suite '{suite}': {source}")]
    SpecExecution {
        suite: String,
        spec: String,
        source: EvalError,
    },
    #[error("no suite described as '{0}'")]
    UnknownSuite(String),
}

impl RunError {
    /// The matcher failure behind this error, if an unknown matcher stopped the run.
    pub fn matcher_error(&self) -> Option<&MatcherError> {
        match self {
            RunError::HookExecution {
                source: EvalError::Matcher(err),
                ..
            }
            | RunError::SpecExecution {
                source: EvalError::Matcher(err),
                ..
            } => Some(err),
            _ => None,
        }
    }
}

/// Drives suites through their lifecycle:
///
/// ```text
/// before
///   before_each, spec, after_each   (per spec, in declaration order)
/// after
/// ```
///
/// The first body that fails aborts the whole run.
pub struct SuiteRunner<E: BodyExecutor> {
    executor: E,
}

impl<E: BodyExecutor> SuiteRunner<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Runs every suite in declaration order.
    #[tracing::instrument(level = "debug", skip_all, fields(suites = registry.len()))]
    pub fn run(
        &mut self,
        registry: &mut SuiteRegistry,
        engine: &mut AssertionEngine,
    ) -> Result<(), RunError> {
        for suite in registry.iter_mut() {
            self.run_suite(suite, engine)?;
        }
        let stats = engine.stats();
        info!(
            specs = stats.specs,
            assertions = stats.assertions,
            passes = stats.passes,
            failures = stats.failures,
            "run finished"
        );
        Ok(())
    }

    pub fn run_suite(&mut self, suite: &mut Suite, engine: &mut AssertionEngine) -> Result<(), RunError> {
        info!(suite = %suite.description, specs = suite.specs().len(), "running suite");
        suite.ran = true;

        let description = suite.description.clone();
        let hooks = suite.hooks().clone();
        let hook = |kind: HookKind| hooks.get(&kind).map(String::as_str);
        let mut scope = Scope::new();

        self.run_hook(&description, HookKind::Before, hook(HookKind::Before), engine, &mut scope)?;

        for spec in suite.specs_mut() {
            self.run_hook(&description, HookKind::BeforeEach, hook(HookKind::BeforeEach), engine, &mut scope)?;

            let body = spec.body.clone();
            let result = {
                let mut ctx = ExecutionContext::for_spec(&description, spec, engine, &mut scope);
                self.executor.execute(&body, &mut ctx)
            };
            if let Err(source) = result {
                error!(suite = %description, spec = %spec.description, "spec failed: {}", source);
                return Err(RunError::SpecExecution {
                    suite: description,
                    spec: spec.description.clone(),
                    source,
                });
            }
            engine.record_spec(spec.assertions().len());

            self.run_hook(&description, HookKind::AfterEach, hook(HookKind::AfterEach), engine, &mut scope)?;
        }

        self.run_hook(&description, HookKind::After, hook(HookKind::After), engine, &mut scope)
    }

    fn run_hook(
        &mut self,
        suite: &str,
        kind: HookKind,
        body: Option<&str>,
        engine: &mut AssertionEngine,
        scope: &mut Scope,
    ) -> Result<(), RunError> {
        let Some(body) = body else {
            return Ok(());
        };
        let mut ctx = ExecutionContext::for_hook(suite, kind, engine, scope);
        self.executor.execute(body, &mut ctx).map_err(|source| {
            error!(suite, hook = %kind, "hook failed: {}", source);
            RunError::HookExecution {
                suite: suite.to_string(),
                hook: kind,
                source,
            }
        })
    }
}

impl<E: BodyExecutor + Default> Default for SuiteRunner<E> {
    fn default() -> Self {
        Self::new(E::default())
    }
}
