//! # System
//!
//! Ties the pipeline together for callers that just want to run spec files:
//!
//! ```text
//! load → parse → register suites → run → report → render
//! ```
//!
//! Suites accumulate across [`System::parse_dsl`] calls, so several files can be
//! loaded before a single [`System::run`].

use std::path::Path;

use tracing::{debug, info};

use crate::{
    analyzer::SpecParser,
    assertion::{AssertionEngine, Stats},
    ast::SuiteRegistry,
    config::SpeckleConfig,
    eval::{BodyExecutor, Interpreter},
    formatter::{Formatter, Report},
    loader::{FsLoader, SourceLoader},
    matcher::{MatcherDefinition, MatcherRegistry},
    runner::{RunError, SuiteRunner},
    SpeckleResult,
};

pub struct System<E: BodyExecutor = Interpreter> {
    registry: SuiteRegistry,
    engine: AssertionEngine,
    parser: SpecParser,
    runner: SuiteRunner<E>,
    loader: Box<dyn SourceLoader>,
    formatter: Box<dyn Formatter>,
}

impl System<Interpreter> {
    /// Builds a system with the built-in matchers plus the ones named in `config`.
    pub fn new(config: &SpeckleConfig) -> SpeckleResult<Self> {
        Self::with_executor(config, Interpreter::new())
    }
}

impl<E: BodyExecutor> System<E> {
    pub fn with_executor(config: &SpeckleConfig, executor: E) -> SpeckleResult<Self> {
        let mut matchers = MatcherRegistry::with_builtins();
        matchers.extend(&config.matchers)?;
        debug!(matchers = matchers.len(), "matchers registered");

        Ok(Self {
            registry: SuiteRegistry::new(),
            engine: AssertionEngine::new(matchers),
            parser: SpecParser::new(),
            runner: SuiteRunner::new(executor),
            loader: Box::new(FsLoader),
            formatter: config.formatter.build(config.show_passes),
        })
    }

    pub fn with_loader(mut self, loader: impl SourceLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn with_formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Registers string matcher definitions, in order.
    pub fn add_matchers<I, K, V>(&mut self, matchers: I) -> SpeckleResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Ok(self.engine.registry_mut().extend(matchers)?)
    }

    pub fn register_matcher(&mut self, name: &str, definition: MatcherDefinition) -> SpeckleResult<()> {
        Ok(self.engine.registry_mut().register(name, definition)?)
    }

    /// Parses `source` and merges its suites. A structural error leaves the
    /// registry untouched.
    pub fn parse_dsl(&mut self, source: &str) -> SpeckleResult<()> {
        let parsed = self.parser.parse(source)?;
        debug!(suites = parsed.len(), "parsed suites");
        self.registry.merge(parsed);
        Ok(())
    }

    /// Loads `path` through the configured loader and parses it.
    pub fn exec(&mut self, path: impl AsRef<Path>) -> SpeckleResult<()> {
        let path = path.as_ref();
        info!("loading {}", path.display());
        let source = self.loader.load(path)?;
        self.parse_dsl(&source)
    }

    pub fn run(&mut self) -> SpeckleResult<()> {
        Ok(self.runner.run(&mut self.registry, &mut self.engine)?)
    }

    pub fn run_suite(&mut self, description: &str) -> SpeckleResult<()> {
        let suite = self
            .registry
            .get_mut(description)
            .ok_or_else(|| RunError::UnknownSuite(description.to_string()))?;
        Ok(self.runner.run_suite(suite, &mut self.engine)?)
    }

    pub fn suites(&self) -> &SuiteRegistry {
        &self.registry
    }

    pub fn matchers(&self) -> &MatcherRegistry {
        self.engine.registry()
    }

    pub fn stats(&self) -> Stats {
        self.engine.stats()
    }

    pub fn report(&self) -> Report {
        Report::new(&self.registry, self.engine.stats())
    }

    pub fn render(&self) -> SpeckleResult<String> {
        Ok(self.formatter.render(&self.report())?)
    }

    pub fn executor(&self) -> &E {
        self.runner.executor()
    }
}
