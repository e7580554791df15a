mod matcher_test;
mod parser_test;
mod runner_test;
mod system_test;

use speckle::{
    analyzer::SpecParser, assertion::AssertionEngine, eval::Interpreter,
    matcher::MatcherRegistry, runner::SuiteRunner, SuiteRegistry,
};

/// Parses and runs `source` with the built-in matchers.
pub fn run_source(source: &str) -> (SuiteRegistry, AssertionEngine) {
    let mut registry = SpecParser::new().parse(source).unwrap();
    let mut engine = AssertionEngine::new(MatcherRegistry::with_builtins());
    SuiteRunner::new(Interpreter::new())
        .run(&mut registry, &mut engine)
        .unwrap();
    (registry, engine)
}
