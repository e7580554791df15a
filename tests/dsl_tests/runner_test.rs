use pretty_assertions::assert_eq;
use speckle::{
    analyzer::SpecParser,
    assertion::AssertionEngine,
    eval::{BodyExecutor, EvalError, ExecutionContext, Interpreter},
    matcher::MatcherRegistry,
    runner::{RunError, SuiteRunner},
    HookKind,
};

use super::run_source;

/// Records which hook or spec each body ran as.
#[derive(Default)]
struct Trace {
    events: Vec<String>,
}

impl BodyExecutor for Trace {
    fn execute(&mut self, _body: &str, ctx: &mut ExecutionContext<'_>) -> Result<(), EvalError> {
        let event = match ctx.spec() {
            Some(spec) => spec.description.clone(),
            None => ctx.hook().map(|h| h.to_string()).unwrap_or_default(),
        };
        self.events.push(event);
        Ok(())
    }
}

#[test]
fn it_runs_hooks_around_each_spec() {
    let source = "describe 'order'
  after done end
  after_each cleanup end
  it 'spec1' a end
  before_each prepare end
  it 'spec2' b end
  before start end
end";
    let mut registry = SpecParser::new().parse(source).unwrap();
    let mut engine = AssertionEngine::default();
    let mut runner = SuiteRunner::new(Trace::default());

    runner.run(&mut registry, &mut engine).unwrap();

    assert_eq!(
        runner.executor().events,
        vec![
            "before",
            "before_each",
            "spec1",
            "after_each",
            "before_each",
            "spec2",
            "after_each",
            "after"
        ]
    );
}

#[test]
fn it_marks_pending_specs() {
    let (registry, engine) = run_source(
        "describe 'todo'
  it 'is written later'
  end
  it 'only sets things up'
    let x = 1
  end
end",
    );
    let specs = registry.get("todo").unwrap().specs();
    assert!(specs.iter().all(|s| s.requires_implementation()));
    assert!(specs.iter().all(|s| !s.passed()));
    assert_eq!(engine.stats().specs, 2);
    assert_eq!(engine.stats().assertions, 0);
}

#[test]
fn it_shares_suite_scope_between_hooks_and_specs() {
    let (registry, engine) = run_source(
        "describe 'counter'
  before
    let start = 10
  end
  before_each
    let seen = [start]
  end
  it 'sees the before value' start.should_eql 10
  end
  it 'sees the before_each value' seen.should_eql [10]
  end
end",
    );
    assert!(registry
        .get("counter")
        .unwrap()
        .specs()
        .iter()
        .all(|s| s.passed()));
    assert_eq!(engine.stats().passes, 2);
}

#[test]
fn it_does_not_leak_scope_between_suites() {
    let source = "describe 'first'
  before let shared = 1
  end
end
describe 'second'
  it 'cannot see it' shared.should_eql 1
  end
end";
    let mut registry = SpecParser::new().parse(source).unwrap();
    let mut engine = AssertionEngine::new(MatcherRegistry::with_builtins());

    let err = SuiteRunner::new(Interpreter::new())
        .run(&mut registry, &mut engine)
        .unwrap_err();
    assert_eq!(
        err,
        RunError::SpecExecution {
            suite: "second".into(),
            spec: "cannot see it".into(),
            source: EvalError::UnknownIdentifier("shared".into()),
        }
    );
}

#[test]
fn it_stops_at_the_first_failing_body() {
    let source = "describe 'broken'
  before_each raise 'setup exploded'
  end
  it 'never runs' 1.should_eql 1
  end
end
describe 'after'
  it 'never runs either' 1.should_eql 1
  end
end";
    let mut registry = SpecParser::new().parse(source).unwrap();
    let mut engine = AssertionEngine::new(MatcherRegistry::with_builtins());

    let err = SuiteRunner::new(Interpreter::new())
        .run(&mut registry, &mut engine)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error in hook 'before_each', suite 'broken': setup exploded"
    );
    assert!(registry.get("broken").unwrap().ran);
    assert!(!registry.get("after").unwrap().ran);
    assert_eq!(engine.stats().assertions, 0);
}

#[test]
fn it_rejects_assertions_in_hooks() {
    let source = "describe 'h'
  before 1.should_eql 1
  end
  it 'x' end
end";
    let mut registry = SpecParser::new().parse(source).unwrap();
    let mut engine = AssertionEngine::new(MatcherRegistry::with_builtins());

    let err = SuiteRunner::new(Interpreter::new())
        .run(&mut registry, &mut engine)
        .unwrap_err();
    assert!(matches!(
        err,
        RunError::HookExecution {
            hook: HookKind::Before,
            source: EvalError::AssertionOutsideSpec(_),
            ..
        }
    ));
}

#[test]
fn it_tells_executors_whether_a_spec_is_running() {
    struct PhaseCheck(Vec<bool>);

    impl BodyExecutor for PhaseCheck {
        fn execute(&mut self, _body: &str, ctx: &mut ExecutionContext<'_>) -> Result<(), EvalError> {
            self.0.push(ctx.spec().is_some() && ctx.hook().is_none());
            Ok(())
        }
    }

    let mut registry = SpecParser::new()
        .parse("describe 'p' before_each x end it 'y' z end end")
        .unwrap();
    let mut runner = SuiteRunner::new(PhaseCheck(Vec::new()));
    runner
        .run(&mut registry, &mut AssertionEngine::default())
        .unwrap();
    assert_eq!(runner.executor().0, vec![false, true]);
}
