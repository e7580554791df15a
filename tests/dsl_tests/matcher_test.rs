use pretty_assertions::assert_eq;
use speckle::{
    assertion::AssertionEngine,
    eval::Value,
    matcher::{MatcherDefinition, MatcherError, MatcherRegistry},
};

use super::run_source;

#[test]
fn it_reports_eql_failures_with_printed_values() {
    let (registry, engine) = run_source(
        "describe 'eql'
  it 'matches lists' [1, 2].should_eql [1, 2]
  end
  it 'reports a mismatch' [1, 2].should_eql [1, 3]
  end
end",
    );
    let suite = registry.get("eql").unwrap();

    assert!(suite.specs()[0].passed());
    let failure = suite.specs()[1].failure().unwrap();
    assert_eq!(failure.message(), "expected [1,2] to eql [1,3]");
    assert_eq!(engine.stats().passes, 1);
    assert_eq!(engine.stats().failures, 1);
}

#[test]
fn it_negates_matchers() {
    let (registry, engine) = run_source(
        "describe 'not'
  it 'differs' 'x'.should_not_eql 'y'
  end
  it 'wrongly differs' 'x'.should_not_eql 'x'
  end
end",
    );
    let specs = registry.get("not").unwrap().specs();
    assert!(specs[0].passed());
    assert_eq!(
        specs[1].failure().map(|a| a.message()),
        Some("expected 'x' to not eql 'x'")
    );
    assert_eq!(engine.stats().assertions, 2);
}

#[test]
fn it_runs_the_builtin_catalogue_from_the_dsl() {
    let (registry, engine) = run_source(
        r#"describe 'builtins'
  it 'compares'
    5.should_be_greater_than 3
    3.should_be_less_than 5
    5.should_be_at_least 5
    5.should_be_at_most 5
    1.should_equal 1
  end
  it 'inspects types'
    'text'.should_be_a String
    [1].should_be_an Array
    'text'.should_be_type 'string'
    null.should_be_null
    [].should_be_empty
    true.should_be_true
    false.should_be_false
  end
  it 'looks inside'
    'hello world'.should_include 'world'
    { name: 'speckle' }.should_include 'name'
    'abc123'.should_match '^[a-z]+[0-9]+$'
    'abc'.should_have_length 3
    { run: -> { 1 } }.should_respond_to 'run'
  end
  it 'catches errors'
    (-> { raise 'boom' }).should_throw_error
    (-> { 1 }).should_not_throw_error
  end
end"#,
    );
    for spec in registry.get("builtins").unwrap().specs() {
        assert!(
            spec.passed(),
            "{}: {:?}",
            spec.description,
            spec.failure().map(|a| a.message())
        );
    }
    assert_eq!(engine.stats().failures, 0);
    assert_eq!(engine.stats().assertions, 19);
}

#[test]
fn it_resolves_aliases_transitively() {
    let mut registry = MatcherRegistry::with_builtins();
    registry.register_source("same_as", "alias be").unwrap();
    registry.register_source("like", "alias same_as").unwrap();

    let mut engine = AssertionEngine::new(registry);
    let direct = engine
        .evaluate("eql", Value::from("a"), Value::from("a"), false)
        .unwrap();
    let aliased = engine
        .evaluate("like", Value::from("a"), Value::from("a"), false)
        .unwrap();
    assert_eq!(direct.passed(), aliased.passed());

    let failed = engine
        .evaluate("like", Value::from("a"), Value::from("b"), false)
        .unwrap();
    assert_eq!(failed.message(), "expected 'a' to like 'b'");
}

#[test]
fn it_rejects_alias_cycles() {
    let mut registry = MatcherRegistry::with_builtins();
    registry.register_source("ping", "alias pong").unwrap();

    let err = registry.register_source("pong", "alias ping").unwrap_err();
    assert_eq!(
        err,
        MatcherError::AliasCycle {
            chain: vec!["pong".into(), "ping".into(), "pong".into()]
        }
    );
    assert!(matches!(
        registry.resolve("ping"),
        Err(MatcherError::UnknownMatcher(name)) if name == "pong"
    ));
}

#[test]
fn it_parses_user_definitions() {
    let mut registry = MatcherRegistry::with_builtins();
    registry
        .extend([
            ("exceed", ">"),
            ("have_size", "actual.length == expected"),
            ("be_positive", "actual > 0"),
        ])
        .unwrap();
    registry
        .register(
            "be_odd",
            MatcherDefinition::predicate(|_, actual| actual.to_number() % 2.0 == 1.0),
        )
        .unwrap();

    let check = |name: &str, actual: Value, expected: Value| {
        registry.resolve(name).unwrap().matches(&expected, &actual)
    };
    assert!(check("exceed", 3.0.into(), 2.0.into()));
    assert!(!check("exceed", 2.0.into(), 3.0.into()));
    assert!(check(
        "have_size",
        Value::list(vec![Value::Null, Value::Null]),
        2.0.into()
    ));
    assert!(check("be_positive", 1.0.into(), Value::Undefined));
    assert!(check("be_odd", 7.0.into(), Value::Undefined));

    assert!(matches!(
        MatcherDefinition::parse("actual ==="),
        Err(MatcherError::InvalidDefinition { .. })
    ));
}
