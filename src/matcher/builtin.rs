use regex::Regex;
use tracing::warn;

use super::{definition::MatcherDefinition, hash::content_hash, registry::MatcherRegistry};
use crate::eval::Value;

/// Built-in matchers expressed in the string definition form.
const DEFINITIONS: &[(&str, &str)] = &[
    ("be", "alias eql"),
    ("equal", "==="),
    ("be_greater_than", ">"),
    ("be_less_than", "<"),
    ("be_at_least", ">="),
    ("be_at_most", "<="),
    ("be_a", "actual.constructor == expected"),
    ("be_an", "alias be_a"),
    ("be_null", "actual == null"),
    ("be_empty", "actual.length == 0"),
    ("be_true", "actual == true"),
    ("be_false", "actual == false"),
    ("be_type", "typeof actual == expected"),
    ("have_length", "actual.length == expected"),
    ("respond_to", "typeof actual[expected] == 'function'"),
];

pub(super) fn install(registry: &mut MatcherRegistry) {
    registry.insert("eql", MatcherDefinition::predicate(eql));
    registry.insert("match", MatcherDefinition::predicate(matches_pattern));
    registry.insert("include", MatcherDefinition::predicate(include));
    registry.insert("throw_error", MatcherDefinition::predicate(throw_error));

    for (name, source) in DEFINITIONS {
        let definition =
            MatcherDefinition::parse(source).expect("built-in matcher definitions are valid");
        registry.insert(name, definition);
    }
}

/// Structural equality for composites, loose equality for scalars.
pub fn eql(expected: &Value, actual: &Value) -> bool {
    if actual.is_composite() {
        content_hash(actual) == content_hash(expected)
    } else {
        actual.loose_eq(expected)
    }
}

fn matches_pattern(expected: &Value, actual: &Value) -> bool {
    let Value::String(text) = actual else {
        return false;
    };
    let pattern = expected.stringify();
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(text),
        Err(err) => {
            warn!("invalid pattern '{}': {}", pattern, err);
            false
        }
    }
}

/// Substring for strings, element membership for lists, key presence for objects.
fn include(expected: &Value, actual: &Value) -> bool {
    match actual {
        Value::String(text) => text.contains(&expected.stringify()),
        Value::List(items) => items.iter().any(|item| eql(expected, item)),
        Value::Object(fields) => fields.contains_key(&expected.stringify()),
        _ => false,
    }
}

/// Invokes `actual` and passes when that raises. Anything that cannot be invoked
/// raises by definition.
fn throw_error(_expected: &Value, actual: &Value) -> bool {
    match actual {
        Value::Callable(callable) => callable.call().is_err(),
        _ => true,
    }
}
