//! # Matchers
//!
//! A matcher turns `(expected, actual)` into a boolean. Each name in the
//! [`MatcherRegistry`] maps to one [`MatcherDefinition`]:
//!
//! * **Operator shorthand**: `==`, `===`, `>`, `<`, `>=`, `<=` (plus `!=`, `!==`),
//!   evaluated as `actual <op> expected`.
//! * **Expression**: a boolean expression over `actual` and `expected`, written in a
//!   small grammar that is parsed once at registration ([`expression`]).
//! * **Alias**: forwards to another name. Chains are followed at lookup; a cycle is
//!   rejected when it is registered.
//! * **Predicate**: a Rust closure with an optional message formatter.
//!
//! String definitions follow three rules: `alias <name>` is an alias, anything
//! shorter than four characters is an operator, everything else is an expression.
//!
//! ```rust
//! use speckle::{eval::Value, matcher::MatcherRegistry};
//!
//! let mut registry = MatcherRegistry::with_builtins();
//! registry.register_source("have_at_least", "actual.length >= expected").unwrap();
//!
//! let rule = registry.resolve("have_at_least").unwrap();
//! assert!(rule.matches(&Value::from(2), &Value::from("abc")));
//! ```

pub mod builtin;
pub mod definition;
pub mod expression;
pub mod hash;
pub mod registry;

use thiserror::Error;

pub use definition::{MatchFn, MatcherDefinition, MessageFn, Operator, Rule};
pub use expression::MatchExpr;
pub use registry::MatcherRegistry;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatcherError {
    #[error("unknown matcher '{0}'")]
    UnknownMatcher(String),
    #[error("alias cycle {}", chain.join(" -> "))]
    AliasCycle { chain: Vec<String> },
    #[error("invalid matcher definition '{definition}': {reason}")]
    InvalidDefinition { definition: String, reason: String },
}
