//! Speckle Evaluation System
//!
//! Runs the raw hook and spec bodies captured by the [`analyzer`](crate::analyzer).
//! The runner only knows the [`BodyExecutor`] boundary; [`Interpreter`] is the
//! default implementation backed by a small body language.
//!
//! # Core Components
//!
//! ## Values
//! [`Value`] models what bodies compute with, including the loose and strict
//! equality used by matchers.
//!
//! ## Expressions and Statements
//! nom parsers for the body language: literals, `let` bindings, `raise`,
//! property access, callables and `.should_<matcher>(..)` assertion calls.
//!
//! ## Execution Context
//! [`ExecutionContext`] carries the running suite, the spec being executed (or the
//! hook), the assertion engine and the suite scope. Nothing is read from ambient
//! state.

pub mod context;
pub mod executor;
pub mod expression;
pub mod statement;
pub mod value;

use thiserror::Error;

use crate::matcher::MatcherError;

pub use context::{BodyExecutor, ExecutionContext, Phase, Scope};
pub use executor::Interpreter;
pub use value::{Callable, TypeName, Value};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("{0}")]
    Raised(String),
    #[error("'{0}' is not defined")]
    UnknownIdentifier(String),
    #[error("{0} is not a function")]
    NotCallable(String),
    #[error("assertions are not allowed in the '{0}' hook")]
    AssertionOutsideSpec(String),
    #[error("assertions are not allowed inside callables")]
    AssertionInCallable,
    #[error(transparent)]
    Matcher(#[from] MatcherError),
}
