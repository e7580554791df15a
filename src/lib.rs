//! # Speckle: a behavior-driven spec engine
//!
//! Speckle reads spec files written in a small `describe` / `it` / `end` DSL,
//! runs their bodies against a registry of named matchers and reports the outcome.
//!
//! ```text
//! describe 'lists'
//!   before
//!     let items = [1, 2, 3]
//!   end
//!   it 'has three items'
//!     items.should_have_length 3
//!     items.should_not_include 5
//!   end
//! end
//! ```
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source → Tokenizer → Analyzer → Suites → Runner → Interpreter → Assertions → Formatter
//! ```
//!
//! ### Stage 1: Tokenization
//!
//! The [`tokenizer`] module splits the source into structural keywords, quoted
//! descriptions, comment markers and plain characters. Every byte of input lands in
//! exactly one token.
//!
//! ### Stage 2: Structural Analysis
//!
//! The [`analyzer`] module walks the tokens with a small state machine and builds
//! [`Suite`](ast::Suite)s whose spec and hook bodies are kept as raw text. Malformed
//! nesting is reported as a [`StructuralError`](analyzer::StructuralError) and
//! nothing is registered.
//!
//! ### Stage 3: Execution
//!
//! The [`runner`] drives each suite through its hooks and specs. Bodies are handed to
//! a [`BodyExecutor`](eval::BodyExecutor); the default one, [`eval::Interpreter`],
//! rewrites short-form assertions ([`preprocessor`]) and evaluates the body language.
//!
//! ### Stage 4: Assertions
//!
//! Assertions resolve their matcher in the [`matcher`] registry and are evaluated by
//! the [`assertion`] engine, which also keeps the run counters.
//!
//! ### Stage 5: Reporting
//!
//! The [`formatter`] module renders a [`Report`](formatter::Report) snapshot of the run.
//!
//! The [`system`] module wires the stages together behind a single facade, with
//! [`config`] and [`loader`] as its inputs.

pub mod analyzer;
pub mod assertion;
pub mod ast;
pub mod config;
pub mod error;
pub mod eval;
pub mod formatter;
pub mod loader;
pub mod matcher;
pub mod preprocessor;
pub mod runner;
pub mod system;
pub mod tokenizer;

// Re-exports
pub use assertion::{Assertion, AssertionBuilder, AssertionEngine, Stats};
pub use ast::*;
pub use error::*;
pub use system::System;
