//! # Speckle Preprocessor
//!
//! Sits between the raw bodies captured by the analyzer and the body language
//! parser:
//!
//! ```text
//! Source → Tokenizer → Analyzer → (raw bodies) → Preprocessor → Interpreter
//! ```
//!
//! Bodies may use the parenthesis-free short form of an assertion call, where the
//! rest of the line is the expected value:
//!
//! ```text
//! list.should_have_length 3        →  list.should_have_length(3)
//! value.should_be_true             →  value.should_be_true()
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use speckle::preprocessor::{BodyPreprocessor, Preprocessor};
//!
//! let body = BodyPreprocessor::new().process("'a'.should_not_eql 'b'");
//! assert_eq!(body, "'a'.should_not_eql('b')");
//! ```

use lazy_static::lazy_static;
use regex::Regex;

/// A trait for preprocessing different types of input
pub trait Preprocessor<T, U = T> {
    /// Process the input of type T and return the processed result
    fn process(&self, input: T) -> U;
}

lazy_static! {
    static ref SHORT_FORM: Regex =
        Regex::new(r"(?m)\.should_(\w+)(?: |$)(.*)$").expect("valid short form pattern");
}

/// Rewrites short-form assertion calls into the parenthesized form.
#[derive(Debug, Clone, Default)]
pub struct BodyPreprocessor {}

impl BodyPreprocessor {
    pub fn new() -> Self {
        Self {}
    }

    fn normalize_newlines(&self, input: &str) -> String {
        input.replace("\r\n", "\n")
    }

    fn expand_short_form(&self, input: &str) -> String {
        SHORT_FORM
            .replace_all(input, |caps: &regex::Captures<'_>| {
                format!(".should_{}({})", &caps[1], caps[2].trim_end())
            })
            .into_owned()
    }
}

impl Preprocessor<&str, String> for BodyPreprocessor {
    fn process(&self, input: &str) -> String {
        let output = self.normalize_newlines(input);
        self.expand_short_form(&output)
    }
}
