//! # Structural Errors
//!
//! Errors raised while building suites from the token stream. Every variant is
//! fatal: parsing stops and nothing from the input is registered.

use thiserror::Error;

use crate::tokenizer::{keyword::Keyword, token::Span};

/// The construct a structural error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Construct {
    Describe,
    It,
    Hook,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructuralError {
    /// `end` with no open describe, spec or hook.
    #[error("Unmatched 'end' at {span}")]
    UnmatchedEnd { span: Span },
    /// A construct opened while another one is still open.
    #[error("'{keyword}' at {span} cannot be nested inside an open {open}")]
    Nested {
        keyword: Keyword,
        open: Construct,
        span: Span,
    },
    /// `it` or a hook keyword with no surrounding describe.
    #[error("'{keyword}' at {span} is outside of a describe block")]
    OutsideSuite { keyword: Keyword, span: Span },
    /// A describe or spec whose quoted description never arrived.
    #[error("{construct} opened at {span} has no description")]
    MissingDescription { construct: Construct, span: Span },
    /// A second quoted literal at describe level.
    #[error("Unexpected literal {literal} at {span}")]
    UnexpectedLiteral { literal: String, span: Span },
    /// Input ended (or halted) while a construct was still open.
    #[error("Unterminated {construct} opened at {span}")]
    Unterminated { construct: Construct, span: Span },
}

impl StructuralError {
    pub fn span(&self) -> Span {
        match self {
            StructuralError::UnmatchedEnd { span }
            | StructuralError::Nested { span, .. }
            | StructuralError::OutsideSuite { span, .. }
            | StructuralError::MissingDescription { span, .. }
            | StructuralError::UnexpectedLiteral { span, .. }
            | StructuralError::Unterminated { span, .. } => *span,
        }
    }
}
