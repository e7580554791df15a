//! # Keyword Token Handling
//!
//! Structural keywords of the spec DSL. Keywords are matched longest-first
//! (`before_each` before `before`) and only when followed by a boundary, so
//! `before_all` or `ending` stay ordinary text.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::one_of,
    combinator::{eof, peek, value},
    error::context,
    sequence::terminated,
};

use super::token::ParserResult;
use crate::ast::HookKind;

/// Keywords recognized by the spec DSL.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Keyword {
    /// Stops parsing; the rest of the input is discarded.
    #[strum(serialize = "__END__")]
    Halt,
    /// Closes the innermost open construct.
    End,
    BeforeEach,
    AfterEach,
    Before,
    After,
    /// Opens a spec.
    It,
    /// Opens a suite.
    Describe,
}

impl Keyword {
    /// The hook this keyword opens, if it is a hook keyword.
    pub fn hook(self) -> Option<HookKind> {
        match self {
            Keyword::Before => Some(HookKind::Before),
            Keyword::After => Some(HookKind::After),
            Keyword::BeforeEach => Some(HookKind::BeforeEach),
            Keyword::AfterEach => Some(HookKind::AfterEach),
            _ => None,
        }
    }
}

/// Succeeds without consuming input when the next character is whitespace or
/// the input is exhausted.
pub fn boundary(input: &str) -> ParserResult<()> {
    peek(alt((value((), one_of(" \t\r\n")), value((), eof))))(input)
}

fn keyword<'a>(
    kw: Keyword,
    text: &'static str,
) -> impl FnMut(&'a str) -> ParserResult<'a, Keyword> {
    value(kw, terminated(tag(text), boundary))
}

/// Parses a keyword at the start of `input`.
///
/// ```
/// # use speckle::tokenizer::keyword::{parse_keyword, Keyword};
/// let (rest, kw) = parse_keyword("before_each\n").unwrap();
/// assert_eq!(kw, Keyword::BeforeEach);
/// assert_eq!(rest, "\n");
/// assert!(parse_keyword("ending").is_err());
/// ```
#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_keyword(input: &str) -> ParserResult<Keyword> {
    context(
        "keyword",
        alt((
            keyword(Keyword::Halt, "__END__"),
            keyword(Keyword::End, "end"),
            keyword(Keyword::BeforeEach, "before_each"),
            keyword(Keyword::AfterEach, "after_each"),
            keyword(Keyword::Before, "before"),
            keyword(Keyword::After, "after"),
            keyword(Keyword::It, "it"),
            keyword(Keyword::Describe, "describe"),
        )),
    )(input)
}
