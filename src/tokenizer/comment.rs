//! Comment markers and line breaks.
//!
//! Only the `//` marker is a token; whether the rest of the line is a comment is
//! decided by the parser, because inside a spec body the marker is plain code.

use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::value,
    error::context,
};

use super::token::{ParserResult, Token};

#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_comment_marker(input: &str) -> ParserResult<Token<'_>> {
    context("comment marker", value(Token::CommentMarker, tag("//")))(input)
}

#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_newline(input: &str) -> ParserResult<Token<'_>> {
    context(
        "newline",
        alt((
            value(Token::Newline("\r\n"), tag("\r\n")),
            value(Token::Newline("\n"), tag("\n")),
        )),
    )(input)
}
