use nom::{
    character::complete::char,
    error::{context, ErrorKind, ParseError, VerboseError},
};

use super::{keyword::boundary, token::ParserResult};

/// Parses a single-quoted literal such as `'adds numbers'`.
///
/// The literal is non-greedy and never spans lines: it ends at the first quote that is
/// followed by a boundary. There is no escaping, so `'it's fine'` is one literal. Returns the
/// raw text including both quotes.
#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_quoted_literal(input: &str) -> ParserResult<&str> {
    context("quoted literal", quoted)(input)
}

fn quoted(input: &str) -> ParserResult<&str> {
    let (rest, _) = char('\'')(input)?;
    let line_end = rest
        .find(|c: char| c == '\n' || c == '\r')
        .unwrap_or(rest.len());

    rest[..line_end]
        .match_indices('\'')
        .map(|(idx, _)| idx)
        .find(|&idx| boundary(&rest[idx + 1..]).is_ok())
        .map(|idx| {
            let consumed = idx + 2;
            (&input[consumed..], &input[..consumed])
        })
        .ok_or_else(|| nom::Err::Error(VerboseError::from_error_kind(input, ErrorKind::Char)))
}

/// Strips the surrounding quotes from a raw literal.
pub fn unquote(raw: &str) -> &str {
    raw.strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(raw)
}
