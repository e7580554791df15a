use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace1, not_line_ending, space0, space1},
    combinator::{all_consuming, map, value, verify},
    error::context,
    multi::many0,
    sequence::{delimited, pair, preceded, separated_pair},
};

use super::{
    expression::{identifier, is_reserved, parse_expression, word, Expr, ParseResult},
    EvalError,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `let name = expr`, bound in the suite scope.
    Let { name: String, value: Expr },
    /// `raise expr`, fails the running body.
    Raise(Expr),
    Expr(Expr),
}

/// Parses a whole body. Statements are separated by newlines or `;`, and `//`
/// comments run to the end of the line.
pub fn parse_body(source: &str) -> Result<Vec<Statement>, EvalError> {
    match all_consuming(parse_statements)(source) {
        Ok((_, statements)) => Ok(statements),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let remaining = e.errors.first().map(|(input, _)| *input).unwrap_or(source);
            let offset = source.len() - remaining.len();
            let line = source[..offset].matches('\n').count() + 1;
            let snippet: String = remaining
                .lines()
                .next()
                .unwrap_or_default()
                .chars()
                .take(40)
                .collect();
            Err(EvalError::Syntax {
                line,
                message: format!("unexpected input '{}'", snippet.trim()),
            })
        }
        Err(nom::Err::Incomplete(_)) => Err(EvalError::Syntax {
            line: 0,
            message: "incomplete input".to_string(),
        }),
    }
}

/// Parses statements until something that cannot start a statement, leaving it
/// for the caller (the closing brace of a callable, or trailing garbage).
pub fn parse_statements(input: &str) -> ParseResult<Vec<Statement>> {
    let mut statements = Vec::new();
    let (mut input, _) = separators(input)?;

    loop {
        match statement(input) {
            Ok((rest, stmt)) => {
                statements.push(stmt);
                let (rest, _) = space0(rest)?;
                if !ends_statement(rest) {
                    return Ok((rest, statements));
                }
                let (rest, _) = separators(rest)?;
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, statements)),
            Err(e) => return Err(e),
        }
    }
}

fn ends_statement(rest: &str) -> bool {
    rest.is_empty()
        || rest.starts_with("//")
        || rest.starts_with(|c: char| matches!(c, '\n' | '\r' | ';' | '}'))
}

fn separators(input: &str) -> ParseResult<()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), char(';')),
            value((), pair(tag("//"), not_line_ending)),
        ))),
    )(input)
}

fn statement(input: &str) -> ParseResult<Statement> {
    alt((
        let_statement,
        raise_statement,
        map(parse_expression, Statement::Expr),
    ))(input)
}

fn let_statement(input: &str) -> ParseResult<Statement> {
    context(
        "let",
        map(
            preceded(
                pair(word("let"), space1),
                separated_pair(
                    verify(identifier, |name: &str| !is_reserved(name)),
                    delimited(space0, char('='), space0),
                    parse_expression,
                ),
            ),
            |(name, value)| Statement::Let {
                name: name.to_string(),
                value,
            },
        ),
    )(input)
}

fn raise_statement(input: &str) -> ParseResult<Statement> {
    context(
        "raise",
        map(
            preceded(pair(word("raise"), space0), parse_expression),
            Statement::Raise,
        ),
    )(input)
}
