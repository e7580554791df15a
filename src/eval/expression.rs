//! Expressions of the body language and their nom parsers.
//!
//! The grammar is deliberately small: literals, identifiers, property access,
//! zero-argument calls, callables and assertion calls. There are no operators;
//! comparisons belong to matchers.

use std::rc::Rc;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1, multispace0, one_of, satisfy, space0},
    combinator::{map, map_res, not, opt, peek, recognize, value},
    error::{context, VerboseError},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};

use super::statement::{parse_statements, Statement};

pub type ParseResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<Expr>),
    Object(Vec<(String, Expr)>),
    /// `box(expr)`
    Boxed(Box<Expr>),
    /// Variable, or a type name such as `String` when unbound.
    Ident(String),
    /// `-> { statements }`
    Callable {
        source: String,
        body: Rc<Vec<Statement>>,
    },
    Property(Box<Expr>, String),
    Call(Box<Expr>),
    /// `actual.should_<matcher>(expected)` / `actual.should_not_<matcher>(expected)`
    Assert {
        actual: Box<Expr>,
        matcher: String,
        negate: bool,
        expected: Option<Box<Expr>>,
    },
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

pub(crate) fn identifier(input: &str) -> ParseResult<&str> {
    context(
        "identifier",
        recognize(pair(satisfy(is_ident_start), take_while(is_ident_char))),
    )(input)
}

/// A reserved word that is not the prefix of a longer identifier.
pub(crate) fn word<'a>(text: &'static str) -> impl FnMut(&'a str) -> ParseResult<'a, &'a str> {
    terminated(tag(text), not(peek(satisfy(is_ident_char))))
}

pub fn parse_expression(input: &str) -> ParseResult<Expr> {
    context("expression", postfix)(input)
}

fn postfix(input: &str) -> ParseResult<Expr> {
    let (mut input, mut expr) = primary(input)?;

    loop {
        if let Ok((rest, (negate, matcher, expected))) = assertion_suffix(input) {
            expr = Expr::Assert {
                actual: Box::new(expr),
                matcher: matcher.to_string(),
                negate,
                expected: expected.map(Box::new),
            };
            input = rest;
        } else if let Ok((rest, name)) = preceded(char('.'), identifier)(input) {
            // A malformed assertion call is not a property read.
            if name.starts_with("should_") {
                return Ok((input, expr));
            }
            expr = Expr::Property(Box::new(expr), name.to_string());
            input = rest;
        } else if let Ok((rest, _)) =
            pair(char::<_, VerboseError<&str>>('('), preceded(multispace0, char(')')))(input)
        {
            expr = Expr::Call(Box::new(expr));
            input = rest;
        } else {
            return Ok((input, expr));
        }
    }
}

fn assertion_suffix(input: &str) -> ParseResult<(bool, &str, Option<Expr>)> {
    context(
        "assertion call",
        tuple((
            preceded(tag(".should_"), map(opt(tag("not_")), |not| not.is_some())),
            identifier,
            delimited(
                pair(char('('), multispace0),
                opt(parse_expression),
                pair(multispace0, char(')')),
            ),
        )),
    )(input)
}

fn primary(input: &str) -> ParseResult<Expr> {
    alt((
        callable,
        number,
        map(single_quoted, |s| Expr::Str(s.to_string())),
        map(double_quoted, |s| Expr::Str(s.to_string())),
        list,
        object,
        boxed,
        value(Expr::Bool(true), word("true")),
        value(Expr::Bool(false), word("false")),
        value(Expr::Null, word("null")),
        value(Expr::Undefined, word("undefined")),
        map(identifier, |name| Expr::Ident(name.to_string())),
        delimited(
            pair(char('('), multispace0),
            parse_expression,
            pair(multispace0, char(')')),
        ),
    ))(input)
}

fn number(input: &str) -> ParseResult<Expr> {
    context(
        "number",
        map_res(
            recognize(tuple((
                opt(char('-')),
                digit1,
                opt(pair(char('.'), digit1)),
                opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
            ))),
            |text: &str| text.parse::<f64>().map(Expr::Number),
        ),
    )(input)
}

pub(crate) fn single_quoted(input: &str) -> ParseResult<&str> {
    delimited(char('\''), take_while(|c| c != '\'' && c != '\n'), char('\''))(input)
}

pub(crate) fn double_quoted(input: &str) -> ParseResult<&str> {
    delimited(char('"'), take_while(|c| c != '"' && c != '\n'), char('"'))(input)
}

fn list(input: &str) -> ParseResult<Expr> {
    context(
        "list",
        map(
            delimited(
                pair(char('['), multispace0),
                terminated(
                    separated_list0(
                        delimited(multispace0, char(','), multispace0),
                        parse_expression,
                    ),
                    opt(pair(multispace0, char(','))),
                ),
                pair(multispace0, char(']')),
            ),
            Expr::List,
        ),
    )(input)
}

fn object(input: &str) -> ParseResult<Expr> {
    let key = alt((identifier, single_quoted, double_quoted));
    let field = separated_pair(key, delimited(space0, char(':'), multispace0), parse_expression);
    context(
        "object",
        map(
            delimited(
                pair(char('{'), multispace0),
                terminated(
                    separated_list0(delimited(multispace0, char(','), multispace0), field),
                    opt(pair(multispace0, char(','))),
                ),
                pair(multispace0, char('}')),
            ),
            |fields| {
                Expr::Object(
                    fields
                        .into_iter()
                        .map(|(k, v): (&str, Expr)| (k.to_string(), v))
                        .collect(),
                )
            },
        ),
    )(input)
}

fn boxed(input: &str) -> ParseResult<Expr> {
    context(
        "box",
        map(
            preceded(
                pair(word("box"), space0),
                delimited(
                    pair(char('('), multispace0),
                    parse_expression,
                    pair(multispace0, char(')')),
                ),
            ),
            |inner| Expr::Boxed(Box::new(inner)),
        ),
    )(input)
}

fn callable(input: &str) -> ParseResult<Expr> {
    let (rest, body) = context(
        "callable",
        preceded(
            tuple((tag("->"), space0, char('{'))),
            terminated(parse_statements, pair(multispace0, char('}'))),
        ),
    )(input)?;
    let source = input[..input.len() - rest.len()].to_string();
    Ok((
        rest,
        Expr::Callable {
            source,
            body: Rc::new(body),
        },
    ))
}

/// Identifier-like names that can never be variables.
pub(crate) fn is_reserved(name: &str) -> bool {
    matches!(
        name,
        "true" | "false" | "null" | "undefined" | "let" | "raise" | "box"
    )
}
