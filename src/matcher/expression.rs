//! Restricted expression language for expression-form matchers.
//!
//! ```text
//! conditional := or ( "?" conditional ":" conditional )?
//! or          := and ( "||" and )*
//! and         := comparison ( "&&" comparison )*
//! comparison  := unary ( operator unary )?
//! unary       := "!" unary | "typeof" unary | postfix
//! postfix     := atom ( "." ident | "[" conditional "]" )*
//! atom        := "actual" | "expected" | literal | type name | "(" conditional ")"
//! ```
//!
//! Nothing else is evaluated: there are no calls, assignments or free variables.

use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, map_res, opt, value},
    error::context,
    multi::many0,
    sequence::{delimited, pair, preceded},
};

use super::{definition::Operator, MatcherError};
use crate::eval::{
    expression::{double_quoted, identifier, single_quoted, word, ParseResult},
    TypeName, Value,
};

#[derive(Debug, Clone, PartialEq)]
pub enum MatchExpr {
    Actual,
    Expected,
    Literal(Value),
    Property(Box<MatchExpr>, String),
    Index(Box<MatchExpr>, Box<MatchExpr>),
    TypeOf(Box<MatchExpr>),
    Not(Box<MatchExpr>),
    Compare(Operator, Box<MatchExpr>, Box<MatchExpr>),
    And(Box<MatchExpr>, Box<MatchExpr>),
    Or(Box<MatchExpr>, Box<MatchExpr>),
    Conditional(Box<MatchExpr>, Box<MatchExpr>, Box<MatchExpr>),
}

impl MatchExpr {
    pub fn parse(source: &str) -> Result<Self, MatcherError> {
        all_consuming(delimited(multispace0, conditional, multispace0))(source)
            .map(|(_, expr)| expr)
            .map_err(|e| MatcherError::InvalidDefinition {
                definition: source.to_string(),
                reason: match e {
                    nom::Err::Error(e) | nom::Err::Failure(e) => e
                        .errors
                        .first()
                        .map(|(rest, _)| format!("unexpected input at '{}'", rest.trim()))
                        .unwrap_or_else(|| "invalid expression".to_string()),
                    nom::Err::Incomplete(_) => "incomplete expression".to_string(),
                },
            })
    }

    pub fn evaluate(&self, actual: &Value, expected: &Value) -> Value {
        match self {
            MatchExpr::Actual => actual.clone(),
            MatchExpr::Expected => expected.clone(),
            MatchExpr::Literal(value) => value.clone(),
            MatchExpr::Property(target, name) => target.evaluate(actual, expected).property(name),
            MatchExpr::Index(target, key) => {
                let key = key.evaluate(actual, expected).stringify();
                target.evaluate(actual, expected).property(&key)
            }
            MatchExpr::TypeOf(inner) => Value::from(inner.evaluate(actual, expected).type_of()),
            MatchExpr::Not(inner) => Value::Bool(!inner.evaluate(actual, expected).is_truthy()),
            MatchExpr::Compare(op, left, right) => Value::Bool(op.apply(
                &left.evaluate(actual, expected),
                &right.evaluate(actual, expected),
            )),
            MatchExpr::And(left, right) => {
                let left = left.evaluate(actual, expected);
                if left.is_truthy() {
                    right.evaluate(actual, expected)
                } else {
                    left
                }
            }
            MatchExpr::Or(left, right) => {
                let left = left.evaluate(actual, expected);
                if left.is_truthy() {
                    left
                } else {
                    right.evaluate(actual, expected)
                }
            }
            MatchExpr::Conditional(test, then, otherwise) => {
                if test.evaluate(actual, expected).is_truthy() {
                    then.evaluate(actual, expected)
                } else {
                    otherwise.evaluate(actual, expected)
                }
            }
        }
    }
}

fn ws<'a, O>(
    inner: impl FnMut(&'a str) -> ParseResult<'a, O>,
) -> impl FnMut(&'a str) -> ParseResult<'a, O> {
    delimited(multispace0, inner, multispace0)
}

fn conditional(input: &str) -> ParseResult<MatchExpr> {
    let (input, test) = or(input)?;
    let (input, branches) = opt(pair(
        preceded(ws(char('?')), conditional),
        preceded(ws(char(':')), conditional),
    ))(input)?;
    Ok(match branches {
        Some((then, otherwise)) => (
            input,
            MatchExpr::Conditional(Box::new(test), Box::new(then), Box::new(otherwise)),
        ),
        None => (input, test),
    })
}

fn or(input: &str) -> ParseResult<MatchExpr> {
    let (input, first) = and(input)?;
    let (input, rest) = many0(preceded(ws(tag("||")), and))(input)?;
    Ok((
        input,
        rest.into_iter()
            .fold(first, |acc, next| MatchExpr::Or(Box::new(acc), Box::new(next))),
    ))
}

fn and(input: &str) -> ParseResult<MatchExpr> {
    let (input, first) = comparison(input)?;
    let (input, rest) = many0(preceded(ws(tag("&&")), comparison))(input)?;
    Ok((
        input,
        rest.into_iter()
            .fold(first, |acc, next| MatchExpr::And(Box::new(acc), Box::new(next))),
    ))
}

fn operator(input: &str) -> ParseResult<Operator> {
    context(
        "operator",
        map_res(
            alt((
                tag("==="),
                tag("!=="),
                tag("=="),
                tag("!="),
                tag(">="),
                tag("<="),
                tag(">"),
                tag("<"),
            )),
            Operator::from_str,
        ),
    )(input)
}

fn comparison(input: &str) -> ParseResult<MatchExpr> {
    let (input, left) = unary(input)?;
    let (input, right) = opt(pair(ws(operator), unary))(input)?;
    Ok(match right {
        Some((op, right)) => (input, MatchExpr::Compare(op, Box::new(left), Box::new(right))),
        None => (input, left),
    })
}

fn unary(input: &str) -> ParseResult<MatchExpr> {
    alt((
        map(preceded(pair(char('!'), multispace0), unary), |inner| {
            MatchExpr::Not(Box::new(inner))
        }),
        map(preceded(pair(word("typeof"), multispace0), unary), |inner| {
            MatchExpr::TypeOf(Box::new(inner))
        }),
        postfix,
    ))(input)
}

enum Access {
    Property(String),
    Index(MatchExpr),
}

fn postfix(input: &str) -> ParseResult<MatchExpr> {
    let (input, target) = atom(input)?;
    let (input, accesses) = many0(alt((
        map(preceded(char('.'), identifier), |name| {
            Access::Property(name.to_string())
        }),
        map(
            delimited(char('['), ws(conditional), char(']')),
            Access::Index,
        ),
    )))(input)?;
    Ok((
        input,
        accesses.into_iter().fold(target, |acc, access| match access {
            Access::Property(name) => MatchExpr::Property(Box::new(acc), name),
            Access::Index(key) => MatchExpr::Index(Box::new(acc), Box::new(key)),
        }),
    ))
}

fn atom(input: &str) -> ParseResult<MatchExpr> {
    context(
        "atom",
        alt((
            value(MatchExpr::Actual, word("actual")),
            value(MatchExpr::Expected, word("expected")),
            map(literal, MatchExpr::Literal),
            map_res(identifier, |name: &str| {
                TypeName::from_str(name).map(|t| MatchExpr::Literal(Value::Type(t)))
            }),
            delimited(pair(char('('), multispace0), conditional, pair(multispace0, char(')'))),
        )),
    )(input)
}

fn literal(input: &str) -> ParseResult<Value> {
    alt((
        map(single_quoted, Value::from),
        map(double_quoted, Value::from),
        map(
            nom::number::complete::recognize_float,
            |text: &str| Value::Number(text.parse().unwrap_or(f64::NAN)),
        ),
        value(Value::Bool(true), word("true")),
        value(Value::Bool(false), word("false")),
        value(Value::Null, word("null")),
        value(Value::Undefined, word("undefined")),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn eval(source: &str, actual: Value, expected: Value) -> Value {
        MatchExpr::parse(source).unwrap().evaluate(&actual, &expected)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            MatchExpr::parse("typeof actual == expected").unwrap(),
            MatchExpr::Compare(
                Operator::Equal,
                Box::new(MatchExpr::TypeOf(Box::new(MatchExpr::Actual))),
                Box::new(MatchExpr::Expected)
            )
        );
        assert_eq!(
            MatchExpr::parse("!actual || actual && expected").unwrap(),
            MatchExpr::Or(
                Box::new(MatchExpr::Not(Box::new(MatchExpr::Actual))),
                Box::new(MatchExpr::And(
                    Box::new(MatchExpr::Actual),
                    Box::new(MatchExpr::Expected)
                ))
            )
        );
    }

    #[test]
    fn test_evaluation() {
        let list = Value::list(vec![Value::from(1), Value::from(2)]);
        assert_eq!(
            eval("actual.length == expected", list.clone(), Value::from(2)),
            Value::Bool(true)
        );
        assert_eq!(
            eval("actual.constructor == expected", list, Value::Type(TypeName::Array)),
            Value::Bool(true)
        );
        assert_eq!(
            eval("typeof actual == 'string' ? 1 : 2", Value::from("s"), Value::Undefined),
            Value::from(1)
        );
        assert_eq!(
            eval("actual.constructor === Number", Value::from(3), Value::Undefined),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_index_access() {
        let object = Value::object([("size", Value::from(4))]);
        assert_eq!(
            eval("actual[expected] > 3", object, Value::from("size")),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_free_variables_are_rejected() {
        let err = MatchExpr::parse("actual == window.location").unwrap_err();
        assert!(matches!(err, MatcherError::InvalidDefinition { .. }));
        assert!(MatchExpr::parse("actual()").is_err());
    }
}
