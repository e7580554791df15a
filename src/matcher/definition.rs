use std::{fmt, rc::Rc, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;

use super::{expression::MatchExpr, MatcherError};
use crate::eval::Value;

/// `match(expected, actual)`
pub type MatchFn = Rc<dyn Fn(&Value, &Value) -> bool>;
/// `message(expected, actual, negate)`
pub type MessageFn = Rc<dyn Fn(&Value, &Value, bool) -> String>;

/// Comparison operators usable as a matcher shorthand (`actual <op> expected`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display, strum::EnumIter)]
pub enum Operator {
    #[strum(serialize = "===")]
    StrictEqual,
    #[strum(serialize = "!==")]
    StrictNotEqual,
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = "!=")]
    NotEqual,
    #[strum(serialize = ">=")]
    GreaterOrEqual,
    #[strum(serialize = "<=")]
    LessOrEqual,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = "<")]
    Less,
}

impl Operator {
    pub fn apply(self, left: &Value, right: &Value) -> bool {
        use std::cmp::Ordering::*;

        match self {
            Operator::StrictEqual => left.strict_eq(right),
            Operator::StrictNotEqual => !left.strict_eq(right),
            Operator::Equal => left.loose_eq(right),
            Operator::NotEqual => !left.loose_eq(right),
            Operator::GreaterOrEqual => matches!(left.compare(right), Some(Greater | Equal)),
            Operator::LessOrEqual => matches!(left.compare(right), Some(Less | Equal)),
            Operator::Greater => left.compare(right) == Some(Greater),
            Operator::Less => left.compare(right) == Some(Less),
        }
    }
}

/// A matcher as registered. Aliases are chased by the registry; everything else
/// is a [`Rule`] that can be evaluated directly.
#[derive(Clone)]
pub enum MatcherDefinition {
    Alias(String),
    Rule(Rule),
}

#[derive(Clone)]
pub enum Rule {
    Operator(Operator),
    /// A boolean expression over `actual` and `expected`.
    Expression { source: String, expr: MatchExpr },
    Predicate {
        matcher: MatchFn,
        message: Option<MessageFn>,
    },
}

lazy_static! {
    static ref ALIAS: Regex = Regex::new(r"^alias (\w+)").expect("valid alias pattern");
}

impl MatcherDefinition {
    /// Parses the string form of a definition: `alias <name>`, an operator
    /// (anything shorter than four characters) or a boolean expression.
    pub fn parse(source: &str) -> Result<Self, MatcherError> {
        let source = source.trim();
        if let Some(caps) = ALIAS.captures(source) {
            return Ok(MatcherDefinition::Alias(caps[1].to_string()));
        }
        if source.len() < 4 {
            return Operator::from_str(source)
                .map(|op| MatcherDefinition::Rule(Rule::Operator(op)))
                .map_err(|_| MatcherError::InvalidDefinition {
                    definition: source.to_string(),
                    reason: "unknown operator".to_string(),
                });
        }
        let expr = MatchExpr::parse(source)?;
        Ok(MatcherDefinition::Rule(Rule::Expression {
            source: source.to_string(),
            expr,
        }))
    }

    pub fn alias(target: impl Into<String>) -> Self {
        MatcherDefinition::Alias(target.into())
    }

    pub fn operator(op: Operator) -> Self {
        MatcherDefinition::Rule(Rule::Operator(op))
    }

    pub fn predicate<F>(matcher: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + 'static,
    {
        MatcherDefinition::Rule(Rule::Predicate {
            matcher: Rc::new(matcher),
            message: None,
        })
    }

    /// Attaches a message formatter. Only predicates carry one; other forms are
    /// returned unchanged.
    pub fn with_message<F>(self, message: F) -> Self
    where
        F: Fn(&Value, &Value, bool) -> String + 'static,
    {
        match self {
            MatcherDefinition::Rule(Rule::Predicate { matcher, .. }) => {
                MatcherDefinition::Rule(Rule::Predicate {
                    matcher,
                    message: Some(Rc::new(message)),
                })
            }
            other => other,
        }
    }
}

impl Rule {
    /// Runs the rule with the engine's argument order.
    pub fn matches(&self, expected: &Value, actual: &Value) -> bool {
        match self {
            Rule::Operator(op) => op.apply(actual, expected),
            Rule::Expression { expr, .. } => expr.evaluate(actual, expected).is_truthy(),
            Rule::Predicate { matcher, .. } => matcher(expected, actual),
        }
    }

    pub fn message(&self, expected: &Value, actual: &Value, negate: bool) -> Option<String> {
        match self {
            Rule::Predicate {
                message: Some(message),
                ..
            } => Some(message(expected, actual, negate)),
            _ => None,
        }
    }
}

impl fmt::Debug for MatcherDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatcherDefinition::Alias(target) => write!(f, "Alias({})", target),
            MatcherDefinition::Rule(rule) => write!(f, "{:?}", rule),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Operator(op) => write!(f, "Operator({})", op),
            Rule::Expression { source, .. } => write!(f, "Expression({})", source),
            Rule::Predicate { message, .. } => {
                write!(f, "Predicate(message: {})", message.is_some())
            }
        }
    }
}
