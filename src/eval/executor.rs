use std::rc::Rc;

use tracing::debug;

use super::{
    context::{BodyExecutor, ExecutionContext, Scope},
    expression::Expr,
    statement::{parse_body, Statement},
    value::{Callable, TypeName, Value},
    EvalError,
};
use crate::preprocessor::{BodyPreprocessor, Preprocessor};

/// Name resolution and assertion sink seen by a running body.
trait Environment {
    fn lookup(&self, name: &str) -> Option<Value>;
    fn bind(&mut self, name: &str, value: Value);
    fn assert(
        &mut self,
        actual: Value,
        matcher: &str,
        expected: Value,
        negate: bool,
    ) -> Result<Value, EvalError>;
    fn snapshot(&self) -> Scope;
}

impl Environment for ExecutionContext<'_> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.scope().get(name).cloned()
    }

    fn bind(&mut self, name: &str, value: Value) {
        self.scope_mut().set(name, value);
    }

    fn assert(
        &mut self,
        actual: Value,
        matcher: &str,
        expected: Value,
        negate: bool,
    ) -> Result<Value, EvalError> {
        let builder = self.expect(actual)?;
        let passed = if negate {
            builder.should_not(matcher, expected)?
        } else {
            builder.should(matcher, expected)?
        };
        Ok(Value::Bool(passed))
    }

    fn snapshot(&self) -> Scope {
        self.scope().clone()
    }
}

/// Environment of a callable: a private copy of the scope it was created in, with
/// no spec to assert against.
struct Detached {
    scope: Scope,
}

impl Environment for Detached {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.scope.get(name).cloned()
    }

    fn bind(&mut self, name: &str, value: Value) {
        self.scope.set(name, value);
    }

    fn assert(&mut self, _: Value, _: &str, _: Value, _: bool) -> Result<Value, EvalError> {
        Err(EvalError::AssertionInCallable)
    }

    fn snapshot(&self) -> Scope {
        self.scope.clone()
    }
}

/// Default [`BodyExecutor`]: rewrites short-form assertions, parses the body and
/// runs its statements against the context.
#[derive(Debug, Default)]
pub struct Interpreter {
    preprocessor: BodyPreprocessor,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BodyExecutor for Interpreter {
    #[tracing::instrument(level = "debug", skip_all, fields(suite = ctx.suite()))]
    fn execute(&mut self, body: &str, ctx: &mut ExecutionContext<'_>) -> Result<(), EvalError> {
        let source = self.preprocessor.process(body);
        let statements = parse_body(&source)?;
        debug!("executing {} statements", statements.len());
        exec_statements(&statements, ctx)?;
        Ok(())
    }
}

fn exec_statements(statements: &[Statement], env: &mut dyn Environment) -> Result<Value, EvalError> {
    let mut last = Value::Undefined;
    for statement in statements {
        last = match statement {
            Statement::Let { name, value } => {
                let value = eval_expr(value, env)?;
                env.bind(name, value);
                Value::Undefined
            }
            Statement::Raise(expr) => {
                let value = eval_expr(expr, env)?;
                return Err(EvalError::Raised(value.stringify()));
            }
            Statement::Expr(expr) => eval_expr(expr, env)?,
        };
    }
    Ok(last)
}

fn eval_expr(expr: &Expr, env: &mut dyn Environment) -> Result<Value, EvalError> {
    let value = match expr {
        Expr::Undefined => Value::Undefined,
        Expr::Null => Value::Null,
        Expr::Bool(b) => Value::Bool(*b),
        Expr::Number(n) => Value::Number(*n),
        Expr::Str(s) => Value::String(s.clone()),
        Expr::List(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(eval_expr(item, env)?);
            }
            Value::list(values)
        }
        Expr::Object(fields) => {
            let mut values = Vec::with_capacity(fields.len());
            for (key, field) in fields {
                values.push((key.clone(), eval_expr(field, env)?));
            }
            Value::object(values)
        }
        Expr::Boxed(inner) => Value::boxed(eval_expr(inner, env)?),
        Expr::Ident(name) => env
            .lookup(name)
            .or_else(|| name.parse::<TypeName>().ok().map(Value::Type))
            .ok_or_else(|| EvalError::UnknownIdentifier(name.clone()))?,
        Expr::Callable { source, body } => callable(source, Rc::clone(body), env.snapshot()),
        Expr::Property(target, name) => eval_expr(target, env)?.property(name),
        Expr::Call(target) => match eval_expr(target, env)? {
            Value::Callable(callable) => callable.call()?,
            other => return Err(EvalError::NotCallable(other.stringify())),
        },
        Expr::Assert {
            actual,
            matcher,
            negate,
            expected,
        } => {
            let actual = eval_expr(actual, env)?;
            let expected = match expected {
                Some(expected) => eval_expr(expected, env)?,
                None => Value::Undefined,
            };
            env.assert(actual, matcher, expected, *negate)?
        }
    };
    Ok(value)
}

fn callable(source: &str, body: Rc<Vec<Statement>>, scope: Scope) -> Value {
    Value::Callable(Callable::new(source, move || {
        let mut env = Detached {
            scope: scope.clone(),
        };
        exec_statements(&body, &mut env)
    }))
}
