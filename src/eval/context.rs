use std::collections::HashMap;

use super::{value::Value, EvalError};
use crate::{
    assertion::{AssertionBuilder, AssertionEngine},
    ast::{HookKind, Spec},
};

/// Bindings shared by the hooks and specs of one suite run.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// What is being executed.
#[derive(Debug)]
pub enum Phase<'a> {
    Hook(HookKind),
    Spec(&'a mut Spec),
}

/// Everything a body needs while it runs. Handed to the executor explicitly for
/// every hook and spec invocation.
pub struct ExecutionContext<'a> {
    suite: &'a str,
    phase: Phase<'a>,
    engine: &'a mut AssertionEngine,
    scope: &'a mut Scope,
}

impl<'a> ExecutionContext<'a> {
    pub fn for_hook(
        suite: &'a str,
        hook: HookKind,
        engine: &'a mut AssertionEngine,
        scope: &'a mut Scope,
    ) -> Self {
        Self {
            suite,
            phase: Phase::Hook(hook),
            engine,
            scope,
        }
    }

    pub fn for_spec(
        suite: &'a str,
        spec: &'a mut Spec,
        engine: &'a mut AssertionEngine,
        scope: &'a mut Scope,
    ) -> Self {
        Self {
            suite,
            phase: Phase::Spec(spec),
            engine,
            scope,
        }
    }

    pub fn suite(&self) -> &str {
        self.suite
    }

    pub fn hook(&self) -> Option<HookKind> {
        match self.phase {
            Phase::Hook(kind) => Some(kind),
            Phase::Spec(_) => None,
        }
    }

    pub fn spec(&self) -> Option<&Spec> {
        match &self.phase {
            Phase::Spec(spec) => Some(&**spec),
            Phase::Hook(_) => None,
        }
    }

    pub fn scope(&self) -> &Scope {
        self.scope
    }

    pub fn scope_mut(&mut self) -> &mut Scope {
        self.scope
    }

    /// Starts an assertion on `actual` against the spec being executed. Hooks own
    /// no spec, so asserting from one is an error.
    pub fn expect(&mut self, actual: Value) -> Result<AssertionBuilder<'_>, EvalError> {
        match &mut self.phase {
            Phase::Spec(spec) => Ok(AssertionBuilder::new(&mut *self.engine, spec, actual)),
            Phase::Hook(kind) => Err(EvalError::AssertionOutsideSpec(kind.to_string())),
        }
    }
}

/// The execution capability the runner drives: runs one body against a context.
pub trait BodyExecutor {
    fn execute(&mut self, body: &str, ctx: &mut ExecutionContext<'_>) -> Result<(), EvalError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatcherRegistry;

    #[test]
    fn test_hooks_cannot_assert() {
        let mut engine = AssertionEngine::new(MatcherRegistry::with_builtins());
        let mut scope = Scope::new();
        let mut ctx = ExecutionContext::for_hook("math", HookKind::BeforeEach, &mut engine, &mut scope);

        let err = ctx.expect(Value::from(1)).err().unwrap();
        assert_eq!(err, EvalError::AssertionOutsideSpec("before_each".to_string()));
    }

    #[test]
    fn test_assertions_land_on_the_running_spec() {
        let mut engine = AssertionEngine::new(MatcherRegistry::with_builtins());
        let mut scope = Scope::new();
        let mut spec = Spec::new("adds", "");

        {
            let mut ctx = ExecutionContext::for_spec("math", &mut spec, &mut engine, &mut scope);
            ctx.scope_mut().set("x", Value::from(2));
            let x = ctx.scope().get("x").cloned().unwrap();
            assert!(ctx.expect(x).unwrap().should("eql", Value::from(2)).unwrap());
            assert_eq!(ctx.spec().map(|s| s.assertions().len()), Some(1));
        }

        assert!(spec.passed());
        assert_eq!(engine.stats().passes, 1);
    }
}
