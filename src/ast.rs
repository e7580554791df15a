use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::assertion::Assertion;

// Suite registry, keyed by description in declaration order
#[derive(Debug, Clone, Default)]
pub struct SuiteRegistry {
    suites: IndexMap<String, Suite>,
}

impl SuiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the suite registered under `description`, creating it the first time
    /// the description is seen.
    pub fn get_or_insert(&mut self, description: &str) -> &mut Suite {
        self.suites
            .entry(description.to_string())
            .or_insert_with(|| Suite::new(description))
    }

    pub fn get(&self, description: &str) -> Option<&Suite> {
        self.suites.get(description)
    }

    pub fn get_mut(&mut self, description: &str) -> Option<&mut Suite> {
        self.suites.get_mut(description)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Suite> {
        self.suites.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Suite> {
        self.suites.values_mut()
    }

    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.suites.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// Folds `other` into this registry. Suites that already exist keep their
    /// position, receive the new specs and have their hooks overridden.
    pub fn merge(&mut self, other: SuiteRegistry) {
        for (description, suite) in other.suites {
            self.get_or_insert(&description).absorb(suite);
        }
    }
}

// Lifecycle hook names
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    Before,
    After,
    BeforeEach,
    AfterEach,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suite {
    pub description: String,
    specs: Vec<Spec>,
    hooks: IndexMap<HookKind, String>,
    pub ran: bool,
}

impl Suite {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            specs: Vec::new(),
            hooks: IndexMap::new(),
            ran: false,
        }
    }

    pub fn add_spec(&mut self, mut spec: Spec) {
        spec.suite = self.description.clone();
        self.specs.push(spec);
    }

    pub fn specs(&self) -> &[Spec] {
        &self.specs
    }

    pub fn specs_mut(&mut self) -> &mut [Spec] {
        &mut self.specs
    }

    /// Stores a hook body. A later registration for the same hook wins.
    pub fn set_hook(&mut self, kind: HookKind, body: impl Into<String>) {
        self.hooks.insert(kind, body.into());
    }

    pub fn hook(&self, kind: HookKind) -> Option<&str> {
        self.hooks.get(&kind).map(String::as_str)
    }

    pub fn hooks(&self) -> &IndexMap<HookKind, String> {
        &self.hooks
    }

    fn absorb(&mut self, other: Suite) {
        for spec in other.specs {
            self.add_spec(spec);
        }
        for (kind, body) in other.hooks {
            self.set_hook(kind, body);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spec {
    pub description: String,
    pub body: String,
    /// Description of the owning suite.
    pub suite: String,
    assertions: Vec<Assertion>,
}

impl Spec {
    pub fn new(description: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            body: body.into(),
            suite: String::new(),
            assertions: Vec::new(),
        }
    }

    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }

    pub(crate) fn record(&mut self, assertion: Assertion) {
        self.assertions.push(assertion);
    }

    /// First failing assertion, in execution order.
    pub fn failure(&self) -> Option<&Assertion> {
        self.assertions.iter().find(|a| !a.passed())
    }

    pub fn passed(&self) -> bool {
        !self.requires_implementation() && self.failure().is_none()
    }

    /// A spec without assertions is pending.
    pub fn requires_implementation(&self) -> bool {
        self.assertions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_keeps_declaration_order() {
        let mut registry = SuiteRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.get_or_insert(name);
        }
        assert_eq!(
            registry.descriptions().collect::<Vec<_>>(),
            vec!["zeta", "alpha", "mid"]
        );
    }

    #[test]
    fn test_merge_appends_specs_and_overrides_hooks() {
        let mut registry = SuiteRegistry::new();
        let suite = registry.get_or_insert("math");
        suite.add_spec(Spec::new("adds", "1"));
        suite.set_hook(HookKind::Before, "old");

        let mut other = SuiteRegistry::new();
        let suite = other.get_or_insert("math");
        suite.add_spec(Spec::new("subtracts", "2"));
        suite.set_hook(HookKind::Before, "new");
        other.get_or_insert("strings");

        registry.merge(other);

        let math = registry.get("math").unwrap();
        assert_eq!(math.specs().len(), 2);
        assert_eq!(math.specs()[1].suite, "math");
        assert_eq!(math.hook(HookKind::Before), Some("new"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_spec_without_assertions_is_pending_not_failing() {
        let spec = Spec::new("todo", "");
        assert!(spec.requires_implementation());
        assert!(spec.failure().is_none());
        assert!(!spec.passed());
    }
}
