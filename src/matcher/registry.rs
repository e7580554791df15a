use indexmap::IndexMap;
use tracing::debug;

use super::{
    builtin,
    definition::{MatcherDefinition, Rule},
    MatcherError,
};

/// Matcher definitions by name, in registration order.
#[derive(Debug, Clone, Default)]
pub struct MatcherRegistry {
    definitions: IndexMap<String, MatcherDefinition>,
}

impl MatcherRegistry {
    /// An empty registry, without the built-in matchers.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::install(&mut registry);
        registry
    }

    /// Registers `definition` under `name`, replacing any earlier definition.
    /// An alias that would close a cycle is rejected and leaves the registry as it was.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn register(&mut self, name: &str, definition: MatcherDefinition) -> Result<(), MatcherError> {
        if let MatcherDefinition::Alias(target) = &definition {
            self.check_alias(name, target)?;
        }
        self.insert(name, definition);
        Ok(())
    }

    /// Registers a definition given in its string form (see [`MatcherDefinition::parse`]).
    pub fn register_source(&mut self, name: &str, source: &str) -> Result<(), MatcherError> {
        let definition = MatcherDefinition::parse(source)?;
        self.register(name, definition)
    }

    /// Registers several string definitions in order, stopping at the first bad one.
    pub fn extend<I, K, V>(&mut self, matchers: I) -> Result<(), MatcherError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, source) in matchers {
            self.register_source(name.as_ref(), source.as_ref())?;
        }
        Ok(())
    }

    pub(super) fn insert(&mut self, name: &str, definition: MatcherDefinition) {
        if self
            .definitions
            .insert(name.to_string(), definition)
            .is_some()
        {
            debug!("matcher '{}' overridden", name);
        }
    }

    fn check_alias(&self, name: &str, target: &str) -> Result<(), MatcherError> {
        let mut chain = vec![name.to_string()];
        let mut current = target.to_string();
        loop {
            let closes_cycle = chain.contains(&current);
            chain.push(current.clone());
            if closes_cycle {
                return Err(MatcherError::AliasCycle { chain });
            }
            match self.definitions.get(&current) {
                Some(MatcherDefinition::Alias(next)) => current = next.clone(),
                _ => return Ok(()),
            }
        }
    }

    /// Follows aliases until a rule is reached.
    pub fn resolve(&self, name: &str) -> Result<&Rule, MatcherError> {
        let mut seen: Vec<&str> = Vec::new();
        let mut current = name;
        loop {
            if seen.contains(&current) {
                let mut chain: Vec<String> = seen.iter().map(|s| s.to_string()).collect();
                chain.push(current.to_string());
                return Err(MatcherError::AliasCycle { chain });
            }
            seen.push(current);
            match self.definitions.get(current) {
                Some(MatcherDefinition::Rule(rule)) => return Ok(rule),
                Some(MatcherDefinition::Alias(target)) => current = target,
                None => return Err(MatcherError::UnknownMatcher(current.to_string())),
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&MatcherDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
