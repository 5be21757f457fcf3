// Binding scope for variable lookups during matching and clause evaluation

use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::Term;
use std::collections::HashMap;

/// A flat variable scope. Clause attempts clone it, so a failed attempt never
/// leaks bindings into the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    bindings: HashMap<String, Term>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            bindings: HashMap::new(),
        }
    }

    pub fn from_bindings<I>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (String, Term)>,
    {
        Environment {
            bindings: bindings.into_iter().collect(),
        }
    }

    /// Defines a new variable or rebinds an existing one.
    pub fn define(&mut self, name: &str, value: Term) {
        self.bindings.insert(name.to_string(), value);
    }

    pub fn lookup(&self, name: &str) -> Option<Term> {
        self.bindings.get(name).cloned()
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.bindings.get(name)
    }

    /// Like `get`, but an unbound name is an interpreter error.
    pub fn fetch(&self, name: &str) -> RuntimeResult<&Term> {
        self.bindings
            .get(name)
            .ok_or_else(|| RuntimeError::InterpreterError(format!("undefined variable \"{}\"", name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Copies every binding of `other` into this scope, overwriting on conflict.
    pub fn merge(&mut self, other: &Environment) {
        for (name, value) in &other.bindings {
            self.bindings.insert(name.clone(), value.clone());
        }
    }

    pub fn symbol_names(&self) -> Vec<String> {
        let mut names = self.bindings.keys().cloned().collect::<Vec<_>>();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
