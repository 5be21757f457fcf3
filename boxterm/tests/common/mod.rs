#![allow(dead_code)]

use boxterm::runtime::stdlib::load_stdlib;
use boxterm::{Environment, Interpreter, ModuleRegistry, RuntimeResult, Term};

pub fn create_test_interpreter(registry: ModuleRegistry) -> Interpreter {
    Interpreter::new(registry)
}

pub fn create_stdlib_interpreter() -> Interpreter {
    let mut registry = ModuleRegistry::new();
    load_stdlib(&mut registry);
    Interpreter::new(registry)
}

pub fn var(name: &str) -> Term {
    Term::variable_pattern(name)
}

pub fn int(value: i64) -> Term {
    Term::integer(value)
}

pub fn ints(values: &[i64]) -> Term {
    Term::list(values.iter().map(|v| Term::integer(*v)).collect())
}

/// Reads a bound variable inside a clause body or guard.
pub fn bound(scope: &Environment, name: &str) -> RuntimeResult<Term> {
    scope.fetch(name).cloned()
}
