// Module Runtime - registry of named functions for boxterm
// Filled during an initialization phase, then owned read-only by the interpreter

use crate::runtime::error::{format_mfa, RuntimeError, RuntimeResult};
use crate::runtime::interpreter::Interpreter;
use crate::runtime::values::{Clause, Term};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

pub type NativeFn = Arc<dyn Fn(&Interpreter, &[Term]) -> RuntimeResult<Term> + Send + Sync>;

/// Host-implemented function, the same shape as a ported library function.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<native-function {}/{}>", self.name, self.arity)
    }
}

#[derive(Debug, Clone)]
pub enum FunctionEntry {
    /// Compiled clauses, tried in declaration order
    Clauses(Vec<Clause>),
    Native(NativeFunction),
}

/// Capability returned by registration; calling through it skips the name lookup
/// of the module but still resolves against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionHandle {
    module: String,
    name: String,
    arity: usize,
}

impl FunctionHandle {
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Display for FunctionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_mfa(&self.module, &self.name, self.arity))
    }
}

#[derive(Debug, Default)]
struct ModuleDefinition {
    // function name -> arity -> entry
    functions: HashMap<String, HashMap<usize, FunctionEntry>>,
}

/// Module registry that holds every named function
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, ModuleDefinition>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        ModuleRegistry {
            modules: HashMap::new(),
        }
    }

    /// Registers compiled clauses for `module.name/arity`. Registering the same
    /// function again appends the clauses after the existing ones.
    pub fn register(
        &mut self,
        module: &str,
        name: &str,
        arity: usize,
        clauses: Vec<Clause>,
    ) -> RuntimeResult<FunctionHandle> {
        if let Some(clause) = clauses.iter().find(|clause| clause.arity() != arity) {
            return Err(RuntimeError::InterpreterError(format!(
                "clause with {} parameters registered for {}",
                clause.arity(),
                format_mfa(module, name, arity)
            )));
        }

        let count = clauses.len();
        let arities = self
            .modules
            .entry(module.to_string())
            .or_default()
            .functions
            .entry(name.to_string())
            .or_default();
        match arities.get_mut(&arity) {
            Some(FunctionEntry::Clauses(existing)) => existing.extend(clauses),
            Some(FunctionEntry::Native(_)) => {
                return Err(RuntimeError::InterpreterError(format!(
                    "{} is already defined as a native function",
                    format_mfa(module, name, arity)
                )))
            }
            None => {
                arities.insert(arity, FunctionEntry::Clauses(clauses));
            }
        }

        debug!("Registered {} clause(s) for {}", count, format_mfa(module, name, arity));
        Ok(self.handle(module, name, arity))
    }

    /// Registers a host function, replacing any earlier entry with the same arity.
    pub fn register_native<F>(
        &mut self,
        module: &str,
        name: &str,
        arity: usize,
        func: F,
    ) -> FunctionHandle
    where
        F: Fn(&Interpreter, &[Term]) -> RuntimeResult<Term> + Send + Sync + 'static,
    {
        let native = NativeFunction {
            name: name.to_string(),
            arity,
            func: Arc::new(func),
        };
        self.modules
            .entry(module.to_string())
            .or_default()
            .functions
            .entry(name.to_string())
            .or_default()
            .insert(arity, FunctionEntry::Native(native));
        debug!("Registered native {}", format_mfa(module, name, arity));
        self.handle(module, name, arity)
    }

    pub fn lookup(&self, module: &str, name: &str, arity: usize) -> Option<&FunctionEntry> {
        self.modules.get(module)?.functions.get(name)?.get(&arity)
    }

    /// Handle for an already registered function.
    pub fn handle_for(&self, module: &str, name: &str, arity: usize) -> Option<FunctionHandle> {
        self.lookup(module, name, arity)
            .map(|_| self.handle(module, name, arity))
    }

    /// Registered arities of `module.name`, ascending.
    pub fn arities(&self, module: &str, name: &str) -> Vec<usize> {
        let mut arities: Vec<usize> = self
            .modules
            .get(module)
            .and_then(|m| m.functions.get(name))
            .map(|a| a.keys().copied().collect())
            .unwrap_or_default();
        arities.sort_unstable();
        arities
    }

    pub fn has_module(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn function_count(&self) -> usize {
        self.modules
            .values()
            .map(|m| m.functions.values().map(HashMap::len).sum::<usize>())
            .sum()
    }

    /// Logs a summary once initialization is complete.
    pub fn log_summary(&self) {
        info!(
            "Module registry ready: {} modules, {} functions",
            self.modules.len(),
            self.function_count()
        );
    }

    fn handle(&self, module: &str, name: &str, arity: usize) -> FunctionHandle {
        FunctionHandle {
            module: module.to_string(),
            name: name.to_string(),
            arity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_clause(params: Vec<Term>, result: Term) -> Clause {
        Clause::new(params, move |_, _| Ok(result.clone()))
    }

    #[test]
    fn register_rejects_arity_mismatch() {
        let mut registry = ModuleRegistry::new();
        let result = registry.register(
            "Elixir.Aaa",
            "bbb",
            2,
            vec![constant_clause(vec![Term::match_placeholder()], Term::nil())],
        );
        assert!(matches!(result, Err(RuntimeError::InterpreterError(_))));
        assert!(!registry.has_module("Elixir.Aaa"));
    }

    #[test]
    fn repeated_registration_appends() {
        let mut registry = ModuleRegistry::new();
        registry
            .register("Elixir.Aaa", "bbb", 0, vec![constant_clause(vec![], Term::integer(1))])
            .unwrap();
        let handle = registry
            .register("Elixir.Aaa", "bbb", 0, vec![constant_clause(vec![], Term::integer(2))])
            .unwrap();
        assert_eq!(handle.to_string(), "Aaa.bbb/0");
        match registry.lookup("Elixir.Aaa", "bbb", 0) {
            Some(FunctionEntry::Clauses(clauses)) => assert_eq!(clauses.len(), 2),
            other => panic!("Expected clauses, got {:?}", other),
        }
    }

    #[test]
    fn arities_are_tracked_per_name() {
        let mut registry = ModuleRegistry::new();
        registry.register_native("lists", "foo", 2, |_, _| Ok(Term::nil()));
        registry.register_native("lists", "foo", 1, |_, _| Ok(Term::nil()));
        assert_eq!(registry.arities("lists", "foo"), vec![1, 2]);
        assert!(registry.handle_for("lists", "foo", 3).is_none());
        assert_eq!(registry.function_count(), 2);
    }
}
