// Clause dispatch for named functions, anonymous functions, case, cond and if

use crate::config::RuntimeConfig;
use crate::runtime::environment::Environment;
use crate::runtime::equality::NumericComparison;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::module_runtime::{FunctionEntry, FunctionHandle, ModuleRegistry};
use crate::runtime::pattern::{try_match_args, MatchOutcome};
use crate::runtime::values::{BodyFn, Clause, GuardFn, Term};
use std::sync::Arc;
use tracing::{debug, trace};

/// One `cond` branch: the body runs when the condition is truthy.
#[derive(Clone)]
pub struct CondClause {
    pub condition: GuardFn,
    pub body: BodyFn,
}

impl CondClause {
    pub fn new<C, B>(condition: C, body: B) -> Self
    where
        C: Fn(&Interpreter, &Environment) -> RuntimeResult<Term> + Send + Sync + 'static,
        B: Fn(&Interpreter, &mut Environment) -> RuntimeResult<Term> + Send + Sync + 'static,
    {
        CondClause {
            condition: Arc::new(condition),
            body: Arc::new(body),
        }
    }
}

/// Evaluates calls against a registry that no longer changes.
#[derive(Debug, Clone)]
pub struct Interpreter {
    registry: Arc<ModuleRegistry>,
    config: RuntimeConfig,
}

impl Interpreter {
    pub fn new(registry: ModuleRegistry) -> Self {
        Interpreter::with_config(registry, RuntimeConfig::default())
    }

    pub fn with_config(registry: ModuleRegistry, config: RuntimeConfig) -> Self {
        registry.log_summary();
        Interpreter {
            registry: Arc::new(registry),
            config,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn numeric_comparison(&self) -> NumericComparison {
        self.config.numeric_comparison
    }

    /// Calls `module.name/args.len()`.
    pub fn invoke(&self, module: &str, name: &str, args: &[Term]) -> RuntimeResult<Term> {
        let entry = self
            .registry
            .lookup(module, name, args.len())
            .ok_or_else(|| RuntimeError::UndefinedFunctionError {
                module: module.to_string(),
                function: name.to_string(),
                arity: args.len(),
            })?;

        match entry {
            FunctionEntry::Native(native) => (native.func)(self, args),
            FunctionEntry::Clauses(clauses) => {
                match self.select_clause(clauses, args, &Environment::new()) {
                    Some((clause, mut scope)) => (clause.body)(self, &mut scope),
                    None => {
                        debug!(
                            "No clause of {}.{}/{} matched",
                            module,
                            name,
                            args.len()
                        );
                        Err(RuntimeError::function_clause(module, name, args))
                    }
                }
            }
        }
    }

    pub fn call(&self, handle: &FunctionHandle, args: &[Term]) -> RuntimeResult<Term> {
        self.invoke(handle.module(), handle.name(), args)
    }

    pub fn call_anonymous_function(&self, fun: &Term, args: &[Term]) -> RuntimeResult<Term> {
        let Term::AnonymousFunction(fun) = fun else {
            return Err(RuntimeError::BadFunctionError(fun.clone()));
        };
        match self.select_clause(&fun.clauses, args, &fun.captured) {
            Some((clause, mut scope)) => (clause.body)(self, &mut scope),
            None => Err(RuntimeError::FunctionClauseError {
                function: format!("anonymous fn/{}", fun.arity),
                args: args.to_vec(),
            }),
        }
    }

    /// Matches `subject` against single-pattern clauses. Bindings made inside
    /// the chosen clause stay local to it.
    pub fn case_expression(
        &self,
        subject: &Term,
        clauses: &[Clause],
        scope: &Environment,
    ) -> RuntimeResult<Term> {
        let args = std::slice::from_ref(subject);
        match self.select_clause(clauses, args, scope) {
            Some((clause, mut clause_scope)) => (clause.body)(self, &mut clause_scope),
            None => Err(RuntimeError::CaseClauseError(subject.clone())),
        }
    }

    pub fn cond_expression(
        &self,
        clauses: &[CondClause],
        scope: &Environment,
    ) -> RuntimeResult<Term> {
        for clause in clauses {
            if (clause.condition)(self, scope)?.is_truthy() {
                let mut clause_scope = scope.clone();
                return (clause.body)(self, &mut clause_scope);
            }
        }
        Err(RuntimeError::CondClauseError)
    }

    pub fn if_expression<C, D, E>(&self, condition: C, do_branch: D, else_branch: E) -> RuntimeResult<Term>
    where
        C: FnOnce() -> RuntimeResult<Term>,
        D: FnOnce() -> RuntimeResult<Term>,
        E: FnOnce() -> RuntimeResult<Term>,
    {
        if condition()?.is_truthy() {
            do_branch()
        } else {
            else_branch()
        }
    }

    /// Finds the first clause whose parameters match `args` and whose guard
    /// passes, returning it with the scope its match produced.
    fn select_clause<'c>(
        &self,
        clauses: &'c [Clause],
        args: &[Term],
        scope: &Environment,
    ) -> Option<(&'c Clause, Environment)> {
        for (index, clause) in clauses.iter().enumerate() {
            let MatchOutcome::Matched(clause_scope) = try_match_args(&clause.params, args, scope)
            else {
                trace!("Clause {} did not match", index);
                continue;
            };
            if self.guard_passes(clause, &clause_scope) {
                trace!("Clause {} selected", index);
                return Some((clause, clause_scope));
            }
            trace!("Clause {} rejected by guard", index);
        }
        None
    }

    fn guard_passes(&self, clause: &Clause, scope: &Environment) -> bool {
        match &clause.guard {
            None => true,
            Some(guard) => match guard(self, scope) {
                Ok(result) => result.is_true(),
                // A raising guard is a failing guard.
                Err(err) => {
                    trace!("Guard raised {}", err);
                    false
                }
            },
        }
    }
}
