// Comprehension engine: generators, filters and collectable sinks

use crate::runtime::bitstring::Bitstring;
use crate::runtime::environment::Environment;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::inspect::inspect;
use crate::runtime::interpreter::Interpreter;
use crate::runtime::pattern::{try_match, MatchOutcome};
use crate::runtime::term_map::TermMap;
use crate::runtime::values::{GuardFn, Term};
use itertools::Itertools;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// `pattern <- enumerable when guard`
#[derive(Clone)]
pub struct Generator {
    pub enumerable: Term,
    pub pattern: Term,
    pub guard: Option<GuardFn>,
}

impl Generator {
    pub fn new(pattern: Term, enumerable: Term) -> Self {
        Generator {
            enumerable,
            pattern,
            guard: None,
        }
    }

    pub fn with_guard<G>(mut self, guard: G) -> Self
    where
        G: Fn(&Interpreter, &Environment) -> RuntimeResult<Term> + Send + Sync + 'static,
    {
        self.guard = Some(Arc::new(guard));
        self
    }
}

/// Where comprehension results are poured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Collectable {
    #[default]
    List,
    Map,
    Binary,
}

#[derive(Clone)]
pub struct Comprehension {
    pub generators: Vec<Generator>,
    pub filters: Vec<GuardFn>,
    pub into: Collectable,
    pub unique: bool,
    pub mapper: GuardFn,
}

impl Comprehension {
    pub fn new<M>(mapper: M) -> Self
    where
        M: Fn(&Interpreter, &Environment) -> RuntimeResult<Term> + Send + Sync + 'static,
    {
        Comprehension {
            generators: Vec::new(),
            filters: Vec::new(),
            into: Collectable::List,
            unique: false,
            mapper: Arc::new(mapper),
        }
    }

    pub fn generator(mut self, generator: Generator) -> Self {
        self.generators.push(generator);
        self
    }

    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Interpreter, &Environment) -> RuntimeResult<Term> + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn collect_into(mut self, collectable: Collectable) -> Self {
        self.into = collectable;
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Runs the comprehension against `scope`; the scope itself is never modified.
    pub fn evaluate(&self, interpreter: &Interpreter, scope: &Environment) -> RuntimeResult<Term> {
        if self.generators.is_empty() {
            return Err(RuntimeError::InterpreterError(
                "comprehension requires at least one generator".to_string(),
            ));
        }

        let sources = self
            .generators
            .iter()
            .map(|generator| materialize(&generator.enumerable))
            .collect::<RuntimeResult<Vec<_>>>()?;
        debug!(
            "Comprehension over {} generator(s), sizes {:?}",
            sources.len(),
            sources.iter().map(Vec::len).collect::<Vec<_>>()
        );

        let mut results = Vec::new();
        let mut seen = HashSet::new();
        for combination in sources.into_iter().map(Vec::into_iter).multi_cartesian_product() {
            let Some(bound) = self.bind_generators(interpreter, scope, &combination) else {
                continue;
            };
            if !self.filters_pass(interpreter, &bound)? {
                continue;
            }
            let result = (self.mapper)(interpreter, &bound)?;
            // Keyed on the canonical encoding, which agrees with strict equality
            // except that every NaN shares one key, so NaN results collapse too.
            if self.unique && !seen.insert(result.encode_map_key()) {
                continue;
            }
            results.push(result);
        }

        collect(results, self.into)
    }

    fn bind_generators(
        &self,
        interpreter: &Interpreter,
        scope: &Environment,
        combination: &[Term],
    ) -> Option<Environment> {
        let mut bound = scope.clone();
        for (generator, value) in self.generators.iter().zip(combination) {
            bound = match try_match(&generator.pattern, value, &bound) {
                MatchOutcome::Matched(next) => next,
                MatchOutcome::NotMatched => return None,
            };
            if let Some(guard) = &generator.guard {
                match guard(interpreter, &bound) {
                    Ok(result) if result.is_true() => {}
                    _ => return None,
                }
            }
        }
        Some(bound)
    }

    fn filters_pass(&self, interpreter: &Interpreter, scope: &Environment) -> RuntimeResult<bool> {
        for filter in &self.filters {
            if !filter(interpreter, scope)?.is_truthy() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Elements of an enumerable term: list elements, or map entries as `{key, value}`.
pub fn materialize(enumerable: &Term) -> RuntimeResult<Vec<Term>> {
    match enumerable {
        Term::List(list) if list.is_proper() => Ok(list.data().to_vec()),
        Term::Map(map) => Ok(map.to_list()),
        other => Err(RuntimeError::ProtocolUndefinedError {
            protocol: "Enumerable".to_string(),
            value: other.clone(),
        }),
    }
}

fn collect(results: Vec<Term>, into: Collectable) -> RuntimeResult<Term> {
    match into {
        Collectable::List => Ok(Term::list(results)),
        Collectable::Map => {
            let mut pairs = Vec::with_capacity(results.len());
            for result in results {
                match result {
                    Term::Tuple(mut pair) if pair.len() == 2 => {
                        let value = pair.pop().unwrap_or_else(Term::nil);
                        let key = pair.pop().unwrap_or_else(Term::nil);
                        pairs.push((key, value));
                    }
                    other => {
                        return Err(RuntimeError::ArgumentError(format!(
                            "collecting into a map requires {{key, value}} tuples, got: {}",
                            inspect(&other)
                        )))
                    }
                }
            }
            Ok(Term::Map(TermMap::from_pairs(pairs)))
        }
        Collectable::Binary => {
            let mut buffer = Bitstring::default();
            for result in results {
                let chunk = match result {
                    Term::String(text) => Bitstring::from_text(&text),
                    Term::Bitstring(bits) => bits,
                    other => {
                        return Err(RuntimeError::ArgumentError(format!(
                            "collecting into a binary requires a bitstring, got: {}",
                            inspect(&other)
                        )))
                    }
                };
                buffer = buffer.concat(&chunk);
            }
            Ok(match buffer.to_text() {
                Some(text) => Term::String(text),
                None => Term::Bitstring(buffer),
            })
        }
    }
}
