// Pattern matching (unification) for boxterm
// A root match runs against a copy of the caller's scope; the copy is only
// handed back when the whole pattern tree matched.

use crate::runtime::environment::Environment;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::{List, Term};
use std::collections::HashSet;

/// Result of a recoverable match attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched(Environment),
    NotMatched,
}

impl MatchOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }

    pub fn into_scope(self) -> Option<Environment> {
        match self {
            MatchOutcome::Matched(scope) => Some(scope),
            MatchOutcome::NotMatched => None,
        }
    }
}

/// Matches `value` against `pattern`, binding into a copy of `scope`.
pub fn try_match(pattern: &Term, value: &Term, scope: &Environment) -> MatchOutcome {
    let mut unifier = Unifier::new(scope);
    if unifier.unify(pattern, value) {
        MatchOutcome::Matched(unifier.scope)
    } else {
        MatchOutcome::NotMatched
    }
}

/// Matches clause parameters against call arguments as one root match, so a
/// variable repeated across parameters must bind the same value.
pub fn try_match_args(params: &[Term], args: &[Term], scope: &Environment) -> MatchOutcome {
    if params.len() != args.len() {
        return MatchOutcome::NotMatched;
    }
    let mut unifier = Unifier::new(scope);
    let matched = params
        .iter()
        .zip(args)
        .all(|(pattern, value)| unifier.unify(pattern, value));
    if matched {
        MatchOutcome::Matched(unifier.scope)
    } else {
        MatchOutcome::NotMatched
    }
}

/// The `=` operator: binds into `scope` and returns the value, or raises
/// `MatchError` leaving `scope` untouched.
pub fn match_pattern(pattern: &Term, value: &Term, scope: &mut Environment) -> RuntimeResult<Term> {
    match try_match(pattern, value, scope) {
        MatchOutcome::Matched(bound) => {
            *scope = bound;
            Ok(value.clone())
        }
        MatchOutcome::NotMatched => Err(RuntimeError::MatchError(value.clone())),
    }
}

pub fn is_matched(pattern: &Term, value: &Term) -> bool {
    try_match(pattern, value, &Environment::new()).is_matched()
}

struct Unifier {
    scope: Environment,
    // Variables bound by the current root match
    bound: HashSet<String>,
}

impl Unifier {
    fn new(scope: &Environment) -> Self {
        Unifier {
            scope: scope.clone(),
            bound: HashSet::new(),
        }
    }

    fn unify(&mut self, pattern: &Term, value: &Term) -> bool {
        match (pattern, value) {
            (Term::MatchPlaceholder, _) => true,
            (Term::VariablePattern(name), _) => {
                if self.bound.contains(name) {
                    self.scope.get(name) == Some(value)
                } else {
                    self.scope.define(name, value.clone());
                    self.bound.insert(name.clone());
                    true
                }
            }
            (Term::ConsPattern(cons), Term::List(list)) => match list.split_first() {
                Some((head, tail)) => self.unify(&cons.head, head) && self.unify(&cons.tail, &tail),
                None => false,
            },
            (Term::ConsPattern(_), _) => false,
            (Term::List(p), Term::List(_)) if p.improper_tail().map_or(false, Term::is_pattern) => {
                self.unify_prefix(p, value)
            }
            (Term::List(p), Term::List(v)) => {
                p.is_proper() == v.is_proper() && self.unify_all(p.data(), v.data())
            }
            (Term::Tuple(p), Term::Tuple(v)) => self.unify_all(p, v),
            (Term::Map(p), Term::Map(v)) => p.iter_encoded().all(|(encoded, _, pattern_value)| {
                match v.get_encoded(encoded) {
                    Some(value) => self.unify(pattern_value, value),
                    None => false,
                }
            }),
            _ => pattern == value,
        }
    }

    /// `[a, b | tail]` with a pattern tail: one cons step per leading element.
    fn unify_prefix(&mut self, pattern: &List, value: &Term) -> bool {
        let mut rest = value.clone();
        for element in pattern.elements() {
            let Term::List(list) = &rest else {
                return false;
            };
            let Some((head, tail)) = list.split_first() else {
                return false;
            };
            if !self.unify(element, head) {
                return false;
            }
            rest = tail;
        }
        match pattern.improper_tail() {
            Some(tail) => self.unify(tail, &rest),
            None => false,
        }
    }

    fn unify_all(&mut self, patterns: &[Term], values: &[Term]) -> bool {
        patterns.len() == values.len()
            && patterns
                .iter()
                .zip(values)
                .all(|(pattern, value)| self.unify(pattern, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Term {
        Term::variable_pattern(name)
    }

    #[test]
    fn wildcard_binds_nothing() {
        let outcome = try_match(&Term::match_placeholder(), &Term::integer(1), &Environment::new());
        assert_eq!(outcome, MatchOutcome::Matched(Environment::new()));
    }

    #[test]
    fn variables_rebind_names_from_before_the_match() {
        let mut scope = Environment::new();
        scope.define("x", Term::integer(1));
        match_pattern(&var("x"), &Term::integer(2), &mut scope).unwrap();
        assert_eq!(scope.lookup("x"), Some(Term::integer(2)));
    }

    #[test]
    fn repeated_variable_must_agree() {
        let pattern = Term::tuple(vec![var("x"), var("x")]);
        let same = Term::tuple(vec![Term::integer(1), Term::integer(1)]);
        let different = Term::tuple(vec![Term::integer(1), Term::integer(2)]);
        assert!(is_matched(&pattern, &same));
        assert!(!is_matched(&pattern, &different));
    }

    #[test]
    fn repeated_variable_is_strict() {
        let pattern = Term::list(vec![var("x"), var("x")]);
        let value = Term::list(vec![Term::integer(1), Term::float(1.0)]);
        assert!(!is_matched(&pattern, &value));
    }

    #[test]
    fn failed_match_leaves_scope_untouched() {
        let mut scope = Environment::new();
        scope.define("y", Term::atom("keep"));
        let pattern = Term::tuple(vec![var("y"), Term::integer(2)]);
        let value = Term::tuple(vec![Term::integer(1), Term::integer(3)]);
        let err = match_pattern(&pattern, &value, &mut scope).unwrap_err();
        assert_eq!(err, RuntimeError::MatchError(value));
        assert_eq!(scope.lookup("y"), Some(Term::atom("keep")));
    }

    #[test]
    fn cons_pattern_on_proper_list() {
        let pattern = Term::cons_pattern(var("h"), var("t"));
        let value = Term::list(vec![Term::integer(1), Term::integer(2), Term::integer(3)]);
        let scope = try_match(&pattern, &value, &Environment::new())
            .into_scope()
            .unwrap();
        assert_eq!(scope.lookup("h"), Some(Term::integer(1)));
        assert_eq!(
            scope.lookup("t"),
            Some(Term::list(vec![Term::integer(2), Term::integer(3)]))
        );
    }

    #[test]
    fn cons_pattern_on_improper_list_binds_bare_tail() {
        let pattern = Term::cons_pattern(var("h"), var("t"));
        let value = Term::improper_list(vec![Term::integer(1)], Term::integer(2));
        let scope = try_match(&pattern, &value, &Environment::new())
            .into_scope()
            .unwrap();
        assert_eq!(scope.lookup("t"), Some(Term::integer(2)));
    }

    #[test]
    fn cons_pattern_rejects_empty_list() {
        let pattern = Term::cons_pattern(var("h"), var("t"));
        assert!(!is_matched(&pattern, &Term::list(vec![])));
        assert!(!is_matched(&pattern, &Term::integer(1)));
    }

    #[test]
    fn improper_list_pattern_binds_the_rest() {
        let pattern = Term::improper_list(vec![Term::integer(1)], var("t"));
        let value = Term::list(vec![Term::integer(1), Term::integer(2)]);
        let scope = try_match(&pattern, &value, &Environment::new())
            .into_scope()
            .unwrap();
        assert_eq!(scope.lookup("t"), Some(Term::list(vec![Term::integer(2)])));

        let improper = Term::improper_list(vec![Term::integer(1)], Term::integer(2));
        let scope = try_match(&pattern, &improper, &Environment::new())
            .into_scope()
            .unwrap();
        assert_eq!(scope.lookup("t"), Some(Term::integer(2)));

        assert!(!is_matched(&pattern, &Term::list(vec![])));
        assert!(!is_matched(&pattern, &Term::list(vec![Term::integer(3)])));
    }

    #[test]
    fn list_properness_must_agree() {
        let proper = Term::list(vec![Term::integer(1), Term::integer(2)]);
        let improper = Term::improper_list(vec![Term::integer(1)], Term::integer(2));
        assert!(!is_matched(&proper, &improper));
    }

    #[test]
    fn map_patterns_match_subsets() {
        let pattern = Term::map_from_pairs(vec![(Term::atom("a"), var("x"))]);
        let value = Term::map_from_pairs(vec![
            (Term::atom("a"), Term::integer(1)),
            (Term::atom("b"), Term::integer(2)),
        ]);
        let scope = try_match(&pattern, &value, &Environment::new())
            .into_scope()
            .unwrap();
        assert_eq!(scope.lookup("x"), Some(Term::integer(1)));

        let missing = Term::map_from_pairs(vec![(Term::atom("b"), Term::integer(2))]);
        assert!(!is_matched(&pattern, &missing));
    }

    #[test]
    fn args_share_one_root_match() {
        let params = vec![var("x"), var("x")];
        assert!(!try_match_args(&params, &[Term::integer(1), Term::integer(2)], &Environment::new())
            .is_matched());
        assert!(try_match_args(&params, &[Term::integer(1), Term::integer(1)], &Environment::new())
            .is_matched());
        assert!(!try_match_args(&params, &[Term::integer(1)], &Environment::new()).is_matched());
    }

    #[test]
    fn scalars_compare_strictly() {
        assert!(!is_matched(&Term::integer(1), &Term::float(1.0)));
        assert!(is_matched(&Term::atom("ok"), &Term::atom("ok")));
    }
}
