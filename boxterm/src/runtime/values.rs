// Runtime term model for boxterm
// Every guest value is a `Term`; pattern-only variants share the same type so that
// clause parameters can be written with the same constructors as literals

use crate::runtime::bitstring::Bitstring;
use crate::runtime::environment::Environment;
use crate::runtime::error::RuntimeResult;
use crate::runtime::interpreter::Interpreter;
use crate::runtime::term_map::TermMap;
use num_bigint::BigInt;
use std::fmt;
use std::sync::Arc;

pub const TRUE_ATOM: &str = "true";
pub const FALSE_ATOM: &str = "false";
pub const NIL_ATOM: &str = "nil";

/// Guard or filter callable: evaluated against a binding scope, passes only on `true`.
pub type GuardFn = Arc<dyn Fn(&Interpreter, &Environment) -> RuntimeResult<Term> + Send + Sync>;

/// Clause body callable supplied by the compiler.
pub type BodyFn =
    Arc<dyn Fn(&Interpreter, &mut Environment) -> RuntimeResult<Term> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Atom(String),
    Integer(BigInt),
    Float(f64),
    String(String),
    Bitstring(Bitstring),
    List(List),
    Tuple(Vec<Term>),
    Map(TermMap),
    AnonymousFunction(Arc<AnonymousFunction>),
    // Pattern-only variants, never produced as runtime values
    VariablePattern(String),
    MatchPlaceholder,
    ConsPattern(ConsPattern),
}

/// A guest list. An improper list keeps its non-list tail as the last element of `data`.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    data: Vec<Term>,
    is_proper: bool,
}

impl List {
    pub fn data(&self) -> &[Term] {
        &self.data
    }

    pub fn is_proper(&self) -> bool {
        self.is_proper
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Elements before the improper tail (all elements for a proper list).
    pub fn elements(&self) -> &[Term] {
        if self.is_proper {
            &self.data
        } else {
            &self.data[..self.data.len() - 1]
        }
    }

    pub fn improper_tail(&self) -> Option<&Term> {
        if self.is_proper {
            None
        } else {
            self.data.last()
        }
    }

    /// Splits a non-empty list into its head and the term that follows it.
    ///
    /// The tail of `[a, b | c]` is `[b | c]`, the tail of `[a | c]` is the bare `c`.
    pub fn split_first(&self) -> Option<(&Term, Term)> {
        let (head, rest) = self.data.split_first()?;
        let tail = if self.is_proper {
            Term::list(rest.to_vec())
        } else if rest.len() == 1 {
            rest[0].clone()
        } else {
            Term::List(List {
                data: rest.to_vec(),
                is_proper: false,
            })
        };
        Some((head, tail))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsPattern {
    pub head: Box<Term>,
    pub tail: Box<Term>,
}

/// One alternative of a multi-clause function, anonymous function or `case`.
#[derive(Clone)]
pub struct Clause {
    pub params: Vec<Term>,
    pub guard: Option<GuardFn>,
    pub body: BodyFn,
}

impl Clause {
    pub fn new<F>(params: Vec<Term>, body: F) -> Self
    where
        F: Fn(&Interpreter, &mut Environment) -> RuntimeResult<Term> + Send + Sync + 'static,
    {
        Clause {
            params,
            guard: None,
            body: Arc::new(body),
        }
    }

    pub fn with_guard<G>(mut self, guard: G) -> Self
    where
        G: Fn(&Interpreter, &Environment) -> RuntimeResult<Term> + Send + Sync + 'static,
    {
        self.guard = Some(Arc::new(guard));
        self
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clause")
            .field("params", &self.params)
            .field("guard", &self.guard.is_some())
            .finish()
    }
}

pub struct AnonymousFunction {
    pub arity: usize,
    pub clauses: Vec<Clause>,
    pub captured: Environment,
}

impl fmt::Debug for AnonymousFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnonymousFunction")
            .field("arity", &self.arity)
            .field("clauses", &self.clauses.len())
            .finish()
    }
}

impl PartialEq for AnonymousFunction {
    fn eq(&self, other: &Self) -> bool {
        // Functions compare by identity.
        std::ptr::eq(self, other)
    }
}

impl Term {
    pub fn atom(value: &str) -> Term {
        Term::Atom(value.to_string())
    }

    pub fn boolean(value: bool) -> Term {
        Term::atom(if value { TRUE_ATOM } else { FALSE_ATOM })
    }

    pub fn nil() -> Term {
        Term::atom(NIL_ATOM)
    }

    pub fn integer<T: Into<BigInt>>(value: T) -> Term {
        Term::Integer(value.into())
    }

    pub fn float(value: f64) -> Term {
        Term::Float(value)
    }

    pub fn string<S: Into<String>>(value: S) -> Term {
        Term::String(value.into())
    }

    pub fn bitstring(value: Bitstring) -> Term {
        Term::Bitstring(value)
    }

    pub fn list(data: Vec<Term>) -> Term {
        Term::List(List {
            data,
            is_proper: true,
        })
    }

    /// Builds `[elements... | tail]`. A list tail is spliced in, so the result is
    /// only improper when the tail is not a list.
    ///
    /// Used as a pattern with a variable, wildcard or cons tail, it matches the
    /// leading elements and binds the tail to the rest of the value, like nested
    /// cons patterns.
    pub fn improper_list(mut elements: Vec<Term>, tail: Term) -> Term {
        match tail {
            Term::List(list) => {
                elements.extend(list.data);
                Term::List(List {
                    data: elements,
                    is_proper: list.is_proper,
                })
            }
            tail if elements.is_empty() => tail,
            tail => {
                elements.push(tail);
                Term::List(List {
                    data: elements,
                    is_proper: false,
                })
            }
        }
    }

    pub fn tuple(data: Vec<Term>) -> Term {
        Term::Tuple(data)
    }

    pub fn map(data: TermMap) -> Term {
        Term::Map(data)
    }

    pub fn map_from_pairs(pairs: Vec<(Term, Term)>) -> Term {
        Term::Map(TermMap::from_pairs(pairs))
    }

    pub fn anonymous_function(arity: usize, clauses: Vec<Clause>, captured: Environment) -> Term {
        Term::AnonymousFunction(Arc::new(AnonymousFunction {
            arity,
            clauses,
            captured,
        }))
    }

    pub fn variable_pattern(name: &str) -> Term {
        Term::VariablePattern(name.to_string())
    }

    pub fn match_placeholder() -> Term {
        Term::MatchPlaceholder
    }

    pub fn cons_pattern(head: Term, tail: Term) -> Term {
        Term::ConsPattern(ConsPattern {
            head: Box::new(head),
            tail: Box::new(tail),
        })
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Term::Atom(_))
    }

    pub fn is_boolean(&self) -> bool {
        self.is_true() || self.is_false()
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Term::Atom(a) if a == TRUE_ATOM)
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Term::Atom(a) if a == FALSE_ATOM)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Term::Atom(a) if a == NIL_ATOM)
    }

    /// Guest truthiness: everything except `false` and `nil`.
    pub fn is_truthy(&self) -> bool {
        !(self.is_false() || self.is_nil())
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Term::Integer(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Term::Float(_))
    }

    pub fn is_number(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Term::String(_))
    }

    pub fn is_bitstring(&self) -> bool {
        matches!(self, Term::Bitstring(_))
    }

    /// Byte-aligned binary data, either text or a byte-aligned bitstring.
    pub fn is_binary(&self) -> bool {
        match self {
            Term::String(_) => true,
            Term::Bitstring(bits) => bits.is_binary(),
            _ => false,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Term::List(_))
    }

    pub fn is_proper_list(&self) -> bool {
        matches!(self, Term::List(l) if l.is_proper())
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Term::Tuple(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Term::Map(_))
    }

    pub fn is_anonymous_function(&self) -> bool {
        matches!(self, Term::AnonymousFunction(_))
    }

    pub fn is_variable_pattern(&self) -> bool {
        matches!(self, Term::VariablePattern(_))
    }

    pub fn is_match_placeholder(&self) -> bool {
        matches!(self, Term::MatchPlaceholder)
    }

    pub fn is_cons_pattern(&self) -> bool {
        matches!(self, Term::ConsPattern(_))
    }

    pub fn is_pattern(&self) -> bool {
        self.is_variable_pattern() || self.is_match_placeholder() || self.is_cons_pattern()
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Term::Atom(_) => "atom",
            Term::Integer(_) => "integer",
            Term::Float(_) => "float",
            Term::String(_) => "string",
            Term::Bitstring(_) => "bitstring",
            Term::List(_) => "list",
            Term::Tuple(_) => "tuple",
            Term::Map(_) => "map",
            Term::AnonymousFunction(_) => "anonymous_function",
            Term::VariablePattern(_) => "variable_pattern",
            Term::MatchPlaceholder => "match_placeholder",
            Term::ConsPattern(_) => "cons_pattern",
        }
    }

    /// Canonical, type-tagged key used to store this term in a `TermMap`.
    ///
    /// Two strictly equal terms always produce the same key.
    pub fn encode_map_key(&self) -> String {
        match self {
            Term::Atom(value) => format!("atom({})", escape_key_text(value)),
            Term::Integer(value) => format!("integer({})", value),
            Term::Float(value) => format!("float({})", canonical_float(*value)),
            Term::String(value) => format!("string({})", escape_key_text(value)),
            Term::Bitstring(bits) => {
                let digits: String = bits.bits().iter().map(|b| if *b { '1' } else { '0' }).collect();
                format!("bitstring({})", digits)
            }
            Term::List(list) => {
                let tag = if list.is_proper() { "list" } else { "improper_list" };
                format!("{}({})", tag, encode_sequence(list.data()))
            }
            Term::Tuple(data) => format!("tuple({})", encode_sequence(data)),
            Term::Map(map) => {
                let mut entries: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{}:{}", k.encode_map_key(), v.encode_map_key()))
                    .collect();
                entries.sort();
                format!("map({})", entries.join(","))
            }
            Term::AnonymousFunction(fun) => {
                format!("anonymous_function({:p})", Arc::as_ptr(fun))
            }
            Term::VariablePattern(name) => format!("variable_pattern({})", escape_key_text(name)),
            Term::MatchPlaceholder => "match_placeholder()".to_string(),
            Term::ConsPattern(cons) => format!(
                "cons_pattern({},{})",
                cons.head.encode_map_key(),
                cons.tail.encode_map_key()
            ),
        }
    }
}

fn encode_sequence(items: &[Term]) -> String {
    items
        .iter()
        .map(Term::encode_map_key)
        .collect::<Vec<_>>()
        .join(",")
}

fn escape_key_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '(' | ')' | ',' | ':' | '|') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn canonical_float(value: f64) -> String {
    // 0.0 and -0.0 are equal terms and must share a key.
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

impl From<bool> for Term {
    fn from(value: bool) -> Self {
        Term::boolean(value)
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::integer(value)
    }
}

impl From<BigInt> for Term {
    fn from(value: BigInt) -> Self {
        Term::Integer(value)
    }
}

impl From<f64> for Term {
    fn from(value: f64) -> Self {
        Term::Float(value)
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Term::string(value)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::runtime::inspect::inspect(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_scalar_map_keys() {
        assert_eq!(Term::atom("abc").encode_map_key(), "atom(abc)");
        assert_eq!(Term::float(1.23).encode_map_key(), "float(1.23)");
        assert_eq!(Term::integer(123).encode_map_key(), "integer(123)");
        assert_eq!(Term::string("abc").encode_map_key(), "string(abc)");
    }

    #[test]
    fn encodes_list_map_key() {
        let list = Term::list(vec![Term::integer(1), Term::atom("b")]);
        assert_eq!(list.encode_map_key(), "list(integer(1),atom(b))");
    }

    #[test]
    fn escaping_keeps_nested_keys_apart() {
        let tricky = Term::list(vec![Term::string("a),string(b")]);
        let plain = Term::list(vec![Term::string("a"), Term::string("b")]);
        assert_ne!(tricky.encode_map_key(), plain.encode_map_key());
    }

    #[test]
    fn map_keys_ignore_insertion_order() {
        let a = Term::map_from_pairs(vec![
            (Term::atom("a"), Term::integer(1)),
            (Term::atom("b"), Term::integer(2)),
        ]);
        let b = Term::map_from_pairs(vec![
            (Term::atom("b"), Term::integer(2)),
            (Term::atom("a"), Term::integer(1)),
        ]);
        assert_eq!(a, b);
        assert_eq!(a.encode_map_key(), b.encode_map_key());
    }

    #[test]
    fn integer_and_float_keys_differ() {
        assert_ne!(Term::integer(1).encode_map_key(), Term::float(1.0).encode_map_key());
        assert_ne!(Term::integer(1), Term::float(1.0));
    }

    #[test]
    fn improper_list_splices_list_tails() {
        let spliced = Term::improper_list(
            vec![Term::integer(1)],
            Term::list(vec![Term::integer(2), Term::integer(3)]),
        );
        assert_eq!(
            spliced,
            Term::list(vec![Term::integer(1), Term::integer(2), Term::integer(3)])
        );

        let improper = Term::improper_list(vec![Term::integer(1)], Term::integer(2));
        assert!(improper.is_list());
        assert!(!improper.is_proper_list());
    }

    #[test]
    fn split_first_of_improper_list_yields_bare_tail() {
        let improper = Term::improper_list(vec![Term::integer(1)], Term::integer(2));
        let Term::List(list) = improper else {
            panic!("expected a list");
        };
        let (head, tail) = list.split_first().expect("non-empty");
        assert_eq!(head, &Term::integer(1));
        assert_eq!(tail, Term::integer(2));
    }

    #[test]
    fn functions_compare_by_identity() {
        let fun = Term::anonymous_function(0, vec![], Environment::new());
        let same = fun.clone();
        let other = Term::anonymous_function(0, vec![], Environment::new());
        assert_eq!(fun, same);
        assert_ne!(fun, other);
    }
}
