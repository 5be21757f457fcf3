// Error handling for the boxterm runtime

use crate::runtime::inspect::inspect;
use crate::runtime::values::Term;
use std::fmt;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Guest-visible errors raised while evaluating terms
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// A `=` match failed; carries the right hand side
    MatchError(Term),

    /// No `case` clause matched the subject
    CaseClauseError(Term),

    CondClauseError,

    /// Clause search exhausted; `function` is already formatted (`Mod.fun/2`, `anonymous fn/1`)
    FunctionClauseError {
        function: String,
        args: Vec<Term>,
    },

    UndefinedFunctionError {
        module: String,
        function: String,
        arity: usize,
    },

    /// Argument contract violation, message is complete
    ArgumentError(String),

    ArithmeticError,

    KeyError {
        key: Term,
        term: Term,
    },

    BadMapError(Term),

    BadFunctionError(Term),

    ProtocolUndefinedError {
        protocol: String,
        value: Term,
    },

    /// Missing runtime coverage
    NotYetImplemented(String),

    /// Misuse of the runtime itself rather than a guest error
    InterpreterError(String),
}

impl RuntimeError {
    /// Builds the positional argument error used by ported functions.
    pub fn argument_error(position: usize, reason: &str) -> RuntimeError {
        RuntimeError::ArgumentError(format!(
            "errors were found at the given arguments:\n\n  * {} argument: {}\n",
            ordinal(position),
            reason
        ))
    }

    pub fn function_clause(module: &str, function: &str, args: &[Term]) -> RuntimeError {
        RuntimeError::FunctionClauseError {
            function: format_mfa(module, function, args.len()),
            args: args.to_vec(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::MatchError(_) => "MatchError",
            RuntimeError::CaseClauseError(_) => "CaseClauseError",
            RuntimeError::CondClauseError => "CondClauseError",
            RuntimeError::FunctionClauseError { .. } => "FunctionClauseError",
            RuntimeError::UndefinedFunctionError { .. } => "UndefinedFunctionError",
            RuntimeError::ArgumentError(_) => "ArgumentError",
            RuntimeError::ArithmeticError => "ArithmeticError",
            RuntimeError::KeyError { .. } => "KeyError",
            RuntimeError::BadMapError(_) => "BadMapError",
            RuntimeError::BadFunctionError(_) => "BadFunctionError",
            RuntimeError::ProtocolUndefinedError { .. } => "Protocol.UndefinedError",
            RuntimeError::NotYetImplemented(_) => "NotYetImplementedError",
            RuntimeError::InterpreterError(_) => "InterpreterError",
        }
    }

    pub fn message(&self) -> String {
        match self {
            RuntimeError::MatchError(value) => {
                format!("no match of right hand side value: {}", inspect(value))
            }
            RuntimeError::CaseClauseError(value) => {
                format!("no case clause matching: {}", inspect(value))
            }
            RuntimeError::CondClauseError => {
                "no cond clause evaluated to a truthy value".to_string()
            }
            RuntimeError::FunctionClauseError { function, .. } => {
                format!("no function clause matching in {}", function)
            }
            RuntimeError::UndefinedFunctionError {
                module,
                function,
                arity,
            } => format!(
                "function {} is undefined or private",
                format_mfa(module, function, *arity)
            ),
            RuntimeError::ArgumentError(message) => message.clone(),
            RuntimeError::ArithmeticError => "bad argument in arithmetic expression".to_string(),
            RuntimeError::KeyError { key, term } => {
                format!("key {} not found in: {}", inspect(key), inspect(term))
            }
            RuntimeError::BadMapError(value) => format!("expected a map, got: {}", inspect(value)),
            RuntimeError::BadFunctionError(value) => {
                format!("expected a function, got: {}", inspect(value))
            }
            RuntimeError::ProtocolUndefinedError { protocol, value } => format!(
                "protocol {} not implemented for {} of type {}",
                protocol,
                inspect(value),
                guest_type_label(value)
            ),
            RuntimeError::NotYetImplemented(message) => message.clone(),
            RuntimeError::InterpreterError(message) => message.clone(),
        }
    }

    /// The guest exception struct for this error.
    pub fn to_term(&self) -> Term {
        Term::map_from_pairs(vec![
            (Term::atom("__exception__"), Term::boolean(true)),
            (
                Term::atom("__struct__"),
                Term::Atom(format!("Elixir.{}", self.kind())),
            ),
            (Term::atom("message"), Term::string(self.message())),
        ])
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.kind(), self.message())
    }
}

impl std::error::Error for RuntimeError {}

/// Formats `module.function/arity` the way the guest prints it:
/// aliases drop their `Elixir.` prefix, bare modules get a leading colon.
pub fn format_mfa(module: &str, function: &str, arity: usize) -> String {
    let module = match module.strip_prefix("Elixir.") {
        Some(alias) => alias.to_string(),
        None => format!(":{}", module),
    };
    format!("{}.{}/{}", module, function, arity)
}

fn ordinal(position: usize) -> String {
    match position {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{}th", n),
    }
}

fn guest_type_label(value: &Term) -> &'static str {
    match value {
        Term::Atom(_) => "Atom",
        Term::Integer(_) => "Integer",
        Term::Float(_) => "Float",
        Term::String(_) | Term::Bitstring(_) => "BitString",
        Term::List(_) => "List",
        Term::Tuple(_) => "Tuple",
        Term::Map(_) => "Map",
        Term::AnonymousFunction(_) => "Function",
        Term::VariablePattern(_) | Term::MatchPlaceholder | Term::ConsPattern(_) => "Pattern",
    }
}
