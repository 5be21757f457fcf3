// Runtime system for boxterm
// This module contains the term model, the unification engine, clause dispatch,
// comprehensions and the ported standard library

pub mod bitstring;
pub mod comprehension;
pub mod environment;
pub mod equality;
pub mod error;
pub mod inspect;
pub mod interpreter;
pub mod module_runtime;
pub mod operators;
pub mod pattern;
pub mod stdlib;
pub mod term_map;
pub mod values;


pub use bitstring::Bitstring;
pub use comprehension::{Collectable, Comprehension, Generator};
pub use environment::Environment;
pub use equality::NumericComparison;
pub use error::{RuntimeError, RuntimeResult};
pub use interpreter::{CondClause, Interpreter};
pub use module_runtime::{FunctionEntry, FunctionHandle, ModuleRegistry, NativeFunction};
pub use pattern::MatchOutcome;
pub use term_map::TermMap;
pub use values::{AnonymousFunction, Clause, ConsPattern, List, Term};
