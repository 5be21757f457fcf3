// Boxterm Library
// Boxed term runtime: term model, unification, clause dispatch, comprehensions and codec
pub mod codec;
pub mod config;
pub mod runtime;

// Re-export the entry points most callers need.
pub use codec::{deserialize, serialize, CodecError};
pub use config::{ConfigError, RuntimeConfig};
pub use runtime::error::{RuntimeError, RuntimeResult};
pub use runtime::inspect::inspect;
pub use runtime::module_runtime::{FunctionHandle, ModuleRegistry};
pub use runtime::values::{Clause, Term};
pub use runtime::{Environment, Interpreter};
