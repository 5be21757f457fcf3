// Ported standard library
// Each function is registered as a native entry under its Erlang module name and
// validates its own arguments.

mod erlang;
mod lists;
mod maps;
mod unicode;

use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::module_runtime::ModuleRegistry;
use crate::runtime::values::Term;
use tracing::debug;

/// Registers every ported module into `registry`.
pub fn load_stdlib(registry: &mut ModuleRegistry) {
    erlang::load(registry);
    lists::load(registry);
    maps::load(registry);
    unicode::load(registry);
    debug!("Loaded stdlib modules: {:?}", registry.module_names());
}

/// Elements of a proper list, or the error produced by `on_error`.
fn proper_list<'a>(
    term: &'a Term,
    on_error: impl FnOnce() -> RuntimeError,
) -> RuntimeResult<&'a [Term]> {
    match term {
        Term::List(list) if list.is_proper() => Ok(list.data()),
        _ => Err(on_error()),
    }
}
