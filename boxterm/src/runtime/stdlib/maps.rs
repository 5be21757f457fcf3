// :maps

use super::proper_list;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::interpreter::Interpreter;
use crate::runtime::module_runtime::ModuleRegistry;
use crate::runtime::term_map::TermMap;
use crate::runtime::values::Term;

pub(super) fn load(registry: &mut ModuleRegistry) {
    registry.register_native("maps", "get", 2, get);
    registry.register_native("maps", "get", 3, get_with_default);
    registry.register_native("maps", "put", 3, put);
    registry.register_native("maps", "is_key", 2, is_key);
    registry.register_native("maps", "keys", 1, |_, args| Ok(Term::list(as_map(&args[0])?.keys())));
    registry.register_native("maps", "values", 1, |_, args| {
        Ok(Term::list(as_map(&args[0])?.values()))
    });
    registry.register_native("maps", "to_list", 1, |_, args| {
        Ok(Term::list(as_map(&args[0])?.to_list()))
    });
    registry.register_native("maps", "from_list", 1, from_list);
}

fn as_map(term: &Term) -> RuntimeResult<&TermMap> {
    match term {
        Term::Map(map) => Ok(map),
        other => Err(RuntimeError::BadMapError(other.clone())),
    }
}

fn get(_: &Interpreter, args: &[Term]) -> RuntimeResult<Term> {
    let (key, map) = (&args[0], &args[1]);
    as_map(map)?
        .get(key)
        .cloned()
        .ok_or_else(|| RuntimeError::KeyError {
            key: key.clone(),
            term: map.clone(),
        })
}

fn get_with_default(_: &Interpreter, args: &[Term]) -> RuntimeResult<Term> {
    let map = as_map(&args[1])?;
    Ok(map.get(&args[0]).cloned().unwrap_or_else(|| args[2].clone()))
}

fn put(_: &Interpreter, args: &[Term]) -> RuntimeResult<Term> {
    let map = as_map(&args[2])?;
    Ok(Term::Map(map.put(args[0].clone(), args[1].clone())))
}

fn is_key(_: &Interpreter, args: &[Term]) -> RuntimeResult<Term> {
    Ok(Term::boolean(as_map(&args[1])?.has_key(&args[0])))
}

fn from_list(_: &Interpreter, args: &[Term]) -> RuntimeResult<Term> {
    let items = proper_list(&args[0], || RuntimeError::argument_error(1, "not a list"))?;
    let pairs = items
        .iter()
        .map(|item| match item {
            Term::Tuple(pair) if pair.len() == 2 => Ok((pair[0].clone(), pair[1].clone())),
            _ => Err(RuntimeError::argument_error(1, "not a list of 2-tuples")),
        })
        .collect::<RuntimeResult<Vec<_>>>()?;
    Ok(Term::Map(TermMap::from_pairs(pairs)))
}
