// :lists

use super::proper_list;
use crate::runtime::equality::loosely_equal;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::interpreter::Interpreter;
use crate::runtime::module_runtime::ModuleRegistry;
use crate::runtime::values::Term;
use num_traits::ToPrimitive;

pub(super) fn load(registry: &mut ModuleRegistry) {
    registry.register_native("lists", "flatten", 1, flatten);
    registry.register_native("lists", "foldl", 3, foldl);
    registry.register_native("lists", "keyfind", 3, keyfind);
    registry.register_native("lists", "member", 2, member);
    registry.register_native("lists", "reverse", 1, reverse);
}

fn flatten(_: &Interpreter, args: &[Term]) -> RuntimeResult<Term> {
    let clause_error = || RuntimeError::function_clause("lists", "flatten", args);
    let mut flat = Vec::new();
    flatten_into(proper_list(&args[0], clause_error)?, &mut flat, &clause_error)?;
    Ok(Term::list(flat))
}

fn flatten_into(
    items: &[Term],
    flat: &mut Vec<Term>,
    clause_error: &dyn Fn() -> RuntimeError,
) -> RuntimeResult<()> {
    for item in items {
        match item {
            Term::List(list) if list.is_proper() => flatten_into(list.data(), flat, clause_error)?,
            Term::List(_) => return Err(clause_error()),
            other => flat.push(other.clone()),
        }
    }
    Ok(())
}

fn foldl(interpreter: &Interpreter, args: &[Term]) -> RuntimeResult<Term> {
    let (fun, acc, list) = (&args[0], &args[1], &args[2]);
    match fun {
        Term::AnonymousFunction(f) if f.arity == 2 => {}
        _ => return Err(RuntimeError::function_clause("lists", "foldl", args)),
    }
    let items = match list {
        Term::List(l) if l.is_proper() => l.data(),
        Term::List(_) => return Err(RuntimeError::function_clause("lists", "foldl", args)),
        other => return Err(RuntimeError::CaseClauseError(other.clone())),
    };
    items.iter().try_fold(acc.clone(), |acc, item| {
        interpreter.call_anonymous_function(fun, &[item.clone(), acc])
    })
}

fn keyfind(interpreter: &Interpreter, args: &[Term]) -> RuntimeResult<Term> {
    let (key, index, tuples) = (&args[0], &args[1], &args[2]);
    let index = match index {
        Term::Integer(i) => match i.to_usize() {
            Some(i) if i >= 1 => i,
            _ => return Err(RuntimeError::argument_error(2, "out of range")),
        },
        _ => return Err(RuntimeError::argument_error(2, "not an integer")),
    };
    let tuples = proper_list(tuples, || RuntimeError::argument_error(3, "not a list"))?;
    let mode = interpreter.numeric_comparison();
    let found = tuples.iter().find(|tuple| match tuple {
        Term::Tuple(items) => items
            .get(index - 1)
            .map_or(false, |item| loosely_equal(item, key, mode)),
        _ => false,
    });
    Ok(found.cloned().unwrap_or_else(|| Term::boolean(false)))
}

fn member(_: &Interpreter, args: &[Term]) -> RuntimeResult<Term> {
    let items = proper_list(&args[1], || RuntimeError::argument_error(2, "not a list"))?;
    Ok(Term::boolean(items.contains(&args[0])))
}

fn reverse(_: &Interpreter, args: &[Term]) -> RuntimeResult<Term> {
    let items = proper_list(&args[0], || RuntimeError::function_clause("lists", "reverse", args))?;
    Ok(Term::list(items.iter().rev().cloned().collect()))
}
