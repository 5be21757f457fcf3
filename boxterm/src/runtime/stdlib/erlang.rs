// :erlang built-ins and the operator functions the compiler calls by name

use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::interpreter::Interpreter;
use crate::runtime::module_runtime::ModuleRegistry;
use crate::runtime::operators;
use crate::runtime::values::Term;
use num_traits::ToPrimitive;

pub(super) fn load(registry: &mut ModuleRegistry) {
    registry.register_native("erlang", "hd", 1, |_, args| operators::head(&args[0]));
    registry.register_native("erlang", "tl", 1, |_, args| operators::tail(&args[0]));
    registry.register_native("erlang", "length", 1, length);
    registry.register_native("erlang", "element", 2, element);
    registry.register_native("erlang", "tuple_size", 1, tuple_size);

    registry.register_native("erlang", "is_atom", 1, |_, args| Ok(args[0].is_atom().into()));
    registry.register_native("erlang", "is_integer", 1, |_, args| {
        Ok(args[0].is_integer().into())
    });
    registry.register_native("erlang", "is_list", 1, |_, args| Ok(args[0].is_list().into()));
    registry.register_native("erlang", "is_map", 1, |_, args| Ok(args[0].is_map().into()));
    registry.register_native("erlang", "is_tuple", 1, |_, args| Ok(args[0].is_tuple().into()));

    registry.register_native("erlang", "+", 2, |_, args| operators::addition(&args[0], &args[1]));
    registry.register_native("erlang", "-", 2, |_, args| {
        operators::subtraction(&args[0], &args[1])
    });
    registry.register_native("erlang", "*", 2, |_, args| {
        operators::multiplication(&args[0], &args[1])
    });
    registry.register_native("erlang", "/", 2, |_, args| operators::division(&args[0], &args[1]));
    registry.register_native("erlang", "<", 2, |interpreter, args| {
        operators::less_than(&args[0], &args[1], interpreter.numeric_comparison())
    });
    registry.register_native("erlang", ">", 2, |interpreter, args| {
        operators::greater_than(&args[0], &args[1], interpreter.numeric_comparison())
    });
    registry.register_native("erlang", "==", 2, |interpreter, args| {
        Ok(operators::equal_to(&args[0], &args[1], interpreter.numeric_comparison()))
    });
    registry.register_native("erlang", "=:=", 2, |_, args| {
        Ok(operators::strictly_equal_to(&args[0], &args[1]))
    });
}

fn length(_: &Interpreter, args: &[Term]) -> RuntimeResult<Term> {
    match &args[0] {
        Term::List(list) if list.is_proper() => Ok(Term::integer(list.len() as u64)),
        _ => Err(RuntimeError::argument_error(1, "not a list")),
    }
}

fn element(_: &Interpreter, args: &[Term]) -> RuntimeResult<Term> {
    let Term::Integer(index) = &args[0] else {
        return Err(RuntimeError::argument_error(1, "not an integer"));
    };
    let Term::Tuple(items) = &args[1] else {
        return Err(RuntimeError::argument_error(2, "not a tuple"));
    };
    index
        .to_usize()
        .filter(|i| *i >= 1)
        .and_then(|i| items.get(i - 1))
        .cloned()
        .ok_or_else(|| RuntimeError::argument_error(1, "out of range"))
}

fn tuple_size(_: &Interpreter, args: &[Term]) -> RuntimeResult<Term> {
    match &args[0] {
        Term::Tuple(items) => Ok(Term::integer(items.len() as u64)),
        _ => Err(RuntimeError::argument_error(1, "not a tuple")),
    }
}
