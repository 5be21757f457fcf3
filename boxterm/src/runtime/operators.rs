// Built-in guest operators

use crate::runtime::comprehension::materialize;
use crate::runtime::equality::{compare_numbers, loosely_equal, strictly_equal, NumericComparison};
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::inspect::inspect;
use crate::runtime::values::Term;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::cmp::Ordering;

/// `[head | tail]`
pub fn cons(head: Term, tail: Term) -> Term {
    Term::improper_list(vec![head], tail)
}

/// `++`; the right operand becomes the tail, so it need not be a list.
pub fn list_concatenation(left: &Term, right: &Term) -> RuntimeResult<Term> {
    match left {
        Term::List(list) if list.is_proper() => {
            Ok(Term::improper_list(list.data().to_vec(), right.clone()))
        }
        _ => Err(RuntimeError::argument_error(1, "not a list")),
    }
}

/// `--`: each right element removes its first strictly equal occurrence.
pub fn list_subtraction(left: &Term, right: &Term) -> RuntimeResult<Term> {
    let mut remaining = proper_list_elements(left, 1)?;
    for item in proper_list_elements(right, 2)? {
        if let Some(index) = remaining.iter().position(|elem| strictly_equal(elem, &item)) {
            remaining.remove(index);
        }
    }
    Ok(Term::list(remaining))
}

fn proper_list_elements(term: &Term, position: usize) -> RuntimeResult<Vec<Term>> {
    match term {
        Term::List(list) if list.is_proper() => Ok(list.data().to_vec()),
        _ => Err(RuntimeError::argument_error(position, "not a proper list")),
    }
}

pub fn addition(left: &Term, right: &Term) -> RuntimeResult<Term> {
    arithmetic(left, right, |a, b| a + b, |a, b| a + b)
}

pub fn subtraction(left: &Term, right: &Term) -> RuntimeResult<Term> {
    arithmetic(left, right, |a, b| a - b, |a, b| a - b)
}

pub fn multiplication(left: &Term, right: &Term) -> RuntimeResult<Term> {
    arithmetic(left, right, |a, b| a * b, |a, b| a * b)
}

/// `/` always produces a float.
pub fn division(left: &Term, right: &Term) -> RuntimeResult<Term> {
    let (dividend, divisor) = (as_f64(left)?, as_f64(right)?);
    if divisor == 0.0 {
        return Err(RuntimeError::ArithmeticError);
    }
    Ok(Term::Float(dividend / divisor))
}

pub fn unary_negative(operand: &Term) -> RuntimeResult<Term> {
    match operand {
        Term::Integer(value) => Ok(Term::Integer(-value)),
        Term::Float(value) => Ok(Term::Float(-value)),
        _ => Err(RuntimeError::ArithmeticError),
    }
}

pub fn unary_positive(operand: &Term) -> RuntimeResult<Term> {
    match operand {
        Term::Integer(_) | Term::Float(_) => Ok(operand.clone()),
        _ => Err(RuntimeError::ArithmeticError),
    }
}

fn arithmetic(
    left: &Term,
    right: &Term,
    on_integers: impl Fn(&BigInt, &BigInt) -> BigInt,
    on_floats: impl Fn(f64, f64) -> f64,
) -> RuntimeResult<Term> {
    match (left, right) {
        (Term::Integer(a), Term::Integer(b)) => Ok(Term::Integer(on_integers(a, b))),
        _ => Ok(Term::Float(on_floats(as_f64(left)?, as_f64(right)?))),
    }
}

fn as_f64(term: &Term) -> RuntimeResult<f64> {
    match term {
        Term::Integer(value) => value.to_f64().ok_or(RuntimeError::ArithmeticError),
        Term::Float(value) => Ok(*value),
        _ => Err(RuntimeError::ArithmeticError),
    }
}

pub fn less_than(left: &Term, right: &Term, mode: NumericComparison) -> RuntimeResult<Term> {
    compare("<", left, right, mode, |o| o == Ordering::Less)
}

pub fn less_than_or_equal(left: &Term, right: &Term, mode: NumericComparison) -> RuntimeResult<Term> {
    compare("<=", left, right, mode, |o| o != Ordering::Greater)
}

pub fn greater_than(left: &Term, right: &Term, mode: NumericComparison) -> RuntimeResult<Term> {
    compare(">", left, right, mode, |o| o == Ordering::Greater)
}

pub fn greater_than_or_equal(
    left: &Term,
    right: &Term,
    mode: NumericComparison,
) -> RuntimeResult<Term> {
    compare(">=", left, right, mode, |o| o != Ordering::Less)
}

fn compare(
    operator: &str,
    left: &Term,
    right: &Term,
    mode: NumericComparison,
    accept: impl Fn(Ordering) -> bool,
) -> RuntimeResult<Term> {
    if let Some(operand) = [left, right].into_iter().find(|t| !t.is_number()) {
        return Err(RuntimeError::NotYetImplemented(format!(
            "{} is not yet implemented for non-number operand {}",
            operator,
            inspect(operand)
        )));
    }
    // NaN is unordered: every comparison is false.
    Ok(Term::boolean(
        compare_numbers(left, right, mode).map_or(false, accept),
    ))
}

pub fn equal_to(left: &Term, right: &Term, mode: NumericComparison) -> Term {
    Term::boolean(loosely_equal(left, right, mode))
}

pub fn not_equal_to(left: &Term, right: &Term, mode: NumericComparison) -> Term {
    Term::boolean(!loosely_equal(left, right, mode))
}

pub fn strictly_equal_to(left: &Term, right: &Term) -> Term {
    Term::boolean(strictly_equal(left, right))
}

pub fn strictly_not_equal_to(left: &Term, right: &Term) -> Term {
    Term::boolean(!strictly_equal(left, right))
}

/// `&&`: the right side is only evaluated when the left is truthy.
pub fn relaxed_boolean_and<F>(left: Term, right: F) -> RuntimeResult<Term>
where
    F: FnOnce() -> RuntimeResult<Term>,
{
    if left.is_truthy() {
        right()
    } else {
        Ok(left)
    }
}

/// `||`
pub fn relaxed_boolean_or<F>(left: Term, right: F) -> RuntimeResult<Term>
where
    F: FnOnce() -> RuntimeResult<Term>,
{
    if left.is_truthy() {
        Ok(left)
    } else {
        right()
    }
}

/// `!`
pub fn relaxed_boolean_not(operand: &Term) -> Term {
    Term::boolean(!operand.is_truthy())
}

/// `in`, strict membership over any enumerable.
pub fn membership(element: &Term, enumerable: &Term) -> RuntimeResult<Term> {
    let items = materialize(enumerable)?;
    Ok(Term::boolean(
        items.iter().any(|item| strictly_equal(item, element)),
    ))
}

/// `map.key`
pub fn dot(term: &Term, key: &Term) -> RuntimeResult<Term> {
    match term {
        Term::Map(map) => map.get(key).cloned().ok_or_else(|| RuntimeError::KeyError {
            key: key.clone(),
            term: term.clone(),
        }),
        other => Err(RuntimeError::BadMapError(other.clone())),
    }
}

pub fn count(enumerable: &Term) -> RuntimeResult<Term> {
    Ok(Term::integer(materialize(enumerable)?.len() as u64))
}

pub fn head(list: &Term) -> RuntimeResult<Term> {
    match list {
        Term::List(list) => match list.split_first() {
            Some((head, _)) => Ok(head.clone()),
            None => Err(RuntimeError::argument_error(1, "not a nonempty list")),
        },
        _ => Err(RuntimeError::argument_error(1, "not a nonempty list")),
    }
}

pub fn tail(list: &Term) -> RuntimeResult<Term> {
    match list {
        Term::List(list) => match list.split_first() {
            Some((_, tail)) => Ok(tail),
            None => Err(RuntimeError::argument_error(1, "not a nonempty list")),
        },
        _ => Err(RuntimeError::argument_error(1, "not a nonempty list")),
    }
}
