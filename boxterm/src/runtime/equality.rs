// Equality and numeric ordering over terms

use crate::runtime::values::Term;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How an integer is compared with a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericComparison {
    /// Widen the integer to `f64`. Integers beyond 2^53 may compare equal to
    /// neighbouring floats.
    #[default]
    Approximate,
    /// Compare the mathematical values.
    Exact,
}

/// `===`: same variant and deeply equal payload.
pub fn strictly_equal(left: &Term, right: &Term) -> bool {
    left == right
}

/// `==`: numbers compare by value, recursively inside containers.
pub fn loosely_equal(left: &Term, right: &Term, mode: NumericComparison) -> bool {
    match (left, right) {
        (Term::Integer(_) | Term::Float(_), Term::Integer(_) | Term::Float(_)) => {
            compare_numbers(left, right, mode) == Some(Ordering::Equal)
        }
        (Term::List(l), Term::List(r)) => {
            l.is_proper() == r.is_proper() && all_loosely_equal(l.data(), r.data(), mode)
        }
        (Term::Tuple(l), Term::Tuple(r)) => all_loosely_equal(l, r, mode),
        (Term::Map(l), Term::Map(r)) => {
            l.len() == r.len()
                && l.iter_encoded().all(|(encoded, _, value)| {
                    r.get_encoded(encoded)
                        .map_or(false, |other| loosely_equal(value, other, mode))
                })
        }
        _ => strictly_equal(left, right),
    }
}

fn all_loosely_equal(left: &[Term], right: &[Term], mode: NumericComparison) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(l, r)| loosely_equal(l, r, mode))
}

/// Orders two numbers by value. Returns `None` for non-numbers and NaN.
pub fn compare_numbers(left: &Term, right: &Term, mode: NumericComparison) -> Option<Ordering> {
    match (left, right) {
        (Term::Integer(l), Term::Integer(r)) => Some(l.cmp(r)),
        (Term::Float(l), Term::Float(r)) => l.partial_cmp(r),
        (Term::Integer(i), Term::Float(f)) => compare_integer_float(i, *f, mode),
        (Term::Float(f), Term::Integer(i)) => {
            compare_integer_float(i, *f, mode).map(Ordering::reverse)
        }
        _ => None,
    }
}

fn compare_integer_float(integer: &BigInt, float: f64, mode: NumericComparison) -> Option<Ordering> {
    match mode {
        NumericComparison::Approximate => integer.to_f64()?.partial_cmp(&float),
        NumericComparison::Exact => {
            if float.is_nan() {
                return None;
            }
            if float.is_infinite() {
                return Some(if float > 0.0 { Ordering::Less } else { Ordering::Greater });
            }
            let floor = float.floor();
            let floor_int = BigInt::from_f64(floor)?;
            match integer.cmp(&floor_int) {
                Ordering::Equal if float > floor => Some(Ordering::Less),
                ordering => Some(ordering),
            }
        }
    }
}
