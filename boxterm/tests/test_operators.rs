mod common;

use boxterm::runtime::operators::*;
use boxterm::runtime::NumericComparison;
use boxterm::{RuntimeError, Term};
use common::{int, ints};

const APPROX: NumericComparison = NumericComparison::Approximate;

#[test]
fn test_cons_and_concatenation() {
    assert_eq!(cons(int(1), ints(&[2, 3])), ints(&[1, 2, 3]));
    assert_eq!(
        cons(int(1), int(2)),
        Term::improper_list(vec![int(1)], int(2))
    );
    assert_eq!(
        list_concatenation(&ints(&[1, 2]), &ints(&[3])).unwrap(),
        ints(&[1, 2, 3])
    );
    assert_eq!(
        list_concatenation(&ints(&[1]), &int(2)).unwrap(),
        Term::improper_list(vec![int(1)], int(2))
    );
    assert!(list_concatenation(&int(1), &ints(&[])).is_err());
}

#[test]
fn test_list_subtraction_removes_first_occurrence() {
    assert_eq!(
        list_subtraction(&ints(&[1, 2, 1, 3]), &ints(&[1, 3])).unwrap(),
        ints(&[2, 1])
    );
    assert_eq!(
        list_subtraction(&ints(&[1]), &Term::list(vec![Term::float(1.0)])).unwrap(),
        ints(&[1])
    );
}

#[test]
fn test_arithmetic_result_types() {
    assert_eq!(addition(&int(1), &int(2)).unwrap(), int(3));
    assert_eq!(addition(&int(1), &Term::float(2.0)).unwrap(), Term::float(3.0));
    assert_eq!(subtraction(&int(1), &int(3)).unwrap(), int(-2));
    assert_eq!(multiplication(&int(2), &int(3)).unwrap(), int(6));
    assert_eq!(division(&int(1), &int(2)).unwrap(), Term::float(0.5));
    assert_eq!(division(&int(4), &int(2)).unwrap(), Term::float(2.0));
}

#[test]
fn test_arithmetic_errors() {
    assert_eq!(division(&int(1), &int(0)), Err(RuntimeError::ArithmeticError));
    assert_eq!(
        division(&int(1), &Term::float(0.0)),
        Err(RuntimeError::ArithmeticError)
    );
    let err = addition(&int(1), &Term::atom("a")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "(ArithmeticError) bad argument in arithmetic expression"
    );
}

#[test]
fn test_big_integer_arithmetic_is_exact() {
    let big = Term::integer(9_007_199_254_740_993i64);
    assert_eq!(
        addition(&big, &int(1)).unwrap(),
        Term::integer(9_007_199_254_740_994i64)
    );
    assert_eq!(
        unary_negative(&big).unwrap(),
        Term::integer(-9_007_199_254_740_993i64)
    );
}

#[test]
fn test_unary_operators() {
    assert_eq!(unary_negative(&Term::float(1.5)).unwrap(), Term::float(-1.5));
    assert_eq!(unary_positive(&int(3)).unwrap(), int(3));
    assert!(unary_negative(&Term::atom("a")).is_err());
}

#[test]
fn test_comparisons() {
    assert_eq!(less_than(&int(1), &Term::float(1.5), APPROX).unwrap(), Term::boolean(true));
    assert_eq!(less_than_or_equal(&int(2), &int(2), APPROX).unwrap(), Term::boolean(true));
    assert_eq!(greater_than(&int(2), &int(2), APPROX).unwrap(), Term::boolean(false));
    assert_eq!(
        greater_than_or_equal(&Term::float(2.0), &int(2), APPROX).unwrap(),
        Term::boolean(true)
    );
}

#[test]
fn test_comparison_of_non_numbers_is_not_yet_implemented() {
    let err = less_than(&int(1), &Term::atom("a"), APPROX).unwrap_err();
    assert_eq!(err.kind(), "NotYetImplementedError");
    assert!(err.message().contains(":a"));
    assert!(err.message().contains('<'));
}

#[test]
fn test_equality_operators() {
    assert_eq!(equal_to(&int(1), &Term::float(1.0), APPROX), Term::boolean(true));
    assert_eq!(not_equal_to(&int(1), &int(2), APPROX), Term::boolean(true));
    assert_eq!(strictly_equal_to(&int(1), &Term::float(1.0)), Term::boolean(false));
    assert_eq!(
        strictly_not_equal_to(&int(1), &Term::float(1.0)),
        Term::boolean(true)
    );
}

#[test]
fn test_relaxed_boolean_operators_short_circuit() {
    let result = relaxed_boolean_and(Term::nil(), || panic!("right side evaluated")).unwrap();
    assert_eq!(result, Term::nil());
    assert_eq!(
        relaxed_boolean_and(int(1), || Ok(int(2))).unwrap(),
        int(2)
    );
    let result = relaxed_boolean_or(int(1), || panic!("right side evaluated")).unwrap();
    assert_eq!(result, int(1));
    assert_eq!(
        relaxed_boolean_or(Term::boolean(false), || Ok(Term::atom("b"))).unwrap(),
        Term::atom("b")
    );
    assert_eq!(relaxed_boolean_not(&Term::nil()), Term::boolean(true));
    assert_eq!(relaxed_boolean_not(&int(0)), Term::boolean(false));
}

#[test]
fn test_membership() {
    assert_eq!(membership(&int(2), &ints(&[1, 2])).unwrap(), Term::boolean(true));
    assert_eq!(
        membership(&Term::float(2.0), &ints(&[1, 2])).unwrap(),
        Term::boolean(false)
    );
    let map = Term::map_from_pairs(vec![(Term::atom("a"), int(1))]);
    assert_eq!(
        membership(&Term::tuple(vec![Term::atom("a"), int(1)]), &map).unwrap(),
        Term::boolean(true)
    );
}

#[test]
fn test_dot_access() {
    let map = Term::map_from_pairs(vec![(Term::atom("a"), int(1))]);
    assert_eq!(dot(&map, &Term::atom("a")).unwrap(), int(1));
    let err = dot(&map, &Term::atom("b")).unwrap_err();
    assert_eq!(err.to_string(), "(KeyError) key :b not found in: %{a: 1}");
    let err = dot(&int(1), &Term::atom("a")).unwrap_err();
    assert_eq!(err, RuntimeError::BadMapError(int(1)));
}

#[test]
fn test_count_head_and_tail() {
    assert_eq!(count(&ints(&[1, 2, 3])).unwrap(), int(3));
    assert_eq!(head(&ints(&[1, 2])).unwrap(), int(1));
    assert_eq!(tail(&ints(&[1, 2])).unwrap(), ints(&[2]));
    assert_eq!(
        tail(&Term::improper_list(vec![int(1)], int(2))).unwrap(),
        int(2)
    );
    let err = head(&ints(&[])).unwrap_err();
    assert_eq!(
        err.message(),
        "errors were found at the given arguments:\n\n  * 1st argument: not a nonempty list\n"
    );
}
