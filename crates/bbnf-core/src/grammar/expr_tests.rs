//! Construction and combinator tests for the node algebra.

use crate::error::GrammarError;
use crate::grammar::Expr;

#[test]
fn empty_literal_is_rejected() {
    let err = Expr::lit("").unwrap_err();
    assert_eq!(err, GrammarError::EmptyLiteral);
    insta::assert_snapshot!(err.to_string(), @"literal must be non-empty");
}

#[test]
fn range_bounds_must_be_ordered() {
    let err = Expr::char_range('z', 'a').unwrap_err();
    assert_eq!(err, GrammarError::InvalidRange { lo: 'z', hi: 'a' });
    assert!(Expr::char_range('a', 'a').is_ok());
}

#[test]
fn char_set_collapses_duplicates() {
    let Expr::CharSet { chars, inverted } = Expr::char_set("aabba".chars()) else {
        panic!("expected a char set");
    };
    assert_eq!(chars.len(), 2);
    assert!(!inverted);
}

#[test]
fn empty_composites_are_rejected() {
    assert_eq!(Expr::concat(Vec::new()).unwrap_err(), GrammarError::EmptyConcatenation);
    assert_eq!(Expr::alt(Vec::new()).unwrap_err(), GrammarError::EmptyAlternation);
}

#[test]
fn single_child_alternation_collapses() {
    let lit = Expr::lit("a").unwrap();
    assert_eq!(Expr::alt(vec![lit.clone()]).unwrap(), lit);
}

#[test]
fn single_child_concatenation_is_preserved() {
    let lit = Expr::lit("a").unwrap();
    let concat = Expr::concat(vec![lit]).unwrap();
    assert!(matches!(concat, Expr::Concat(ref parts) if parts.len() == 1));
}

#[test]
fn then_flattens_left_associative_chains() {
    let chained = Expr::lit("a")
        .unwrap()
        .then(Expr::lit("b").unwrap())
        .then(Expr::lit("c").unwrap());
    let Expr::Concat(parts) = chained else {
        panic!("expected a concatenation");
    };
    assert_eq!(parts.len(), 3);
}

#[test]
fn or_flattens_left_but_keeps_a_nested_right() {
    let chained = Expr::lit("a")
        .unwrap()
        .or(Expr::lit("b").unwrap())
        .or(Expr::lit("c").unwrap());
    let Expr::Alt(parts) = chained else {
        panic!("expected an alternation");
    };
    assert_eq!(parts.len(), 3);

    // a deliberately grouped right-hand alternation stays a single branch,
    // because the chosen-alternative index is positional
    let grouped = Expr::alt(vec![Expr::lit("b").unwrap(), Expr::lit("c").unwrap()]).unwrap();
    let outer = Expr::lit("a").unwrap().or(grouped);
    let Expr::Alt(parts) = outer else {
        panic!("expected an alternation");
    };
    assert_eq!(parts.len(), 2);
    assert!(matches!(parts[1], Expr::Alt(_)));
}

#[test]
fn bounded_repetition_validates_order() {
    let digit = Expr::char_range('0', '9').unwrap();
    let err = Expr::repeat(digit.clone(), 3, Some(2)).unwrap_err();
    assert_eq!(err, GrammarError::InvalidBounds { min: 3, max: 2 });
    assert!(Expr::repeat(digit, 2, Some(2)).is_ok());
}

#[test]
fn integer_shorthand_expands_to_n_and_n_plus_one() {
    let Expr::Repeat { min, max, .. } = Expr::lit("x").unwrap().times(3) else {
        panic!("expected a repetition");
    };
    assert_eq!((min, max), (3, Some(4)));
}

#[test]
fn invert_toggles_and_round_trips() {
    let set = Expr::char_set("ab".chars());
    let inverted = set.clone().invert().unwrap();
    assert!(matches!(inverted, Expr::CharSet { inverted: true, .. }));
    assert_eq!(inverted.invert().unwrap(), set);
}

#[test]
fn only_character_classes_invert() {
    let err = Expr::lit("a").unwrap().invert().unwrap_err();
    assert_eq!(err, GrammarError::NotInvertible);
}

#[test]
fn values_lift_into_nodes() {
    assert!(matches!(Expr::try_from("ab").unwrap(), Expr::Literal(_)));
    assert!(matches!(
        Expr::try_from(('a', 'z')).unwrap(),
        Expr::CharRange { .. }
    ));
    assert!(Expr::try_from("").is_err());
}
