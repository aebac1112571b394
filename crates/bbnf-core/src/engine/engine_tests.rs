//! Matching-protocol tests, one behavior each.

use crate::engine::{Limits, Matcher};
use crate::error::MatchFailure;
use crate::grammar::{Expr, Grammar, GrammarBuilder, classes};
use crate::match_tree::MatchNode;

fn single(definition: Expr) -> Grammar {
    let mut builder = GrammarBuilder::new();
    let main = builder.define("main", definition).unwrap();
    builder.finish(main)
}

fn run(grammar: &Grammar, input: &str) -> Result<(MatchNode, usize), MatchFailure> {
    Matcher::new(grammar, input).run()
}

#[test]
fn literal_consumes_its_own_length() {
    let grammar = single(Expr::lit("abc").unwrap());
    let (node, end) = run(&grammar, "abcdef").unwrap();
    assert_eq!(end, 3);
    assert_eq!(node.text(), "abc");
}

#[test]
fn literal_mismatch_reports_offset() {
    let grammar = single(Expr::lit("abc").unwrap());
    let err = run(&grammar, "abx").unwrap_err();
    let MatchFailure::Mismatch(e) = err else {
        panic!("expected mismatch, got {err:?}");
    };
    assert_eq!(e.at, 0);
}

#[test]
fn char_range_consumes_one_char() {
    let grammar = single(Expr::char_range('a', 'z').unwrap());
    let (node, end) = run(&grammar, "q").unwrap();
    assert_eq!((node.text().as_str(), end), ("q", 1));
    assert!(run(&grammar, "Q").is_err());
}

#[test]
fn inverted_char_range_flips_membership() {
    let grammar = single(Expr::char_range('a', 'z').unwrap().invert().unwrap());
    assert!(run(&grammar, "a").is_err());
    let (node, _) = run(&grammar, "Q").unwrap();
    assert_eq!(node.text(), "Q");
}

#[test]
fn char_set_membership() {
    let grammar = single(Expr::char_set("+-".chars()));
    assert!(run(&grammar, "+").is_ok());
    assert!(run(&grammar, "-").is_ok());
    assert!(run(&grammar, "*").is_err());
}

#[test]
fn inverted_char_set_rejects_members_only() {
    let grammar = single(Expr::char_set("\n".chars()).invert().unwrap());
    assert!(run(&grammar, "x").is_ok());
    assert!(run(&grammar, "\n").is_err());
}

#[test]
fn char_classes_fail_at_end_of_input() {
    let grammar = single(Expr::char_set("x".chars()).invert().unwrap());
    // even inverted classes need a character to consume
    assert!(run(&grammar, "").is_err());
}

#[test]
fn concatenation_threads_the_index() {
    let grammar = single(
        Expr::lit("ab").unwrap().then(classes::digit()).then(Expr::lit("!").unwrap()),
    );
    let (node, end) = run(&grammar, "ab7!").unwrap();
    assert_eq!(end, 4);
    assert_eq!(node.text(), "ab7!");
}

#[test]
fn alternation_takes_first_success_in_declaration_order() {
    let grammar = single(Expr::lit("ab").unwrap().or(Expr::lit("a").unwrap()));
    let (node, end) = run(&grammar, "ab").unwrap();
    let (index, _) = node.inner().unwrap().choice().unwrap();
    assert_eq!((index, end), (0, 2));
}

#[test]
fn alternation_commits_even_when_a_later_branch_is_longer() {
    // swapped order: the short branch shadows the long one
    let grammar = single(Expr::lit("a").unwrap().or(Expr::lit("ab").unwrap()));
    let (node, end) = run(&grammar, "ab").unwrap();
    let (index, _) = node.inner().unwrap().choice().unwrap();
    assert_eq!((index, end), (0, 1));
}

#[test]
fn alternation_reports_furthest_failure() {
    let first = Expr::lit("a").unwrap().then(Expr::lit("x").unwrap());
    let grammar = single(first.or(Expr::lit("b").unwrap()));
    let err = run(&grammar, "ab").unwrap_err();
    let MatchFailure::Mismatch(e) = err else {
        panic!("expected mismatch, got {err:?}");
    };
    assert_eq!(e.at, 1);
}

#[test]
fn empty_alternation_always_fails() {
    // not constructible through the public API, but representable
    let grammar = single(Expr::Alt(Vec::new()));
    assert!(run(&grammar, "anything").is_err());
    assert!(run(&grammar, "").is_err());
}

#[test]
fn repetition_is_greedy() {
    let grammar = single(Expr::repeat(classes::digit(), 1, None).unwrap());
    let (node, end) = run(&grammar, "42x").unwrap();
    assert_eq!(end, 2);
    assert_eq!(node.text(), "42");
}

#[test]
fn repetition_mandatory_failure_propagates() {
    let grammar = single(Expr::repeat(classes::digit(), 2, None).unwrap());
    assert!(run(&grammar, "4x").is_err());
}

#[test]
fn repetition_respects_the_upper_bound() {
    let grammar = single(Expr::repeat(Expr::lit("x").unwrap(), 0, Some(2)).unwrap());
    let (_, end) = run(&grammar, "xxx").unwrap();
    assert_eq!(end, 2);
}

#[test]
fn repetition_never_backtracks_for_a_sibling() {
    // greedy a* swallows every 'a', so the trailing literal cannot match
    let rep = Expr::repeat(Expr::lit("a").unwrap(), 0, None).unwrap();
    let grammar = single(rep.then(Expr::lit("a").unwrap()));
    assert!(run(&grammar, "aaa").is_err());
}

#[test]
fn repetition_produces_a_flat_concatenation() {
    let grammar = single(Expr::repeat(classes::digit(), 1, None).unwrap());
    let (node, _) = run(&grammar, "123").unwrap();
    let inner = node.inner().unwrap();
    assert_eq!(inner.children().len(), 3);
    assert_eq!(inner.child(1).unwrap().text(), "2");
}

#[test]
fn undefined_element_is_fatal() {
    let mut builder = GrammarBuilder::new();
    let ghost = builder.element("ghost");
    let main = builder.define("main", Expr::element(ghost)).unwrap();
    let grammar = builder.finish(main);
    let err = run(&grammar, "input").unwrap_err();
    let MatchFailure::Undefined(e) = err else {
        panic!("expected undefined element, got {err:?}");
    };
    assert_eq!(e.name, "ghost");
}

#[test]
fn undefined_element_is_not_caught_by_alternation() {
    let mut builder = GrammarBuilder::new();
    let ghost = builder.element("ghost");
    let main = builder
        .define("main", Expr::element(ghost).or(Expr::lit("fallback").unwrap()))
        .unwrap();
    let grammar = builder.finish(main);
    assert!(matches!(
        run(&grammar, "fallback").unwrap_err(),
        MatchFailure::Undefined(_)
    ));
}

#[test]
fn recursive_elements_match_nested_input() {
    // wrapped ::= "(" wrapped ")" | "x"
    let mut builder = GrammarBuilder::new();
    let wrapped = builder.element("wrapped");
    let nested = Expr::lit("(")
        .unwrap()
        .then(Expr::element(wrapped))
        .then(Expr::lit(")").unwrap());
    let main = builder
        .define("wrapped", nested.or(Expr::lit("x").unwrap()))
        .unwrap();
    let grammar = builder.finish(main);
    let (node, end) = run(&grammar, "(((x)))").unwrap();
    assert_eq!(end, 7);
    assert_eq!(node.text(), "(((x)))");
}

#[test]
fn mutual_recursion_without_progress_hits_the_recursion_limit() {
    let mut builder = GrammarBuilder::new();
    let y = builder.element("y");
    let x = builder.define("x", Expr::element(y)).unwrap();
    builder.define("y", Expr::element(x)).unwrap();
    let grammar = builder.finish(x);
    assert!(matches!(
        run(&grammar, "anything").unwrap_err(),
        MatchFailure::RecursionLimitExceeded
    ));
}

#[test]
fn exec_fuel_bounds_the_run() {
    let grammar = single(Expr::repeat(classes::digit(), 0, None).unwrap());
    let input = "1234567890".repeat(4);
    let err = Matcher::new(&grammar, &input)
        .with_limits(Limits::new().exec_fuel(5))
        .run()
        .unwrap_err();
    assert!(matches!(err, MatchFailure::FuelExhausted));
}

#[test]
fn rendering_round_trips_the_consumed_input() {
    let number = Expr::repeat(classes::digit(), 1, None).unwrap();
    let tail = Expr::char_set("+-".chars()).then(number.clone());
    let grammar = single(number.then(Expr::repeat(tail, 0, None).unwrap()));
    let input = "12+34-5";
    let (node, end) = run(&grammar, input).unwrap();
    assert_eq!(node.to_string(), &input[..end]);
    assert_eq!(end, input.len());
}

#[test]
fn multibyte_input_advances_by_whole_characters() {
    let grammar = single(Expr::repeat(Expr::char_set("é".chars()), 1, None).unwrap());
    let (node, end) = run(&grammar, "éé").unwrap();
    assert_eq!(end, "éé".len());
    assert_eq!(node.text(), "éé");
}

#[test]
fn check_is_exclusive_and_exhaustive_against_its_inversion() {
    let range = Expr::char_range('a', 'z').unwrap();
    let inverted = range.clone().invert().unwrap();
    let grammar = single(range.clone());
    let input = "aQz9é";
    let mut matcher = Matcher::new(&grammar, input);
    for (at, _) in input.char_indices() {
        let plain = matcher.check(&range, at);
        let flipped = matcher.check(&inverted, at);
        assert!(plain != flipped, "duality broken at offset {at}");
    }
}

#[test]
fn check_on_composites_attempts_the_match() {
    let concat = Expr::lit("ab").unwrap().then(classes::digit());
    let grammar = single(concat.clone());
    let mut matcher = Matcher::new(&grammar, "ab7");
    assert!(matcher.check(&concat, 0));
    let mut matcher = Matcher::new(&grammar, "abx");
    assert!(!matcher.check(&concat, 0));
}

#[test]
fn check_on_an_undefined_element_is_false() {
    let mut builder = GrammarBuilder::new();
    let ghost = builder.element("ghost");
    let main = builder.define("main", Expr::element(ghost)).unwrap();
    let grammar = builder.finish(main);
    let expr = Expr::element(ghost);
    assert!(!Matcher::new(&grammar, "x").check(&expr, 0));
}
