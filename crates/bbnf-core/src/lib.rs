//! Core engine for BBNF grammars: the node algebra, the matcher, and the
//! parser shell.
//!
//! - `grammar` - grammar nodes, combinators, and the element symbol table
//! - `match_tree` - structured match results and handler evaluation
//! - `handlers` - semantic-action registration and per-grammar binding
//! - `engine` - the `match(buffer, index)` protocol, limits, and tracing
//! - `parser` - feed/clear/parse over one grammar
//! - `error` - construction, matching, and evaluation error types
//!
//! Matching is PEG-flavored: alternations commit to the first success in
//! declaration order and repetitions are greedy, so authors order
//! alternatives longest-first. Grammars are immutable once built and safe to
//! share; each parse owns its buffer and its match tree.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;
pub mod error;
pub mod grammar;
pub mod handlers;
pub mod match_tree;
pub mod parser;


pub use engine::{Limits, Matcher, NoopTracer, PrintTracer, Tracer};
pub use error::{
    EvalError, GrammarError, MatchError, MatchFailure, ParseError, UndefinedElementError,
};
pub use grammar::{ElementId, Expr, Grammar, GrammarBuilder, classes};
pub use handlers::{Handler, HandlerRegistry, Handlers};
pub use match_tree::MatchNode;
pub use parser::Parser;
