//! Self-hosted grammar-definition language over `bbnf-core`.
//!
//! - `grammar` - the definition language's own grammar, written in the
//!   algebra it generates grammars for
//! - `handlers` - semantic actions that fold a parsed definition file into
//!   a fresh grammar with user handlers bound by element name
//! - `meta` - the [`MetaParser`] facade: feed source, parse, get a parser
//! - `escape` - escape-sequence decoding for quoted literals
//!
//! The bootstrap is reflexive: the meta-parser is itself an ordinary parser
//! over an ordinary grammar, and the parsers it produces are the same shell
//! it runs on.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod escape;
mod grammar;
mod handlers;
mod meta;
mod value;

#[cfg(test)]
mod escape_tests;
#[cfg(test)]
mod bootstrap_tests;

pub use bbnf_core::{
    EvalError, GrammarError, HandlerRegistry, Handlers, Limits, MatchError, MatchNode, ParseError,
    Parser, UndefinedElementError,
};
pub use meta::MetaParser;

/// Errors from parsing grammar definitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetaError {
    /// The definitions assemble into an invalid grammar.
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// The definition source itself does not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A semantic action rejected an otherwise well-formed parse.
    #[error(transparent)]
    Eval(#[from] EvalError),
}
