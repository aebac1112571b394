//! The grammar algebra: a closed set of composable node kinds.
//!
//! Nodes are built through the validating constructors ([`Expr::lit`],
//! [`Expr::concat`], ...) or the combinator methods ([`Expr::then`],
//! [`Expr::or`], [`Expr::repeated`]). Composite nodes own their children;
//! the only back-references in a grammar go through [`Expr::Element`]
//! handles, which is how recursive grammars stay acyclic in ownership.

use std::collections::BTreeSet;

use crate::error::GrammarError;
use crate::grammar::ElementId;

/// A grammar node.
///
/// Invariants are maintained by the constructors: literals are non-empty,
/// range bounds are in code-point order, bounded repetitions have
/// `max >= min`, and concatenations/alternations are non-empty. `max: None`
/// denotes an unbounded repetition; a bounded `max` is an inclusive count.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Expr {
    Literal(String),
    CharRange { lo: char, hi: char, inverted: bool },
    CharSet { chars: BTreeSet<char>, inverted: bool },
    Concat(Vec<Expr>),
    Alt(Vec<Expr>),
    Repeat { inner: Box<Expr>, min: u32, max: Option<u32> },
    Element(ElementId),
}

impl Expr {
    /// A literal string node. The empty string is rejected.
    pub fn lit(value: impl Into<String>) -> Result<Expr, GrammarError> {
        let value = value.into();
        if value.is_empty() {
            return Err(GrammarError::EmptyLiteral);
        }
        Ok(Expr::Literal(value))
    }

    /// An inclusive character range. Bounds must satisfy `lo <= hi`.
    pub fn char_range(lo: char, hi: char) -> Result<Expr, GrammarError> {
        if lo > hi {
            return Err(GrammarError::InvalidRange { lo, hi });
        }
        Ok(Expr::CharRange { lo, hi, inverted: false })
    }

    /// A character set node. Duplicates collapse; the empty set is allowed
    /// (it matches nothing, or any character once inverted).
    pub fn char_set(chars: impl IntoIterator<Item = char>) -> Expr {
        Expr::CharSet {
            chars: chars.into_iter().collect(),
            inverted: false,
        }
    }

    /// An n-ary concatenation of at least one child.
    pub fn concat(parts: Vec<Expr>) -> Result<Expr, GrammarError> {
        if parts.is_empty() {
            return Err(GrammarError::EmptyConcatenation);
        }
        Ok(Expr::Concat(parts))
    }

    /// An n-ary ordered alternation. A single child collapses to itself;
    /// nested alternations are kept as-is, since the chosen-alternative
    /// index reported at match time is positional.
    pub fn alt(mut parts: Vec<Expr>) -> Result<Expr, GrammarError> {
        match parts.len() {
            0 => Err(GrammarError::EmptyAlternation),
            1 => Ok(parts.remove(0)),
            _ => Ok(Expr::Alt(parts)),
        }
    }

    /// A repetition of `inner`, between `min` and `max` times inclusive.
    /// `max: None` means unbounded.
    pub fn repeat(inner: Expr, min: u32, max: Option<u32>) -> Result<Expr, GrammarError> {
        if let Some(max) = max {
            if max < min {
                return Err(GrammarError::InvalidBounds { min, max });
            }
        }
        Ok(Expr::Repeat { inner: Box::new(inner), min, max })
    }

    /// A by-handle reference to a named element of the owning grammar.
    pub fn element(id: ElementId) -> Expr {
        Expr::Element(id)
    }

    /// Concatenate, flattening a left-hand concatenation so that chained
    /// calls build one n-ary node.
    pub fn then(self, other: Expr) -> Expr {
        match self {
            Expr::Concat(mut parts) => {
                parts.push(other);
                Expr::Concat(parts)
            }
            first => Expr::Concat(vec![first, other]),
        }
    }

    /// Alternate, flattening a left-hand alternation the same way
    /// [`Expr::then`] flattens concatenations.
    pub fn or(self, other: Expr) -> Expr {
        match self {
            Expr::Alt(mut parts) => {
                parts.push(other);
                Expr::Alt(parts)
            }
            first => Expr::Alt(vec![first, other]),
        }
    }

    /// Repeat between `min` and `max` times. See [`Expr::repeat`].
    pub fn repeated(self, min: u32, max: Option<u32>) -> Result<Expr, GrammarError> {
        Expr::repeat(self, min, max)
    }

    /// The integer repetition shorthand: `g.times(n)` expands to
    /// `(n, n + 1)`, not `(n, n)`. One extra occurrence is consumed when
    /// present; spell the bounds out with [`Expr::repeated`] for an exact
    /// count.
    pub fn times(self, n: u32) -> Expr {
        Expr::Repeat {
            inner: Box::new(self),
            min: n,
            max: Some(n.saturating_add(1)),
        }
    }

    /// Toggle the `inverted` flag on a character range or set.
    pub fn invert(self) -> Result<Expr, GrammarError> {
        match self {
            Expr::CharRange { lo, hi, inverted } => {
                Ok(Expr::CharRange { lo, hi, inverted: !inverted })
            }
            Expr::CharSet { chars, inverted } => {
                Ok(Expr::CharSet { chars, inverted: !inverted })
            }
            _ => Err(GrammarError::NotInvertible),
        }
    }

    /// Short node-kind label, used by tracers.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Literal(_) => "literal",
            Expr::CharRange { .. } => "char-range",
            Expr::CharSet { .. } => "char-set",
            Expr::Concat(_) => "concat",
            Expr::Alt(_) => "alt",
            Expr::Repeat { .. } => "repeat",
            Expr::Element(_) => "element",
        }
    }
}

/// Value-lift: a raw string is a literal node.
impl TryFrom<&str> for Expr {
    type Error = GrammarError;

    fn try_from(value: &str) -> Result<Self, GrammarError> {
        Expr::lit(value)
    }
}

/// Value-lift: a pair of characters is an inclusive range.
impl TryFrom<(char, char)> for Expr {
    type Error = GrammarError;

    fn try_from((lo, hi): (char, char)) -> Result<Self, GrammarError> {
        Expr::char_range(lo, hi)
    }
}
