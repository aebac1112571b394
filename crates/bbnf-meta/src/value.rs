//! The meta-evaluation value type.
//!
//! Meta-handlers are value-polymorphic over this sum of everything a BBNF
//! rule can fold into: decoded characters and strings, repetition bounds,
//! grammar nodes, element names, and finally the generated parser itself.
//! `V` is the *user* parser's handler-output type, threaded through so the
//! finished [`Parser`] comes out already bound to the user's handlers.

use bbnf_core::{EvalError, Expr, Parser};

pub(crate) enum MetaValue<V> {
    /// The null value; what unbound elements and side-effecting rules yield.
    Null,
    Char(char),
    Str(String),
    Int(u32),
    /// Repetition bounds; `None` is the `inf` spelling.
    Bounds(u32, Option<u32>),
    Expr(Expr),
    /// An element name, as returned by the identifier rule.
    Name(String),
    /// The finished product of the top-level rule.
    Parser(Parser<V>),
}

impl<V> Default for MetaValue<V> {
    fn default() -> Self {
        MetaValue::Null
    }
}

impl<V> MetaValue<V> {
    pub(crate) fn into_char(self) -> Result<char, EvalError> {
        match self {
            MetaValue::Char(c) => Ok(c),
            _ => Err(EvalError::UnexpectedValue { expected: "character" }),
        }
    }

    pub(crate) fn into_str(self) -> Result<String, EvalError> {
        match self {
            MetaValue::Str(s) => Ok(s),
            _ => Err(EvalError::UnexpectedValue { expected: "string" }),
        }
    }

    pub(crate) fn into_int(self) -> Result<u32, EvalError> {
        match self {
            MetaValue::Int(n) => Ok(n),
            _ => Err(EvalError::UnexpectedValue { expected: "integer" }),
        }
    }

    pub(crate) fn into_expr(self) -> Result<Expr, EvalError> {
        match self {
            MetaValue::Expr(expr) => Ok(expr),
            _ => Err(EvalError::UnexpectedValue { expected: "grammar node" }),
        }
    }

    pub(crate) fn into_name(self) -> Result<String, EvalError> {
        match self {
            MetaValue::Name(name) => Ok(name),
            _ => Err(EvalError::UnexpectedValue { expected: "element name" }),
        }
    }

    pub(crate) fn into_parser(self) -> Result<Parser<V>, EvalError> {
        match self {
            MetaValue::Parser(parser) => Ok(parser),
            _ => Err(EvalError::UnexpectedValue { expected: "parser" }),
        }
    }
}
