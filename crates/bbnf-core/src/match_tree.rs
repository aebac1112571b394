//! Match trees: the structured result of a successful match.
//!
//! The tree mirrors the grammar algebra minus the element-level indirection:
//! repetitions flatten into [`MatchNode::Concat`], and an element match
//! carries the element handle rather than the element itself, so the tree is
//! plain owned data with no back-references into the grammar.
//!
//! A match tree is owned by the parse that produced it, read by handlers
//! during [`MatchNode::evaluate`], and then discarded.

use std::fmt;

use crate::error::EvalError;
use crate::grammar::ElementId;
use crate::handlers::Handlers;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchNode {
    /// Text captured from the buffer by a literal or character-class node.
    Str(String),
    /// Ordered child matches of a concatenation or repetition.
    Concat(Vec<MatchNode>),
    /// The chosen alternative and its zero-based index.
    Alt { index: usize, inner: Box<MatchNode> },
    /// A named element's match. The name and the bound handler are resolved
    /// through the grammar and handler table this handle indexes into.
    Element { element: ElementId, inner: Box<MatchNode> },
}

impl MatchNode {
    /// The consumed text. Equal to the buffer substring this node matched.
    pub fn text(&self) -> String {
        self.to_string()
    }

    /// Child matches: the list for a concatenation, the single inner match
    /// for alternations and elements, nothing for captured text.
    pub fn children(&self) -> &[MatchNode] {
        match self {
            MatchNode::Str(_) => &[],
            MatchNode::Concat(parts) => parts,
            MatchNode::Alt { inner, .. } | MatchNode::Element { inner, .. } => {
                std::slice::from_ref(inner.as_ref())
            }
        }
    }

    pub fn child(&self, index: usize) -> Result<&MatchNode, EvalError> {
        self.children().get(index).ok_or(EvalError::MissingChild(index))
    }

    /// The chosen alternative of an alternation match.
    pub fn choice(&self) -> Result<(usize, &MatchNode), EvalError> {
        match self {
            MatchNode::Alt { index, inner } => Ok((*index, inner.as_ref())),
            _ => Err(EvalError::UnexpectedShape { expected: "alternation" }),
        }
    }

    /// The single wrapped match of an alternation or element node.
    pub fn inner(&self) -> Result<&MatchNode, EvalError> {
        match self {
            MatchNode::Alt { inner, .. } | MatchNode::Element { inner, .. } => Ok(inner.as_ref()),
            _ => Err(EvalError::UnexpectedShape { expected: "alternation or element" }),
        }
    }

    /// Fold this element match through its bound handler.
    ///
    /// The handler receives the element's single child match plus the handler
    /// table, so it can evaluate nested element matches bottom-up. An element
    /// bound to no handler evaluates to the null value `V::default()`. Only
    /// element matches evaluate; handlers reach everything else positionally
    /// through [`MatchNode::child`] and friends.
    pub fn evaluate<V: Default>(&self, handlers: &Handlers<V>) -> Result<V, EvalError> {
        match self {
            MatchNode::Element { element, inner } => match handlers.get(*element) {
                Some(handler) => handler(inner.as_ref(), handlers),
                None => Ok(V::default()),
            },
            _ => Err(EvalError::UnexpectedShape { expected: "element" }),
        }
    }
}

impl fmt::Display for MatchNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchNode::Str(value) => f.write_str(value),
            MatchNode::Concat(parts) => {
                for part in parts {
                    part.fmt(f)?;
                }
                Ok(())
            }
            MatchNode::Alt { inner, .. } | MatchNode::Element { inner, .. } => inner.fmt(f),
        }
    }
}
