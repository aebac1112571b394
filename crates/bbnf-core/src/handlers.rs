//! Semantic-action binding.
//!
//! Handlers are registered by element name in a [`HandlerRegistry`], then
//! bound to a concrete grammar with [`HandlerRegistry::bind`], which resolves
//! names into per-element slots. Elements whose name has no registered
//! handler keep a no-op default that evaluates to `V::default()`.
//!
//! The engine is value-polymorphic over a single handler-output type `V`;
//! what `V` is belongs entirely to the grammar author.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::EvalError;
use crate::grammar::{ElementId, Grammar};
use crate::match_tree::MatchNode;

/// A semantic action bound to an element. Receives the element's single
/// child match and the handler table for recursive evaluation.
pub type Handler<V> = Rc<dyn Fn(&MatchNode, &Handlers<V>) -> Result<V, EvalError>>;

/// Handlers keyed by element name, not yet tied to any grammar.
///
/// This is the registration API: callers that generate a parser from grammar
/// source supply one of these, and elements are looked up in it by name when
/// the grammar is finalized.
pub struct HandlerRegistry<V> {
    handlers: IndexMap<String, Handler<V>>,
}

impl<V> HandlerRegistry<V> {
    pub fn new() -> Self {
        Self { handlers: IndexMap::new() }
    }

    /// Register `handler` for the element named `name`. Re-inserting a name
    /// replaces the previous handler.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        handler: impl Fn(&MatchNode, &Handlers<V>) -> Result<V, EvalError> + 'static,
    ) {
        self.handlers.insert(name.into(), Rc::new(handler));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Resolve names against `grammar`, producing per-element handler slots.
    /// Registered names that match no element are ignored.
    pub fn bind(&self, grammar: &Grammar) -> Handlers<V> {
        Handlers {
            slots: grammar
                .iter()
                .map(|(_, name)| self.handlers.get(name).cloned())
                .collect(),
        }
    }
}

impl<V> Default for HandlerRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for HandlerRegistry<V> {
    fn clone(&self) -> Self {
        Self { handlers: self.handlers.clone() }
    }
}

/// A registry bound to one grammar: handler slots indexed by element handle.
pub struct Handlers<V> {
    slots: Vec<Option<Handler<V>>>,
}

impl<V> Handlers<V> {
    /// An all-default table for `grammar`: every element evaluates to the
    /// null value.
    pub fn none(grammar: &Grammar) -> Self {
        Self { slots: vec![None; grammar.len()] }
    }

    pub(crate) fn get(&self, id: ElementId) -> Option<&Handler<V>> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }
}

impl<V> Clone for Handlers<V> {
    fn clone(&self) -> Self {
        Self { slots: self.slots.clone() }
    }
}
