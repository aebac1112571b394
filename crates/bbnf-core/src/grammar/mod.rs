//! Grammar objects: an element symbol table plus a designated main element.
//!
//! - [`Expr`] - the node algebra (see `expr`)
//! - [`GrammarBuilder`] - assembles elements and their definitions
//! - [`Grammar`] - the frozen result handed to the matching engine
//!
//! Elements are the only cycle carriers in a grammar. Composite nodes own
//! their children outright, while element references are [`ElementId`]
//! handles into the table owned here, so recursive grammars need no shared
//! ownership and no interior mutability.

use indexmap::IndexMap;

use crate::error::GrammarError;

mod expr;
pub mod classes;

pub use expr::Expr;

#[cfg(test)]
mod expr_tests;

/// Handle of a named element within one grammar. Handles are only
/// meaningful for the grammar whose builder issued them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub(crate) usize);

/// A named element slot. The definition is written at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct Element {
    definition: Option<Expr>,
}

/// Assembles a [`Grammar`]. Elements may be referenced before they are
/// defined, which is how recursive and mutually recursive grammars are
/// spelled; whatever is still undefined when the grammar is frozen fails at
/// parse time with an undefined-element error.
#[derive(Debug, Clone, Default)]
pub struct GrammarBuilder {
    elements: IndexMap<String, Element>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the element named `name`. Name uniqueness holds by
    /// construction: asking twice returns the same handle.
    pub fn element(&mut self, name: &str) -> ElementId {
        if let Some(index) = self.elements.get_index_of(name) {
            return ElementId(index);
        }
        self.elements.insert(name.to_string(), Element::default());
        ElementId(self.elements.len() - 1)
    }

    /// Set the definition of the element named `name`, creating the element
    /// if this is its first mention. Defining an element twice is an error.
    pub fn define(&mut self, name: &str, definition: Expr) -> Result<ElementId, GrammarError> {
        let id = self.element(name);
        // element() just ensured the slot exists
        let Some(slot) = self.elements.get_index_mut(id.0).map(|(_, slot)| slot) else {
            return Err(GrammarError::Redefinition(name.to_string()));
        };
        if slot.definition.is_some() {
            return Err(GrammarError::Redefinition(name.to_string()));
        }
        slot.definition = Some(definition);
        Ok(id)
    }

    pub fn is_defined(&self, id: ElementId) -> bool {
        self.elements
            .get_index(id.0)
            .is_some_and(|(_, slot)| slot.definition.is_some())
    }

    /// Freeze the table into a grammar parsing from `main`.
    pub fn finish(self, main: ElementId) -> Grammar {
        Grammar { elements: self.elements, main }
    }
}

/// A frozen grammar: immutable element table plus the main element that a
/// parse starts from. Pure data; handlers are bound separately, so a grammar
/// can be shared freely across parser instances and threads.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Grammar {
    elements: IndexMap<String, Element>,
    main: ElementId,
}

impl Grammar {
    pub fn main(&self) -> ElementId {
        self.main
    }

    pub fn element_id(&self, name: &str) -> Option<ElementId> {
        self.elements.get_index_of(name).map(ElementId)
    }

    pub fn element_name(&self, id: ElementId) -> Option<&str> {
        self.elements.get_index(id.0).map(|(name, _)| name.as_str())
    }

    /// The element's definition, or `None` if it was never defined.
    pub fn definition(&self, id: ElementId) -> Option<&Expr> {
        self.elements
            .get_index(id.0)
            .and_then(|(_, slot)| slot.definition.as_ref())
    }

    /// Elements in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &str)> {
        self.elements
            .keys()
            .enumerate()
            .map(|(index, name)| (ElementId(index), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Render a node in definition-language syntax, resolving element
    /// handles to their names.
    pub fn render(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(value) => format!("{value:?}"),
            Expr::CharRange { lo, hi, inverted } => {
                format!("{}[{lo:?}-{hi:?}]", invert_mark(*inverted))
            }
            Expr::CharSet { chars, inverted } => {
                let joined: String = chars.iter().collect();
                format!("{}{{{joined:?}}}", invert_mark(*inverted))
            }
            Expr::Concat(parts) => self.render_list(parts, " + "),
            Expr::Alt(parts) => self.render_list(parts, " | "),
            Expr::Repeat { inner, min, max } => match max {
                Some(max) => format!("{} * ({min}, {max})", self.render(inner)),
                None => format!("{} * ({min}, inf)", self.render(inner)),
            },
            Expr::Element(id) => self.element_name(*id).unwrap_or("<unknown>").to_string(),
        }
    }

    /// Render one element as a full `name ::= ...` definition line.
    pub fn expand(&self, id: ElementId) -> Option<String> {
        let (name, slot) = self.elements.get_index(id.0)?;
        let body = match &slot.definition {
            Some(definition) => self.render(definition),
            None => "<undefined>".to_string(),
        };
        Some(format!("{name} ::= {body}"))
    }

    fn render_list(&self, parts: &[Expr], separator: &str) -> String {
        let rendered: Vec<String> = parts.iter().map(|part| self.render(part)).collect();
        format!("({})", rendered.join(separator))
    }
}

fn invert_mark(inverted: bool) -> &'static str {
    if inverted { "~" } else { "" }
}
