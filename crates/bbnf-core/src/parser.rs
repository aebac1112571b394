//! The parser shell: a grammar, a handler table, and an input buffer.

use std::fmt;
use std::sync::Arc;

use crate::engine::{Limits, Matcher, NoopTracer, Tracer};
use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::handlers::Handlers;

/// A ready-to-run parser over one grammar.
///
/// The grammar graph is shared, immutable data; the buffer is owned by this
/// instance and released on [`Parser::clear`] or drop. To parse the same
/// grammar from several threads, give each thread its own instance (the
/// handler table is per-instance).
pub struct Parser<V> {
    grammar: Arc<Grammar>,
    handlers: Handlers<V>,
    name: String,
    limits: Limits,
    buf: String,
}

impl<V> Parser<V> {
    pub fn new(grammar: Arc<Grammar>, handlers: Handlers<V>) -> Self {
        Self {
            grammar,
            handlers,
            name: "CustomParser".to_string(),
            limits: Limits::default(),
            buf: String::new(),
        }
    }

    /// Set the parser's display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the runtime limits used by [`Parser::parse`].
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Append input to the buffer.
    pub fn feed(&mut self, data: &str) {
        self.buf.push_str(data);
    }

    /// Empty the buffer.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl<V: Default> Parser<V> {
    /// Match the main element against the whole buffer and fold the match
    /// tree through the bound handlers.
    ///
    /// The main element must consume everything fed so far; leftover input is
    /// [`ParseError::TrailingInput`]. Handlers run only after a fully
    /// successful match, never on a partial tree.
    pub fn parse(&self) -> Result<V, ParseError> {
        self.parse_traced(&mut NoopTracer)
    }

    /// Same as [`Parser::parse`], logging every engine step to `tracer`.
    pub fn parse_traced<T: Tracer>(&self, tracer: &mut T) -> Result<V, ParseError> {
        let mut matcher =
            Matcher::with_tracer(&self.grammar, &self.buf, tracer).with_limits(self.limits);
        let (node, end) = matcher.run()?;
        if end != self.buf.len() {
            return Err(ParseError::TrailingInput { consumed: end, total: self.buf.len() });
        }
        Ok(node.evaluate(&self.handlers)?)
    }
}

impl<V> Clone for Parser<V> {
    fn clone(&self) -> Self {
        Self {
            grammar: Arc::clone(&self.grammar),
            handlers: self.handlers.clone(),
            name: self.name.clone(),
            limits: self.limits,
            buf: self.buf.clone(),
        }
    }
}

impl<V> fmt::Debug for Parser<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("name", &self.name)
            .field("grammar", &self.grammar)
            .field("buf", &self.buf)
            .finish_non_exhaustive()
    }
}
