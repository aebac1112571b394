//! The meta-parser facade: feed grammar source, get a parser back.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use bbnf_core::{EvalError, HandlerRegistry, ParseError, Parser};

use crate::MetaError;
use crate::handlers::{self, MetaState};
use crate::value::MetaValue;

/// Parses BBNF grammar definitions into ready-to-run parsers.
///
/// `V` is the handler-output type of the *generated* parser. Feed grammar
/// source with [`MetaParser::feed`], optionally register semantic actions
/// by element name, then [`MetaParser::parse`] to fold the definitions into
/// a fresh [`Parser`] with those actions bound.
///
/// ```
/// use bbnf_core::HandlerRegistry;
/// use bbnf_meta::MetaParser;
///
/// let mut registry: HandlerRegistry<i64> = HandlerRegistry::new();
/// registry.insert("number", |m, _| Ok(m.text().parse().unwrap_or(0)));
///
/// let mut meta = MetaParser::new().with_handlers(registry);
/// meta.feed("number ::= ['0'-'9'] * (1, inf)\n");
/// let mut parser = meta.parse().unwrap();
/// parser.feed("417");
/// assert_eq!(parser.parse().unwrap(), 417);
/// ```
pub struct MetaParser<V> {
    buf: String,
    handlers: HandlerRegistry<V>,
}

impl<V: Default + 'static> MetaParser<V> {
    pub fn new() -> Self {
        Self {
            buf: String::new(),
            handlers: HandlerRegistry::new(),
        }
    }

    /// Register the handler provider bound to the generated parser's
    /// elements by name when the grammar is finalized.
    pub fn with_handlers(mut self, handlers: HandlerRegistry<V>) -> Self {
        self.handlers = handlers;
        self
    }

    /// Append grammar source to the buffer.
    pub fn feed(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Append grammar source and register the handler provider in one call.
    pub fn feed_with_handlers(&mut self, text: &str, handlers: HandlerRegistry<V>) {
        self.feed(text);
        self.handlers = handlers;
    }

    /// Empty the source buffer.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Parse the fed definitions into a new parser.
    ///
    /// Evaluation state (the symbol table and the metadata directives) is
    /// per-parse, so the same meta-parser can be cleared, refed, and reused.
    pub fn parse(&self) -> Result<Parser<V>, MetaError> {
        let grammar = Arc::new(crate::grammar::build()?);
        let state = Rc::new(RefCell::new(MetaState::new(self.handlers.clone())));
        let bound = handlers::bind(&grammar, &state);

        let mut shell: Parser<MetaValue<V>> =
            Parser::new(Arc::clone(&grammar), bound).with_name("MetaParser");
        shell.feed(&self.buf);
        let value = shell.parse().map_err(|e| match e {
            ParseError::Eval(EvalError::Grammar(e)) => MetaError::Grammar(e),
            ParseError::Eval(e) => MetaError::Eval(e),
            other => MetaError::Parse(other),
        })?;
        Ok(value.into_parser()?)
    }
}

impl<V: Default + 'static> Default for MetaParser<V> {
    fn default() -> Self {
        Self::new()
    }
}
