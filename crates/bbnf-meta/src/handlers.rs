//! Semantic actions that fold a parsed definition file into a new parser.
//!
//! The handlers share one [`MetaState`] through `Rc<RefCell<..>>`: the user
//! grammar under construction, the metadata directives seen so far, and the
//! caller-supplied handler registry to bind at the end. Borrows are taken
//! briefly and never held across a nested `evaluate` call.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use bbnf_core::{
    ElementId, EvalError, Expr, Grammar, GrammarBuilder, GrammarError, HandlerRegistry, Handlers,
    MatchNode, Parser,
};

use crate::escape;
use crate::value::MetaValue;

/// Per-parse state. Built fresh for every `parse()` call, so directives and
/// definitions never leak between parses.
pub(crate) struct MetaState<V> {
    builder: GrammarBuilder,
    /// `#: name` directive, if seen.
    name: Option<String>,
    /// Main element: set by `#: main`, else by the first element referenced
    /// during evaluation.
    main: Option<ElementId>,
    user: HandlerRegistry<V>,
}

impl<V> MetaState<V> {
    pub(crate) fn new(user: HandlerRegistry<V>) -> Self {
        Self {
            builder: GrammarBuilder::new(),
            name: None,
            main: None,
            user,
        }
    }
}

type Shared<V> = Rc<RefCell<MetaState<V>>>;
type MetaResult<V> = Result<MetaValue<V>, EvalError>;

/// Bind every rule's handler against the meta-grammar. `blank`, `space`,
/// and `cmnt` stay unbound and evaluate to the null value.
pub(crate) fn bind<V: 'static>(grammar: &Grammar, state: &Shared<V>) -> Handlers<MetaValue<V>> {
    let mut registry: HandlerRegistry<MetaValue<V>> = HandlerRegistry::new();

    let st = Rc::clone(state);
    registry.insert("defs", move |m, hs| defs(&st, m, hs));
    let st = Rc::clone(state);
    registry.insert("defn", move |m, hs| defn(&st, m, hs));
    let st = Rc::clone(state);
    registry.insert("simple", move |m, hs| simple(&st, m, hs));
    let st = Rc::clone(state);
    registry.insert("elem", move |m, _| elem(&st, m));
    let st = Rc::clone(state);
    registry.insert("mdata", move |m, hs| mdata(&st, m, hs));

    registry.insert("disj", |m, hs| disjunction(m, hs));
    registry.insert("conc", |m, hs| concatenation(m, hs));
    registry.insert("rept", |m, hs| repetition(m, hs));
    registry.insert("range", |m, hs| bounds(m, hs));
    registry.insert("intg", |m, _| integer(m));
    registry.insert("strg", |m, hs| string_literal(m, hs));
    registry.insert("char", |m, hs| char_literal(m, hs));
    registry.insert("chrs", |m, hs| char_set(m, hs));
    registry.insert("chrr", |m, hs| char_range(m, hs));
    registry.insert("ctrl", |m, hs| control(m, hs));
    registry.insert("dqchar", |m, hs| quoted_char(m, hs));
    registry.insert("sqchar", |m, hs| quoted_char(m, hs));
    registry.insert("eseq", |m, _| escape_sequence(m));

    registry.bind(grammar)
}

/// The whole file: evaluate prelude directives and definition lines in
/// source order, then freeze the grammar, bind the user's handlers by
/// element name, and hand back the finished parser.
fn defs<V>(st: &Shared<V>, m: &MatchNode, hs: &Handlers<MetaValue<V>>) -> MetaResult<V> {
    for item in m.child(0)?.children() {
        let (index, inner) = item.choice()?;
        if index == 0 {
            inner.evaluate(hs)?;
        }
    }
    for line in m.child(1)?.children() {
        let (_, first) = line.child(0)?.choice()?;
        first.evaluate(hs)?;
    }

    let (builder, main, name, user) = {
        let mut st = st.borrow_mut();
        let main = st.main.take().ok_or(GrammarError::MissingMain)?;
        (
            std::mem::take(&mut st.builder),
            main,
            st.name.take(),
            std::mem::take(&mut st.user),
        )
    };
    let grammar = Arc::new(builder.finish(main));
    let handlers = user.bind(&grammar);
    let mut parser = Parser::new(grammar, handlers);
    if let Some(name) = name {
        parser = parser.with_name(name);
    }
    Ok(MetaValue::Parser(parser))
}

/// One `name ::= body` line. The left-hand side evaluates first, so the
/// first definition's element becomes the default main.
fn defn<V>(st: &Shared<V>, m: &MatchNode, hs: &Handlers<MetaValue<V>>) -> MetaResult<V> {
    let name = m.child(0)?.evaluate(hs)?.into_name()?;
    let body = m.child(2)?.evaluate(hs)?.into_expr()?;
    st.borrow_mut().builder.define(&name, body)?;
    Ok(MetaValue::Null)
}

fn disjunction<V>(m: &MatchNode, hs: &Handlers<MetaValue<V>>) -> MetaResult<V> {
    let mut parts = vec![m.child(0)?.evaluate(hs)?.into_expr()?];
    for item in m.child(1)?.children() {
        parts.push(item.child(1)?.evaluate(hs)?.into_expr()?);
    }
    // a single branch collapses; Expr::alt already does that
    Ok(MetaValue::Expr(Expr::alt(parts)?))
}

fn concatenation<V>(m: &MatchNode, hs: &Handlers<MetaValue<V>>) -> MetaResult<V> {
    let mut parts = vec![m.child(0)?.evaluate(hs)?.into_expr()?];
    for item in m.child(1)?.children() {
        parts.push(item.child(1)?.evaluate(hs)?.into_expr()?);
    }
    let expr = if parts.len() == 1 {
        parts.remove(0)
    } else {
        Expr::concat(parts)?
    };
    Ok(MetaValue::Expr(expr))
}

/// An atom with an optional `*` suffix. A bare integer `n` repeats
/// `(n, n + 1)` times; an explicit pair is taken as written.
fn repetition<V>(m: &MatchNode, hs: &Handlers<MetaValue<V>>) -> MetaResult<V> {
    let mut expr = m.child(0)?.evaluate(hs)?.into_expr()?;
    if let Some(suffix) = m.child(1)?.children().first() {
        let (_, chosen) = suffix.child(1)?.choice()?;
        expr = match chosen.evaluate(hs)? {
            MetaValue::Int(n) => expr.times(n),
            MetaValue::Bounds(min, max) => expr.repeated(min, max)?,
            _ => return Err(EvalError::UnexpectedValue { expected: "repetition bound" }),
        };
    }
    Ok(MetaValue::Expr(expr))
}

/// `(min, max)` or `(min, inf)`.
fn bounds<V>(m: &MatchNode, hs: &Handlers<MetaValue<V>>) -> MetaResult<V> {
    let start = m.child(2)?.evaluate(hs)?.into_int()?;
    let (index, chosen) = m.child(4)?.choice()?;
    let end = if index == 0 {
        Some(chosen.evaluate(hs)?.into_int()?)
    } else {
        None
    };
    Ok(MetaValue::Bounds(start, end))
}

/// Atom dispatch on the alternative index: string literal, char set, char
/// range, element reference, parenthesized alternation.
fn simple<V>(st: &Shared<V>, m: &MatchNode, hs: &Handlers<MetaValue<V>>) -> MetaResult<V> {
    let (index, inner) = m.choice()?;
    let expr = match index {
        0 => Expr::lit(inner.evaluate(hs)?.into_str()?)?,
        1 | 2 => inner.evaluate(hs)?.into_expr()?,
        3 => {
            let name = inner.evaluate(hs)?.into_name()?;
            let id = st.borrow_mut().builder.element(&name);
            Expr::element(id)
        }
        _ => inner.child(2)?.evaluate(hs)?.into_expr()?,
    };
    Ok(MetaValue::Expr(expr))
}

fn integer<V>(m: &MatchNode) -> MetaResult<V> {
    let text = m.child(1)?.text();
    let value: u32 = text
        .parse()
        .map_err(|_| EvalError::handler(format!("repetition count out of range: {text}")))?;
    Ok(MetaValue::Int(value))
}

/// A quoted string: decode every quoted character of the winning quote form.
fn string_literal<V>(m: &MatchNode, hs: &Handlers<MetaValue<V>>) -> MetaResult<V> {
    let quoted = m.child(1)?.inner()?;
    let mut out = String::new();
    for piece in quoted.child(1)?.children() {
        out.push(piece.evaluate(hs)?.into_char()?);
    }
    Ok(MetaValue::Str(out))
}

/// A quoted single character, as used by range bounds.
fn char_literal<V>(m: &MatchNode, hs: &Handlers<MetaValue<V>>) -> MetaResult<V> {
    let ch = m.child(1)?.inner()?.child(1)?.evaluate(hs)?.into_char()?;
    Ok(MetaValue::Char(ch))
}

fn char_set<V>(m: &MatchNode, hs: &Handlers<MetaValue<V>>) -> MetaResult<V> {
    let members = m.child(2)?.evaluate(hs)?.into_str()?;
    Ok(MetaValue::Expr(Expr::char_set(members.chars())))
}

fn char_range<V>(m: &MatchNode, hs: &Handlers<MetaValue<V>>) -> MetaResult<V> {
    let lo = m.child(2)?.evaluate(hs)?.into_char()?;
    let hi = m.child(4)?.evaluate(hs)?.into_char()?;
    Ok(MetaValue::Expr(Expr::char_range(lo, hi)?))
}

/// An identifier occurrence. Unseen names get an undefined element; the
/// first element created this way becomes the default main.
fn elem<V>(st: &Shared<V>, m: &MatchNode) -> MetaResult<V> {
    let name = m.child(1)?.text();
    {
        let mut st = st.borrow_mut();
        let id = st.builder.element(&name);
        if st.main.is_none() {
            st.main = Some(id);
        }
    }
    Ok(MetaValue::Name(name))
}

fn control<V>(m: &MatchNode, hs: &Handlers<MetaValue<V>>) -> MetaResult<V> {
    m.child(2)?.evaluate(hs)?;
    Ok(MetaValue::Null)
}

/// A `#:` directive. Each field is written at most once per parse.
fn mdata<V>(st: &Shared<V>, m: &MatchNode, hs: &Handlers<MetaValue<V>>) -> MetaResult<V> {
    let (index, inner) = m.choice()?;
    if index == 0 {
        let seen = st.borrow().name.is_some();
        if seen {
            return Err(GrammarError::DuplicateDirective("name".to_string()).into());
        }
        let value = inner.child(3)?.evaluate(hs)?.into_str()?;
        st.borrow_mut().name = Some(value);
    } else {
        let seen = st.borrow().main.is_some();
        if seen {
            return Err(GrammarError::DuplicateDirective("main".to_string()).into());
        }
        // the element rule records its argument as main on evaluation
        inner.child(3)?.evaluate(hs)?;
    }
    Ok(MetaValue::Null)
}

/// One character inside a quoted form: either a plain character or an
/// escape sequence, by alternative index.
fn quoted_char<V>(m: &MatchNode, hs: &Handlers<MetaValue<V>>) -> MetaResult<V> {
    let (index, inner) = m.choice()?;
    if index == 0 {
        let text = inner.text();
        let ch = text
            .chars()
            .next()
            .ok_or(EvalError::UnexpectedShape { expected: "character" })?;
        Ok(MetaValue::Char(ch))
    } else {
        inner.evaluate(hs)
    }
}

fn escape_sequence<V>(m: &MatchNode) -> MetaResult<V> {
    Ok(MetaValue::Char(escape::decode(&m.text())?))
}
