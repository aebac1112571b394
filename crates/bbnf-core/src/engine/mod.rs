//! The matching engine.
//!
//! Every grammar node answers the same protocol: `match(buffer, index)`
//! yields a match node and the new index, or a [`MatchFailure`]. Mismatches
//! are the one recoverable failure (alternations try their next branch on
//! them, repetitions end their optional phase); undefined elements and limit
//! exhaustion propagate through the whole parse.
//!
//! Matching is greedy-commit: alternations take the first success in
//! declaration order and repetitions never give occurrences back, so
//! grammars are ordered longest-first by their authors.

mod trace;

pub use trace::{NoopTracer, PrintTracer, Tracer};

#[cfg(test)]
mod engine_tests;

use crate::error::{MatchError, MatchFailure, UndefinedElementError};
use crate::grammar::{ElementId, Expr, Grammar};
use crate::match_tree::MatchNode;

const DEFAULT_EXEC_FUEL: u32 = 1_000_000;
const DEFAULT_RECURSION_LIMIT: u32 = 1024;

/// Runtime limits for one matching run.
///
/// Fuel counts engine steps (one per node entered); the recursion limit
/// bounds nesting depth. Both turn runaway grammars, such as a pair of
/// elements defined in terms of each other with no consuming node between
/// them, into errors instead of stack exhaustion.
#[derive(Clone, Copy, Debug)]
pub struct Limits {
    pub(crate) exec_fuel: u32,
    pub(crate) recursion_limit: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            exec_fuel: DEFAULT_EXEC_FUEL,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl Limits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = fuel;
        self
    }

    /// Set the recursion limit.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> u32 {
        self.exec_fuel
    }

    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// One matching run over a borrowed grammar and buffer.
///
/// Offsets are byte offsets; the engine only ever stops on character
/// boundaries because every consuming node advances by whole characters.
pub struct Matcher<'g, T: Tracer = NoopTracer> {
    grammar: &'g Grammar,
    buf: &'g str,
    fuel: u32,
    depth: u32,
    limits: Limits,
    tracer: T,
}

impl<'g> Matcher<'g, NoopTracer> {
    pub fn new(grammar: &'g Grammar, buf: &'g str) -> Self {
        Self::with_tracer(grammar, buf, NoopTracer)
    }
}

impl<'g, T: Tracer> Matcher<'g, T> {
    pub fn with_tracer(grammar: &'g Grammar, buf: &'g str, tracer: T) -> Self {
        let limits = Limits::default();
        Self {
            grammar,
            buf,
            fuel: limits.exec_fuel,
            depth: 0,
            limits,
            tracer,
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.fuel = limits.exec_fuel;
        self.limits = limits;
        self
    }

    /// Match the grammar's main element at offset 0.
    pub fn run(&mut self) -> Result<(MatchNode, usize), MatchFailure> {
        let main = self.grammar.main();
        self.match_element(main, 0)
    }

    /// Match the named element `id` at `at`, wrapping the result so the
    /// element's handler can be found at evaluation time.
    pub fn match_element(&mut self, id: ElementId, at: usize) -> Result<(MatchNode, usize), MatchFailure> {
        let grammar = self.grammar;
        let Some(definition) = grammar.definition(id) else {
            return Err(MatchFailure::Undefined(UndefinedElementError {
                name: grammar.element_name(id).unwrap_or("<unknown>").to_string(),
            }));
        };
        self.tracer.element(grammar.element_name(id).unwrap_or("<unknown>"), at);
        let (inner, next) = self.match_expr(definition, at)?;
        Ok((MatchNode::Element { element: id, inner: Box::new(inner) }, next))
    }

    /// Match any node at `at`.
    pub fn match_expr(&mut self, expr: &Expr, at: usize) -> Result<(MatchNode, usize), MatchFailure> {
        if self.fuel == 0 {
            return Err(MatchFailure::FuelExhausted);
        }
        self.fuel -= 1;
        if self.depth >= self.limits.recursion_limit {
            return Err(MatchFailure::RecursionLimitExceeded);
        }
        self.depth += 1;
        self.tracer.enter(expr.kind_name(), at);
        let result = self.dispatch(expr, at);
        self.depth -= 1;
        match &result {
            Ok((_, next)) => self.tracer.success(expr.kind_name(), at, *next),
            Err(_) => self.tracer.failure(expr.kind_name(), at),
        }
        result
    }

    fn dispatch(&mut self, expr: &Expr, at: usize) -> Result<(MatchNode, usize), MatchFailure> {
        match expr {
            Expr::Literal(value) => self.match_literal(value, at),
            Expr::CharRange { lo, hi, inverted } => {
                self.match_char(at, |c| (*lo <= c && c <= *hi) != *inverted)
            }
            Expr::CharSet { chars, inverted } => {
                self.match_char(at, |c| chars.contains(&c) != *inverted)
            }
            Expr::Concat(parts) => self.match_concat(parts, at),
            Expr::Alt(parts) => self.match_alt(parts, at),
            Expr::Repeat { inner, min, max } => self.match_repeat(inner, *min, *max, at),
            Expr::Element(id) => self.match_element(*id, at),
        }
    }

    fn match_literal(&self, value: &str, at: usize) -> Result<(MatchNode, usize), MatchFailure> {
        if self.buf.get(at..at + value.len()).is_some_and(|s| s == value) {
            Ok((MatchNode::Str(value.to_string()), at + value.len()))
        } else {
            Err(mismatch(at))
        }
    }

    fn match_char(
        &self,
        at: usize,
        test: impl Fn(char) -> bool,
    ) -> Result<(MatchNode, usize), MatchFailure> {
        match self.buf.get(at..).and_then(|rest| rest.chars().next()) {
            Some(c) if test(c) => Ok((MatchNode::Str(c.to_string()), at + c.len_utf8())),
            _ => Err(mismatch(at)),
        }
    }

    /// Children match in order on an advancing index. The first failure
    /// propagates as-is; any rewinding is the caller's business.
    fn match_concat(&mut self, parts: &[Expr], at: usize) -> Result<(MatchNode, usize), MatchFailure> {
        let mut index = at;
        let mut inners = Vec::with_capacity(parts.len());
        for part in parts {
            let (node, next) = self.match_expr(part, index)?;
            inners.push(node);
            index = next;
        }
        Ok((MatchNode::Concat(inners), index))
    }

    /// First success in declaration order wins; every attempt restarts from
    /// the alternation's own index. Reports the furthest failure offset when
    /// nothing matches.
    fn match_alt(&mut self, parts: &[Expr], at: usize) -> Result<(MatchNode, usize), MatchFailure> {
        let mut furthest = at;
        for (index, part) in parts.iter().enumerate() {
            match self.match_expr(part, at) {
                Ok((node, next)) => {
                    return Ok((MatchNode::Alt { index, inner: Box::new(node) }, next));
                }
                Err(MatchFailure::Mismatch(e)) => furthest = furthest.max(e.at),
                Err(fatal) => return Err(fatal),
            }
        }
        Err(mismatch(furthest))
    }

    /// `min` mandatory occurrences (failures propagate), then greedy optional
    /// occurrences while the child succeeds and the bound allows. There is no
    /// backtracking across the mandatory/optional boundary, and occurrences
    /// are never given back to let a following sibling match.
    fn match_repeat(
        &mut self,
        inner: &Expr,
        min: u32,
        max: Option<u32>,
        at: usize,
    ) -> Result<(MatchNode, usize), MatchFailure> {
        let mut index = at;
        let mut inners = Vec::new();
        let mut count: u32 = 0;
        while count < min {
            let (node, next) = self.match_expr(inner, index)?;
            inners.push(node);
            index = next;
            count += 1;
        }
        while max.is_none_or(|max| count < max) {
            match self.match_expr(inner, index) {
                Ok((node, next)) => {
                    inners.push(node);
                    index = next;
                    count += 1;
                }
                Err(MatchFailure::Mismatch(_)) => break,
                Err(fatal) => return Err(fatal),
            }
        }
        Ok((MatchNode::Concat(inners), index))
    }

    /// Whether a `match` starting at `at` might succeed. O(1) for simple
    /// nodes; attempt-and-discard for concatenations and repetitions;
    /// any-child for alternations. Checks have no error channel, so fatal
    /// failures also read as `false`.
    pub fn check(&mut self, expr: &Expr, at: usize) -> bool {
        match expr {
            Expr::Literal(value) => self.buf.get(at..at + value.len()).is_some_and(|s| s == value),
            Expr::CharRange { lo, hi, inverted } => {
                self.check_char(at, |c| (*lo <= c && c <= *hi) != *inverted)
            }
            Expr::CharSet { chars, inverted } => {
                self.check_char(at, |c| chars.contains(&c) != *inverted)
            }
            Expr::Alt(parts) => parts.iter().any(|part| self.check(part, at)),
            Expr::Element(id) => {
                let grammar = self.grammar;
                match grammar.definition(*id) {
                    Some(definition) => self.check(definition, at),
                    None => false,
                }
            }
            Expr::Concat(_) | Expr::Repeat { .. } => self.match_expr(expr, at).is_ok(),
        }
    }

    fn check_char(&self, at: usize, test: impl Fn(char) -> bool) -> bool {
        self.buf
            .get(at..)
            .and_then(|rest| rest.chars().next())
            .is_some_and(test)
    }
}

fn mismatch(at: usize) -> MatchFailure {
    MatchFailure::Mismatch(MatchError { at })
}
