//! Tracing hooks for debugging engine execution.
//!
//! The tracer is a zero-cost abstraction: [`NoopTracer`] methods are empty
//! and `#[inline(always)]`, so the default engine carries no tracing state
//! and no per-step cost. [`PrintTracer`] renders an indented step log to
//! stderr, one line per node entered, resolved, or failed.

/// Engine instrumentation. Methods receive raw data the engine already has;
/// formatting belongs to the tracer implementation.
pub trait Tracer {
    /// Called before a node starts matching.
    fn enter(&mut self, kind: &'static str, at: usize);

    /// Called after a node matched, with the consumed byte span.
    fn success(&mut self, kind: &'static str, from: usize, to: usize);

    /// Called after a node failed to match.
    fn failure(&mut self, kind: &'static str, at: usize);

    /// Called when matching descends into a named element's definition.
    fn element(&mut self, name: &str, at: usize);
}

/// The default tracer. Does nothing and compiles away.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn enter(&mut self, _kind: &'static str, _at: usize) {}

    #[inline(always)]
    fn success(&mut self, _kind: &'static str, _from: usize, _to: usize) {}

    #[inline(always)]
    fn failure(&mut self, _kind: &'static str, _at: usize) {}

    #[inline(always)]
    fn element(&mut self, _name: &str, _at: usize) {}
}

impl<T: Tracer + ?Sized> Tracer for &mut T {
    fn enter(&mut self, kind: &'static str, at: usize) {
        (**self).enter(kind, at)
    }

    fn success(&mut self, kind: &'static str, from: usize, to: usize) {
        (**self).success(kind, from, to)
    }

    fn failure(&mut self, kind: &'static str, at: usize) {
        (**self).failure(kind, at)
    }

    fn element(&mut self, name: &str, at: usize) {
        (**self).element(name, at)
    }
}

/// Logs every step to stderr, indented by nesting depth.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintTracer {
    depth: usize,
}

impl PrintTracer {
    pub fn new() -> Self {
        Self::default()
    }

    fn pad(&self) -> String {
        "  ".repeat(self.depth)
    }
}

impl Tracer for PrintTracer {
    fn enter(&mut self, kind: &'static str, at: usize) {
        eprintln!("{}{kind} @ {at}", self.pad());
        self.depth += 1;
    }

    fn success(&mut self, kind: &'static str, from: usize, to: usize) {
        self.depth = self.depth.saturating_sub(1);
        eprintln!("{}{kind} ok {from}..{to}", self.pad());
    }

    fn failure(&mut self, kind: &'static str, at: usize) {
        self.depth = self.depth.saturating_sub(1);
        eprintln!("{}{kind} failed @ {at}", self.pad());
    }

    fn element(&mut self, name: &str, at: usize) {
        eprintln!("{}<{name}> @ {at}", self.pad());
    }
}
