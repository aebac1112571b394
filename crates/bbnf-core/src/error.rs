//! Error types for grammar construction, matching, and evaluation.
//!
//! Two channels exist at the matching boundary: [`MatchError`] is the only
//! recoverable failure (alternations and repetitions catch it to try another
//! branch), while everything else in [`MatchFailure`] propagates through the
//! whole parse.

/// Errors raised eagerly while constructing grammar nodes or assembling a
/// grammar from BBNF source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    /// Literals must consume at least one character.
    #[error("literal must be non-empty")]
    EmptyLiteral,

    /// Character range bounds must be in code-point order.
    #[error("character range bounds out of order: {lo:?} > {hi:?}")]
    InvalidRange { lo: char, hi: char },

    /// Bounded repetitions require `max >= min`.
    #[error("repetition bounds out of order: min {min}, max {max}")]
    InvalidBounds { min: u32, max: u32 },

    #[error("concatenation needs at least one child")]
    EmptyConcatenation,

    #[error("alternation needs at least one child")]
    EmptyAlternation,

    /// Only character ranges and character sets can be inverted.
    #[error("node kind cannot be inverted")]
    NotInvertible,

    /// An element's definition slot is written exactly once.
    #[error("element `{0}` is already defined")]
    Redefinition(String),

    /// Each metadata directive may appear at most once per grammar.
    #[error("duplicate `{0}` directive")]
    DuplicateDirective(String),

    /// A grammar with no elements has nothing to parse with.
    #[error("grammar has no main element")]
    MissingMain,
}

/// A syntactic mismatch at some buffer offset. Recoverable: alternations try
/// their next branch and repetitions end their optional phase on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no match at offset {at}")]
pub struct MatchError {
    /// Byte offset of the furthest failure.
    pub at: usize,
}

/// A grammar referenced an element whose definition was never filled in.
/// Always fatal; never caught internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("undefined element `{name}`")]
pub struct UndefinedElementError {
    pub name: String,
}

/// Failure channel of the matching engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchFailure {
    #[error(transparent)]
    Mismatch(#[from] MatchError),

    #[error(transparent)]
    Undefined(#[from] UndefinedElementError),

    /// Execution fuel exhausted (too many matching steps).
    #[error("execution limit exceeded")]
    FuelExhausted,

    /// Too many nested grammar nodes for the configured limit.
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,
}

impl MatchFailure {
    /// Whether this failure may be caught to try another branch.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, MatchFailure::Mismatch(_))
    }
}

/// Errors raised while folding a match tree through its handlers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("match node has no child at index {0}")]
    MissingChild(usize),

    /// A handler navigated to a node of a shape the grammar cannot produce
    /// at that position.
    #[error("expected {expected} match node")]
    UnexpectedShape { expected: &'static str },

    /// A handler received a nested evaluation result of the wrong kind.
    #[error("expected {expected} value")]
    UnexpectedValue { expected: &'static str },

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// Free-form failure raised by a handler body.
    #[error("{0}")]
    Handler(String),
}

impl EvalError {
    /// Build a handler-raised error from any message.
    pub fn handler(message: impl Into<String>) -> Self {
        EvalError::Handler(message.into())
    }
}

/// Everything a full `parse()` call can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    UndefinedElement(#[from] UndefinedElementError),

    /// The main element matched but left input behind; grammars must consume
    /// the whole buffer.
    #[error("trailing input: matched {consumed} of {total} bytes")]
    TrailingInput { consumed: usize, total: usize },

    #[error("execution limit exceeded")]
    FuelExhausted,

    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl From<MatchFailure> for ParseError {
    fn from(failure: MatchFailure) -> Self {
        match failure {
            MatchFailure::Mismatch(e) => ParseError::Match(e),
            MatchFailure::Undefined(e) => ParseError::UndefinedElement(e),
            MatchFailure::FuelExhausted => ParseError::FuelExhausted,
            MatchFailure::RecursionLimitExceeded => ParseError::RecursionLimitExceeded,
        }
    }
}
