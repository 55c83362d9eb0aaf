//! # Compiler Errors
//!
//! A single error type shared by every stage of the pipeline: the frontend
//! (lexer/parser/semantic pass), the TAC generator, and the LLVM IR
//! generator. Each error carries a `kind` that callers can match on, a
//! human-readable `message`, and a `span` locating the offending construct.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize, line: usize, col: usize) -> Self {
        Self {
            start,
            end,
            line,
            col,
        }
    }

    /// A span with no useful source location, for errors raised on
    /// synthesized or already-lowered data (TAC, IR) rather than raw text.
    pub const fn synthetic() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

/// The three error kinds from the spec's taxonomy, each carrying the detail
/// needed to format a single diagnostic line.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// The AST (or source text, for the frontend) violates the expected
    /// shape: a missing child, an unknown node, a syntax error.
    InputError,
    /// An invariant of the TAC or IR generator was violated at generation
    /// time — a bug in the compiler, not in the input program.
    InternalError,
    /// The instruction list contains an opcode the emitter does not yet
    /// support. Surfaced as a warning, never silently dropped.
    Unimplemented,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
}

impl CompileError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn input(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::InputError, message, span)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message, Span::synthetic())
    }

    pub fn unimplemented(opcode: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::Unimplemented,
            format!("unsupported opcode: {opcode}"),
            Span::synthetic(),
        )
    }

    fn kind_label(&self) -> &'static str {
        match self.kind {
            ErrorKind::InputError => "InputError",
            ErrorKind::InternalError => "InternalError",
            ErrorKind::Unimplemented => "Unimplemented",
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span == Span::synthetic() {
            write!(f, "{}: {}", self.kind_label(), self.message)
        } else {
            write!(
                f,
                "{} (line {}:{}): {}",
                self.kind_label(),
                self.span.line,
                self.span.col,
                self.message
            )
        }
    }
}

impl std::error::Error for CompileError {}

pub type Result<T> = std::result::Result<T, CompileError>;
