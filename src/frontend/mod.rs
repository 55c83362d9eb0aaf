//! # Frontend
//!
//! A small lexer and recursive-descent parser for the concrete syntax used
//! throughout spec.md's worked scenarios. This is ambient infrastructure,
//! not the core the rest of the crate is about (spec.md treats lexing and
//! parsing as external collaborators with a documented interface) — it
//! exists so the compiler can be exercised end to end from real source
//! text instead of hand-built ASTs.

mod cursor;
pub mod lexer;
pub mod parser;
pub mod token;

use crate::ast::Program;
use crate::error::Result;

/// Tokenize and parse `source` into a [`Program`].
pub fn parse(source: &str) -> Result<Program> {
    let tokens = lexer::tokenize(source)?;
    parser::parse(tokens)
}
