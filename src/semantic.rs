//! # Semantic Table
//!
//! A mapping from source identifier to [`SourceType`], consumed by the LLVM
//! IR generator to decide alloca and value types (spec.md §3.2, §4.2.1).
//!
//! Lookup of an unknown name yields the default `inteiro`, matching
//! spec.md §3.2 — callers use [`SymbolTable::type_of`] rather than indexing
//! so that default applies uniformly.
//!
//! [`build`] is the minimal semantic pass that walks a [`Program`] and
//! records every `Decl` it sees. It does not perform type checking
//! (use-before-declaration, operand type mismatches); spec.md §4.1 assigns
//! that responsibility to an external semantic analyzer and treats the TAC
//! generator's input as already valid. This pass exists only to produce a
//! real table for a real program, so the crate's frontend has something to
//! hand the IR generator.

use std::collections::HashMap;

use crate::ast::{Command, CommandKind, Program, SourceType};

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    types: HashMap<String, SourceType>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: impl Into<String>, source_type: SourceType) {
        self.types.insert(name.into(), source_type);
    }

    /// Type of `name`, defaulting to `inteiro` for unknown identifiers.
    pub fn type_of(&self, name: &str) -> SourceType {
        self.types.get(name).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Build a [`SymbolTable`] by recording every `Decl` command in the program.
pub fn build(program: &Program) -> SymbolTable {
    let mut table = SymbolTable::new();
    walk_block(&program.commands, &mut table);
    table
}

fn walk_block(block: &[Command], table: &mut SymbolTable) {
    for command in block {
        match &command.kind {
            CommandKind::Decl { source_type, name } => table.declare(name.clone(), *source_type),
            CommandKind::If {
                then_block,
                else_block,
                ..
            } => {
                walk_block(then_block, table);
                if let Some(else_block) = else_block {
                    walk_block(else_block, table);
                }
            }
            CommandKind::While { body, .. } => walk_block(body, table),
            CommandKind::Read { .. } | CommandKind::Write { .. } | CommandKind::Assign { .. } => {}
        }
    }
}
