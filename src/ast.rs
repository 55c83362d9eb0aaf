//! # Abstract Syntax Tree
//!
//! The tagged-variant parse tree consumed by the TAC generator ([`crate::tac`]).
//! This is a consumed contract, not a generator's internal format: whatever
//! produces it (here, [`crate::frontend`]) only needs to populate these
//! shapes, and the TAC generator only needs to match them exhaustively.
//!
//! ## Design
//!
//! Expressions are collapsed into a single recursive [`Expr`] enum rather
//! than the precedence-chain of non-terminals a grammar typically describes
//! (`LogicExpr`, `CmpExpr`, `SumExpr`, `Term`, `Factor`). The chain only
//! exists to encode operator precedence during parsing; once parsed, a
//! binary operation is a binary operation regardless of which precedence
//! level produced it, so [`crate::frontend::parser`] builds this shape
//! directly and the TAC generator matches on [`BinOp`]/[`UnOp`] instead of
//! re-deriving precedence from node type.

use crate::error::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandKind {
    Read { name: String },
    Write { expr: Expr },
    Assign { name: String, expr: Expr },
    Decl { source_type: SourceType, name: String },
    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },
    While { cond: Expr, body: Block },
}

pub type Block = Vec<Command>;

/// Source-level type tags, per spec.md §3.2's `{inteiro, real, booleano}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Inteiro,
    Real,
    Booleano,
}

impl Default for SourceType {
    /// Lookup of an unknown identifier yields `inteiro` (spec.md §3.2).
    fn default() -> Self {
        SourceType::Inteiro
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntLit(i64),
    StrLit(String),
    Ident(String),
    Unary { op: UnOp, operand: Box<Expr> },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl Command {
    pub fn new(kind: CommandKind, span: Span) -> Self {
        Self { kind, span }
    }
}
