//! # Token Types
//!
//! Defines every lexical token the concrete syntax produces (spec.md
//! §3.1's worked scenarios, generalized into a grammar by `SPEC_FULL.md`).
//!
//! Each token carries its [`Span`] so parse errors surface a real
//! location instead of "somewhere in the file".

use crate::error::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    Leia,
    Escreva,
    Se,
    Entao,
    Senao,
    Fimse,
    Enquanto,
    Faca,
    Fimenquanto,
    Inteiro,
    Real,
    Booleano,

    // Literals and identifiers
    Ident(String),
    IntLit(i64),
    /// Raw text including the surrounding quotes, escapes undecoded — see
    /// [`crate::ast::ExprKind::StrLit`].
    StrLit(String),

    // Punctuation
    LParen,
    RParen,
    Semicolon,
    Arrow, // <-
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,

    Eof,
}

impl TokenKind {
    /// A human-readable label for error messages, e.g. "';'" or "'fimse'".
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Leia => "'leia'".into(),
            TokenKind::Escreva => "'escreva'".into(),
            TokenKind::Se => "'se'".into(),
            TokenKind::Entao => "'entao'".into(),
            TokenKind::Senao => "'senao'".into(),
            TokenKind::Fimse => "'fimse'".into(),
            TokenKind::Enquanto => "'enquanto'".into(),
            TokenKind::Faca => "'faca'".into(),
            TokenKind::Fimenquanto => "'fimenquanto'".into(),
            TokenKind::Inteiro => "'inteiro'".into(),
            TokenKind::Real => "'real'".into(),
            TokenKind::Booleano => "'booleano'".into(),
            TokenKind::Ident(name) => format!("identifier '{name}'"),
            TokenKind::IntLit(v) => format!("integer literal '{v}'"),
            TokenKind::StrLit(s) => format!("string literal {s}"),
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::Semicolon => "';'".into(),
            TokenKind::Arrow => "'<-'".into(),
            TokenKind::Plus => "'+'".into(),
            TokenKind::Minus => "'-'".into(),
            TokenKind::Star => "'*'".into(),
            TokenKind::Slash => "'/'".into(),
            TokenKind::Bang => "'!'".into(),
            TokenKind::EqEq => "'=='".into(),
            TokenKind::NotEq => "'!='".into(),
            TokenKind::Lt => "'<'".into(),
            TokenKind::Le => "'<='".into(),
            TokenKind::Gt => "'>'".into(),
            TokenKind::Ge => "'>='".into(),
            TokenKind::AndAnd => "'&&'".into(),
            TokenKind::OrOr => "'||'".into(),
            TokenKind::Eof => "end of input".into(),
        }
    }
}

/// Keywords are case-sensitive, lowercase, matching spec.md's literal
/// scenario source text.
pub fn keyword(word: &str) -> Option<TokenKind> {
    Some(match word {
        "leia" => TokenKind::Leia,
        "escreva" => TokenKind::Escreva,
        "se" => TokenKind::Se,
        "entao" => TokenKind::Entao,
        "senao" => TokenKind::Senao,
        "fimse" => TokenKind::Fimse,
        "enquanto" => TokenKind::Enquanto,
        "faca" => TokenKind::Faca,
        "fimenquanto" => TokenKind::Fimenquanto,
        "inteiro" => TokenKind::Inteiro,
        "real" => TokenKind::Real,
        "booleano" => TokenKind::Booleano,
        _ => return None,
    })
}
