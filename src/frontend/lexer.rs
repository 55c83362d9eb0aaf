//! # Lexer
//!
//! Converts source text into a flat token stream. Identifiers follow
//! `[A-Za-z_][A-Za-z0-9_]*`; the keyword set in [`token::keyword`] is
//! checked after scanning a full identifier, so `lei` or `leiam` lex as
//! plain identifiers rather than a truncated match on `leia`.

use crate::error::{CompileError, Result, Span};

use super::cursor::Cursor;
use super::token::{keyword, Token, TokenKind};

pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer {
        cursor: Cursor::new(source),
    };
    lexer.run()
}

struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    fn run(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let start = self.cursor.current_pos();
            let Some(c) = self.cursor.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    span: self.cursor.make_span(start),
                });
                break;
            };

            let kind = if c.is_ascii_digit() {
                self.lex_number()
            } else if c == '_' || c.is_alphabetic() {
                self.lex_word()
            } else if c == '"' {
                self.lex_string(start)?
            } else {
                self.lex_punct(start)?
            };
            tokens.push(Token {
                kind,
                span: self.cursor.make_span(start),
            });
        }
        Ok(tokens)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(c) if c.is_whitespace() => {
                    self.cursor.advance();
                }
                Some('/') if self.cursor.peek_second() == Some('/') => {
                    while !matches!(self.cursor.peek(), None | Some('\n')) {
                        self.cursor.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self.cursor.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.cursor.advance();
            } else {
                break;
            }
        }
        TokenKind::IntLit(text.parse().unwrap_or(0))
    }

    fn lex_word(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self.cursor.peek() {
            if c == '_' || c.is_alphanumeric() {
                text.push(c);
                self.cursor.advance();
            } else {
                break;
            }
        }
        keyword(&text).unwrap_or(TokenKind::Ident(text))
    }

    fn lex_string(&mut self, start: (usize, usize, usize)) -> Result<TokenKind> {
        let mut raw = String::from("\"");
        self.cursor.advance(); // opening quote
        loop {
            match self.cursor.advance() {
                Some('"') => {
                    raw.push('"');
                    return Ok(TokenKind::StrLit(raw));
                }
                Some('\\') => {
                    raw.push('\\');
                    if let Some(escaped) = self.cursor.advance() {
                        raw.push(escaped);
                    }
                }
                Some(c) => raw.push(c),
                None => {
                    return Err(CompileError::input(
                        "unterminated string literal",
                        self.cursor.make_span(start),
                    ))
                }
            }
        }
    }

    fn lex_punct(&mut self, start: (usize, usize, usize)) -> Result<TokenKind> {
        let c = self.cursor.advance().unwrap();
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '<' => {
                if self.cursor.peek() == Some('-') {
                    self.cursor.advance();
                    TokenKind::Arrow
                } else if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '=' if self.cursor.peek() == Some('=') => {
                self.cursor.advance();
                TokenKind::EqEq
            }
            '!' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            '&' if self.cursor.peek() == Some('&') => {
                self.cursor.advance();
                TokenKind::AndAnd
            }
            '|' if self.cursor.peek() == Some('|') => {
                self.cursor.advance();
                TokenKind::OrOr
            }
            other => {
                return Err(CompileError::input(
                    format!("unexpected character '{other}'"),
                    self.cursor.make_span(start),
                ))
            }
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        assert_eq!(
            kinds("leia(x);"),
            vec![
                TokenKind::Leia,
                TokenKind::LParen,
                TokenKind::Ident("x".to_string()),
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn does_not_truncate_identifiers_that_start_like_keywords() {
        assert_eq!(
            kinds("leiam"),
            vec![TokenKind::Ident("leiam".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn lexes_arrow_not_less_than_minus() {
        assert_eq!(
            kinds("x <- 1"),
            vec![
                TokenKind::Ident("x".to_string()),
                TokenKind::Arrow,
                TokenKind::IntLit(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_string_literal_preserving_escapes_raw() {
        assert_eq!(
            kinds(r#""ola\n""#),
            vec![TokenKind::StrLit("\"ola\\n\"".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn unterminated_string_is_an_input_error() {
        assert!(tokenize("\"abc").is_err());
    }
}
