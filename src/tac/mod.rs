//! # Three-Address Code
//!
//! The linear intermediate representation produced by [`generator`] and
//! consumed by [`crate::codegen`]. See spec.md §3.3 for the full contract;
//! this module is the shared data model generators 4 and 5 pass data
//! through, plus the textual dump/parse pair from spec.md §6 used for
//! debugging and for the round-trip property test.

pub mod generator;

#[cfg(test)]
mod tests;

use std::fmt;

use crate::error::{CompileError, Result};

/// An operand in a TAC instruction. Carries its tag explicitly rather than
/// encoding it as a string prefix, so that `Operand` is exhaustively
/// matchable everywhere it's consumed (spec.md §9 "Operand tagging").
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Lit(Literal),
    Id(String),
    Temp(String),
    Label(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    /// Raw string literal text as captured by the parser, quotes included.
    /// Escape decoding happens at LLVM string-interning time, not here
    /// (spec.md §9 "String escape handling").
    Str(String),
}

impl Operand {
    pub fn is_temp(&self) -> bool {
        matches!(self, Operand::Temp(_))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Lit(Literal::Int(v)) => write!(f, "{v}"),
            Operand::Lit(Literal::Str(s)) => write!(f, "{s}"),
            Operand::Id(name) | Operand::Temp(name) | Operand::Label(name) => write!(f, "{name}"),
        }
    }
}

/// TAC opcodes, per spec.md §3.3's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Assign,
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
    Not,
    Read,
    Write,
    Label,
    Goto,
    IfFalseGoto,
    /// Optional declaration marker. The generator in this crate never
    /// emits it (spec.md §4.1: "Decl: no TAC emitted"); it exists in the
    /// opcode space so the data model matches spec.md §3.3 exactly.
    Decl,
}

impl Opcode {
    /// The infix symbol for binary arithmetic/comparison/logical opcodes,
    /// per spec.md §3.3 and the textual format of §6.
    fn symbol(self) -> Option<&'static str> {
        Some(match self {
            Opcode::Add => "+",
            Opcode::Sub => "-",
            Opcode::Mul => "*",
            Opcode::Div => "/",
            Opcode::Eq => "==",
            Opcode::Neq => "!=",
            Opcode::Lt => "<",
            Opcode::Le => "<=",
            Opcode::Gt => ">",
            Opcode::Ge => ">=",
            Opcode::And => "&&",
            Opcode::Or => "||",
            _ => return None,
        })
    }

    fn from_symbol(symbol: &str) -> Option<Opcode> {
        Some(match symbol {
            "+" => Opcode::Add,
            "-" => Opcode::Sub,
            "*" => Opcode::Mul,
            "/" => Opcode::Div,
            "==" => Opcode::Eq,
            "!=" => Opcode::Neq,
            "<" => Opcode::Lt,
            "<=" => Opcode::Le,
            ">" => Opcode::Gt,
            ">=" => Opcode::Ge,
            "&&" => Opcode::And,
            "||" => Opcode::Or,
            _ => return None,
        })
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Opcode::Eq | Opcode::Neq | Opcode::Lt | Opcode::Le | Opcode::Gt | Opcode::Ge
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Opcode::And | Opcode::Or)
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div)
    }
}

/// `(opcode, result?, arg1?, arg2?)` — spec.md §3.3.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub result: Option<Operand>,
    pub arg1: Option<Operand>,
    pub arg2: Option<Operand>,
}

impl Instruction {
    pub fn label(name: Operand) -> Self {
        Self {
            opcode: Opcode::Label,
            result: Some(name),
            arg1: None,
            arg2: None,
        }
    }

    pub fn goto(target: Operand) -> Self {
        Self {
            opcode: Opcode::Goto,
            result: Some(target),
            arg1: None,
            arg2: None,
        }
    }

    pub fn if_false_goto(target: Operand, cond: Operand) -> Self {
        Self {
            opcode: Opcode::IfFalseGoto,
            result: Some(target),
            arg1: Some(cond),
            arg2: None,
        }
    }

    pub fn assign(dest: Operand, src: Operand) -> Self {
        Self {
            opcode: Opcode::Assign,
            result: Some(dest),
            arg1: Some(src),
            arg2: None,
        }
    }

    pub fn binary(opcode: Opcode, dest: Operand, lhs: Operand, rhs: Operand) -> Self {
        Self {
            opcode,
            result: Some(dest),
            arg1: Some(lhs),
            arg2: Some(rhs),
        }
    }

    pub fn not(dest: Operand, operand: Operand) -> Self {
        Self {
            opcode: Opcode::Not,
            result: Some(dest),
            arg1: Some(operand),
            arg2: None,
        }
    }

    pub fn read(name: Operand) -> Self {
        Self {
            opcode: Opcode::Read,
            result: Some(name),
            arg1: None,
            arg2: None,
        }
    }

    pub fn write(value: Operand) -> Self {
        Self {
            opcode: Opcode::Write,
            result: Some(value),
            arg1: None,
            arg2: None,
        }
    }
}

impl fmt::Display for Instruction {
    /// Renders an instruction per the textual TAC table of spec.md §6.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.opcode {
            Opcode::Label => write!(f, "{}:", self.result.as_ref().unwrap()),
            Opcode::Assign => write!(
                f,
                "{} = {}",
                self.result.as_ref().unwrap(),
                self.arg1.as_ref().unwrap()
            ),
            Opcode::Not => write!(
                f,
                "{} = ! {}",
                self.result.as_ref().unwrap(),
                self.arg1.as_ref().unwrap()
            ),
            Opcode::IfFalseGoto => write!(
                f,
                "IF_FALSE {} GOTO {}",
                self.arg1.as_ref().unwrap(),
                self.result.as_ref().unwrap()
            ),
            Opcode::Goto => write!(f, "GOTO {}", self.result.as_ref().unwrap()),
            Opcode::Read => write!(f, "READ {}", self.result.as_ref().unwrap()),
            Opcode::Write => write!(f, "WRITE {}", self.result.as_ref().unwrap()),
            Opcode::Decl => write!(f, "DECL {}", self.result.as_ref().unwrap()),
            op => write!(
                f,
                "{} = {} {} {}",
                self.result.as_ref().unwrap(),
                self.arg1.as_ref().unwrap(),
                op.symbol().expect("binary opcode always has a symbol"),
                self.arg2.as_ref().unwrap()
            ),
        }
    }
}

/// Render a full instruction list, one instruction per line, matching what
/// [`parse_program`] reads back (spec.md §6, §8 round-trip property).
pub fn print_program(instructions: &[Instruction]) -> String {
    instructions
        .iter()
        .map(|instr| instr.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse the textual TAC dump format of spec.md §6 back into an
/// instruction list. Exists to make `parse(print(TAC)) == TAC`
/// (spec.md §8) an executable property rather than an assertion in prose.
pub fn parse_program(text: &str) -> Result<Vec<Instruction>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Result<Instruction> {
    let line = line.trim();

    if let Some(label) = line.strip_suffix(':') {
        return Ok(Instruction::label(Operand::Label(label.to_string())));
    }
    if let Some(rest) = line.strip_prefix("IF_FALSE ") {
        let (cond, target) = rest
            .split_once(" GOTO ")
            .ok_or_else(|| malformed(line))?;
        return Ok(Instruction::if_false_goto(
            Operand::Label(target.trim().to_string()),
            parse_value(cond.trim()),
        ));
    }
    if let Some(target) = line.strip_prefix("GOTO ") {
        return Ok(Instruction::goto(Operand::Label(target.trim().to_string())));
    }
    if let Some(name) = line.strip_prefix("READ ") {
        return Ok(Instruction::read(parse_value(name.trim())));
    }
    if let Some(value) = line.strip_prefix("WRITE ") {
        return Ok(Instruction::write(parse_value(value.trim())));
    }
    if let Some((lhs, rhs)) = line.split_once(" = ") {
        let dest = parse_value(lhs.trim());
        let rhs = rhs.trim();
        if let Some(operand) = rhs.strip_prefix("! ") {
            return Ok(Instruction::not(dest, parse_value(operand.trim())));
        }
        let tokens: Vec<&str> = split_respecting_quotes(rhs);
        return match tokens.as_slice() {
            [single] => Ok(Instruction::assign(dest, parse_value(single))),
            [a, sym, b] => {
                let opcode = Opcode::from_symbol(sym).ok_or_else(|| malformed(line))?;
                Ok(Instruction::binary(opcode, dest, parse_value(a), parse_value(b)))
            }
            _ => Err(malformed(line)),
        };
    }
    Err(malformed(line))
}

fn malformed(line: &str) -> CompileError {
    CompileError::input(format!("malformed TAC line: {line:?}"), crate::error::Span::synthetic())
}

/// Split on whitespace, but keep a double-quoted run (a string literal)
/// together as one token even if it contains spaces.
fn split_respecting_quotes(s: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        while i < bytes.len() && bytes[i] == b' ' {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        let start = i;
        if bytes[i] == b'"' {
            i += 1;
            while i < bytes.len() && bytes[i] != b'"' {
                i += 1;
            }
            i = (i + 1).min(bytes.len());
        } else {
            while i < bytes.len() && bytes[i] != b' ' {
                i += 1;
            }
        }
        tokens.push(&s[start..i]);
    }
    tokens
}

fn parse_value(tok: &str) -> Operand {
    if tok.starts_with('"') && tok.ends_with('"') && tok.len() >= 2 {
        return Operand::Lit(Literal::Str(tok.to_string()));
    }
    if let Ok(n) = tok.parse::<i64>() {
        return Operand::Lit(Literal::Int(n));
    }
    if tok.starts_with("_t") && tok[2..].chars().all(|c| c.is_ascii_digit()) && tok.len() > 2 {
        return Operand::Temp(tok.to_string());
    }
    Operand::Id(tok.to_string())
}
