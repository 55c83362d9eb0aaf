//! # TAC Generator
//!
//! Walks the AST (spec.md §3.1) and appends TAC instructions to a growing
//! list, following spec.md §4.1 literally: two monotonic counters mint
//! fresh temporaries and labels, each visited expression returns the
//! [`Operand`] holding its value, and literals/identifiers short-circuit
//! without emitting anything.
//!
//! Tagged dispatch (`match` over [`CommandKind`]/[`ExprKind`]) replaces the
//! visitor pattern a tree-walking interpreter would normally use — the
//! compiler checks exhaustiveness for us (spec.md §9).

use crate::ast::{BinOp, Command, CommandKind, Expr, ExprKind, Program, UnOp};
use crate::error::Result;

use super::{Instruction, Literal, Opcode, Operand};

/// Lower a [`Program`] into a flat TAC instruction list.
///
/// Resets all counters on every call (spec.md §5: "both generators reset
/// all mutable state on each top-level invocation").
pub fn generate(program: &Program) -> Result<Vec<Instruction>> {
    let mut gen = TacGenerator::default();
    gen.visit_block(&program.commands)?;
    Ok(gen.instructions)
}

#[derive(Default)]
struct TacGenerator {
    instructions: Vec<Instruction>,
    temp_count: u32,
    label_count: u32,
}

impl TacGenerator {
    fn next_temp(&mut self) -> Operand {
        let name = format!("_t{}", self.temp_count);
        self.temp_count += 1;
        Operand::Temp(name)
    }

    fn next_label(&mut self) -> Operand {
        let name = format!("L{}", self.label_count);
        self.label_count += 1;
        Operand::Label(name)
    }

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn visit_block(&mut self, block: &[Command]) -> Result<()> {
        for command in block {
            self.visit_command(command)?;
        }
        Ok(())
    }

    fn visit_command(&mut self, command: &Command) -> Result<()> {
        match &command.kind {
            CommandKind::Read { name } => {
                self.emit(Instruction::read(Operand::Id(name.clone())));
                Ok(())
            }
            CommandKind::Write { expr } => {
                let value = self.visit_expr(expr)?;
                self.emit(Instruction::write(value));
                Ok(())
            }
            CommandKind::Assign { name, expr } => {
                let value = self.visit_expr(expr)?;
                self.emit(Instruction::assign(Operand::Id(name.clone()), value));
                Ok(())
            }
            // Declarations carry no runtime behavior; the semantic table
            // records the type (spec.md §4.1: "Decl: no TAC emitted").
            CommandKind::Decl { .. } => Ok(()),
            CommandKind::If {
                cond,
                then_block,
                else_block,
            } => self.visit_if(cond, then_block, else_block.as_deref()),
            CommandKind::While { cond, body } => self.visit_while(cond, body),
        }
    }

    fn visit_if(
        &mut self,
        cond: &Expr,
        then_block: &[Command],
        else_block: Option<&[Command]>,
    ) -> Result<()> {
        let label_else = self.next_label();
        let label_end = self.next_label();

        let cond_operand = self.visit_expr(cond)?;
        self.emit(Instruction::if_false_goto(label_else.clone(), cond_operand));

        self.visit_block(then_block)?;

        if let Some(else_block) = else_block {
            self.emit(Instruction::goto(label_end.clone()));
            self.emit(Instruction::label(label_else));
            self.visit_block(else_block)?;
        } else {
            self.emit(Instruction::label(label_else));
        }

        self.emit(Instruction::label(label_end));
        Ok(())
    }

    fn visit_while(&mut self, cond: &Expr, body: &[Command]) -> Result<()> {
        let label_start = self.next_label();
        let label_end = self.next_label();

        self.emit(Instruction::label(label_start.clone()));
        let cond_operand = self.visit_expr(cond)?;
        self.emit(Instruction::if_false_goto(label_end.clone(), cond_operand));

        self.visit_block(body)?;

        self.emit(Instruction::goto(label_start));
        self.emit(Instruction::label(label_end));
        Ok(())
    }

    /// Lower an expression, returning the operand holding its value.
    /// Literals and identifiers return directly without emitting an
    /// instruction (spec.md §4.1).
    fn visit_expr(&mut self, expr: &Expr) -> Result<Operand> {
        match &expr.kind {
            ExprKind::IntLit(value) => Ok(Operand::Lit(Literal::Int(*value))),
            ExprKind::StrLit(text) => Ok(Operand::Lit(Literal::Str(text.clone()))),
            ExprKind::Ident(name) => Ok(Operand::Id(name.clone())),
            ExprKind::Unary { op, operand } => {
                let value = self.visit_expr(operand)?;
                match op {
                    UnOp::Not => {
                        let temp = self.next_temp();
                        self.emit(Instruction::not(temp.clone(), value));
                        Ok(temp)
                    }
                }
            }
            ExprKind::Binary { op, left, right } => {
                let lhs = self.visit_expr(left)?;
                let rhs = self.visit_expr(right)?;
                let temp = self.next_temp();
                let opcode = opcode_of(*op);
                self.emit(Instruction::binary(opcode, temp.clone(), lhs, rhs));
                Ok(temp)
            }
        }
    }
}

fn opcode_of(op: BinOp) -> Opcode {
    match op {
        BinOp::Add => Opcode::Add,
        BinOp::Sub => Opcode::Sub,
        BinOp::Mul => Opcode::Mul,
        BinOp::Div => Opcode::Div,
        BinOp::Eq => Opcode::Eq,
        BinOp::Neq => Opcode::Neq,
        BinOp::Lt => Opcode::Lt,
        BinOp::Le => Opcode::Le,
        BinOp::Gt => Opcode::Gt,
        BinOp::Ge => Opcode::Ge,
        BinOp::And => Opcode::And,
        BinOp::Or => Opcode::Or,
    }
}

