//! # LLVM IR Generator
//!
//! Converts a TAC instruction list (spec.md §3.3) into textual LLVM IR for a
//! single `@main` function (spec.md §4.2). Three concerns are tracked
//! concurrently: symbol/temporary bookkeeping ([`IrGenerator::var_map`],
//! [`IrGenerator::temp_map`]), string-literal interning
//! ([`IrGenerator::string_literals`]), and basic-block construction
//! (`current_name`/`current_lines`/`current_terminated`).
//!
//! Terminator discipline is tracked with an explicit boolean rather than by
//! inspecting the text of the last emitted line (spec.md §9): every opcode
//! handler that closes a block sets `current_terminated = true`, and the
//! top of the main loop opens a fresh synthetic block whenever a
//! non-`LABEL` instruction would otherwise land in an already-terminated
//! block.


use std::collections::BTreeSet;

use crate::ast::SourceType;
use crate::error::{CompileError, Result};
use crate::semantic::SymbolTable;
use crate::tac::{Instruction, Literal, Opcode, Operand};

const I32: &str = "i32";
const I1: &str = "i1";
const FLOAT: &str = "float";
const PTR: &str = "i8*";

fn llvm_type(source_type: SourceType) -> &'static str {
    match source_type {
        SourceType::Inteiro => I32,
        SourceType::Booleano => I1,
        SourceType::Real => FLOAT,
    }
}

/// Lower a TAC instruction list into a textual LLVM IR module defining a
/// single `i32 @main()`.
pub fn generate(instructions: &[Instruction], symbols: &SymbolTable) -> Result<String> {
    let mut gen = IrGenerator::default();

    // Format strings are interned eagerly, before the prepass even looks at
    // usage, matching spec.md §4.2.3's "interned eagerly at start" and
    // `original_source/llvm_generator.py::_declare_printf_scanf` being
    // called unconditionally at the top of generation.
    gen.intern_string("%d".to_string());
    gen.intern_string("%d\n".to_string());
    gen.prepass(instructions);

    gen.start_new_block("entry".to_string());
    for name in collect_identifiers(instructions) {
        let ty = llvm_type(symbols.type_of(&name));
        let ptr = format!("%{name}_ptr");
        gen.add_line(format!("{ptr} = alloca {ty}, align 4"));
        gen.var_map.insert(name, (ptr, ty.to_string()));
    }

    if instructions.is_empty() {
        gen.add_line("ret i32 0");
        gen.current_terminated = true;
    } else if let Some(label) = leading_label_name(&instructions[0]) {
        // Entry branches to the program's own leading label; the main loop
        // below opens that block when it processes the LABEL instruction.
        gen.add_line(format!("br label %{label}"));
        gen.current_terminated = true;
    } else {
        // The TAC list doesn't begin with a LABEL — synthesize one and
        // pre-open it so the first instruction has somewhere to land.
        let synthetic = gen.synthetic_block_name();
        gen.add_line(format!("br label %{synthetic}"));
        gen.current_terminated = true;
        gen.start_new_block(synthetic);
    }

    for instr in instructions {
        if instr.opcode != Opcode::Label && gen.current_terminated {
            let synthetic = gen.synthetic_block_name();
            gen.start_new_block(synthetic);
        }
        gen.translate(instr)?;
    }

    if !gen.current_terminated {
        gen.add_line("ret i32 0");
    }
    gen.finish_current_block();

    Ok(gen.assemble())
}

fn leading_label_name(instr: &Instruction) -> Option<String> {
    match (instr.opcode, &instr.result) {
        (Opcode::Label, Some(Operand::Label(name))) => Some(name.clone()),
        _ => None,
    }
}

/// Every `Id` operand name appearing anywhere in the instruction list
/// (spec.md §4.2.4 item 2), in a deterministic (sorted) order so the entry
/// block's alloca sequence is stable across runs.
fn collect_identifiers(instructions: &[Instruction]) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for instr in instructions {
        for slot in [&instr.result, &instr.arg1, &instr.arg2] {
            if let Some(Operand::Id(name)) = slot {
                names.insert(name.clone());
            }
        }
    }
    names
}

#[derive(Default)]
struct IrGenerator {
    var_map: std::collections::HashMap<String, (String, String)>,
    temp_map: std::collections::HashMap<String, (String, String)>,
    string_literals: std::collections::HashMap<String, (String, usize)>,
    global_strings: Vec<String>,
    string_count: u32,
    reg_count: u32,
    blocks: Vec<(String, Vec<String>)>,
    current_name: Option<String>,
    current_lines: Vec<String>,
    current_terminated: bool,
}

impl IrGenerator {
    fn add_line(&mut self, line: impl Into<String>) {
        self.current_lines.push(format!("  {}", line.into()));
    }

    fn start_new_block(&mut self, name: String) {
        self.finish_current_block();
        self.current_name = Some(name);
        self.current_lines = Vec::new();
        self.current_terminated = false;
    }

    fn finish_current_block(&mut self) {
        if let Some(name) = self.current_name.take() {
            self.blocks.push((name, std::mem::take(&mut self.current_lines)));
        }
    }

    fn fresh_reg(&mut self) -> u32 {
        let n = self.reg_count;
        self.reg_count += 1;
        n
    }

    fn fresh_value_reg(&mut self) -> String {
        format!("v{}", self.fresh_reg())
    }

    fn synthetic_block_name(&mut self) -> String {
        format!("block_{}", self.fresh_reg())
    }

    fn prepass(&mut self, instructions: &[Instruction]) {
        for instr in instructions {
            if instr.opcode == Opcode::Write {
                if let Some(Operand::Lit(Literal::Str(raw))) = &instr.result {
                    let decoded = decode_escapes(strip_quotes(raw));
                    self.intern_string(format!("{decoded}\n"));
                }
            }
        }
    }

    fn intern_string(&mut self, content: String) -> (String, usize) {
        if let Some(existing) = self.string_literals.get(&content) {
            return existing.clone();
        }
        let mut bytes = content.clone().into_bytes();
        bytes.push(0);
        let len = bytes.len();
        let name = format!("@.str.{}", self.string_count);
        self.string_count += 1;
        let escaped = hex_escape(&bytes);
        self.global_strings.push(format!(
            "{name} = private unnamed_addr constant [{len} x i8] c\"{escaped}\", align 1"
        ));
        self.string_literals.insert(content, (name.clone(), len));
        (name, len)
    }

    fn label_operand(op: &Operand) -> Result<String> {
        match op {
            Operand::Label(name) => Ok(name.clone()),
            other => Err(CompileError::internal(format!(
                "expected a label operand, got {other:?}"
            ))),
        }
    }

    /// The operand's type as already recorded (var_map/temp_map), without
    /// forcing any conversion. Used to infer an `ASSIGN`-into-`Temp`'s
    /// result type from its source operand (spec.md §4.2.6).
    fn natural_type(&self, op: &Operand) -> Result<String> {
        Ok(match op {
            Operand::Lit(Literal::Int(_)) => I32.to_string(),
            Operand::Lit(Literal::Str(_)) => PTR.to_string(),
            Operand::Id(name) => self
                .var_map
                .get(name)
                .map(|(_, ty)| ty.clone())
                .ok_or_else(|| CompileError::internal(format!("no alloca for identifier '{name}'")))?,
            Operand::Temp(name) => self
                .temp_map
                .get(name)
                .map(|(_, ty)| ty.clone())
                .ok_or_else(|| CompileError::internal(format!("temp '{name}' used before assignment")))?,
            Operand::Label(name) => {
                return Err(CompileError::internal(format!(
                    "label '{name}' used as a value operand"
                )))
            }
        })
    }

    /// Produce the LLVM value (register or immediate) for `operand` at
    /// `target_ty`, emitting loads/conversions as needed (spec.md §4.2.7).
    fn materialize(&mut self, operand: &Operand, target_ty: &str) -> Result<String> {
        match operand {
            Operand::Lit(Literal::Int(value)) => {
                if target_ty == I1 {
                    Ok(if *value != 0 { "true".to_string() } else { "false".to_string() })
                } else {
                    Ok(value.to_string())
                }
            }
            Operand::Lit(Literal::Str(raw)) => {
                let decoded = decode_escapes(strip_quotes(raw));
                let (name, len) = self.intern_string(decoded);
                let reg = self.fresh_value_reg();
                self.add_line(format!(
                    "%{reg} = getelementptr inbounds [{len} x i8], [{len} x i8]* {name}, i64 0, i64 0"
                ));
                Ok(format!("%{reg}"))
            }
            Operand::Id(name) => {
                let (ptr, actual_ty) = self
                    .var_map
                    .get(name)
                    .cloned()
                    .ok_or_else(|| CompileError::internal(format!("no alloca for identifier '{name}'")))?;
                let reg = self.fresh_value_reg();
                self.add_line(format!("%{reg} = load {actual_ty}, {actual_ty}* {ptr}, align 4"));
                self.convert(format!("%{reg}"), &actual_ty, target_ty)
            }
            Operand::Temp(name) => {
                let (value, actual_ty) = self
                    .temp_map
                    .get(name)
                    .cloned()
                    .ok_or_else(|| CompileError::internal(format!("temp '{name}' used before assignment")))?;
                self.convert(value, &actual_ty, target_ty)
            }
            Operand::Label(name) => Err(CompileError::internal(format!(
                "label '{name}' used as a value operand"
            ))),
        }
    }

    /// The only supported implicit conversion is widening a loaded `i32`
    /// to `i1` for boolean contexts (spec.md §4.2.7). Anything else is an
    /// invariant violation under a semantically valid program.
    fn convert(&mut self, value: String, from_ty: &str, to_ty: &str) -> Result<String> {
        if from_ty == to_ty {
            return Ok(value);
        }
        if from_ty == I32 && to_ty == I1 {
            let reg = self.fresh_value_reg();
            self.add_line(format!("%{reg} = icmp ne i32 {value}, 0"));
            return Ok(format!("%{reg}"));
        }
        Err(CompileError::internal(format!(
            "unsupported type conversion from {from_ty} to {to_ty}"
        )))
    }

    /// Materialize a real copy instruction rather than aliasing map entries
    /// (spec.md §9's resolution of the `ASSIGN`-into-`Temp` open question).
    fn copy_operand(&mut self, ty: &str, value: String) -> String {
        let reg = self.fresh_value_reg();
        let line = match ty {
            I1 => format!("%{reg} = add i1 {value}, 0"),
            I32 => format!("%{reg} = add i32 {value}, 0"),
            FLOAT => format!("%{reg} = fadd float {value}, 0.000000e+00"),
            _ => format!("%{reg} = bitcast {ty} {value} to {ty}"),
        };
        self.add_line(line);
        format!("%{reg}")
    }

    fn translate(&mut self, instr: &Instruction) -> Result<()> {
        match instr.opcode {
            Opcode::Label => {
                let name = Self::label_operand(instr.result.as_ref().unwrap())?;
                if !self.current_terminated {
                    self.add_line(format!("br label %{name}"));
                }
                self.start_new_block(name);
            }
            Opcode::Goto => {
                let target = Self::label_operand(instr.result.as_ref().unwrap())?;
                self.add_line(format!("br label %{target}"));
                self.current_terminated = true;
            }
            Opcode::IfFalseGoto => {
                let false_label = Self::label_operand(instr.result.as_ref().unwrap())?;
                let cond = self.materialize(instr.arg1.as_ref().unwrap(), I1)?;
                let true_label = self.synthetic_block_name();
                self.add_line(format!(
                    "br i1 {cond}, label %{true_label}, label %{false_label}"
                ));
                self.current_terminated = true;
                self.start_new_block(true_label);
            }
            Opcode::Assign => {
                let dst = instr.result.as_ref().unwrap();
                let src = instr.arg1.as_ref().unwrap();
                let ty = match dst {
                    Operand::Id(name) => self
                        .var_map
                        .get(name)
                        .map(|(_, ty)| ty.clone())
                        .ok_or_else(|| {
                            CompileError::internal(format!("assignment to undeclared identifier '{name}'"))
                        })?,
                    Operand::Temp(_) => self.natural_type(src)?,
                    other => {
                        return Err(CompileError::internal(format!(
                            "ASSIGN result must be Id or Temp, got {other:?}"
                        )))
                    }
                };
                let value = self.materialize(src, &ty)?;
                match dst {
                    Operand::Id(name) => {
                        let ptr = self.var_map[name].0.clone();
                        self.add_line(format!("store {ty} {value}, {ty}* {ptr}, align 4"));
                    }
                    Operand::Temp(name) => {
                        let reg = self.copy_operand(&ty, value);
                        self.temp_map.insert(name.clone(), (reg, ty));
                    }
                    _ => unreachable!("validated above"),
                }
            }
            op if op.is_arithmetic() => {
                let a = self.materialize(instr.arg1.as_ref().unwrap(), I32)?;
                let b = self.materialize(instr.arg2.as_ref().unwrap(), I32)?;
                let mnemonic = match op {
                    Opcode::Add => "add",
                    Opcode::Sub => "sub",
                    Opcode::Mul => "mul",
                    Opcode::Div => "sdiv",
                    _ => unreachable!("guarded by is_arithmetic"),
                };
                let dst = temp_name(instr.result.as_ref().unwrap())?;
                self.add_line(format!("%{dst} = {mnemonic} i32 {a}, {b}"));
                self.temp_map.insert(dst.clone(), (format!("%{dst}"), I32.to_string()));
            }
            op if op.is_comparison() => {
                let a = self.materialize(instr.arg1.as_ref().unwrap(), I32)?;
                let b = self.materialize(instr.arg2.as_ref().unwrap(), I32)?;
                let predicate = match op {
                    Opcode::Eq => "eq",
                    Opcode::Neq => "ne",
                    Opcode::Lt => "slt",
                    Opcode::Le => "sle",
                    Opcode::Gt => "sgt",
                    Opcode::Ge => "sge",
                    _ => unreachable!("guarded by is_comparison"),
                };
                let dst = temp_name(instr.result.as_ref().unwrap())?;
                self.add_line(format!("%{dst} = icmp {predicate} i32 {a}, {b}"));
                self.temp_map.insert(dst.clone(), (format!("%{dst}"), I1.to_string()));
            }
            op if op.is_logical() => {
                let a = self.materialize(instr.arg1.as_ref().unwrap(), I1)?;
                let b = self.materialize(instr.arg2.as_ref().unwrap(), I1)?;
                let mnemonic = if op == Opcode::And { "and" } else { "or" };
                let dst = temp_name(instr.result.as_ref().unwrap())?;
                self.add_line(format!("%{dst} = {mnemonic} i1 {a}, {b}"));
                self.temp_map.insert(dst.clone(), (format!("%{dst}"), I1.to_string()));
            }
            Opcode::Not => {
                let a = self.materialize(instr.arg1.as_ref().unwrap(), I1)?;
                let dst = temp_name(instr.result.as_ref().unwrap())?;
                self.add_line(format!("%{dst} = xor i1 {a}, true"));
                self.temp_map.insert(dst.clone(), (format!("%{dst}"), I1.to_string()));
            }
            Opcode::Read => {
                let name = match instr.result.as_ref().unwrap() {
                    Operand::Id(name) => name.clone(),
                    other => {
                        return Err(CompileError::internal(format!(
                            "READ result must be an identifier, got {other:?}"
                        )))
                    }
                };
                let (ptr, ty) = self
                    .var_map
                    .get(&name)
                    .cloned()
                    .ok_or_else(|| CompileError::internal(format!("no alloca for identifier '{name}'")))?;
                let (fmt_name, fmt_len) = self.intern_string("%d".to_string());
                let fmt_reg = self.fresh_value_reg();
                self.add_line(format!(
                    "%{fmt_reg} = getelementptr inbounds [{fmt_len} x i8], [{fmt_len} x i8]* {fmt_name}, i64 0, i64 0"
                ));
                self.add_line(format!(
                    "call i32 (i8*, ...) @scanf(i8* %{fmt_reg}, {ty}* {ptr})"
                ));
            }
            Opcode::Write => {
                let value = instr.result.as_ref().unwrap();
                if let Operand::Lit(Literal::Str(raw)) = value {
                    let decoded = decode_escapes(strip_quotes(raw));
                    let (fmt_name, fmt_len) = self.intern_string(format!("{decoded}\n"));
                    let fmt_reg = self.fresh_value_reg();
                    self.add_line(format!(
                        "%{fmt_reg} = getelementptr inbounds [{fmt_len} x i8], [{fmt_len} x i8]* {fmt_name}, i64 0, i64 0"
                    ));
                    self.add_line(format!("call i32 (i8*, ...) @printf(i8* %{fmt_reg})"));
                } else {
                    let val = self.materialize(value, I32)?;
                    let (fmt_name, fmt_len) = self.intern_string("%d\n".to_string());
                    let fmt_reg = self.fresh_value_reg();
                    self.add_line(format!(
                        "%{fmt_reg} = getelementptr inbounds [{fmt_len} x i8], [{fmt_len} x i8]* {fmt_name}, i64 0, i64 0"
                    ));
                    self.add_line(format!(
                        "call i32 (i8*, ...) @printf(i8* %{fmt_reg}, i32 {val})"
                    ));
                }
            }
            Opcode::Decl => {} // variable already allocated in the prepass
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => unreachable!("handled above"),
            Opcode::Eq | Opcode::Neq | Opcode::Lt | Opcode::Le | Opcode::Gt | Opcode::Ge => {
                unreachable!("handled above")
            }
            Opcode::And | Opcode::Or => unreachable!("handled above"),
        }
        Ok(())
    }

    fn assemble(&self) -> String {
        let mut out = vec![
            "; ModuleID = 'arara_program'".to_string(),
            "source_filename = \"arara.arara\"".to_string(),
            "target datalayout = \"e-m:e-p270:32:32-p271:32:32-p272:64:64-i64:64-f80:128-n8:16:32:64-S128\""
                .to_string(),
            "target triple = \"x86_64-pc-linux-gnu\"".to_string(),
            String::new(),
        ];
        out.extend(self.global_strings.iter().cloned());
        out.push(String::new());
        out.push("declare i32 @printf(i8*, ...)".to_string());
        out.push("declare i32 @scanf(i8*, ...)".to_string());
        out.push(String::new());
        out.push("define i32 @main() {".to_string());
        for (name, lines) in &self.blocks {
            out.push(format!("{name}:"));
            out.extend(lines.iter().cloned());
        }
        out.push("}".to_string());
        out.join("\n")
    }
}

fn temp_name(op: &Operand) -> Result<String> {
    match op {
        Operand::Temp(name) => Ok(name.clone()),
        other => Err(CompileError::internal(format!(
            "expected a temp result operand, got {other:?}"
        ))),
    }
}

/// Decode the single escape vocabulary spec.md §9 requires (`\n \t \\ \"`),
/// applied before computing byte length for the interned LLVM constant.
fn decode_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn strip_quotes(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
}

/// LLVM's conventional string-constant escaping: printable ASCII passes
/// through, everything else (including `"` and `\`) becomes `\XX`.
fn hex_escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if b.is_ascii_graphic() && b != b'"' && b != b'\\' || b == b' ' {
            out.push(b as char);
        } else {
            out.push_str(&format!("\\{b:02X}"));
        }
    }
    out
}
