//! # Arara Compiler
//!
//! A small ahead-of-time compiler that lowers a didactic imperative
//! language to LLVM IR through a three-address-code intermediate
//! representation.
//!
//! ## Pipeline
//!
//! The compiler processes source text through four stages:
//!
//! 1. **Frontend** - Tokenizes and parses source into an [`ast::Program`]
//! 2. **Semantic table** - Records every declared identifier's type
//! 3. **TAC generator** - Lowers the AST into three-address code
//! 4. **IR generator** - Lowers TAC into textual LLVM IR for `@main`
//!
//! ## Example
//!
//! ```rust
//! use arara_compiler::{codegen, frontend, semantic, tac};
//!
//! let source = "leia(x); escreva(x);";
//! let program = frontend::parse(source).unwrap();
//! let symbols = semantic::build(&program);
//! let instructions = tac::generator::generate(&program).unwrap();
//! let ir = codegen::generate(&instructions, &symbols).unwrap();
//! assert!(ir.contains("define i32 @main()"));
//! ```

pub mod ast;
pub mod codegen;
pub mod error;
pub mod frontend;
pub mod semantic;
pub mod tac;
