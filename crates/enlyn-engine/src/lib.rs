//! Enlyn Language Engine
//!
//! This crate provides the complete Enlyn toolchain core:
//! - **Parser**: Lexer, indentation filter and recursive-descent parser (`parser` module)
//! - **Checker**: Class table, type checker and diagnostics (`checker` module)
//! - **Compiler**: Bytecode model, code generation and disassembly (`compiler` module)
//! - **VM**: Stack interpreter with virtual dispatch (`vm` module)
//! - **Builtins**: The standard library registry shared by all stages (`builtins` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use enlyn_engine::pipeline::run_source;
//!
//! let source = "class Main : IO {\n  public new() = this.out(\"Hi\")\n}";
//! let mut output = Vec::new();
//! run_source(source, std::io::empty(), &mut output)?;
//! assert_eq!(output, b"Hi\n");
//! ```

#![warn(rust_2018_idioms)]
#![allow(clippy::new_without_default)]

// ============================================================================
// Core Modules
// ============================================================================

/// Standard library registry: built-in classes, members and natives
pub mod builtins;

/// Front end: tokens, lexer, indentation filter, AST and parser
pub mod parser;

/// Semantic analysis: class table, type checker and diagnostics
pub mod checker;

/// Bytecode compiler: image format, constant pool, codegen and disassembler
pub mod compiler;

/// Virtual machine: values, instances, frames, natives and interpreter
pub mod vm;

/// Whole-pipeline entry points
pub mod pipeline;

// ============================================================================
// Re-exports
// ============================================================================

pub use builtins::StandardLibrary;
pub use checker::{Analysis, CheckError, Diagnostic, TypeChecker};
pub use compiler::{compile, disassemble, CompileError, Executable};
pub use parser::{Parser, Span};
pub use pipeline::{check_program, compile_source, parse_program, run_source, EngineError, EngineResult};
pub use vm::{Value, Vm, VmError};
