//! Bytecode compiler
//!
//! Turns a checked program into a self-contained executable image:
//! one construct per class, one chunk per member.

pub mod bytecode;
pub mod codegen;
pub mod error;

pub use bytecode::{disassemble, Chunk, CompiledChunk, Construct, Executable, ImageError, Instruction, MemberId};
pub use codegen::compile;
pub use error::{CompileError, CompileResult};
