//! Enlyn VM Bytecode Definitions
//!
//! This module provides the instruction set, the executable image format,
//! the constant pool and the disassembler.

pub mod constants;
pub mod disasm;
pub mod module;
pub mod opcode;

pub use constants::{Constant, ConstantPool};
pub use disasm::disassemble;
pub use module::{Chunk, CompiledChunk, Construct, Executable, ImageError, MemberId};
pub use opcode::Instruction;
