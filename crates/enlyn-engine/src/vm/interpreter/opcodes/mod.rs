//! Opcode handler modules for the interpreter
//!
//! Each module implements a category of opcode handlers as methods on `Vm`.

pub mod arithmetic;
pub mod calls;
pub mod control_flow;
pub mod objects;
pub mod stack;
pub mod types;
