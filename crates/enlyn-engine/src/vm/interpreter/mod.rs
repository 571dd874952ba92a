//! Instruction dispatch
//!
//! The run loop fetches from the innermost frame and hands each instruction
//! to the handler for its category. Handlers live in [`opcodes`], one module
//! per category, as methods on [`Vm`].

pub mod opcodes;

use super::frame::Frame;
use super::{Vm, VmError, VmResult};
use crate::compiler::bytecode::Instruction;
use crate::vm::value::Value;
use tracing::trace;

/// Outcome of executing one instruction
#[derive(Debug)]
pub enum OpcodeResult {
    /// Continue with the next instruction of whichever frame is now on top
    Continue,
    /// The outermost frame returned
    Halt(Value),
}

impl<'a> Vm<'a> {
    pub(super) fn execute(&mut self) -> VmResult<Value> {
        loop {
            let depth = self.frames.len();
            let frame = self.frame()?;
            let ip = frame.ip;
            let instruction = frame.fetch()?;
            trace!(depth, ip, %instruction, stack = frame.depth(), "exec");

            if let OpcodeResult::Halt(value) = self.dispatch(instruction)? {
                return Ok(value);
            }
        }
    }

    fn dispatch(&mut self, instruction: Instruction) -> VmResult<OpcodeResult> {
        use Instruction::*;

        match instruction {
            Const(_) | Zero | One | True | False | Null | Pop | Dup | Load(_) | Store(_) => {
                self.exec_stack_ops(instruction)
            }
            Add | Subtract | Multiply | Divide | Modulo | Negate | Less | Greater | LessEqual | GreaterEqual
            | Equal | NotEqual | And | Or | Not => self.exec_arithmetic_ops(instruction),
            New(_) | GetField(_) | SetField(_) => self.exec_object_ops(instruction),
            Invoke { .. } | Virtual { .. } | VirtualOrAny { .. } => self.exec_call_ops(instruction),
            Is { .. } | IsNull | Cast { .. } | Assert => self.exec_type_ops(instruction),
            Jump(_) | JumpIfFalse(_) | Return => self.exec_control_flow_ops(instruction),
        }
    }

    /// The innermost frame
    pub(in crate::vm) fn frame(&mut self) -> VmResult<&mut Frame<'a>> {
        self.frames
            .last_mut()
            .ok_or_else(|| VmError::InvalidBytecode("no active frame".to_string()))
    }
}
