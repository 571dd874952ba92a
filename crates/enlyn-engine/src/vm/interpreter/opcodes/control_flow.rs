//! Control flow opcode handlers: Jump, JumpIfFalse, Return

use crate::compiler::bytecode::Instruction;
use crate::vm::interpreter::OpcodeResult;
use crate::vm::{Vm, VmError, VmResult};
use tracing::debug;

impl<'a> Vm<'a> {
    pub(in crate::vm::interpreter) fn exec_control_flow_ops(
        &mut self,
        instruction: Instruction,
    ) -> VmResult<OpcodeResult> {
        match instruction {
            Instruction::Jump(target) => {
                self.frame()?.jump(target);
                Ok(OpcodeResult::Continue)
            }

            Instruction::JumpIfFalse(target) => {
                let frame = self.frame()?;
                if !frame.pop_bool()? {
                    frame.jump(target);
                }
                Ok(OpcodeResult::Continue)
            }

            // Pop the result and the frame; the caller gets the result on its stack
            Instruction::Return => {
                let result = self.frame()?.pop()?;
                self.frames.pop();
                debug!(depth = self.frames.len(), "pop frame");
                match self.frames.last_mut() {
                    Some(caller) => {
                        caller.push(result);
                        Ok(OpcodeResult::Continue)
                    }
                    None => Ok(OpcodeResult::Halt(result)),
                }
            }

            other => Err(VmError::InvalidBytecode(format!(
                "{} is not a control flow instruction",
                other.name()
            ))),
        }
    }
}
