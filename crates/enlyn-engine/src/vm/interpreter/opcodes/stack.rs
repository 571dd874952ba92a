//! Stack opcode handlers: constants, literals, Pop, Dup, Load, Store

use crate::compiler::bytecode::Instruction;
use crate::vm::interpreter::OpcodeResult;
use crate::vm::value::Value;
use crate::vm::{Vm, VmError, VmResult};

impl<'a> Vm<'a> {
    pub(in crate::vm::interpreter) fn exec_stack_ops(&mut self, instruction: Instruction) -> VmResult<OpcodeResult> {
        let value = match instruction {
            Instruction::Const(index) => self
                .constants
                .get(index as usize)
                .cloned()
                .ok_or_else(|| VmError::InvalidBytecode(format!("constant #{} out of range", index)))?,
            Instruction::Zero => Value::Number(0.0),
            Instruction::One => Value::Number(1.0),
            Instruction::True => Value::Boolean(true),
            Instruction::False => Value::Boolean(false),
            Instruction::Null => Value::Null,

            Instruction::Pop => {
                self.frame()?.pop()?;
                return Ok(OpcodeResult::Continue);
            }
            Instruction::Dup => self.frame()?.peek()?.clone(),
            Instruction::Load(slot) => self.frame()?.load(slot)?,
            Instruction::Store(slot) => {
                let frame = self.frame()?;
                let value = frame.pop()?;
                frame.store(slot, value)?;
                return Ok(OpcodeResult::Continue);
            }
            other => return Err(VmError::InvalidBytecode(format!("{} is not a stack instruction", other.name()))),
        };
        self.frame()?.push(value);
        Ok(OpcodeResult::Continue)
    }
}
