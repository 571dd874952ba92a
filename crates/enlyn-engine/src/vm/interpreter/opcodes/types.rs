//! Type opcode handlers: Is, IsNull, Cast, Assert

use crate::compiler::bytecode::Instruction;
use crate::vm::interpreter::OpcodeResult;
use crate::vm::value::Value;
use crate::vm::{Vm, VmError, VmResult};

impl<'a> Vm<'a> {
    pub(in crate::vm::interpreter) fn exec_type_ops(&mut self, instruction: Instruction) -> VmResult<OpcodeResult> {
        let executable = self.executable;
        let value = self.frame()?.pop()?;

        let result = match instruction {
            Instruction::Is { construct, nullable } => Value::Boolean(match value.construct() {
                None => nullable,
                Some(runtime) => executable.is_instance(runtime, construct),
            }),

            Instruction::IsNull => Value::Boolean(value.is_null()),

            Instruction::Cast { construct, nullable } => {
                let accepted = match value.construct() {
                    None => nullable,
                    Some(runtime) => executable.is_instance(runtime, construct),
                };
                if !accepted {
                    return Err(VmError::InvalidCast {
                        value: value.display(executable),
                        target: format!("{}{}", self.construct_name(construct), if nullable { "?" } else { "" }),
                    });
                }
                value
            }

            Instruction::Assert => {
                if value.is_null() {
                    return Err(VmError::NullAssertion);
                }
                value
            }

            other => {
                return Err(VmError::InvalidBytecode(format!("{} is not a type instruction", other.name())));
            }
        };
        self.frame()?.push(result);
        Ok(OpcodeResult::Continue)
    }
}
