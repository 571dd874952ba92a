//! Object opcode handlers: New, GetField, SetField

use crate::compiler::bytecode::Instruction;
use crate::vm::interpreter::OpcodeResult;
use crate::vm::object::Object;
use crate::vm::value::Value;
use crate::vm::{Vm, VmError, VmResult};

/// Offset of the synthetic `length` field of strings
const STRING_LENGTH: u16 = 0;

impl<'a> Vm<'a> {
    pub(in crate::vm::interpreter) fn exec_object_ops(&mut self, instruction: Instruction) -> VmResult<OpcodeResult> {
        match instruction {
            Instruction::New(index) => self.new_instance(index)?,

            Instruction::GetField(offset) => {
                let frame = self.frame()?;
                let object = frame.pop()?;
                let value = match &object {
                    Value::Object(instance) => instance.borrow().get_field(offset as usize)?,
                    Value::String(s) if offset == STRING_LENGTH => Value::Number(s.chars().count() as f64),
                    Value::Null => return Err(VmError::NullReceiver { member: format!("field #{}", offset) }),
                    other => {
                        return Err(VmError::TypeError(format!("{} has no field #{}", other.kind(), offset)));
                    }
                };
                frame.push(value);
            }

            // Leaves the stored value, which is the value of the assignment
            Instruction::SetField(offset) => {
                let frame = self.frame()?;
                let value = frame.pop()?;
                let object = frame.pop()?;
                match &object {
                    Value::Object(instance) => instance.borrow_mut().set_field(offset as usize, value.clone())?,
                    Value::Null => return Err(VmError::NullReceiver { member: format!("field #{}", offset) }),
                    other => {
                        return Err(VmError::TypeError(format!("cannot assign fields of {}", other.kind())));
                    }
                }
                frame.push(value);
            }

            other => {
                return Err(VmError::InvalidBytecode(format!("{} is not an object instruction", other.name())));
            }
        }
        Ok(OpcodeResult::Continue)
    }

    /// Allocate an instance of `index` and run its field initializer.
    ///
    /// The initializer returns the instance, so it ends up on the caller's
    /// stack once the initializer frame has returned.
    fn new_instance(&mut self, index: u32) -> VmResult<()> {
        let construct = self
            .executable
            .construct(index)
            .ok_or_else(|| VmError::InvalidBytecode(format!("construct @{} out of range", index)))?;
        let instance = Value::object(Object::new(index, construct.field_count));

        let Some(member) = self.initializer else {
            self.frame()?.push(instance);
            return Ok(());
        };
        let (owner, chunk) = self.resolve(index, member)?;
        self.call(owner, member, chunk, vec![instance])
    }
}
