//! Primitive operator handlers
//!
//! Only emitted when both operands are statically numbers (or booleans);
//! every other operator use goes through a call.

use crate::compiler::bytecode::Instruction;
use crate::vm::interpreter::OpcodeResult;
use crate::vm::value::Value;
use crate::vm::{Vm, VmError, VmResult};

impl<'a> Vm<'a> {
    pub(in crate::vm::interpreter) fn exec_arithmetic_ops(
        &mut self,
        instruction: Instruction,
    ) -> VmResult<OpcodeResult> {
        let frame = self.frame()?;
        let result = match instruction {
            // =========================================================
            // Unary
            // =========================================================
            Instruction::Negate => Value::Number(-frame.pop_number()?),
            Instruction::Not => Value::Boolean(!frame.pop_bool()?),

            // =========================================================
            // Number arithmetic
            // =========================================================
            Instruction::Add
            | Instruction::Subtract
            | Instruction::Multiply
            | Instruction::Divide
            | Instruction::Modulo => {
                let b = frame.pop_number()?;
                let a = frame.pop_number()?;
                Value::Number(match instruction {
                    Instruction::Add => a + b,
                    Instruction::Subtract => a - b,
                    Instruction::Multiply => a * b,
                    Instruction::Divide => a / b,
                    _ => a % b,
                })
            }

            // =========================================================
            // Number comparison
            // =========================================================
            Instruction::Less | Instruction::Greater | Instruction::LessEqual | Instruction::GreaterEqual => {
                let b = frame.pop_number()?;
                let a = frame.pop_number()?;
                Value::Boolean(match instruction {
                    Instruction::Less => a < b,
                    Instruction::Greater => a > b,
                    Instruction::LessEqual => a <= b,
                    _ => a >= b,
                })
            }

            // Numbers or booleans, compared by value
            Instruction::Equal | Instruction::NotEqual => {
                let b = frame.pop()?;
                let a = frame.pop()?;
                let equal = a.equals(&b);
                Value::Boolean(if instruction == Instruction::Equal { equal } else { !equal })
            }

            // Both operands are always evaluated
            Instruction::And | Instruction::Or => {
                let b = frame.pop_bool()?;
                let a = frame.pop_bool()?;
                Value::Boolean(if instruction == Instruction::And { a && b } else { a || b })
            }

            other => {
                return Err(VmError::InvalidBytecode(format!(
                    "{} is not an operator instruction",
                    other.name()
                )))
            }
        };
        frame.push(result);
        Ok(OpcodeResult::Continue)
    }
}
