//! Call frames
//!
//! Each active call owns its instruction pointer, operand stack and local
//! slots. The caller link is the frame below it on the interpreter's frame
//! stack.
//!
//! ```text
//! locals:  [ this | arg1 .. argN | let slots ... ]
//! stack:   [ operand₀ operand₁ ... ]            ← top
//! ```

use super::value::Value;
use super::{VmError, VmResult};
use crate::compiler::bytecode::{CompiledChunk, Instruction};

/// Activation record for one compiled chunk
#[derive(Debug)]
pub struct Frame<'a> {
    code: &'a [Instruction],
    pub ip: usize,
    stack: Vec<Value>,
    locals: Vec<Value>,
}

impl<'a> Frame<'a> {
    /// Bind `args` (receiver first) to the leading slots; the rest start null.
    pub fn new(chunk: &'a CompiledChunk, mut args: Vec<Value>) -> Self {
        let size = chunk.locals.max(args.len());
        args.resize(size, Value::Null);
        Self {
            code: &chunk.code,
            ip: 0,
            stack: Vec::new(),
            locals: args,
        }
    }

    /// Next instruction, advancing the instruction pointer
    pub fn fetch(&mut self) -> VmResult<Instruction> {
        let instruction = self.code.get(self.ip).copied().ok_or_else(|| {
            VmError::InvalidBytecode(format!("instruction pointer {} past end of chunk", self.ip))
        })?;
        self.ip += 1;
        Ok(instruction)
    }

    pub fn jump(&mut self, target: u32) {
        self.ip = target as usize;
    }

    // ===== Operand stack =====

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    #[inline]
    pub fn pop(&mut self) -> VmResult<Value> {
        self.stack.pop().ok_or(VmError::StackUnderflow)
    }

    pub fn peek(&self) -> VmResult<&Value> {
        self.stack.last().ok_or(VmError::StackUnderflow)
    }

    /// Value `depth` slots below the top (0 is the top)
    pub fn peek_at(&self, depth: usize) -> VmResult<&Value> {
        let len = self.stack.len();
        if depth >= len {
            return Err(VmError::StackUnderflow);
        }
        Ok(&self.stack[len - 1 - depth])
    }

    /// Pop the top `count` values, preserving their push order.
    pub fn pop_n(&mut self, count: usize) -> VmResult<Vec<Value>> {
        let len = self.stack.len();
        if count > len {
            return Err(VmError::StackUnderflow);
        }
        Ok(self.stack.split_off(len - count))
    }

    pub fn pop_number(&mut self) -> VmResult<f64> {
        let value = self.pop()?;
        value
            .as_number()
            .ok_or_else(|| VmError::TypeError(format!("expected number, found {}", value.kind())))
    }

    pub fn pop_bool(&mut self) -> VmResult<bool> {
        let value = self.pop()?;
        value
            .as_bool()
            .ok_or_else(|| VmError::TypeError(format!("expected boolean, found {}", value.kind())))
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    // ===== Locals =====

    pub fn load(&self, slot: u16) -> VmResult<Value> {
        self.locals
            .get(slot as usize)
            .cloned()
            .ok_or_else(|| VmError::InvalidBytecode(format!("local slot {} out of range", slot)))
    }

    pub fn store(&mut self, slot: u16, value: Value) -> VmResult<()> {
        let local = self
            .locals
            .get_mut(slot as usize)
            .ok_or_else(|| VmError::InvalidBytecode(format!("local slot {} out of range", slot)))?;
        *local = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(locals: usize) -> CompiledChunk {
        CompiledChunk {
            code: vec![Instruction::Null, Instruction::Return],
            arguments: 1,
            locals,
        }
    }

    #[test]
    fn test_locals_padded_with_null() {
        let chunk = chunk(3);
        let frame = Frame::new(&chunk, vec![Value::Number(1.0)]);
        assert_eq!(frame.load(0).unwrap(), Value::Number(1.0));
        assert!(frame.load(2).unwrap().is_null());
        assert!(frame.load(3).is_err());
    }

    #[test]
    fn test_pop_n_keeps_order() {
        let chunk = chunk(1);
        let mut frame = Frame::new(&chunk, Vec::new());
        for n in 1..=3 {
            frame.push(Value::Number(n as f64));
        }
        let args = frame.pop_n(2).unwrap();
        assert_eq!(args, vec![Value::Number(2.0), Value::Number(3.0)]);
        assert_eq!(frame.depth(), 1);
        assert!(matches!(frame.pop_n(2), Err(VmError::StackUnderflow)));
    }

    #[test]
    fn test_fetch_past_end() {
        let chunk = chunk(1);
        let mut frame = Frame::new(&chunk, Vec::new());
        assert_eq!(frame.fetch().unwrap(), Instruction::Null);
        assert_eq!(frame.fetch().unwrap(), Instruction::Return);
        assert!(frame.fetch().is_err());
    }

    #[test]
    fn test_typed_pops() {
        let chunk = chunk(1);
        let mut frame = Frame::new(&chunk, Vec::new());
        frame.push(Value::Boolean(true));
        assert!(matches!(frame.pop_number(), Err(VmError::TypeError(_))));
        frame.push(Value::Number(2.5));
        assert_eq!(frame.pop_number().unwrap(), 2.5);
    }
}
