//! Heap instances

use super::value::Value;
use super::{VmError, VmResult};

/// Instance of a class: its runtime construct and one slot per field.
///
/// Inherited fields occupy the lowest offsets, so a subclass instance can be
/// used wherever a parent instance is expected.
#[derive(Debug, Clone)]
pub struct Object {
    /// Construct index of the runtime type
    pub construct: u32,
    pub fields: Vec<Value>,
}

impl Object {
    /// Create an instance with every field set to null
    pub fn new(construct: u32, field_count: usize) -> Self {
        Self {
            construct,
            fields: vec![Value::Null; field_count],
        }
    }

    pub fn get_field(&self, offset: usize) -> VmResult<Value> {
        self.fields.get(offset).cloned().ok_or_else(|| {
            VmError::InvalidBytecode(format!(
                "field offset {} out of bounds (instance has {} fields)",
                offset,
                self.fields.len()
            ))
        })
    }

    pub fn set_field(&mut self, offset: usize, value: Value) -> VmResult<()> {
        let count = self.fields.len();
        let slot = self.fields.get_mut(offset).ok_or_else(|| {
            VmError::InvalidBytecode(format!(
                "field offset {} out of bounds (instance has {} fields)",
                offset, count
            ))
        })?;
        *slot = value;
        Ok(())
    }
}
