//! Runtime values
//!
//! Primitives are carried inline; instances of user classes and `IO` are
//! reference-counted field arrays. `null` is the absence of an instance.

use super::object::Object;
use crate::builtins::class_id;
use crate::compiler::Executable;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A value on the operand stack, in a local slot or in a field slot
#[derive(Clone)]
pub enum Value {
    Null,
    Number(f64),
    Boolean(bool),
    String(Rc<str>),
    Object(Rc<RefCell<Object>>),
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn object(object: Object) -> Self {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Construct index of the value's runtime type; `None` for null.
    pub fn construct(&self) -> Option<u32> {
        let index = match self {
            Value::Null => return None,
            Value::Number(_) => class_id::NUMBER,
            Value::Boolean(_) => class_id::BOOLEAN,
            Value::String(_) => class_id::STRING,
            Value::Object(object) => return Some(object.borrow().construct),
        };
        Some(index as u32)
    }

    /// Universal equality: by value for primitives, by identity for instances.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Text written by `IO.out` and string concatenation.
    pub fn display(&self, executable: &Executable) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Number(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::String(s) => s.to_string(),
            Value::Object(object) => {
                let construct = object.borrow().construct;
                let name = executable.construct(construct).map_or("?", |c| c.name.as_str());
                format!("<{}>", name)
            }
        }
    }

    /// Short kind name used in fault messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::Object(_) => "instance",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Object(object) => {
                let object = object.borrow();
                write!(f, "@{}[{} fields]", object.construct, object.fields.len())
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::bytecode::{CompiledChunk, ConstantPool, Construct};

    fn image() -> Executable {
        let constructs = vec![Construct::new("any", None, 0), Construct::new("Point", Some(0), 2)];
        Executable::new(constructs, 1, ConstantPool::new(), Vec::new(), CompiledChunk::default())
    }

    #[test]
    fn test_display_forms() {
        let exe = image();
        assert_eq!(Value::Number(1.0).display(&exe), "1");
        assert_eq!(Value::Number(0.5).display(&exe), "0.5");
        assert_eq!(Value::Number(-3.0).display(&exe), "-3");
        assert_eq!(Value::Boolean(true).display(&exe), "true");
        assert_eq!(Value::Null.display(&exe), "null");
        assert_eq!(Value::from("hi").display(&exe), "hi");
        assert_eq!(Value::object(Object::new(1, 2)).display(&exe), "<Point>");
    }

    #[test]
    fn test_equality_by_value_and_identity() {
        assert!(Value::from("a").equals(&Value::from("a")));
        assert!(Value::Number(2.0).equals(&Value::Number(2.0)));
        assert!(!Value::Number(1.0).equals(&Value::Boolean(true)));
        assert!(!Value::Null.equals(&Value::Number(0.0)));

        let a = Value::object(Object::new(1, 0));
        let b = Value::object(Object::new(1, 0));
        assert!(a.equals(&a.clone()));
        assert!(!a.equals(&b));
    }

    #[test]
    fn test_runtime_construct() {
        assert_eq!(Value::Null.construct(), None);
        assert_eq!(Value::Number(1.0).construct(), Some(class_id::NUMBER as u32));
        assert_eq!(Value::from("x").construct(), Some(class_id::STRING as u32));
        assert_eq!(Value::object(Object::new(7, 0)).construct(), Some(7));
    }
}
