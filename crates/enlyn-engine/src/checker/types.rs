//! Static types

use crate::builtins::{class_id, BUILTIN_CLASS_COUNT};

/// Index of a type record in the class table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ANY: TypeId = TypeId(class_id::ANY as u32);
    pub const NUMBER: TypeId = TypeId(class_id::NUMBER as u32);
    pub const STRING: TypeId = TypeId(class_id::STRING as u32);
    pub const BOOLEAN: TypeId = TypeId(class_id::BOOLEAN as u32);
    pub const IO: TypeId = TypeId(class_id::IO as u32);
    /// Return type of methods that produce no value; has no runtime construct
    pub const UNIT: TypeId = TypeId(BUILTIN_CLASS_COUNT as u32);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Static type of an expression or declaration.
///
/// Nested options collapse: `T??` is the same type as `T?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ty {
    /// Instance of a class (never null)
    Class(TypeId),
    /// Instance of a class or null
    Option(TypeId),
    /// Type of the `null` literal; only assignable to options
    Null,
}

impl Ty {
    pub const UNIT: Ty = Ty::Class(TypeId::UNIT);
    pub const NUMBER: Ty = Ty::Class(TypeId::NUMBER);
    pub const STRING: Ty = Ty::Class(TypeId::STRING);
    pub const BOOLEAN: Ty = Ty::Class(TypeId::BOOLEAN);

    /// The class behind this type, if any.
    pub fn class(self) -> Option<TypeId> {
        match self {
            Ty::Class(id) | Ty::Option(id) => Some(id),
            Ty::Null => None,
        }
    }

    pub fn is_nullable(self) -> bool {
        matches!(self, Ty::Option(_) | Ty::Null)
    }

    /// Wrap into an option.
    pub fn optional(self) -> Ty {
        match self {
            Ty::Class(id) => Ty::Option(id),
            other => other,
        }
    }

    /// Strip one level of option.
    pub fn unwrapped(self) -> Option<Ty> {
        match self {
            Ty::Option(id) => Some(Ty::Class(id)),
            _ => None,
        }
    }
}
