//! Standard library registry
//!
//! Describes the built-in classes (`any`, `number`, `string`, `boolean`,
//! `IO`) once: their fixed class indices, fields, method signatures and the
//! native primitive that implements each method. The checker derives type
//! records from it, the compiler derives native chunks from it, and the VM
//! executes natives by [`NativeId`].

use crate::parser::ast::{BinaryOperator, UnaryOperator};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed indices of the built-in classes.
///
/// These are both checker type ids and runtime construct indices.
pub mod class_id {
    pub const ANY: usize = 0;
    pub const NUMBER: usize = 1;
    pub const STRING: usize = 2;
    pub const BOOLEAN: usize = 3;
    pub const IO: usize = 4;
}

/// Number of built-in classes; user classes are indexed from here.
pub const BUILTIN_CLASS_COUNT: usize = 5;

/// Name of the class whose constructor starts the program.
pub const ENTRY_CLASS: &str = "Main";

/// Key of a member in a method table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKey {
    Named(String),
    Binary(BinaryOperator),
    Unary(UnaryOperator),
    /// Reserved constructor identifier
    Constructor,
    /// Synthesized field-initializer chunk
    Initializer,
}

impl MemberKey {
    pub fn named(name: impl Into<String>) -> Self {
        MemberKey::Named(name.into())
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKey::Named(name) => write!(f, "{}", name),
            MemberKey::Binary(op) => write!(f, "binary {}", op),
            MemberKey::Unary(op) => write!(f, "unary {}", op),
            MemberKey::Constructor => write!(f, "new"),
            MemberKey::Initializer => write!(f, "<init>"),
        }
    }
}

/// Host-provided primitives behind native chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeId {
    AnyNew,
    AnyInit,
    AnyEqual,
    AnyNotEqual,
    NumberAdd,
    NumberSubtract,
    NumberMultiply,
    NumberDivide,
    NumberModulo,
    NumberLess,
    NumberGreater,
    NumberLessEqual,
    NumberGreaterEqual,
    NumberNegate,
    StringConcat,
    BooleanAnd,
    BooleanOr,
    BooleanNot,
    IoOut,
    IoIn,
}

impl NativeId {
    /// Number of arguments including the receiver.
    pub fn arity(&self) -> usize {
        match self {
            NativeId::AnyNew
            | NativeId::AnyInit
            | NativeId::NumberNegate
            | NativeId::BooleanNot
            | NativeId::IoIn => 1,
            _ => 2,
        }
    }
}

/// A type as written in a built-in signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinType {
    Class(usize),
    Optional(usize),
    Unit,
}

#[derive(Debug, Clone)]
pub struct BuiltinField {
    pub name: &'static str,
    pub ty: BuiltinType,
}

#[derive(Debug, Clone)]
pub struct BuiltinMethod {
    pub key: MemberKey,
    pub params: Vec<BuiltinType>,
    pub returns: BuiltinType,
    pub native: NativeId,
}

#[derive(Debug, Clone)]
pub struct BuiltinClass {
    pub id: usize,
    pub name: &'static str,
    pub parent: Option<usize>,
    /// Sealed classes cannot be inherited from
    pub sealed: bool,
    pub fields: Vec<BuiltinField>,
    pub methods: Vec<BuiltinMethod>,
}

impl BuiltinClass {
    fn new(id: usize, name: &'static str, parent: Option<usize>, sealed: bool) -> Self {
        Self {
            id,
            name,
            parent,
            sealed,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    fn method(mut self, key: MemberKey, params: &[BuiltinType], returns: BuiltinType, native: NativeId) -> Self {
        self.methods.push(BuiltinMethod {
            key,
            params: params.to_vec(),
            returns,
            native,
        });
        self
    }

    fn field(mut self, name: &'static str, ty: BuiltinType) -> Self {
        self.fields.push(BuiltinField { name, ty });
        self
    }
}

/// Immutable registry of the built-in classes, indexed by class id.
#[derive(Debug, Clone)]
pub struct StandardLibrary {
    classes: Vec<BuiltinClass>,
}

impl Default for StandardLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardLibrary {
    pub fn new() -> Self {
        use class_id::*;
        use BuiltinType::{Class, Optional, Unit};

        let number = Class(NUMBER);
        let boolean = Class(BOOLEAN);
        let anything = Optional(ANY);

        let any = BuiltinClass::new(ANY, "any", None, false)
            .method(MemberKey::Constructor, &[], Unit, NativeId::AnyNew)
            .method(MemberKey::Initializer, &[], Unit, NativeId::AnyInit)
            .method(MemberKey::Binary(BinaryOperator::Equal), &[anything], boolean, NativeId::AnyEqual)
            .method(MemberKey::Binary(BinaryOperator::NotEqual), &[anything], boolean, NativeId::AnyNotEqual);

        let arithmetic = [
            (BinaryOperator::Add, NativeId::NumberAdd),
            (BinaryOperator::Subtract, NativeId::NumberSubtract),
            (BinaryOperator::Multiply, NativeId::NumberMultiply),
            (BinaryOperator::Divide, NativeId::NumberDivide),
            (BinaryOperator::Modulo, NativeId::NumberModulo),
        ];
        let comparison = [
            (BinaryOperator::Less, NativeId::NumberLess),
            (BinaryOperator::Greater, NativeId::NumberGreater),
            (BinaryOperator::LessEqual, NativeId::NumberLessEqual),
            (BinaryOperator::GreaterEqual, NativeId::NumberGreaterEqual),
        ];
        let mut numbers = BuiltinClass::new(NUMBER, "number", Some(ANY), true);
        for (op, native) in arithmetic {
            numbers = numbers.method(MemberKey::Binary(op), &[number], number, native);
        }
        for (op, native) in comparison {
            numbers = numbers.method(MemberKey::Binary(op), &[number], boolean, native);
        }
        numbers = numbers.method(MemberKey::Unary(UnaryOperator::Negate), &[], number, NativeId::NumberNegate);

        let strings = BuiltinClass::new(STRING, "string", Some(ANY), true)
            .field("length", number)
            .method(MemberKey::Binary(BinaryOperator::Add), &[anything], Class(STRING), NativeId::StringConcat);

        let booleans = BuiltinClass::new(BOOLEAN, "boolean", Some(ANY), true)
            .method(MemberKey::Binary(BinaryOperator::And), &[boolean], boolean, NativeId::BooleanAnd)
            .method(MemberKey::Binary(BinaryOperator::Or), &[boolean], boolean, NativeId::BooleanOr)
            .method(MemberKey::Unary(UnaryOperator::Not), &[], boolean, NativeId::BooleanNot);

        let io = BuiltinClass::new(IO, "IO", Some(ANY), false)
            .method(MemberKey::Constructor, &[], Unit, NativeId::AnyNew)
            .method(MemberKey::named("out"), &[anything], Unit, NativeId::IoOut)
            .method(MemberKey::named("in"), &[], Class(STRING), NativeId::IoIn);

        Self {
            classes: vec![any, numbers, strings, booleans, io],
        }
    }

    pub fn classes(&self) -> &[BuiltinClass] {
        &self.classes
    }

    pub fn class(&self, id: usize) -> Option<&BuiltinClass> {
        self.classes.get(id)
    }

    pub fn class_by_name(&self, name: &str) -> Option<&BuiltinClass> {
        self.classes.iter().find(|class| class.name == name)
    }
}
