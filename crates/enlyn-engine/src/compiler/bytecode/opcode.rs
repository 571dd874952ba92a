//! Instruction set of the Enlyn VM
//!
//! Instructions operate on the operand stack of the active frame. Jump
//! targets are absolute instruction indices within the same chunk.
//!
//! Instructions are organized into categories:
//! - constants and stack manipulation
//! - locals and fields
//! - control flow and calls
//! - primitive arithmetic, comparison and logic
//! - instance tests and casts

use super::module::MemberId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    // ===== Constants & Stack =====
    /// Push constant from pool (operand: pool index)
    Const(u32),
    /// Push the number 0
    Zero,
    /// Push the number 1
    One,
    /// Push true
    True,
    /// Push false
    False,
    /// Push null
    Null,
    /// Pop and discard top value
    Pop,
    /// Duplicate top value
    Dup,

    // ===== Locals & Fields =====
    /// Push local slot
    Load(u16),
    /// Pop into local slot
    Store(u16),
    /// Allocate an instance of a construct and run its field initializer;
    /// pushes the instance
    New(u32),
    /// Pop instance, push field at offset
    GetField(u16),
    /// Pop value, pop instance, store field at offset, push value
    SetField(u16),

    // ===== Control Flow & Calls =====
    /// Jump to instruction index
    Jump(u32),
    /// Pop boolean, jump to instruction index when false
    JumpIfFalse(u32),
    /// Pop result, leave the frame and push the result to the caller
    Return,
    /// Call a member resolved from a compile-time construct
    Invoke { construct: u32, member: MemberId },
    /// Call a member resolved from the receiver's runtime construct;
    /// `construct` is the static type and fixes the argument count
    Virtual { construct: u32, member: MemberId },
    /// As `Virtual`, but a null receiver resolves from `any` instead of
    /// faulting; used for equality on options
    VirtualOrAny { construct: u32, member: MemberId },

    // ===== Number Arithmetic & Comparison =====
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Negate,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    // ===== Equality & Boolean Logic =====
    Equal,
    NotEqual,
    And,
    Or,
    Not,

    // ===== Instance Tests & Casts =====
    /// Pop value, push whether it is an instance of the construct
    /// (or null, when nullable)
    Is { construct: u32, nullable: bool },
    /// Pop value, push whether it is null
    IsNull,
    /// Check value on top of the stack is an instance of the construct
    /// (or null, when nullable); faults otherwise
    Cast { construct: u32, nullable: bool },
    /// Fault when the value on top of the stack is null
    Assert,
}

impl Instruction {
    /// Mnemonic used by the disassembler
    pub fn name(&self) -> &'static str {
        match self {
            Self::Const(_) => "CONST",
            Self::Zero => "ZERO",
            Self::One => "ONE",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Null => "NULL",
            Self::Pop => "POP",
            Self::Dup => "DUP",
            Self::Load(_) => "LOAD",
            Self::Store(_) => "STORE",
            Self::New(_) => "NEW",
            Self::GetField(_) => "GET_FIELD",
            Self::SetField(_) => "SET_FIELD",
            Self::Jump(_) => "JUMP",
            Self::JumpIfFalse(_) => "JUMP_IF_FALSE",
            Self::Return => "RETURN",
            Self::Invoke { .. } => "INVOKE",
            Self::Virtual { .. } => "VIRTUAL",
            Self::VirtualOrAny { .. } => "VIRTUAL_OR_ANY",
            Self::Add => "ADD",
            Self::Subtract => "SUB",
            Self::Multiply => "MUL",
            Self::Divide => "DIV",
            Self::Modulo => "MOD",
            Self::Negate => "NEG",
            Self::Less => "LT",
            Self::Greater => "GT",
            Self::LessEqual => "LE",
            Self::GreaterEqual => "GE",
            Self::Equal => "EQ",
            Self::NotEqual => "NE",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Is { .. } => "IS",
            Self::IsNull => "IS_NULL",
            Self::Cast { .. } => "CAST",
            Self::Assert => "ASSERT",
        }
    }

    /// Jump target, if this is a jump
    pub fn jump_target(&self) -> Option<u32> {
        match self {
            Self::Jump(target) | Self::JumpIfFalse(target) => Some(*target),
            _ => None,
        }
    }

    /// Construct index referenced by this instruction
    pub fn construct(&self) -> Option<u32> {
        match self {
            Self::New(construct)
            | Self::Invoke { construct, .. }
            | Self::Virtual { construct, .. }
            | Self::VirtualOrAny { construct, .. }
            | Self::Is { construct, .. }
            | Self::Cast { construct, .. } => Some(*construct),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match self {
            Self::Const(index) => write!(f, "{} #{}", name, index),
            Self::Load(slot) | Self::Store(slot) => write!(f, "{} {}", name, slot),
            Self::GetField(offset) | Self::SetField(offset) => write!(f, "{} {}", name, offset),
            Self::New(construct) => write!(f, "{} @{}", name, construct),
            Self::Jump(target) | Self::JumpIfFalse(target) => write!(f, "{} -> {}", name, target),
            Self::Invoke { construct, member }
            | Self::Virtual { construct, member }
            | Self::VirtualOrAny { construct, member } => {
                write!(f, "{} @{} ${}", name, construct, member.0)
            }
            Self::Is { construct, nullable } | Self::Cast { construct, nullable } => {
                write!(f, "{} @{}{}", name, construct, if *nullable { "?" } else { "" })
            }
            _ => write!(f, "{}", name),
        }
    }
}
