//! Abstract syntax tree for Enlyn programs.
//!
//! Every node carries a [`Span`]; spans are only consulted for diagnostics.

mod expression;
mod statement;

pub use expression::*;
pub use statement::*;

use crate::parser::token::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Root node: the classes of one source file, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub classes: Vec<ClassDecl>,
    pub span: Span,
}

/// A name together with where it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// `class Name [: Parent] { members }`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Identifier,
    pub parent: Option<Identifier>,
    pub members: Vec<ClassMember>,
    pub span: Span,
}

impl ClassDecl {
    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            ClassMember::Field(field) => Some(field),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            ClassMember::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &ConstructorDecl> {
        self.members.iter().filter_map(|m| match m {
            ClassMember::Constructor(ctor) => Some(ctor),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Field(FieldDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
}

impl ClassMember {
    pub fn span(&self) -> Span {
        match self {
            ClassMember::Field(f) => f.span,
            ClassMember::Method(m) => m.span,
            ClassMember::Constructor(c) => c.span,
        }
    }
}

/// Member visibility, ordered from least to most restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Public => write!(f, "public"),
            Access::Protected => write!(f, "protected"),
            Access::Private => write!(f, "private"),
        }
    }
}

/// `access name : Type [= initializer]`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub access: Access,
    pub name: Identifier,
    pub ty: TypeAnnotation,
    pub initializer: Option<Expression>,
    pub span: Span,
}

/// Name of a method: plain, or a synthetic operator identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodName {
    Named(Identifier),
    Binary(BinaryOperator, Span),
    Unary(UnaryOperator, Span),
}

impl MethodName {
    pub fn span(&self) -> Span {
        match self {
            MethodName::Named(id) => id.span,
            MethodName::Binary(_, span) | MethodName::Unary(_, span) => *span,
        }
    }
}

/// `access [override] name(params) [: Type] body`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub access: Access,
    pub is_override: bool,
    pub name: MethodName,
    pub params: Vec<Parameter>,
    pub return_type: Option<TypeAnnotation>,
    pub body: Statement,
    pub span: Span,
}

/// `access new(params) [: base(args)] body`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    pub access: Access,
    pub params: Vec<Parameter>,
    pub base_args: Option<Vec<Expression>>,
    pub body: Statement,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Identifier,
    pub ty: TypeAnnotation,
    pub span: Span,
}

/// A written type: `Name`, `Name?` (any number of `?` collapse to one),
/// or `null` in instance tests.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnnotation {
    Named(Identifier),
    Optional(Identifier, Span),
    Null(Span),
}

impl TypeAnnotation {
    pub fn span(&self) -> Span {
        match self {
            TypeAnnotation::Named(id) => id.span,
            TypeAnnotation::Optional(_, span) | TypeAnnotation::Null(span) => *span,
        }
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeAnnotation::Named(id) => write!(f, "{}", id.name),
            TypeAnnotation::Optional(id, _) => write!(f, "{}?", id.name),
            TypeAnnotation::Null(_) => write!(f, "null"),
        }
    }
}
