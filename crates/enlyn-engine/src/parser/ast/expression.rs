//! Expression AST nodes

use super::{Identifier, TypeAnnotation};
use crate::parser::token::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Number literal: `42`, `.5e3`
    NumberLiteral(NumberLiteral),

    /// String literal: `"hello"`
    StringLiteral(StringLiteral),

    /// Boolean literal: `true`, `false`
    BooleanLiteral(BooleanLiteral),

    /// `null`
    NullLiteral(Span),

    /// Local variable or parameter reference
    Identifier(Identifier),

    /// `this`
    This(Span),

    /// `base`
    Base(Span),

    /// Field access: `obj.field`
    Member(MemberExpression),

    /// Method call: `obj.method(args)`
    Call(CallExpression),

    /// Construction: `new T(args)`
    New(NewExpression),

    /// Assignment: `target = value`
    Assign(AssignExpression),

    /// Binary operator: `a + b`
    Binary(BinaryExpression),

    /// Unary operator: `-a`, `!a`
    Unary(UnaryExpression),

    /// Option unwrap: `x!`
    Assert(AssertExpression),

    /// Instance test: `x is T`, `x is T?`, `x is null`
    Is(TypeTestExpression),

    /// Cast: `x as T`
    As(TypeTestExpression),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::NumberLiteral(lit) => lit.span,
            Expression::StringLiteral(lit) => lit.span,
            Expression::BooleanLiteral(lit) => lit.span,
            Expression::NullLiteral(span) | Expression::This(span) | Expression::Base(span) => {
                *span
            }
            Expression::Identifier(id) => id.span,
            Expression::Member(e) => e.span,
            Expression::Call(e) => e.span,
            Expression::New(e) => e.span,
            Expression::Assign(e) => e.span,
            Expression::Binary(e) => e.span,
            Expression::Unary(e) => e.span,
            Expression::Assert(e) => e.span,
            Expression::Is(e) | Expression::As(e) => e.span,
        }
    }

    /// Identity of this node for side tables keyed by expression.
    ///
    /// Stable as long as the owning tree is not moved or mutated.
    pub fn id(&self) -> usize {
        self as *const Expression as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub value: f64,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpression {
    pub class: Identifier,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpression {
    pub target: Box<Expression>,
    pub value: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssertExpression {
    pub operand: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeTestExpression {
    pub operand: Box<Expression>,
    pub target: TypeAnnotation,
    pub span: Span,
}

/// Overloadable binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    And,
    Or,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterEqual => ">=",
        }
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOperator::Equal | BinaryOperator::NotEqual)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Overloadable unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Negate,
    Not,
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Not => "!",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
