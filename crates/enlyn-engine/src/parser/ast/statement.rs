//! Statement AST nodes

use super::{Expression, Identifier, TypeAnnotation};
use crate::parser::token::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `let x [: T] = value`
    Let(LetStatement),

    /// `return [value]`
    Return(ReturnStatement),

    /// `if cond then s [else s]`
    If(IfStatement),

    /// `while cond do s`
    While(WhileStatement),

    /// `{ s ... }`
    Block(BlockStatement),

    /// Expression evaluated for its effect
    Expression(ExpressionStatement),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Let(s) => s.span,
            Statement::Return(s) => s.span,
            Statement::If(s) => s.span,
            Statement::While(s) => s.span,
            Statement::Block(s) => s.span,
            Statement::Expression(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub name: Identifier,
    pub ty: Option<TypeAnnotation>,
    pub value: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub span: Span,
}
