//! Class and member declarations

use super::{stmt, ParseError, Parser};
use crate::parser::ast::*;
use crate::parser::token::{Span, Token};

/// Parse `class Name [: Parent] { members }`.
pub fn parse_class(parser: &mut Parser) -> Result<ClassDecl, ParseError> {
    let start = parser.current_span();
    parser.expect(Token::Class)?;
    let name = parser.expect_identifier()?;

    let parent = if parser.check(&Token::Colon) {
        parser.advance();
        Some(parser.expect_identifier()?)
    } else {
        None
    };

    parser.expect(Token::LeftBrace)?;
    parser.skip_newlines();

    let mut members = Vec::new();
    while !parser.check(&Token::RightBrace) && !parser.at_eof() {
        members.push(parse_member(parser)?);
        if !parser.check(&Token::RightBrace) {
            parser.expect(Token::Newline)?;
            parser.skip_newlines();
        }
    }
    parser.expect(Token::RightBrace)?;

    Ok(ClassDecl {
        name,
        parent,
        members,
        span: parser.span_from(&start),
    })
}

fn parse_access(parser: &mut Parser) -> Result<Access, ParseError> {
    let access = match parser.current() {
        Token::Public => Access::Public,
        Token::Protected => Access::Protected,
        Token::Private => Access::Private,
        _ => {
            return Err(parser
                .unexpected_token(&[Token::Public, Token::Protected, Token::Private])
                .with_suggestion("Every member declaration starts with an access modifier"))
        }
    };
    parser.advance();
    Ok(access)
}

fn parse_member(parser: &mut Parser) -> Result<ClassMember, ParseError> {
    let start = parser.current_span();
    let access = parse_access(parser)?;

    if parser.check(&Token::New) {
        return parse_constructor(parser, access, start).map(ClassMember::Constructor);
    }

    let is_override = parser.check(&Token::Override);
    if is_override {
        parser.advance();
        if parser.check(&Token::New) {
            return Err(ParseError::invalid_syntax(
                "constructors cannot be marked override",
                parser.current_span(),
            ));
        }
    }

    let name = match parser.current() {
        Token::Binary => parse_binary_name(parser)?,
        Token::Unary => parse_unary_name(parser)?,
        _ => {
            let ident = parser.expect_identifier()?;
            if parser.check(&Token::Colon) {
                if is_override {
                    return Err(ParseError::invalid_syntax(
                        "fields cannot be marked override",
                        ident.span,
                    ));
                }
                return parse_field(parser, access, ident, start).map(ClassMember::Field);
            }
            MethodName::Named(ident)
        }
    };

    let params = parse_parameters(parser)?;
    let return_type = if parser.check(&Token::Colon) {
        parser.advance();
        Some(parse_type(parser, false)?)
    } else {
        None
    };
    let returns_value = return_type
        .as_ref()
        .is_some_and(|ty| !matches!(ty, TypeAnnotation::Named(id) if id.name == "unit"));
    let body = parse_body(parser, returns_value)?;

    Ok(ClassMember::Method(MethodDecl {
        access,
        is_override,
        name,
        params,
        return_type,
        body,
        span: parser.span_from(&start),
    }))
}

fn parse_field(
    parser: &mut Parser,
    access: Access,
    name: Identifier,
    start: Span,
) -> Result<FieldDecl, ParseError> {
    parser.expect(Token::Colon)?;
    let ty = parse_type(parser, false)?;
    let initializer = if parser.check(&Token::Equal) {
        parser.advance();
        Some(super::expr::parse_expression(parser)?)
    } else {
        None
    };

    Ok(FieldDecl {
        access,
        name,
        ty,
        initializer,
        span: parser.span_from(&start),
    })
}

fn parse_constructor(
    parser: &mut Parser,
    access: Access,
    start: Span,
) -> Result<ConstructorDecl, ParseError> {
    parser.expect(Token::New)?;
    let params = parse_parameters(parser)?;

    let base_args = if parser.check(&Token::Colon) {
        parser.advance();
        parser.expect(Token::Base)?;
        Some(super::expr::parse_arguments(parser)?)
    } else {
        None
    };
    let body = parse_body(parser, false)?;

    Ok(ConstructorDecl {
        access,
        params,
        base_args,
        body,
        span: parser.span_from(&start),
    })
}

fn parse_binary_name(parser: &mut Parser) -> Result<MethodName, ParseError> {
    let start = parser.current_span();
    parser.expect(Token::Binary)?;
    let operator = match parser.current() {
        Token::Plus => BinaryOperator::Add,
        Token::Minus => BinaryOperator::Subtract,
        Token::Star => BinaryOperator::Multiply,
        Token::Slash => BinaryOperator::Divide,
        Token::Percent => BinaryOperator::Modulo,
        Token::AmpAmp => BinaryOperator::And,
        Token::PipePipe => BinaryOperator::Or,
        Token::EqualEqual => BinaryOperator::Equal,
        Token::BangEqual => BinaryOperator::NotEqual,
        Token::Less => BinaryOperator::Less,
        Token::Greater => BinaryOperator::Greater,
        Token::LessEqual => BinaryOperator::LessEqual,
        Token::GreaterEqual => BinaryOperator::GreaterEqual,
        _ => {
            return Err(ParseError::invalid_syntax(
                format!("{} is not an overloadable binary operator", parser.current().description()),
                parser.current_span(),
            ))
        }
    };
    parser.advance();
    Ok(MethodName::Binary(operator, parser.span_from(&start)))
}

fn parse_unary_name(parser: &mut Parser) -> Result<MethodName, ParseError> {
    let start = parser.current_span();
    parser.expect(Token::Unary)?;
    let operator = match parser.current() {
        Token::Minus => UnaryOperator::Negate,
        Token::Bang => UnaryOperator::Not,
        _ => {
            return Err(ParseError::invalid_syntax(
                format!("{} is not an overloadable unary operator", parser.current().description()),
                parser.current_span(),
            ))
        }
    };
    parser.advance();
    Ok(MethodName::Unary(operator, parser.span_from(&start)))
}

fn parse_parameters(parser: &mut Parser) -> Result<Vec<Parameter>, ParseError> {
    parser.expect(Token::LeftParen)?;
    let mut params = Vec::new();

    if !parser.check(&Token::RightParen) {
        loop {
            let name = parser.expect_identifier()?;
            parser.expect(Token::Colon)?;
            let ty = parse_type(parser, false)?;
            params.push(Parameter {
                span: parser.span_from(&name.span),
                name,
                ty,
            });
            if !parser.check(&Token::Comma) {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(Token::RightParen)?;
    Ok(params)
}

/// Parse a member body: `= statement` or a block.
///
/// With `returns_value`, a bare `= expression` body returns the expression.
fn parse_body(parser: &mut Parser, returns_value: bool) -> Result<Statement, ParseError> {
    match parser.current() {
        Token::Equal => {
            parser.advance();
            let starts_statement = parser.check_any(&[
                Token::Let,
                Token::Return,
                Token::If,
                Token::While,
                Token::LeftBrace,
            ]);
            if returns_value && !starts_statement {
                let value = super::expr::parse_expression(parser)?;
                let span = value.span();
                Ok(Statement::Return(ReturnStatement {
                    value: Some(value),
                    span,
                }))
            } else {
                stmt::parse_statement(parser)
            }
        }
        Token::LeftBrace => stmt::parse_block(parser).map(Statement::Block),
        _ => Err(parser.unexpected_token(&[Token::Equal, Token::LeftBrace])),
    }
}

/// Parse `Name`, `Name?...`, or (when allowed) `null`.
pub fn parse_type(parser: &mut Parser, allow_null: bool) -> Result<TypeAnnotation, ParseError> {
    if allow_null && parser.check(&Token::Null) {
        let span = parser.current_span();
        parser.advance();
        return Ok(TypeAnnotation::Null(span));
    }

    let name = parser.expect_identifier()?;
    if !parser.check(&Token::Question) {
        return Ok(TypeAnnotation::Named(name));
    }
    while parser.check(&Token::Question) {
        parser.advance();
    }
    let span = parser.span_from(&name.span);
    Ok(TypeAnnotation::Optional(name, span))
}
