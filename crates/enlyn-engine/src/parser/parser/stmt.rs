//! Statement parsing

use super::{expr, ParseError, Parser};
use crate::parser::ast::*;
use crate::parser::token::Token;

pub fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    match parser.current() {
        Token::Let => parse_let(parser).map(Statement::Let),
        Token::Return => parse_return(parser).map(Statement::Return),
        Token::If => parse_if(parser).map(Statement::If),
        Token::While => parse_while(parser).map(Statement::While),
        Token::LeftBrace => parse_block(parser).map(Statement::Block),
        _ => {
            let expression = expr::parse_expression(parser)?;
            let span = expression.span();
            Ok(Statement::Expression(ExpressionStatement { expression, span }))
        }
    }
}

/// Parse `{ statement (NEWLINE statement)* }`.
pub fn parse_block(parser: &mut Parser) -> Result<BlockStatement, ParseError> {
    let start = parser.current_span();
    parser.expect(Token::LeftBrace)?;
    parser.skip_newlines();

    let mut statements = Vec::new();
    while !parser.check(&Token::RightBrace) && !parser.at_eof() {
        statements.push(parse_statement(parser)?);
        if !parser.check(&Token::RightBrace) {
            parser.expect(Token::Newline).map_err(|err| {
                err.with_suggestion("Put each statement on its own line at the block's indentation")
            })?;
            parser.skip_newlines();
        }
    }
    parser.expect(Token::RightBrace)?;

    Ok(BlockStatement {
        statements,
        span: parser.span_from(&start),
    })
}

fn parse_let(parser: &mut Parser) -> Result<LetStatement, ParseError> {
    let start = parser.current_span();
    parser.expect(Token::Let)?;
    let name = parser.expect_identifier()?;

    let ty = if parser.check(&Token::Colon) {
        parser.advance();
        Some(super::class::parse_type(parser, false)?)
    } else {
        None
    };

    parser.expect(Token::Equal)?;
    let value = expr::parse_expression(parser)?;

    Ok(LetStatement {
        name,
        ty,
        value,
        span: parser.span_from(&start),
    })
}

fn parse_return(parser: &mut Parser) -> Result<ReturnStatement, ParseError> {
    let start = parser.current_span();
    parser.expect(Token::Return)?;

    let ends_statement = parser.check_any(&[Token::Newline, Token::RightBrace, Token::Else, Token::Eof]);
    let value = if ends_statement {
        None
    } else {
        Some(expr::parse_expression(parser)?)
    };

    Ok(ReturnStatement {
        value,
        span: parser.span_from(&start),
    })
}

fn parse_if(parser: &mut Parser) -> Result<IfStatement, ParseError> {
    let start = parser.current_span();
    parser.expect(Token::If)?;
    let condition = expr::parse_expression(parser)?;
    parser.expect(Token::Then)?;
    let then_branch = Box::new(parse_statement(parser)?);

    let else_branch = if parser.check(&Token::Else) {
        parser.advance();
        Some(Box::new(parse_statement(parser)?))
    } else {
        None
    };

    Ok(IfStatement {
        condition,
        then_branch,
        else_branch,
        span: parser.span_from(&start),
    })
}

fn parse_while(parser: &mut Parser) -> Result<WhileStatement, ParseError> {
    let start = parser.current_span();
    parser.expect(Token::While)?;
    let condition = expr::parse_expression(parser)?;
    parser.expect(Token::Do)?;
    let body = Box::new(parse_statement(parser)?);

    Ok(WhileStatement {
        condition,
        body,
        span: parser.span_from(&start),
    })
}
