//! Expression parsing
//!
//! One function per precedence level, lowest first:
//! assignment, `||`, `&&`, equality, relational (with `is`/`as`),
//! additive, multiplicative, prefix, postfix, primary.

use super::{class::parse_type, ParseError, Parser};
use crate::parser::ast::*;
use crate::parser::token::Token;

pub fn parse_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    parse_assignment(parser)
}

/// Parse `( [expr (, expr)*] )`.
pub fn parse_arguments(parser: &mut Parser) -> Result<Vec<Expression>, ParseError> {
    parser.expect(Token::LeftParen)?;
    let mut arguments = Vec::new();

    if !parser.check(&Token::RightParen) {
        loop {
            arguments.push(parse_expression(parser)?);
            if !parser.check(&Token::Comma) {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(Token::RightParen)?;
    Ok(arguments)
}

fn parse_assignment(parser: &mut Parser) -> Result<Expression, ParseError> {
    let target = parse_binary_level(parser, 0)?;

    if !parser.check(&Token::Equal) {
        return Ok(target);
    }
    parser.advance();
    let value = parse_assignment(parser)?;
    let span = target.span().merge(&value.span());

    Ok(Expression::Assign(AssignExpression {
        target: Box::new(target),
        value: Box::new(value),
        span,
    }))
}

/// Number of binary precedence levels; level 0 binds loosest.
const LEVEL_COUNT: usize = 6;

/// Index of the relational level, which also hosts `is` and `as`.
const RELATIONAL: usize = 3;

fn binary_operator(level: usize, token: &Token) -> Option<BinaryOperator> {
    let operator = match (level, token) {
        (0, Token::PipePipe) => BinaryOperator::Or,
        (1, Token::AmpAmp) => BinaryOperator::And,
        (2, Token::EqualEqual) => BinaryOperator::Equal,
        (2, Token::BangEqual) => BinaryOperator::NotEqual,
        (3, Token::Less) => BinaryOperator::Less,
        (3, Token::Greater) => BinaryOperator::Greater,
        (3, Token::LessEqual) => BinaryOperator::LessEqual,
        (3, Token::GreaterEqual) => BinaryOperator::GreaterEqual,
        (4, Token::Plus) => BinaryOperator::Add,
        (4, Token::Minus) => BinaryOperator::Subtract,
        (5, Token::Star) => BinaryOperator::Multiply,
        (5, Token::Slash) => BinaryOperator::Divide,
        (5, Token::Percent) => BinaryOperator::Modulo,
        _ => return None,
    };
    Some(operator)
}

fn parse_binary_level(parser: &mut Parser, level: usize) -> Result<Expression, ParseError> {
    if level == LEVEL_COUNT {
        return parse_unary(parser);
    }

    let mut left = parse_binary_level(parser, level + 1)?;
    loop {
        if level == RELATIONAL && parser.check_any(&[Token::Is, Token::As]) {
            left = parse_type_test(parser, left)?;
            continue;
        }

        let Some(operator) = binary_operator(level, parser.current()) else {
            break;
        };
        parser.advance();

        let right = parse_binary_level(parser, level + 1)?;
        let span = left.span().merge(&right.span());
        left = Expression::Binary(BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            span,
        });
    }

    Ok(left)
}

fn parse_type_test(parser: &mut Parser, operand: Expression) -> Result<Expression, ParseError> {
    let is_test = matches!(parser.advance(), Token::Is);
    let target = parse_type(parser, is_test)?;
    let span = operand.span().merge(&target.span());
    let node = TypeTestExpression {
        operand: Box::new(operand),
        target,
        span,
    };

    Ok(if is_test {
        Expression::Is(node)
    } else {
        Expression::As(node)
    })
}

fn parse_unary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let operator = match parser.current() {
        Token::Minus => UnaryOperator::Negate,
        Token::Bang => UnaryOperator::Not,
        _ => return parse_postfix(parser),
    };
    let start = parser.current_span();
    parser.advance();

    let operand = parse_unary(parser)?;
    let span = start.merge(&operand.span());
    Ok(Expression::Unary(UnaryExpression {
        operator,
        operand: Box::new(operand),
        span,
    }))
}

fn parse_postfix(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut expr = parse_primary(parser)?;

    loop {
        match parser.current() {
            Token::Dot => {
                parser.advance();
                let property = parser.expect_identifier()?;
                let span = expr.span().merge(&property.span);
                expr = Expression::Member(MemberExpression {
                    object: Box::new(expr),
                    property,
                    span,
                });
            }
            Token::LeftParen => {
                let arguments = parse_arguments(parser)?;
                let span = parser.span_from(&expr.span());
                expr = Expression::Call(CallExpression {
                    callee: Box::new(expr),
                    arguments,
                    span,
                });
            }
            Token::Bang => {
                parser.advance();
                let span = parser.span_from(&expr.span());
                expr = Expression::Assert(AssertExpression {
                    operand: Box::new(expr),
                    span,
                });
            }
            _ => break,
        }
    }

    Ok(expr)
}

fn parse_primary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let span = parser.current_span();

    let expr = match parser.current().clone() {
        Token::NumberLiteral(value) => Expression::NumberLiteral(NumberLiteral { value, span }),
        Token::StringLiteral(value) => Expression::StringLiteral(StringLiteral { value, span }),
        Token::True => Expression::BooleanLiteral(BooleanLiteral { value: true, span }),
        Token::False => Expression::BooleanLiteral(BooleanLiteral { value: false, span }),
        Token::Null => Expression::NullLiteral(span),
        Token::This => Expression::This(span),
        Token::Base => Expression::Base(span),
        Token::Identifier(name) => Expression::Identifier(Identifier::new(name, span)),
        Token::New => return parse_new(parser),
        Token::LeftParen => {
            parser.advance();
            let inner = parse_expression(parser)?;
            parser.expect(Token::RightParen)?;
            return Ok(inner);
        }
        _ => {
            return Err(parser.unexpected_token(&[
                Token::Identifier(String::new()),
                Token::NumberLiteral(0.0),
                Token::StringLiteral(String::new()),
                Token::New,
                Token::This,
                Token::LeftParen,
            ]))
        }
    };

    parser.advance();
    Ok(expr)
}

fn parse_new(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start = parser.current_span();
    parser.expect(Token::New)?;
    let class = parser.expect_identifier()?;
    let arguments = parse_arguments(parser)?;

    Ok(Expression::New(NewExpression {
        class,
        arguments,
        span: parser.span_from(&start),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Expression {
        let mut parser = Parser::new(source).expect("lexing failed");
        let expr = parse_expression(&mut parser).expect("parsing failed");
        assert!(parser.at_eof(), "trailing tokens after {:?}", expr);
        expr
    }

    #[test]
    fn test_precedence() {
        match parse("1 + 2 * 3 == 7 && true") {
            Expression::Binary(and) => {
                assert_eq!(and.operator, BinaryOperator::And);
                match *and.left {
                    Expression::Binary(ref eq) => {
                        assert_eq!(eq.operator, BinaryOperator::Equal);
                        assert!(matches!(*eq.left, Expression::Binary(ref add) if add.operator == BinaryOperator::Add));
                    }
                    ref other => panic!("expected ==, got {:?}", other),
                }
            }
            other => panic!("expected &&, got {:?}", other),
        }
    }

    #[test]
    fn test_left_associative_subtraction() {
        match parse("a - b - c") {
            Expression::Binary(outer) => {
                assert!(matches!(*outer.left, Expression::Binary(_)));
                assert!(matches!(*outer.right, Expression::Identifier(_)));
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        match parse("a = b = 1") {
            Expression::Assign(outer) => assert!(matches!(*outer.value, Expression::Assign(_))),
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_call_chain() {
        match parse("new A().out(x)") {
            Expression::Call(call) => {
                assert_eq!(call.arguments.len(), 1);
                match *call.callee {
                    Expression::Member(ref member) => {
                        assert_eq!(member.property.name, "out");
                        assert!(matches!(*member.object, Expression::New(_)));
                    }
                    ref other => panic!("expected member callee, got {:?}", other),
                }
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_type_tests() {
        assert!(matches!(parse("a is number?"), Expression::Is(ref t) if matches!(t.target, TypeAnnotation::Optional(..))));
        assert!(matches!(parse("a is null"), Expression::Is(ref t) if matches!(t.target, TypeAnnotation::Null(_))));
        assert!(matches!(parse("null is string???"), Expression::Is(_)));
        assert!(matches!(parse("b as any"), Expression::As(_)));
    }

    #[test]
    fn test_as_does_not_accept_null() {
        let mut parser = Parser::new("a as null").unwrap();
        assert!(parse_expression(&mut parser).is_err());
    }

    #[test]
    fn test_prefix_and_postfix_bang() {
        match parse("!a!") {
            Expression::Unary(unary) => {
                assert_eq!(unary.operator, UnaryOperator::Not);
                assert!(matches!(*unary.operand, Expression::Assert(_)));
            }
            other => panic!("expected unary, got {:?}", other),
        }
    }

    #[test]
    fn test_call_on_literal_parses() {
        // Rejected later by the checker, not the parser
        assert!(matches!(parse("null(1, 2)"), Expression::Call(_)));
    }
}
