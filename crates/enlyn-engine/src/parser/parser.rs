//! Parser for the Enlyn language
//!
//! A recursive descent parser that turns the filtered token stream into a
//! [`Program`]. Declarations live in `class`, statements in `stmt` and
//! expressions in `expr`.

pub mod class;
pub mod error;
pub mod expr;
pub mod stmt;

use crate::parser::ast::*;
use crate::parser::filter::filter_newlines;
use crate::parser::lexer::{LexError, Lexer};
use crate::parser::token::{Span, Token};

pub use error::{ParseError, ParseErrorKind};

/// Parser state for the Enlyn programming language.
pub struct Parser {
    /// Pre-tokenized, newline-filtered input
    tokens: Vec<(Token, Span)>,

    /// Current position in token stream
    pos: usize,

    /// Accumulated parse errors, one per failed class declaration
    errors: Vec<ParseError>,
}

impl Parser {
    /// Create a new parser from source code.
    pub fn new(source: &str) -> Result<Self, Vec<LexError>> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self::from_tokens(filter_newlines(tokens)))
    }

    /// Create a parser over an already filtered token stream.
    pub fn from_tokens(mut tokens: Vec<(Token, Span)>) -> Self {
        if !matches!(tokens.last(), Some((Token::Eof, _))) {
            let eof_span = tokens
                .last()
                .map(|(_, last)| Span::new(last.end, last.end, last.line, last.column))
                .unwrap_or_else(|| Span::new(0, 0, 1, 1));
            tokens.push((Token::Eof, eof_span));
        }

        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the entire source file into a Program AST.
    ///
    /// Returns the Program on success, or all accumulated errors on failure.
    pub fn parse(mut self) -> Result<Program, Vec<ParseError>> {
        let start_span = self.current_span();
        let mut classes = Vec::new();

        self.skip_newlines();
        while !self.at_eof() {
            match class::parse_class(&mut self) {
                Ok(class) => classes.push(class),
                Err(err) => {
                    self.errors.push(err);
                    self.sync_to_class();
                }
            }
            self.skip_newlines();
        }

        if !self.errors.is_empty() {
            return Err(self.errors);
        }

        let span = match classes.last() {
            Some(last) => self.combine_spans(&start_span, &last.span),
            None => start_span,
        };
        Ok(Program { classes, span })
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].1
    }

    #[inline]
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|(tok, _)| tok)
    }

    /// Advance to the next token, returning the previous current token.
    pub fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    /// Check if the current token matches the given kind.
    #[inline]
    pub fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(expected)
    }

    pub fn check_any(&self, expected: &[Token]) -> bool {
        expected.iter().any(|tok| self.check(tok))
    }

    #[inline]
    pub fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    /// Consume the current token if it matches the expected kind.
    pub fn expect(&mut self, expected: Token) -> Result<Token, ParseError> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected_token(&[expected]))
        }
    }

    /// Consume an identifier and return it with its span.
    pub fn expect_identifier(&mut self) -> Result<Identifier, ParseError> {
        let span = self.current_span();
        match self.current().clone() {
            Token::Identifier(name) => {
                self.advance();
                Ok(Identifier::new(name, span))
            }
            _ => Err(self.unexpected_token(&[Token::Identifier(String::new())])),
        }
    }

    pub fn skip_newlines(&mut self) {
        while self.check(&Token::Newline) {
            self.advance();
        }
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Create an "unexpected token" error at the current position.
    pub fn unexpected_token(&self, expected: &[Token]) -> ParseError {
        let span = self.current_span();
        if self.at_eof() {
            ParseError::unexpected_eof(expected.to_vec(), span)
        } else {
            ParseError::unexpected_token(expected.to_vec(), self.current().clone(), span)
        }
    }

    /// Skip ahead to the next `class` keyword at the start of a line.
    fn sync_to_class(&mut self) {
        while !self.at_eof() {
            if self.check(&Token::Class) && (self.pos == 0 || matches!(self.tokens[self.pos - 1].0, Token::Newline)) {
                return;
            }
            self.advance();
        }
    }

    // ========================================================================
    // Utilities
    // ========================================================================

    pub fn combine_spans(&self, start: &Span, end: &Span) -> Span {
        Span {
            start: start.start,
            end: end.end,
            line: start.line,
            column: start.column,
        }
    }

    /// Span from `start` through the last consumed token.
    pub fn span_from(&self, start: &Span) -> Span {
        self.combine_spans(start, &self.previous_span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source)
            .expect("lexing failed")
            .parse()
            .expect("parsing failed")
    }

    #[test]
    fn test_parser_advance() {
        let mut parser = Parser::new("class A").unwrap();
        assert!(parser.check(&Token::Class));
        let tok = parser.advance();
        assert_eq!(tok, Token::Class);
        assert!(matches!(parser.current(), Token::Identifier(_)));
        assert!(matches!(parser.peek(), Some(Token::Eof)));
    }

    #[test]
    fn test_empty_program() {
        let program = parse("");
        assert!(program.classes.is_empty());
    }

    #[test]
    fn test_sample_program() {
        let source = r#"class Main : IO
{
    private new() : base()
    {
        let x = "Hi"
        new A().out(x)
    }
}
class A
{
    public new() = return
    public out(a : string) = new IO().out(a)
}
"#;
        let program = parse(source);
        assert_eq!(program.classes.len(), 2);

        let main = &program.classes[0];
        assert_eq!(main.name.name, "Main");
        assert_eq!(main.parent.as_ref().map(|p| p.name.as_str()), Some("IO"));
        let ctor = main.constructors().next().expect("constructor");
        assert_eq!(ctor.access, Access::Private);
        assert_eq!(ctor.base_args.as_ref().map(Vec::len), Some(0));
        match &ctor.body {
            Statement::Block(block) => assert_eq!(block.statements.len(), 2),
            other => panic!("expected block body, got {:?}", other),
        }

        let a = &program.classes[1];
        assert_eq!(a.members.len(), 2);
        assert_eq!(a.methods().count(), 1);
    }

    #[test]
    fn test_errors_recover_at_next_class() {
        let source = "class A { public x : }\nclass B { public y : number }\nclass C {";
        let errors = Parser::new(source).unwrap().parse().unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
