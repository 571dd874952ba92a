//! Token definitions for the Enlyn lexer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token type produced by the lexer and consumed by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Class,
    Public,
    Protected,
    Private,
    Override,
    New,
    Base,
    This,
    Let,
    Return,
    If,
    Then,
    Else,
    While,
    Do,
    Is,
    As,
    Binary,
    Unary,

    // Literals
    True,
    False,
    Null,
    NumberLiteral(f64),
    StringLiteral(String),

    Identifier(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    AmpAmp,
    PipePipe,
    EqualEqual,
    BangEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Bang,
    Equal,

    // Punctuation
    Dot,
    Comma,
    Colon,
    Question,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,

    /// A significant line break (statement terminator after filtering)
    Newline,
    Eof,
}

impl Token {
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::Class
                | Token::Public
                | Token::Protected
                | Token::Private
                | Token::Override
                | Token::New
                | Token::Base
                | Token::This
                | Token::Let
                | Token::Return
                | Token::If
                | Token::Then
                | Token::Else
                | Token::While
                | Token::Do
                | Token::Is
                | Token::As
                | Token::Binary
                | Token::Unary
                | Token::True
                | Token::False
                | Token::Null
        )
    }

    /// Tokens that may follow a line break without it terminating the statement.
    pub fn continues_line(&self) -> bool {
        matches!(
            self,
            Token::LeftBrace | Token::RightBrace | Token::Then | Token::Else | Token::Do | Token::Eof
        )
    }

    /// Name of the token's kind, without its payload.
    pub fn kind_name(&self) -> String {
        match self {
            Token::NumberLiteral(_) => "number".to_string(),
            Token::StringLiteral(_) => "string".to_string(),
            Token::Identifier(_) => "identifier".to_string(),
            other => other.description(),
        }
    }

    pub fn description(&self) -> String {
        match self {
            Token::NumberLiteral(n) => format!("number '{}'", n),
            Token::StringLiteral(s) => format!("string \"{}\"", s),
            Token::Identifier(name) => format!("identifier '{}'", name),
            Token::Newline => "line break".to_string(),
            Token::Eof => "end of file".to_string(),
            other => format!("'{}'", other),
        }
    }
}

/// Source location of a token or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    pub fn merge(&self, other: &Span) -> Span {
        let (line, column) = if (self.line, self.column) <= (other.line, other.column) {
            (self.line, self.column)
        } else {
            (other.line, other.column)
        };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line,
            column,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Class => "class",
            Token::Public => "public",
            Token::Protected => "protected",
            Token::Private => "private",
            Token::Override => "override",
            Token::New => "new",
            Token::Base => "base",
            Token::This => "this",
            Token::Let => "let",
            Token::Return => "return",
            Token::If => "if",
            Token::Then => "then",
            Token::Else => "else",
            Token::While => "while",
            Token::Do => "do",
            Token::Is => "is",
            Token::As => "as",
            Token::Binary => "binary",
            Token::Unary => "unary",
            Token::True => "true",
            Token::False => "false",
            Token::Null => "null",
            Token::NumberLiteral(n) => return write!(f, "{}", n),
            Token::StringLiteral(s) => return write!(f, "\"{}\"", s),
            Token::Identifier(name) => return write!(f, "{}", name),
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::AmpAmp => "&&",
            Token::PipePipe => "||",
            Token::EqualEqual => "==",
            Token::BangEqual => "!=",
            Token::Less => "<",
            Token::Greater => ">",
            Token::LessEqual => "<=",
            Token::GreaterEqual => ">=",
            Token::Bang => "!",
            Token::Equal => "=",
            Token::Dot => ".",
            Token::Comma => ",",
            Token::Colon => ":",
            Token::Question => "?",
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::LeftBrace => "{",
            Token::RightBrace => "}",
            Token::Newline => "\\n",
            Token::Eof => "<eof>",
        };
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge_keeps_earliest_position() {
        let a = Span::new(10, 12, 2, 5);
        let b = Span::new(3, 4, 1, 9);
        let merged = a.merge(&b);
        assert_eq!(merged.start, 3);
        assert_eq!(merged.end, 12);
        assert_eq!((merged.line, merged.column), (1, 9));
    }

    #[test]
    fn test_continuation_tokens() {
        assert!(Token::Then.continues_line());
        assert!(Token::RightBrace.continues_line());
        assert!(!Token::Return.continues_line());
    }

    #[test]
    fn test_keyword_display() {
        assert_eq!(Token::Override.to_string(), "override");
        assert_eq!(Token::BangEqual.to_string(), "!=");
        assert!(Token::Binary.is_keyword());
        assert!(!Token::Identifier("x".into()).is_keyword());
    }
}
