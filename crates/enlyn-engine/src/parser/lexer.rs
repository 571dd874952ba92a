//! Lexer for the Enlyn programming language.
//!
//! Converts source code into a stream of tokens with source location
//! information using the logos library. Line breaks are kept as
//! [`Token::Newline`]; the indentation filter decides which of them are
//! significant.

use crate::parser::token::{Span, Token};
use logos::Logos;

/// Logos-based token enum for lexing.
///
/// Converted to the main [`Token`] enum after lexing.
#[derive(Logos, Debug, Clone, PartialEq)]
enum LogosToken {
    #[regex(r"[ \t\f]+", logos::skip)]
    Whitespace,

    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"\r?\n")]
    Newline,

    // Keywords (must come before identifiers)
    #[token("class")]
    Class,
    #[token("public")]
    Public,
    #[token("protected")]
    Protected,
    #[token("private")]
    Private,
    #[token("override")]
    Override,
    #[token("new")]
    New,
    #[token("base")]
    Base,
    #[token("this")]
    This,
    #[token("let")]
    Let,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("is")]
    Is,
    #[token("as")]
    As,
    #[token("binary")]
    Binary,
    #[token("unary")]
    Unary,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", parse_number)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_number)]
    Number(f64),

    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    String(String),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("!")]
    Bang,
    #[token("=")]
    Equal,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
}

fn parse_number(lex: &mut logos::Lexer<LogosToken>) -> Option<f64> {
    lex.slice().parse().ok()
}

fn parse_string(lex: &mut logos::Lexer<LogosToken>) -> Option<String> {
    let s = lex.slice();
    Some(unescape_string(&s[1..s.len() - 1]))
}

fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('b') => result.push('\u{8}'),
            Some('f') => result.push('\u{c}'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

/// Lexer error types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character '{char}' at {}:{}", span.line, span.column)]
    UnexpectedCharacter { char: char, span: Span },

    #[error("Unterminated string literal at {}:{}", span.line, span.column)]
    UnterminatedString { span: Span },

    #[error("Invalid number '{text}' at {}:{}", span.line, span.column)]
    InvalidNumber { text: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> &Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::InvalidNumber { span, .. } => span,
        }
    }

    pub fn hint(&self) -> Option<String> {
        match self {
            LexError::UnterminatedString { .. } => {
                Some("Add a closing quote to terminate the string".to_string())
            }
            _ => None,
        }
    }
}

/// Main lexer structure.
pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<(Token, Span)>,
    errors: Vec<LexError>,
    // Line/column tracking
    cursor: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            errors: Vec::new(),
            cursor: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole source, always ending with [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<(Token, Span)>, Vec<LexError>> {
        let mut lexer = LogosToken::lexer(self.source);

        while let Some(result) = lexer.next() {
            let range = lexer.span();
            self.advance_to(range.start);
            let span = Span::new(range.start, range.end, self.line, self.column);

            match result {
                Ok(token) => {
                    if let Some(token) = convert_token(token) {
                        self.tokens.push((token, span));
                    }
                }
                Err(()) => {
                    let error = self.classify_error(span);
                    self.errors.push(error);
                }
            }
        }

        self.advance_to(self.source.len());
        let eof = Span::new(self.source.len(), self.source.len(), self.line, self.column);
        self.tokens.push((Token::Eof, eof));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    fn classify_error(&self, span: Span) -> LexError {
        let text = span.slice(self.source);
        let char = text.chars().next().unwrap_or('\0');
        if char == '"' {
            LexError::UnterminatedString { span }
        } else if char.is_ascii_digit() || char == '.' {
            LexError::InvalidNumber {
                text: text.to_string(),
                span,
            }
        } else {
            LexError::UnexpectedCharacter { char, span }
        }
    }

    fn advance_to(&mut self, offset: usize) {
        if offset <= self.cursor {
            return;
        }
        for c in self.source[self.cursor..offset].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.cursor = offset;
    }
}

fn convert_token(token: LogosToken) -> Option<Token> {
    let token = match token {
        LogosToken::Newline => Token::Newline,
        LogosToken::Class => Token::Class,
        LogosToken::Public => Token::Public,
        LogosToken::Protected => Token::Protected,
        LogosToken::Private => Token::Private,
        LogosToken::Override => Token::Override,
        LogosToken::New => Token::New,
        LogosToken::Base => Token::Base,
        LogosToken::This => Token::This,
        LogosToken::Let => Token::Let,
        LogosToken::Return => Token::Return,
        LogosToken::If => Token::If,
        LogosToken::Then => Token::Then,
        LogosToken::Else => Token::Else,
        LogosToken::While => Token::While,
        LogosToken::Do => Token::Do,
        LogosToken::Is => Token::Is,
        LogosToken::As => Token::As,
        LogosToken::Binary => Token::Binary,
        LogosToken::Unary => Token::Unary,
        LogosToken::True => Token::True,
        LogosToken::False => Token::False,
        LogosToken::Null => Token::Null,
        LogosToken::Number(n) => Token::NumberLiteral(n),
        LogosToken::String(s) => Token::StringLiteral(s),
        LogosToken::Identifier(name) => Token::Identifier(name),
        LogosToken::Plus => Token::Plus,
        LogosToken::Minus => Token::Minus,
        LogosToken::Star => Token::Star,
        LogosToken::Slash => Token::Slash,
        LogosToken::Percent => Token::Percent,
        LogosToken::AmpAmp => Token::AmpAmp,
        LogosToken::PipePipe => Token::PipePipe,
        LogosToken::EqualEqual => Token::EqualEqual,
        LogosToken::BangEqual => Token::BangEqual,
        LogosToken::Less => Token::Less,
        LogosToken::Greater => Token::Greater,
        LogosToken::LessEqual => Token::LessEqual,
        LogosToken::GreaterEqual => Token::GreaterEqual,
        LogosToken::Bang => Token::Bang,
        LogosToken::Equal => Token::Equal,
        LogosToken::Dot => Token::Dot,
        LogosToken::Comma => Token::Comma,
        LogosToken::Colon => Token::Colon,
        LogosToken::Question => Token::Question,
        LogosToken::LeftParen => Token::LeftParen,
        LogosToken::RightParen => Token::RightParen,
        LogosToken::LeftBrace => Token::LeftBrace,
        LogosToken::RightBrace => Token::RightBrace,
        // Skipped by logos before conversion
        LogosToken::Whitespace | LogosToken::LineComment => return None,
    };
    Some(token)
}
