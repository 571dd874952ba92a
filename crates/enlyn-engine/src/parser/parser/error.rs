//! Syntax errors

use crate::parser::token::{Span, Token};
use thiserror::Error;

/// First syntax error in a declaration, with an optional hint
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}:{}: {}{}", .span.line, .span.column, .message, hint(.suggestion))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken { expected: Vec<Token>, found: Token },

    /// Input ended inside a declaration
    UnexpectedEof { expected: Vec<Token> },

    /// Tokens are well-formed but cannot appear here, e.g. `override new`
    InvalidSyntax { reason: String },
}

fn hint(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|text| format!(" (help: {})", text))
        .unwrap_or_default()
}

fn expected_list(expected: &[Token]) -> String {
    let names: Vec<String> = expected.iter().map(|t| t.kind_name()).collect();
    match names.as_slice() {
        [] => "a token".to_string(),
        [one] => one.clone(),
        _ => format!("one of {}", names.join(", ")),
    }
}

impl ParseError {
    pub fn unexpected_token(expected: Vec<Token>, found: Token, span: Span) -> Self {
        Self {
            message: format!("Expected {}, found {}", expected_list(&expected), found.description()),
            kind: ParseErrorKind::UnexpectedToken { expected, found },
            span,
            suggestion: None,
        }
    }

    pub fn unexpected_eof(expected: Vec<Token>, span: Span) -> Self {
        Self {
            message: format!("Unexpected end of input, expected {}", expected_list(&expected)),
            kind: ParseErrorKind::UnexpectedEof { expected },
            span,
            suggestion: None,
        }
    }

    pub fn invalid_syntax(reason: impl Into<String>, span: Span) -> Self {
        let reason = reason.into();
        Self {
            message: format!("Invalid syntax: {}", reason),
            kind: ParseErrorKind::InvalidSyntax { reason },
            span,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}
