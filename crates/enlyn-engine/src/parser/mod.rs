//! Enlyn front end: lexer, indentation filter and parser.
//!
//! # Example
//!
//! ```ignore
//! use enlyn_engine::parser::Parser;
//!
//! let source = "class Main : IO { private new() = this.out(\"hi\") }";
//! let program = Parser::new(source)?.parse()?;
//! assert_eq!(program.classes.len(), 1);
//! ```

pub mod ast;
pub mod filter;
pub mod lexer;
pub mod parser;
pub mod token;

pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, ParseErrorKind, Parser};
pub use token::{Span, Token};
