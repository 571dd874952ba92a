//! Compilation errors

use crate::parser::Span;
use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompileError {
    #[error("No entry point: the program must declare a class named 'Main'")]
    MissingEntryPoint,

    #[error("The constructor of 'Main' must take no arguments, found {count}")]
    EntryPointArguments { count: usize, span: Span },

    #[error("Internal compiler error: {message}")]
    Internal { message: String },
}

impl CompileError {
    pub fn internal(message: impl Into<String>) -> Self {
        CompileError::Internal {
            message: message.into(),
        }
    }
}
