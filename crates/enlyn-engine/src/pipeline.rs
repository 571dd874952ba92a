//! Source-to-execution facade
//!
//! Runs the stages in order, stopping at the first stage that reports
//! errors: parse, check, compile, execute. Each stage gets its own tracing
//! span.

use crate::builtins::StandardLibrary;
use crate::checker::{Analysis, CheckError, Diagnostic, TypeChecker};
use crate::compiler::{self, CompileError, Executable};
use crate::parser::ast::Program;
use crate::parser::{LexError, ParseError, Parser};
use crate::vm::{Value, Vm, VmError};
use std::io::{BufRead, Write};
use thiserror::Error;
use tracing::info_span;

/// Failure of one pipeline stage
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{} lexical error(s)", .0.len())]
    Lex(Vec<LexError>),

    #[error("{} syntax error(s)", .0.len())]
    Parse(Vec<ParseError>),

    #[error("{} semantic error(s)", .0.len())]
    Check(Vec<CheckError>),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Runtime fault: {0}")]
    Runtime(#[from] VmError),
}

impl EngineError {
    /// Source diagnostics for the errors, in report order.
    ///
    /// Runtime faults have no source position and yield none.
    pub fn diagnostics(&self, file_id: usize) -> Vec<Diagnostic> {
        match self {
            EngineError::Lex(errors) => errors.iter().map(|e| Diagnostic::from_lex_error(e, file_id)).collect(),
            EngineError::Parse(errors) => errors.iter().map(|e| Diagnostic::from_parse_error(e, file_id)).collect(),
            EngineError::Check(errors) => errors.iter().map(|e| Diagnostic::from_check_error(e, file_id)).collect(),
            EngineError::Compile(error) => vec![Diagnostic::from_compile_error(error, file_id)],
            EngineError::Runtime(_) => Vec::new(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Tokenize and parse a source file.
pub fn parse_program(source: &str) -> EngineResult<Program> {
    let _span = info_span!("parse", bytes = source.len()).entered();
    let parser = Parser::new(source).map_err(EngineError::Lex)?;
    parser.parse().map_err(EngineError::Parse)
}

/// Build the class table and check every member.
pub fn check_program(program: &Program, stdlib: &StandardLibrary) -> EngineResult<Analysis> {
    let _span = info_span!("check", classes = program.classes.len()).entered();
    TypeChecker::new(stdlib).check_program(program).map_err(EngineError::Check)
}

/// Parse, check and compile a source file into an executable image.
pub fn compile_source(source: &str) -> EngineResult<Executable> {
    let stdlib = StandardLibrary::new();
    let program = parse_program(source)?;
    let analysis = check_program(&program, &stdlib)?;

    let _span = info_span!("compile").entered();
    let executable = compiler::compile(&program, &analysis, &stdlib)?;
    tracing::info!(
        constructs = executable.constructs.len(),
        constants = executable.constants.len(),
        "compiled"
    );
    Ok(executable)
}

/// Compile a source file and run it with the given I/O.
pub fn run_source(source: &str, input: impl BufRead, output: impl Write) -> EngineResult<Value> {
    let executable = compile_source(source)?;
    let mut vm = Vm::with_io(&executable, input, output);
    Ok(vm.run()?)
}
