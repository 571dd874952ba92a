//! Diagnostic infrastructure for error reporting
//!
//! Converts lexer, parser, checker and compiler errors into codespan
//! diagnostics with stable error codes, and renders them either with source
//! context, as a single line, or as JSON.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::WriteColor;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::CheckError;
use crate::compiler::CompileError;
use crate::parser::{LexError, ParseError, ParseErrorKind, Span};

/// Error code for a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// A diagnostic message with source code context
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The underlying codespan diagnostic
    inner: CsDiagnostic<usize>,
    /// Error code (e.g., "E2001")
    code: Option<ErrorCode>,
    /// Line and column of the primary label
    position: Option<(u32, u32)>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
            position: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.inner = self.inner.with_code(code.0);
        self.code = Some(code);
        self
    }

    /// Add a primary label (main error location)
    pub fn with_primary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        let label = Label::primary(file_id, span.start..span.end).with_message(message);
        self.inner.labels.push(label);
        if span.line > 0 {
            self.position = Some((span.line, span.column));
        }
        self
    }

    /// Add a note (additional context)
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    /// Add a help suggestion
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    pub fn code(&self) -> Option<&ErrorCode> {
        self.code.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Get the underlying codespan diagnostic (for testing/custom rendering)
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    /// Create diagnostic from a CheckError
    pub fn from_check_error(error: &CheckError, file_id: usize) -> Self {
        use CheckError::*;

        let span = error.span();
        let diag = Diagnostic::error(error.to_string()).with_code(check_error_code(error));

        match error {
            DuplicateDeclaration { .. } => diag
                .with_primary_label(file_id, span, "already declared")
                .with_help("rename one of the declarations"),
            DuplicateBinding { .. } => diag.with_primary_label(file_id, span, "already bound in this scope"),
            UnknownType { .. } => diag.with_primary_label(file_id, span, "type not found"),
            UndefinedVariable { .. } => diag.with_primary_label(file_id, span, "not found in this scope"),
            CyclicInheritance { .. } => diag
                .with_primary_label(file_id, span, "inherits from itself")
                .with_note("a class cannot be its own ancestor"),
            SealedType { .. } => diag.with_primary_label(file_id, span, "sealed built-in type"),
            InvalidOperatorArity { expected, .. } => {
                let label = if *expected == 0 {
                    "unary operators take no parameters"
                } else {
                    "binary operators take exactly one parameter"
                };
                diag.with_primary_label(file_id, span, label)
            }
            TypeIncompatible { expected, actual, note, .. } => {
                let diag = diag.with_primary_label(
                    file_id,
                    span,
                    format!("expected '{}', found '{}'", expected, actual),
                );
                match note {
                    Some(note) => diag.with_note(note.clone()),
                    None => diag,
                }
            }
            NotAnOption { ty, .. } => diag
                .with_primary_label(file_id, span, "cannot be null")
                .with_help(format!("declare the type as '{}?'", ty)),
            MissingReturn { .. } => diag
                .with_primary_label(file_id, span, "not every path returns")
                .with_note("a while loop may run zero times and an if needs an else"),
            NoMethodToOverride { .. } => diag
                .with_primary_label(file_id, span, "nothing to override")
                .with_help("remove the override modifier"),
            MustDeclareOverride { .. } => diag
                .with_primary_label(file_id, span, "hides an inherited method")
                .with_help("add the override modifier"),
            OverrideAccessNarrowed { .. } => diag.with_primary_label(file_id, span, "less accessible than the overridden method"),
            OverrideArityMismatch { .. } => diag.with_primary_label(file_id, span, "parameter count differs"),
            MemberNotFound { ty, .. } => {
                let diag = diag.with_primary_label(file_id, span, "member not found");
                if ty.ends_with('?') || ty == "null" {
                    diag.with_help("unwrap the option with '!' first")
                } else {
                    diag
                }
            }
            MemberInaccessible { .. } => diag.with_primary_label(file_id, span, "not accessible from here"),
            InvalidArgumentCount { .. } => diag.with_primary_label(file_id, span, "incorrect number of arguments"),
            InvalidCallTarget { .. } => diag.with_primary_label(file_id, span, "cannot be called"),
            InvalidAssignmentTarget { .. } => diag
                .with_primary_label(file_id, span, "cannot assign to this")
                .with_note("only variables and fields can be assigned"),
            InvalidAssertionTarget { .. } => diag.with_primary_label(file_id, span, "not an option"),
        }
    }

    /// Create diagnostic from a ParseError
    pub fn from_parse_error(error: &ParseError, file_id: usize) -> Self {
        let (code, label) = match &error.kind {
            ParseErrorKind::UnexpectedToken { .. } => (ErrorCode("E1001"), "unexpected token"),
            ParseErrorKind::UnexpectedEof { .. } => (ErrorCode("E1002"), "unexpected end of input"),
            ParseErrorKind::InvalidSyntax { .. } => (ErrorCode("E1003"), "invalid syntax"),
        };
        let diag = Diagnostic::error(error.message.clone())
            .with_code(code)
            .with_primary_label(file_id, error.span, label);
        match &error.suggestion {
            Some(suggestion) => diag.with_help(suggestion.clone()),
            None => diag,
        }
    }

    /// Create diagnostic from a LexError
    pub fn from_lex_error(error: &LexError, file_id: usize) -> Self {
        let diag = Diagnostic::error(error.to_string())
            .with_code(ErrorCode("E1000"))
            .with_primary_label(file_id, *error.span(), "invalid token");
        match error.hint() {
            Some(hint) => diag.with_help(hint),
            None => diag,
        }
    }

    /// Create diagnostic from a CompileError
    pub fn from_compile_error(error: &CompileError, file_id: usize) -> Self {
        let diag = Diagnostic::error(error.to_string());
        match error {
            CompileError::MissingEntryPoint => diag
                .with_code(ErrorCode("E3001"))
                .with_help("declare a class named 'Main' with a constructor taking no arguments"),
            CompileError::EntryPointArguments { span, .. } => diag
                .with_code(ErrorCode("E3002"))
                .with_primary_label(file_id, *span, "entry constructor must take no arguments"),
            CompileError::Internal { .. } => diag.with_code(ErrorCode("E3999")),
        }
    }

    /// Emit the diagnostic with source context to a terminal stream
    pub fn emit(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.inner)
    }

    /// Single-line rendering: `file:line:col - message`
    pub fn one_line(&self, file: &str) -> String {
        match self.position {
            Some((line, column)) => format!("{}:{}:{} - {}", file, line, column, self.inner.message),
            None => format!("{} - {}", file, self.inner.message),
        }
    }

    /// Convert to JSON representation for editor integration
    pub fn to_json(&self, files: &SimpleFiles<String, String>) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&JsonDiagnostic::from_diagnostic(self, files))
    }
}

/// JSON representation of a diagnostic
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub code: Option<String>,
    pub severity: String,
    pub message: String,
    pub labels: Vec<JsonLabel>,
    pub notes: Vec<String>,
}

/// JSON representation of a diagnostic label (1-indexed positions)
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    pub file: String,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub message: String,
    pub style: String,
}

impl JsonDiagnostic {
    pub fn from_diagnostic(diag: &Diagnostic, files: &SimpleFiles<String, String>) -> Self {
        let severity = match diag.inner.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
            Severity::Bug => "bug",
        };

        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let file = files.get(label.file_id).ok()?;
                let start = file.location((), label.range.start).ok()?;
                let end = file.location((), label.range.end).ok()?;
                Some(JsonLabel {
                    file: file.name().to_string(),
                    start_line: start.line_number,
                    start_column: start.column_number,
                    end_line: end.line_number,
                    end_column: end.column_number,
                    message: label.message.clone(),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            code: diag.code.as_ref().map(|c| c.0.to_string()),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

/// Get error code for a CheckError
pub fn check_error_code(error: &CheckError) -> ErrorCode {
    use CheckError::*;

    match error {
        DuplicateDeclaration { .. } => ErrorCode("E2001"),
        UnknownType { .. } => ErrorCode("E2002"),
        CyclicInheritance { .. } => ErrorCode("E2003"),
        InvalidOperatorArity { .. } => ErrorCode("E2004"),
        TypeIncompatible { .. } => ErrorCode("E2005"),
        NotAnOption { .. } => ErrorCode("E2006"),
        MissingReturn { .. } => ErrorCode("E2007"),
        NoMethodToOverride { .. } => ErrorCode("E2008"),
        MustDeclareOverride { .. } => ErrorCode("E2009"),
        OverrideAccessNarrowed { .. } => ErrorCode("E2010"),
        OverrideArityMismatch { .. } => ErrorCode("E2011"),
        MemberNotFound { .. } => ErrorCode("E2012"),
        MemberInaccessible { .. } => ErrorCode("E2013"),
        InvalidArgumentCount { .. } => ErrorCode("E2014"),
        InvalidCallTarget { .. } => ErrorCode("E2015"),
        InvalidAssignmentTarget { .. } => ErrorCode("E2016"),
        InvalidAssertionTarget { .. } => ErrorCode("E2017"),
        DuplicateBinding { .. } => ErrorCode("E2018"),
        UndefinedVariable { .. } => ErrorCode("E2019"),
        SealedType { .. } => ErrorCode("E2020"),
    }
}

/// Helper to create a SimpleFiles instance from source code
pub fn create_files(path: impl Into<PathBuf>, source: impl Into<String>) -> (SimpleFiles<String, String>, usize) {
    let mut files = SimpleFiles::new();
    let file_id = files.add(path.into().display().to_string(), source.into());
    (files, file_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan_reporting::term::termcolor::NoColor;

    #[test]
    fn test_from_check_error_code_and_message() {
        let error = CheckError::UnknownType {
            name: "Foo".to_string(),
            span: Span::new(10, 13, 1, 11),
        };
        let diag = Diagnostic::from_check_error(&error, 0);
        assert_eq!(diag.code(), Some(&ErrorCode("E2002")));
        assert_eq!(diag.message(), "Type 'Foo' not found");
        assert_eq!(diag.inner().severity, Severity::Error);
    }

    #[test]
    fn test_type_incompatible_keeps_note() {
        let error = CheckError::TypeIncompatible {
            expected: "A".to_string(),
            actual: "B".to_string(),
            note: Some("context".to_string()),
            span: Span::new(0, 1, 1, 1),
        };
        let diag = Diagnostic::from_check_error(&error, 0);
        assert!(diag.inner().notes.iter().any(|n| n == "context"));
    }

    #[test]
    fn test_one_line() {
        let error = CheckError::UndefinedVariable {
            name: "y".to_string(),
            span: Span::new(4, 5, 2, 7),
        };
        let diag = Diagnostic::from_check_error(&error, 0);
        assert_eq!(diag.one_line("main.en"), "main.en:2:7 - Variable 'y' not found");
    }

    #[test]
    fn test_emit_renders_source() {
        let source = "class A : Missing { }";
        let (files, file_id) = create_files("main.en", source);
        let error = CheckError::UnknownType {
            name: "Missing".to_string(),
            span: Span::new(10, 17, 1, 11),
        };
        let mut out = NoColor::new(Vec::new());
        Diagnostic::from_check_error(&error, file_id).emit(&mut out, &files).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains("E2002"));
        assert!(text.contains("main.en:1:11"));
    }

    #[test]
    fn test_json_labels() {
        let source = "let x = foo";
        let (files, file_id) = create_files("main.en", source);
        let error = CheckError::UndefinedVariable {
            name: "foo".to_string(),
            span: Span::new(8, 11, 1, 9),
        };
        let json = Diagnostic::from_check_error(&error, file_id).to_json(&files).unwrap();
        let parsed: JsonDiagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.code.as_deref(), Some("E2019"));
        assert_eq!(parsed.labels[0].start_column, 9);
        assert_eq!(parsed.labels[0].style, "primary");
    }

    #[test]
    fn test_compile_error_without_location() {
        let diag = Diagnostic::from_compile_error(&CompileError::MissingEntryPoint, 0);
        assert_eq!(diag.code(), Some(&ErrorCode("E3001")));
        assert!(diag.inner().labels.is_empty());
        assert!(diag.one_line("x.en").starts_with("x.en - "));
    }
}
