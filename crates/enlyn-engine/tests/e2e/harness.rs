//! Test harness for end-to-end compilation and execution
//!
//! Programs run with an in-memory `IO`: input comes from a string and
//! everything passed to `IO.out` is captured.

use enlyn_engine::{compile_source, run_source, CheckError, CompileError, EngineError, Executable, VmError};

/// Compile and run `source`, returning the captured output
pub fn run_with_input(source: &str, input: &str) -> Result<String, EngineError> {
    let mut output = Vec::new();
    run_source(source, input.as_bytes(), &mut output)?;
    Ok(String::from_utf8(output).expect("output is not UTF-8"))
}

/// Compile and run `source` with empty input
pub fn run(source: &str) -> Result<String, EngineError> {
    run_with_input(source, "")
}

/// Compile `source`, panicking on any error
pub fn compile_ok(source: &str) -> Executable {
    match compile_source(source) {
        Ok(executable) => executable,
        Err(e) => panic!("Compilation failed: {}\n{:#?}\nSource:\n{}", e, e, source),
    }
}

/// Run `source` and expect it to print `expected` lines, in order
pub fn expect_output(source: &str, expected: &[&str]) {
    expect_output_with_input(source, "", expected);
}

/// Run `source` reading `input`, and expect it to print `expected` lines
pub fn expect_output_with_input(source: &str, input: &str, expected: &[&str]) {
    match run_with_input(source, input) {
        Ok(output) => {
            let lines: Vec<&str> = output.lines().collect();
            assert_eq!(lines, expected, "Wrong output for:\n{}", source);
        }
        Err(e) => panic!("Compilation/execution failed: {}\n{:#?}\nSource:\n{}", e, e, source),
    }
}

/// Check `source` and return the semantic errors it reports
pub fn check_errors(source: &str) -> Vec<CheckError> {
    match run(source) {
        Err(EngineError::Check(errors)) => errors,
        Err(e) => panic!("Expected semantic errors, got: {}\nSource:\n{}", e, source),
        Ok(output) => panic!("Expected semantic errors, program ran and printed {:?}\nSource:\n{}", output, source),
    }
}

/// Expect exactly one semantic error and return it
pub fn expect_check_error(source: &str) -> CheckError {
    let mut errors = check_errors(source);
    assert_eq!(errors.len(), 1, "Expected one error, got {:#?}\nSource:\n{}", errors, source);
    errors.remove(0)
}

/// Expect compilation to fail after a clean check
pub fn expect_compile_error(source: &str) -> CompileError {
    match compile_source(source) {
        Err(EngineError::Compile(error)) => error,
        Err(e) => panic!("Expected a compile error, got: {}\nSource:\n{}", e, source),
        Ok(_) => panic!("Expected a compile error, compilation succeeded\nSource:\n{}", source),
    }
}

/// Expect the program to compile and then fault, returning the fault and
/// what was printed before it
pub fn expect_runtime_error(source: &str) -> (VmError, String) {
    let mut output = Vec::new();
    match run_source(source, std::io::empty(), &mut output) {
        Err(EngineError::Runtime(error)) => (error, String::from_utf8(output).expect("output is not UTF-8")),
        Err(e) => panic!("Expected a runtime fault, got: {}\nSource:\n{}", e, source),
        Ok(_) => panic!("Expected a runtime fault, program completed\nSource:\n{}", source),
    }
}

/// Wrap statements into the constructor of `class Main : IO`, followed by
/// any extra classes.
pub fn main_with(statements: &str, classes: &str) -> String {
    let body: Vec<String> = statements.lines().map(|line| format!("        {}", line)).collect();
    format!(
        "class Main : IO\n{{\n    public new()\n    {{\n{}\n    }}\n}}\n{}",
        body.join("\n"),
        classes
    )
}

/// Shorthand for [`main_with`] without extra classes
pub fn main_body(statements: &str) -> String {
    main_with(statements, "")
}
