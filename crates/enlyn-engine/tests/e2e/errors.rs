//! Diagnostics from every stage before execution

use super::harness::*;
use enlyn_engine::{compile_source, CheckError, CompileError, EngineError};

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_duplicate_class_reports_once() {
    let source = "class Main { }\nclass A { }\nclass A { }";
    let error = expect_check_error(source);
    assert!(matches!(&error, CheckError::DuplicateDeclaration { name, .. } if name == "A"));

    let diagnostics = match compile_source(source) {
        Err(error) => error.diagnostics(0),
        Ok(_) => panic!("duplicate class accepted"),
    };
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].one_line("test.enl").starts_with("test.enl:3:"));
}

#[test]
fn test_cycle_reported_once() {
    let errors = check_errors("class Main { }\nclass A : B { }\nclass B : C { }\nclass C : A { }");
    let cycles = errors.iter().filter(|e| matches!(e, CheckError::CyclicInheritance { .. })).count();
    assert_eq!(cycles, 1, "{:#?}", errors);
}

#[test]
fn test_sealed_builtin_parent() {
    let error = expect_check_error("class Main : string { }");
    assert!(matches!(error, CheckError::SealedType { .. }));
}

#[test]
fn test_extending_io_is_allowed() {
    expect_output("class Main : IO { }\nclass Loud : IO { }", &[]);
}

// ============================================================================
// Bodies
// ============================================================================

#[test]
fn test_missing_return() {
    let error = expect_check_error(&main_with(
        "",
        "class A {\n    public f(x : boolean) : number = while x do return 1\n}",
    ));
    assert!(matches!(error, CheckError::MissingReturn { .. }));
}

#[test]
fn test_errors_are_collected_across_classes() {
    let source = main_with(
        "let n : number = \"x\"",
        "class A {\n    public f() : string = 1\n}\nclass B {\n    public g() = this.nothing()\n}",
    );
    assert_eq!(check_errors(&source).len(), 3);
}

#[test]
fn test_builtin_field_cannot_be_assigned() {
    let error = expect_check_error(&main_body("let s = \"abc\"\ns.length = 5\nthis.out(s.length)"));
    assert!(matches!(error, CheckError::InvalidAssignmentTarget { .. }));
}

#[test]
fn test_private_method_hidden_from_outside() {
    let error = expect_check_error(&main_with(
        "new A().hidden()",
        "class A {\n    private hidden() = return\n}",
    ));
    assert!(matches!(error, CheckError::MemberInaccessible { .. }));
}

#[test]
fn test_protected_method_hidden_from_unrelated_class() {
    let error = expect_check_error(&main_with(
        "new A().guarded()",
        "class A {\n    protected guarded() = return\n}",
    ));
    assert!(matches!(error, CheckError::MemberInaccessible { .. }));
}

#[test]
fn test_option_requires_unwrap_for_members() {
    let error = expect_check_error(&main_body("let s : string? = \"x\"\nthis.out(s.length)"));
    assert!(matches!(error, CheckError::MemberNotFound { .. }));
}

#[test]
fn test_operator_on_wrong_type() {
    let error = expect_check_error(&main_body("this.out(true + 1)"));
    assert!(matches!(&error, CheckError::MemberNotFound { member, .. } if member == "binary +"));
}

// ============================================================================
// Entry point and earlier stages
// ============================================================================

#[test]
fn test_missing_main() {
    assert_eq!(expect_compile_error("class A { }"), CompileError::MissingEntryPoint);
}

#[test]
fn test_main_constructor_with_arguments() {
    let error = expect_compile_error("class Main {\n    public new(x : number) = return\n}");
    assert!(matches!(error, CompileError::EntryPointArguments { count: 1, .. }));
}

#[test]
fn test_syntax_error_stops_pipeline() {
    assert!(matches!(run("class Main {\n    public new( = return\n}"), Err(EngineError::Parse(_))));
}

#[test]
fn test_lex_error_stops_pipeline() {
    assert!(matches!(run("class Main {\n    public x : number = 1 # 2\n}"), Err(EngineError::Lex(_))));
}
