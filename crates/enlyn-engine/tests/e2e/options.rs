//! Option types, null, type tests and casts

use super::harness::*;
use enlyn_engine::CheckError;

#[test]
fn test_type_test_matrix() {
    let source = main_body(
        "let a : number? = null
this.out(a is number)
this.out(a is number?)
let b : any = 5
this.out(b is boolean)
this.out(null is string???)
this.out(a is null)
this.out(b is any)",
    );
    expect_output(&source, &["false", "true", "false", "true", "true", "true"]);
}

#[test]
fn test_type_tests_on_instances() {
    let source = main_with(
        "let x : A = new B()\nthis.out(x is B)\nthis.out(x is A)\nthis.out(x is C)",
        "class A { }\nclass B : A { }\nclass C : A { }",
    );
    expect_output(&source, &["true", "true", "false"]);
}

#[test]
fn test_type_test_cannot_widen() {
    let source = main_with("let x : A = new A()\nthis.out(x is any)", "class A { }");
    let error = expect_check_error(&source);
    assert!(matches!(error, CheckError::TypeIncompatible { .. }));
}

#[test]
fn test_option_holds_value_then_null() {
    let source = main_body("let a : number? = 3\nthis.out(a! + 1)\na = null\nthis.out(a)");
    expect_output(&source, &["4", "null"]);
}

#[test]
fn test_option_equality() {
    let source = main_body(
        "let a : number? = null\nthis.out(a == null)\nthis.out(null != a)\na = 2\nthis.out(a == 2)\nthis.out(a == null)",
    );
    expect_output(&source, &["true", "false", "true", "false"]);
}

#[test]
fn test_option_of_class() {
    let source = main_with(
        "let n : Node? = new Node()\nthis.out(n!.value)\nn = null\nthis.out(n is null)",
        "class Node {\n    public value : number = 9\n}",
    );
    expect_output(&source, &["9", "true"]);
}

#[test]
fn test_value_flows_into_option_parameter() {
    let source = main_with(
        "this.out(new Box().describe(1))\nthis.out(new Box().describe(null))",
        "class Box {\n    public describe(v : number?) : string = if v is null then return \"empty\" else return \"full\"\n}",
    );
    expect_output(&source, &["full", "empty"]);
}

#[test]
fn test_downcast_succeeds() {
    let source = main_with(
        "let x : A = new B()\nlet b = x as B\nthis.out(b.tag)",
        "class A { }\nclass B : A {\n    public tag : string = \"b\"\n}",
    );
    expect_output(&source, &["b"]);
}

#[test]
fn test_cast_from_any_to_primitive() {
    expect_output(&main_body("let v : any = 41\nlet n = v as number\nthis.out(n + 1)"), &["42"]);
}

#[test]
fn test_cast_null_to_option() {
    let source = main_body("let v : any? = null\nlet s = v as string?\nthis.out(s is null)");
    expect_output(&source, &["true"]);
}

#[test]
fn test_nested_option_collapses() {
    let source = main_body("let a : number??? = 1\nlet b : number? = a\nthis.out(b)");
    expect_output(&source, &["1"]);
}
