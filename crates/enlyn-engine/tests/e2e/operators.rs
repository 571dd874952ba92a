//! Built-in and overloaded operators

use super::harness::*;

// ============================================================================
// Numbers and booleans
// ============================================================================

#[test]
fn test_arithmetic_precedence() {
    expect_output(&main_body("this.out(1 + 2 * 3)\nthis.out((1 + 2) * 3)\nthis.out(7 / 2)\nthis.out(7 % 4)"), &["7", "9", "3.5", "3"]);
}

#[test]
fn test_unary_minus_and_not() {
    expect_output(&main_body("let x = 4\nthis.out(-x)\nthis.out(!(x < 3))"), &["-4", "true"]);
}

#[test]
fn test_comparisons() {
    let source = main_body("this.out(1 < 2)\nthis.out(2 <= 2)\nthis.out(3 > 4)\nthis.out(3 >= 4)\nthis.out(1 == 1)\nthis.out(1 != 1)");
    expect_output(&source, &["true", "true", "false", "false", "true", "false"]);
}

#[test]
fn test_logical_operators() {
    let source = main_body("let t = true\nlet f = false\nthis.out(t && f)\nthis.out(t || f)\nthis.out(!f && t)");
    expect_output(&source, &["false", "true", "true"]);
}

#[test]
fn test_logical_operators_evaluate_both_sides() {
    let source = main_with(
        "let s = new Side()\nthis.out(false && s.mark(\"right\"))\nthis.out(true || s.mark(\"again\"))",
        "class Side {\n    public mark(label : string) : boolean\n    {\n        new IO().out(label)\n        return true\n    }\n}",
    );
    expect_output(&source, &["right", "false", "again", "true"]);
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_concat_renders_operand() {
    let source = main_body("let n = 1\nthis.out(\"n = \" + n)\nthis.out(\"ok: \" + true)\nthis.out(\"a\" + \"b\" + \"c\")");
    expect_output(&source, &["n = 1", "ok: true", "abc"]);
}

#[test]
fn test_string_length_counts_characters() {
    expect_output(&main_body("this.out(\"héllo\".length)\nthis.out(\"\".length)"), &["5", "0"]);
}

#[test]
fn test_string_equality_is_by_value() {
    expect_output(&main_body("let a = \"ab\"\nthis.out(a == \"a\" + \"b\")"), &["true"]);
}

// ============================================================================
// Overloading
// ============================================================================

const VECTOR: &str = "class V
{
    public x : number
    public new(x : number) = this.x = x
    public binary +(other : V) : V = new V(this.x + other.x)
    public binary <(other : V) : boolean = this.x < other.x
    public unary -() : V = new V(-this.x)
}";

#[test]
fn test_user_binary_operator() {
    let source = main_with("let v = new V(1) + new V(2)\nthis.out(v.x)", VECTOR);
    expect_output(&source, &["3"]);
}

#[test]
fn test_user_comparison_operator() {
    let source = main_with("this.out(new V(1) < new V(2))\nthis.out(new V(3) < new V(2))", VECTOR);
    expect_output(&source, &["true", "false"]);
}

#[test]
fn test_user_unary_operator() {
    let source = main_with("let v = -(new V(2) + new V(3))\nthis.out(v.x)", VECTOR);
    expect_output(&source, &["-5"]);
}

#[test]
fn test_object_equality_is_identity() {
    let source = main_with("let a = new V(1)\nlet b = new V(1)\nthis.out(a == a)\nthis.out(a == b)\nthis.out(a != b)", VECTOR);
    expect_output(&source, &["true", "false", "true"]);
}

#[test]
fn test_overridden_equality_dispatches() {
    let source = main_with(
        "let a : any = new Always()\nthis.out(a == new Always())",
        "class Always\n{\n    public override binary ==(other : any?) : boolean = true\n}",
    );
    expect_output(&source, &["true"]);
}

#[test]
fn test_overridden_equality_on_option_receiver() {
    let source = main_with(
        "let a : Never? = new Never()\nlet b : Never = new Never()\nthis.out(b == b)\nthis.out(a == b)\n\
         let n : Never? = null\nthis.out(n == null)\nthis.out(n != b)",
        "class Never\n{\n    public override binary ==(other : any?) : boolean = false\n}",
    );
    expect_output(&source, &["false", "false", "true", "true"]);
}
