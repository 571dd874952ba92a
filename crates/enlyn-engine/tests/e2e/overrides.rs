//! Virtual dispatch, overrides and base calls

use super::harness::*;
use enlyn_engine::CheckError;

const SHAPES: &str = "class Shape
{
    public area() : number = 0
    public describe() : string = this.name() + \" \" + this.area()
    protected name() : string = \"shape\"
}
class Square : Shape
{
    public side : number = 2
    public override area() : number = this.side * this.side
    protected override name() : string = \"square\"
}
class Unit : Square
{
    public override area() : number = base.area() / 4
}";

#[test]
fn test_dispatch_on_runtime_type() {
    let source = main_with("let s : Shape = new Square()\nthis.out(s.area())", SHAPES);
    expect_output(&source, &["4"]);
}

#[test]
fn test_self_call_dispatches_virtually() {
    let source = main_with(
        "this.out(new Shape().describe())\nthis.out(new Square().describe())\nthis.out(new Unit().describe())",
        SHAPES,
    );
    expect_output(&source, &["shape 0", "square 4", "square 1"]);
}

#[test]
fn test_base_call_is_static() {
    let source = main_with("let s : Shape = new Unit()\nthis.out(s.area())", SHAPES);
    expect_output(&source, &["1"]);
}

#[test]
fn test_inherited_method_without_override() {
    let source = main_with(
        "this.out(new B().greet())",
        "class A {\n    public greet() : string = \"hello\"\n}\nclass B : A { }",
    );
    expect_output(&source, &["hello"]);
}

#[test]
fn test_override_widens_parameter() {
    let source = main_with(
        "let a : A = new B()\nthis.out(a.take(new A()))",
        "class A {\n    public take(x : A) : string = \"A\"\n}\n\
         class B : A {\n    public override take(x : any?) : string = \"B\"\n}",
    );
    expect_output(&source, &["B"]);
}

#[test]
fn test_override_narrows_return() {
    let source = main_with(
        "let a : A = new B()\nthis.out(a.me() is B)",
        "class A {\n    public me() : A = this\n}\nclass B : A {\n    public override me() : B = this\n}",
    );
    expect_output(&source, &["true"]);
}

#[test]
fn test_override_may_not_narrow_parameter() {
    let error = expect_check_error(
        "class Main { }\nclass A {\n    public take(x : A) = return\n}\n\
         class B : A {\n    public override take(x : B) = return\n}",
    );
    assert!(matches!(error, CheckError::TypeIncompatible { .. }));
}

#[test]
fn test_override_may_not_widen_return() {
    let error = expect_check_error(
        "class Main { }\nclass A {\n    public me() : A = this\n}\nclass B : A {\n    public override me() : any = this\n}",
    );
    assert!(matches!(error, CheckError::TypeIncompatible { .. }));
}

#[test]
fn test_override_must_be_marked() {
    let source = main_with("", &SHAPES.replacen("public override area", "public area", 1));
    let error = expect_check_error(&source);
    assert!(matches!(error, CheckError::MustDeclareOverride { .. }));
}

#[test]
fn test_override_access_cannot_narrow() {
    let error = expect_check_error(
        "class Main { }\nclass A {\n    public f() = return\n}\nclass B : A {\n    protected override f() = return\n}",
    );
    assert!(matches!(error, CheckError::OverrideAccessNarrowed { .. }));
}
