//! Classes, constructors, fields and inheritance

use super::harness::*;
use enlyn_engine::compiler::MemberId;
use enlyn_engine::builtins::MemberKey;

// ============================================================================
// Constructors
// ============================================================================

#[test]
fn test_hello() {
    expect_output("class Main : IO {\n    public new() = this.out(\"Hi\")\n}", &["Hi"]);
}

#[test]
fn test_call_through_other_class() {
    let source = "class Main : IO
{
    private new() : base()
    {
        let x = \"Hi\"
        new A().out(x)
    }
}
class A
{
    public new() = return
    public out(a : string) = new IO().out(a)
}";
    expect_output(source, &["Hi"]);
}

#[test]
fn test_base_constructor_chain() {
    let source = "class Main
{
    private new()
    {
        new A(1)
    }
}
class A : B
{
    public new(x : number) : base(x, x) = new IO().out(x)
}
class B
{
    public new(x : number, y : number)
    {
        new IO().out(x)
        new IO().out(y)
    }
}";
    expect_output(source, &["1", "1", "1"]);
}

#[test]
fn test_parent_constructor_runs_first() {
    let source = main_with(
        "new C()",
        "class A {\n    public new() = new IO().out(\"A\")\n}\n\
         class B : A {\n    public new() = new IO().out(\"B\")\n}\n\
         class C : B {\n    public new() = new IO().out(\"C\")\n}",
    );
    expect_output(&source, &["A", "B", "C"]);
}

#[test]
fn test_synthesized_constructor() {
    let source = main_with("this.out(new A().n)", "class A {\n    public n : number = 7\n}");
    expect_output(&source, &["7"]);
}

// ============================================================================
// Fields
// ============================================================================

#[test]
fn test_field_initializer_then_constructor() {
    let source = "class Main : A
{
    public new()
    {
        this.a = \"12345\"
        new IO().out(this.a.length)
    }
}
class A
{
    public a : string = \"123\"
}";
    expect_output(source, &["5"]);
}

#[test]
fn test_inherited_initializers_run() {
    let source = main_with(
        "let b = new B()\nthis.out(b.x)\nthis.out(b.y)",
        "class A {\n    public x : number = 1\n}\nclass B : A {\n    public y : number = this.x + 1\n}",
    );
    expect_output(&source, &["1", "2"]);
}

#[test]
fn test_uninitialized_field_is_null() {
    let source = main_with("this.out(new A().s)", "class A {\n    public s : string?\n}");
    expect_output(&source, &["null"]);
}

#[test]
fn test_field_offsets_span_hierarchy() {
    let source = "class Main { public new() = return }
class A : B
{
    public new() = return
    public a : number
    public b : number
    public c : number
}
class B
{
    public new() = return
    public a : number
    public b : number
    public c : number
}";
    let executable = compile_ok(source);
    assert_eq!(executable.constructs[6].name, "A");
    assert_eq!(executable.constructs[6].field_count, 6);
    assert_eq!(executable.constructs[7].field_count, 3);
}

#[test]
fn test_fields_are_per_instance() {
    let source = main_with(
        "let a = new Counter()\nlet b = new Counter()\na.bump()\na.bump()\nb.bump()\nthis.out(a.n)\nthis.out(b.n)",
        "class Counter {\n    public n : number = 0\n    public bump() = this.n = this.n + 1\n}",
    );
    expect_output(&source, &["2", "1"]);
}

// ============================================================================
// Image layout
// ============================================================================

#[test]
fn test_constructs_follow_declaration_order() {
    let executable = compile_ok("class Z { }\nclass Main { }\nclass A : Z { }");
    let names: Vec<&str> = executable.constructs.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["any", "number", "string", "boolean", "IO", "Z", "Main", "A"]);
    assert_eq!(executable.main, 6);
    assert_eq!(executable.constructs[7].parent, Some(5));
}

#[test]
fn test_methods_share_member_ids() {
    let executable = compile_ok(
        "class Main { }\nclass A {\n    public f() = return\n}\nclass B : A {\n    public override f() = return\n}",
    );
    let id: MemberId = executable.member_id(&MemberKey::named("f")).unwrap();
    assert!(executable.constructs[6].chunks.contains_key(&id));
    assert!(executable.constructs[7].chunks.contains_key(&id));
}
