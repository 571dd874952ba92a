//! Runtime faults and execution results

use super::harness::*;
use enlyn_engine::{compile_source, Value, Vm, VmError};

#[test]
fn test_null_assertion_faults() {
    let (error, output) = expect_runtime_error(&main_body("this.out(\"before\")\nlet a : number? = null\nthis.out(a!)"));
    assert!(matches!(error, VmError::NullAssertion));
    assert_eq!(output, "before\n");
}

#[test]
fn test_null_field_receiver_faults() {
    let source = main_with(
        "new Holder().poke()",
        "class Holder\n{\n    public inner : Holder\n    public poke() = this.inner.poke()\n}",
    );
    let (error, _) = expect_runtime_error(&source);
    assert!(matches!(&error, VmError::NullReceiver { member } if member == "poke"));
}

#[test]
fn test_invalid_downcast_faults() {
    let source = main_with("let x : A = new A()\nlet b = x as B", "class A { }\nclass B : A { }");
    let (error, _) = expect_runtime_error(&source);
    assert!(matches!(&error, VmError::InvalidCast { target, .. } if target == "B"));
}

#[test]
fn test_cast_of_null_to_plain_type_faults() {
    let (error, _) = expect_runtime_error(&main_body("let v : any? = null\nlet n = v as number"));
    assert!(matches!(error, VmError::InvalidCast { .. }));
}

#[test]
fn test_cast_of_primitive_to_wrong_primitive_faults() {
    let (error, _) = expect_runtime_error(&main_body("let v : any = 1\nlet s = v as string"));
    assert!(matches!(error, VmError::InvalidCast { .. }));
}

#[test]
fn test_empty_main_completes_with_null() {
    let executable = compile_source("class Main { }").unwrap();
    let mut output = Vec::new();
    let value = Vm::with_io(&executable, std::io::empty(), &mut output).run().unwrap();
    assert_eq!(value, Value::Null);
    assert!(output.is_empty());
}

#[test]
fn test_vm_can_run_twice() {
    let executable = compile_source(&main_body("this.out(1)")).unwrap();
    let mut output = Vec::new();
    {
        let mut vm = Vm::with_io(&executable, std::io::empty(), &mut output);
        vm.run().unwrap();
        vm.run().unwrap();
    }
    assert_eq!(String::from_utf8(output).unwrap(), "1\n1\n");
}

#[test]
fn test_image_survives_serialization() {
    let executable = compile_source(&main_with(
        "let s : Shape = new Circle()\nthis.out(s.name() + \" \" + 2.5)",
        "class Shape {\n    public name() : string = \"shape\"\n}\nclass Circle : Shape {\n    public override name() : string = \"circle\"\n}",
    ))
    .unwrap();
    let json = executable.to_json().unwrap();
    let restored = enlyn_engine::Executable::from_json(&json).unwrap();

    let mut output = Vec::new();
    Vm::with_io(&restored, std::io::empty(), &mut output).run().unwrap();
    assert_eq!(String::from_utf8(output).unwrap(), "circle 2.5\n");
}

#[test]
fn test_deep_recursion_uses_heap_frames() {
    let source = main_with(
        "this.out(new Deep().down(5000))",
        "class Deep {\n    public down(n : number) : number = if n == 0 then return 0 else return 1 + this.down(n - 1)\n}",
    );
    expect_output(&source, &["5000"]);
}
