//! Locals, conditionals, loops, recursion and input

use super::harness::*;

// ============================================================================
// Locals and scopes
// ============================================================================

#[test]
fn test_many_locals() {
    let source = main_body("let a = 1\nlet b = 2\nlet c = 3\nlet d = 4\nlet e = 5\nlet f = 6\nthis.out(a + b + c + d + e + f)");
    expect_output(&source, &["21"]);
}

#[test]
fn test_shadowing_in_nested_block() {
    let source = main_body("let x = 1\nif true then\n{\n    let x = 2\n    this.out(x)\n}\nthis.out(x)");
    expect_output(&source, &["2", "1"]);
}

#[test]
fn test_assignment_is_an_expression() {
    let source = main_body("let a = 1\nlet b = 2\na = b = 5\nthis.out(a)\nthis.out(b)");
    expect_output(&source, &["5", "5"]);
}

// ============================================================================
// Conditionals
// ============================================================================

#[test]
fn test_if_else() {
    let source = main_body("let n = 3\nif n % 2 == 0 then this.out(\"even\") else this.out(\"odd\")");
    expect_output(&source, &["odd"]);
}

#[test]
fn test_if_without_else() {
    let source = main_body("if 1 > 2 then this.out(\"no\")\nthis.out(\"after\")");
    expect_output(&source, &["after"]);
}

#[test]
fn test_if_with_blocks() {
    let source = main_body(
        "let n = 10
if n > 5 then
{
    this.out(\"big\")
    this.out(n)
}
else
{
    this.out(\"small\")
}",
    );
    expect_output(&source, &["big", "10"]);
}

// ============================================================================
// Loops
// ============================================================================

#[test]
fn test_while_counts() {
    let source = main_body("let i = 0\nwhile i < 3 do\n{\n    this.out(i)\n    i = i + 1\n}\nthis.out(\"done\")");
    expect_output(&source, &["0", "1", "2", "done"]);
}

#[test]
fn test_while_false_never_runs() {
    expect_output(&main_body("while false do this.out(\"never\")\nthis.out(\"end\")"), &["end"]);
}

#[test]
fn test_nested_loops() {
    let source = main_body(
        "let total = 0
let i = 0
while i < 3 do
{
    let j = 0
    while j < 4 do
    {
        total = total + 1
        j = j + 1
    }
    i = i + 1
}
this.out(total)",
    );
    expect_output(&source, &["12"]);
}

#[test]
fn test_return_from_inside_loop() {
    let source = main_with(
        "this.out(new Finder().first(7))",
        "class Finder
{
    public first(limit : number) : number
    {
        let i = 1
        while true do
        {
            if i * i > limit then return i
            i = i + 1
        }
        return 0
    }
}",
    );
    expect_output(&source, &["3"]);
}

// ============================================================================
// Methods
// ============================================================================

#[test]
fn test_recursion() {
    let source = main_with(
        "let m = new MathUtil()\nthis.out(m.fact(5))\nthis.out(m.fib(10))",
        "class MathUtil
{
    public fact(n : number) : number = if n < 2 then return 1 else return n * this.fact(n - 1)
    public fib(n : number) : number = if n < 2 then return n else return this.fib(n - 1) + this.fib(n - 2)
}",
    );
    expect_output(&source, &["120", "55"]);
}

#[test]
fn test_arguments_bind_in_order() {
    let source = main_with(
        "this.out(new P().minus(10, 3))",
        "class P {\n    public minus(a : number, b : number) : number = a - b\n}",
    );
    expect_output(&source, &["7"]);
}

#[test]
fn test_reads_input_lines() {
    let source = main_body("let name = this.in()\nlet again = this.in()\nthis.out(\"Hello, \" + name)\nthis.out(again.length)");
    expect_output_with_input(&source, "World\r\nabc\n", &["Hello, World", "3"]);
}

#[test]
fn test_input_at_end_reads_empty() {
    expect_output_with_input(&main_body("this.out(this.in().length)"), "", &["0"]);
}
