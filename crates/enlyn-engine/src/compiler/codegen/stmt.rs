//! Statement lowering

use super::context::ChunkBuilder;
use super::CodeGenerator;
use crate::compiler::bytecode::Instruction;
use crate::compiler::error::CompileResult;
use crate::parser::ast::*;

impl CodeGenerator<'_> {
    /// Emit code for a statement. Statements leave the stack as they found it.
    pub(super) fn compile_stmt(&mut self, builder: &mut ChunkBuilder, stmt: &Statement) -> CompileResult<()> {
        match stmt {
            Statement::Let(decl) => {
                // The value is compiled before the name exists, so `let x = x` sees the outer x
                self.compile_expr(builder, &decl.value)?;
                let slot = builder.declare(&decl.name.name)?;
                builder.emit(Instruction::Store(slot));
            }
            Statement::Return(ret) => {
                match &ret.value {
                    Some(value) => self.compile_expr(builder, value)?,
                    None => {
                        builder.emit(Instruction::Null);
                    }
                }
                builder.emit(Instruction::Return);
            }
            Statement::If(stmt) => self.compile_if(builder, stmt)?,
            Statement::While(stmt) => self.compile_while(builder, stmt)?,
            Statement::Block(block) => {
                builder.enter_scope();
                for stmt in &block.statements {
                    self.compile_stmt(builder, stmt)?;
                }
                builder.exit_scope();
            }
            Statement::Expression(stmt) => {
                self.compile_expr(builder, &stmt.expression)?;
                builder.emit(Instruction::Pop);
            }
        }
        Ok(())
    }

    fn compile_if(&mut self, builder: &mut ChunkBuilder, stmt: &IfStatement) -> CompileResult<()> {
        self.compile_expr(builder, &stmt.condition)?;
        let skip_then = builder.emit(Instruction::JumpIfFalse(0));

        self.compile_branch(builder, &stmt.then_branch)?;

        match &stmt.else_branch {
            Some(else_branch) => {
                let skip_else = builder.emit(Instruction::Jump(0));
                builder.patch_here(skip_then)?;
                self.compile_branch(builder, else_branch)?;
                builder.patch_here(skip_else)?;
            }
            None => builder.patch_here(skip_then)?,
        }
        Ok(())
    }

    fn compile_while(&mut self, builder: &mut ChunkBuilder, stmt: &WhileStatement) -> CompileResult<()> {
        let start = builder.position();
        self.compile_expr(builder, &stmt.condition)?;
        let exit = builder.emit(Instruction::JumpIfFalse(0));

        self.compile_branch(builder, &stmt.body)?;

        builder.emit(Instruction::Jump(start));
        builder.patch_here(exit)
    }

    /// A branch body gets its own scope even when it is a single statement.
    fn compile_branch(&mut self, builder: &mut ChunkBuilder, stmt: &Statement) -> CompileResult<()> {
        builder.enter_scope();
        let result = self.compile_stmt(builder, stmt);
        builder.exit_scope();
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::builtins::{MemberKey, StandardLibrary};
    use crate::checker::TypeChecker;
    use crate::compiler::bytecode::{Chunk, CompiledChunk, Instruction};
    use crate::compiler::codegen::compile;
    use crate::parser::Parser;

    fn method_chunk(members: &str, name: &str) -> CompiledChunk {
        let source = format!("class Main {{ }}\nclass A {{\n{}\n}}", members);
        let stdlib = StandardLibrary::new();
        let program = Parser::new(&source).unwrap().parse().unwrap();
        let analysis = TypeChecker::new(&stdlib).check_program(&program).unwrap();
        let image = compile(&program, &analysis, &stdlib).unwrap();
        let member = image.member_id(&MemberKey::named(name)).unwrap();
        match &image.constructs[6].chunks[&member] {
            Chunk::Compiled(chunk) => chunk.clone(),
            other => panic!("expected compiled chunk, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_return_pushes_null() {
        let chunk = method_chunk("  public f() {\n    return\n  }", "f");
        assert_eq!(
            chunk.code,
            vec![Instruction::Null, Instruction::Return, Instruction::Null, Instruction::Return]
        );
    }

    #[test]
    fn test_if_without_else() {
        let chunk = method_chunk("  public f(b : boolean) {\n    if b then return\n  }", "f");
        assert_eq!(
            chunk.code,
            vec![
                Instruction::Load(1),
                Instruction::JumpIfFalse(4),
                Instruction::Null,
                Instruction::Return,
                Instruction::Null,
                Instruction::Return,
            ]
        );
    }

    #[test]
    fn test_expression_statement_pops() {
        let chunk = method_chunk("  public f(x : number) {\n    x = 2\n  }", "f");
        assert_eq!(
            &chunk.code[..4],
            &[Instruction::Const(0), Instruction::Dup, Instruction::Store(1), Instruction::Pop]
        );
    }

    #[test]
    fn test_branch_locals_share_slots() {
        let members = "  public f(b : boolean) {\n    if b then {\n      let x = 1\n      let y = 2\n    } else {\n      let z = 3\n    }\n    let w = 4\n  }";
        let chunk = method_chunk(members, "f");
        // receiver, b, then x and y; z and w reuse slot 2
        assert_eq!(chunk.locals, 4);
        assert!(chunk.code.contains(&Instruction::Store(3)));
        assert!(!chunk.code.contains(&Instruction::Store(4)));
    }

    #[test]
    fn test_while_condition_reevaluated() {
        let chunk = method_chunk("  public f(b : boolean) {\n    while b do b = false\n  }", "f");
        assert_eq!(chunk.code[0], Instruction::Load(1));
        assert_eq!(chunk.code[1], Instruction::JumpIfFalse(7));
        assert_eq!(chunk.code[6], Instruction::Jump(0));
    }
}
