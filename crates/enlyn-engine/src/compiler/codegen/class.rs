//! Construct generation: field initializers, methods and constructors

use super::context::ChunkBuilder;
use super::CodeGenerator;
use crate::builtins::MemberKey;
use crate::checker::{method_key, Ty, TypeId};
use crate::compiler::bytecode::{Chunk, Construct, Instruction};
use crate::compiler::error::{CompileError, CompileResult};
use crate::parser::ast::{ClassDecl, ConstructorDecl, Expression, MethodDecl};

impl CodeGenerator<'_> {
    pub(super) fn compile_class(&mut self, id: TypeId, decl: &ClassDecl) -> CompileResult<Construct> {
        let classes = &self.analysis.classes;
        let parent = classes
            .get(id)
            .parent
            .ok_or_else(|| CompileError::internal(format!("class '{}' has no parent", decl.name.name)))?;
        let parent_index = self.construct_index(parent)?;
        let mut construct = Construct::new(decl.name.name.clone(), Some(parent_index), classes.field_count(id));

        let initializer = self.compile_initializer(id, parent_index, decl)?;
        let member = self.member(MemberKey::Initializer);
        construct.chunks.insert(member, initializer);

        for method in decl.methods() {
            let chunk = self.compile_method(method)?;
            let member = self.member(method_key(&method.name));
            construct.chunks.insert(member, chunk);
        }

        let constructor = match decl.constructors().next() {
            Some(ctor) => self.compile_constructor(parent_index, ctor)?,
            None => self.compile_implicit_constructor(parent_index)?,
        };
        let member = self.member(MemberKey::Constructor);
        construct.chunks.insert(member, constructor);

        Ok(construct)
    }

    /// Runs the parent's initializer, then stores each initialized field.
    /// Returns the receiver.
    fn compile_initializer(&mut self, id: TypeId, parent: u32, decl: &ClassDecl) -> CompileResult<Chunk> {
        let mut builder = ChunkBuilder::new([])?;
        let member = self.member(MemberKey::Initializer);

        builder.emit(Instruction::Load(0));
        builder.emit(Instruction::Invoke {
            construct: parent,
            member,
        });
        builder.emit(Instruction::Pop);

        for field in decl.fields() {
            let Some(initializer) = &field.initializer else {
                continue;
            };
            let offset = self.field_offset(id, &field.name.name)?;
            builder.emit(Instruction::Load(0));
            self.compile_expr(&mut builder, initializer)?;
            builder.emit(Instruction::SetField(offset));
            builder.emit(Instruction::Pop);
        }

        builder.emit(Instruction::Load(0));
        builder.emit(Instruction::Return);
        Ok(Chunk::Compiled(builder.finish()))
    }

    fn compile_method(&mut self, method: &MethodDecl) -> CompileResult<Chunk> {
        let mut builder = ChunkBuilder::new(method.params.iter().map(|p| p.name.name.as_str()))?;
        self.compile_stmt(&mut builder, &method.body)?;
        builder.emit(Instruction::Null);
        builder.emit(Instruction::Return);
        Ok(Chunk::Compiled(builder.finish()))
    }

    /// Parent constructor first, then the body.
    fn compile_constructor(&mut self, parent: u32, ctor: &ConstructorDecl) -> CompileResult<Chunk> {
        let mut builder = ChunkBuilder::new(ctor.params.iter().map(|p| p.name.name.as_str()))?;
        let base_args = ctor.base_args.as_deref().unwrap_or(&[]);
        self.compile_base_constructor_call(&mut builder, parent, base_args)?;
        self.compile_stmt(&mut builder, &ctor.body)?;
        builder.emit(Instruction::Null);
        builder.emit(Instruction::Return);
        Ok(Chunk::Compiled(builder.finish()))
    }

    fn compile_implicit_constructor(&mut self, parent: u32) -> CompileResult<Chunk> {
        let mut builder = ChunkBuilder::new([])?;
        self.compile_base_constructor_call(&mut builder, parent, &[])?;
        builder.emit(Instruction::Null);
        builder.emit(Instruction::Return);
        Ok(Chunk::Compiled(builder.finish()))
    }

    fn compile_base_constructor_call(
        &mut self,
        builder: &mut ChunkBuilder,
        parent: u32,
        args: &[Expression],
    ) -> CompileResult<()> {
        builder.emit(Instruction::Load(0));
        for arg in args {
            self.compile_expr(builder, arg)?;
        }
        let member = self.member(MemberKey::Constructor);
        builder.emit(Instruction::Invoke {
            construct: parent,
            member,
        });
        builder.emit(Instruction::Pop);
        Ok(())
    }

    /// Offset of a field visible on `id` (own or inherited)
    pub(super) fn field_offset(&self, id: TypeId, name: &str) -> CompileResult<u16> {
        let (_, field) = self
            .analysis
            .classes
            .lookup_field(id, name)
            .ok_or_else(|| CompileError::internal(format!("field '{}' not found", name)))?;
        u16::try_from(field.offset).map_err(|_| CompileError::internal("field offset out of range"))
    }

    /// Offset of a field on the static type of an object expression
    pub(super) fn field_offset_of(&self, object: Ty, name: &str) -> CompileResult<u16> {
        self.field_offset(self.class_of(object), name)
    }
}
