//! Code generation
//!
//! Lowers a checked program into an executable image in a single linear
//! pass per chunk. Construct indices, field offsets and call arities all
//! come from the frozen class table of the analysis.

mod class;
mod context;
mod expr;
mod stmt;

pub use context::ChunkBuilder;

use crate::builtins::{class_id, MemberKey, StandardLibrary, BUILTIN_CLASS_COUNT, ENTRY_CLASS};
use crate::checker::{Analysis, Ty, TypeId};
use crate::compiler::bytecode::{
    Chunk, CompiledChunk, ConstantPool, Construct, Executable, Instruction, MemberId,
};
use crate::compiler::error::{CompileError, CompileResult};
use crate::parser::ast::{Expression, Program};
use rustc_hash::FxHashMap;

/// Compile a checked program into an executable image.
pub fn compile(program: &Program, analysis: &Analysis, stdlib: &StandardLibrary) -> CompileResult<Executable> {
    CodeGenerator::new(analysis, stdlib).generate(program)
}

/// Code generator that transforms a checked AST into bytecode
pub struct CodeGenerator<'a> {
    analysis: &'a Analysis,
    stdlib: &'a StandardLibrary,
    /// Construct index of every class that has one
    construct_indices: FxHashMap<TypeId, u32>,
    members: Vec<MemberKey>,
    member_ids: FxHashMap<MemberKey, MemberId>,
    constants: ConstantPool,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(analysis: &'a Analysis, stdlib: &'a StandardLibrary) -> Self {
        Self {
            analysis,
            stdlib,
            construct_indices: FxHashMap::default(),
            members: Vec::new(),
            member_ids: FxHashMap::default(),
            constants: ConstantPool::new(),
        }
    }

    pub fn generate(mut self, program: &Program) -> CompileResult<Executable> {
        let classes = &self.analysis.classes;

        // Built-ins keep their fixed indices; user classes follow in program order
        for class in self.stdlib.classes() {
            self.construct_indices.insert(TypeId(class.id as u32), class.id as u32);
        }
        let mut declared = Vec::with_capacity(program.classes.len());
        for (position, decl) in program.classes.iter().enumerate() {
            let record = classes
                .get_by_name(&decl.name.name)
                .ok_or_else(|| CompileError::internal(format!("class '{}' was not checked", decl.name.name)))?;
            let index = (BUILTIN_CLASS_COUNT + position) as u32;
            self.construct_indices.insert(record.id, index);
            declared.push((record.id, decl));
        }

        let main = self.entry_point()?;

        let mut constructs = Vec::with_capacity(BUILTIN_CLASS_COUNT + declared.len());
        for class in self.stdlib.classes() {
            constructs.push(self.builtin_construct(class.id));
        }
        for (id, decl) in declared {
            let construct = self.compile_class(id, decl)?;
            tracing::debug!(
                construct = %construct.name,
                index = constructs.len(),
                fields = construct.field_count,
                chunks = construct.chunks.len(),
                "laid out construct"
            );
            constructs.push(construct);
        }

        let entry = self.entry_chunk(main);
        let image = Executable::new(constructs, main, self.constants, self.members, entry);
        Ok(image)
    }

    /// The entry class must exist and be constructible without arguments.
    fn entry_point(&self) -> CompileResult<u32> {
        let classes = &self.analysis.classes;
        let record = classes
            .get_by_name(ENTRY_CLASS)
            .filter(|record| !record.builtin)
            .ok_or(CompileError::MissingEntryPoint)?;

        if let Some(ctor) = classes.constructor(record.id) {
            if !ctor.params.is_empty() {
                return Err(CompileError::EntryPointArguments {
                    count: ctor.params.len(),
                    span: ctor.span,
                });
            }
        }
        self.construct_index(record.id)
    }

    /// `New(main); Invoke(main, new); Return`
    fn entry_chunk(&mut self, main: u32) -> CompiledChunk {
        let constructor = self.member(MemberKey::Constructor);
        CompiledChunk {
            code: vec![
                Instruction::New(main),
                Instruction::Invoke {
                    construct: main,
                    member: constructor,
                },
                Instruction::Return,
            ],
            arguments: 0,
            locals: 0,
        }
    }

    fn builtin_construct(&mut self, id: usize) -> Construct {
        let Some(class) = self.stdlib.class(id) else {
            return Construct::new("?", None, 0);
        };
        let parent = class.parent.map(|p| p as u32);
        let mut construct = Construct::new(class.name, parent, class.fields.len());
        for method in &class.methods {
            let member = self.member(method.key.clone());
            construct.chunks.insert(member, Chunk::native(method.native));
        }
        construct
    }

    // ========================================================================
    // Shared lookups
    // ========================================================================

    /// Intern a member key
    pub(super) fn member(&mut self, key: MemberKey) -> MemberId {
        if let Some(id) = self.member_ids.get(&key) {
            return *id;
        }
        let id = MemberId(self.members.len() as u32);
        self.members.push(key.clone());
        self.member_ids.insert(key, id);
        id
    }

    pub(super) fn construct_index(&self, id: TypeId) -> CompileResult<u32> {
        self.construct_indices
            .get(&id)
            .copied()
            .ok_or_else(|| CompileError::internal(format!("type '{}' has no construct", self.analysis.classes.name(id))))
    }

    /// Static type the checker recorded for an expression.
    pub(super) fn type_of(&self, expr: &Expression) -> CompileResult<Ty> {
        self.analysis
            .type_of(expr)
            .ok_or_else(|| CompileError::internal(format!("expression at {} has no type", expr.span())))
    }

    /// Class behind a static type; `null` is typed as `any`.
    pub(super) fn class_of(&self, ty: Ty) -> TypeId {
        ty.class().unwrap_or(TypeId(class_id::ANY as u32))
    }
}
