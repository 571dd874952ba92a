//! Per-chunk emission state
//!
//! Tracks the instruction buffer, local slot allocation and jump patching
//! for the chunk currently being generated.

use crate::compiler::bytecode::{CompiledChunk, Instruction};
use crate::compiler::error::{CompileError, CompileResult};
use rustc_hash::FxHashMap;

/// Local variables declared in one block
struct Scope {
    names: FxHashMap<String, u16>,
    /// First slot owned by this scope; released on exit
    first_slot: u16,
}

/// Builder for a single compiled chunk.
///
/// Slot 0 holds the receiver, parameters follow. Sibling blocks reuse
/// each other's slots, so the local count is the deepest nesting reached.
pub struct ChunkBuilder {
    code: Vec<Instruction>,
    arguments: usize,
    scopes: Vec<Scope>,
    next_slot: u16,
    max_slots: u16,
}

impl ChunkBuilder {
    /// Start a chunk whose receiver is followed by `params`.
    pub fn new<'n>(params: impl IntoIterator<Item = &'n str>) -> CompileResult<Self> {
        let mut builder = Self {
            code: Vec::new(),
            arguments: 1,
            scopes: vec![Scope {
                names: FxHashMap::default(),
                first_slot: 0,
            }],
            next_slot: 1,
            max_slots: 1,
        };
        for param in params {
            builder.declare(param)?;
            builder.arguments += 1;
        }
        Ok(builder)
    }

    /// Emit an instruction and return its index
    pub fn emit(&mut self, instruction: Instruction) -> usize {
        self.code.push(instruction);
        self.code.len() - 1
    }

    /// Index the next instruction will get
    pub fn position(&self) -> u32 {
        self.code.len() as u32
    }

    /// Point the jump at `index` to `target`.
    pub fn patch_jump(&mut self, index: usize, target: u32) -> CompileResult<()> {
        match self.code.get_mut(index) {
            Some(Instruction::Jump(slot)) | Some(Instruction::JumpIfFalse(slot)) => {
                *slot = target;
                Ok(())
            }
            _ => Err(CompileError::internal(format!("no jump at instruction {}", index))),
        }
    }

    /// Point the jump at `index` to the next instruction.
    pub fn patch_here(&mut self, index: usize) -> CompileResult<()> {
        let target = self.position();
        self.patch_jump(index, target)
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope {
            names: FxHashMap::default(),
            first_slot: self.next_slot,
        });
    }

    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            if let Some(scope) = self.scopes.pop() {
                self.next_slot = scope.first_slot;
            }
        }
    }

    /// Allocate a slot for `name` in the innermost scope.
    pub fn declare(&mut self, name: &str) -> CompileResult<u16> {
        let slot = self.next_slot;
        self.next_slot = slot
            .checked_add(1)
            .ok_or_else(|| CompileError::internal("too many local variables"))?;
        self.max_slots = self.max_slots.max(self.next_slot);
        if let Some(scope) = self.scopes.last_mut() {
            scope.names.insert(name.to_string(), slot);
        }
        Ok(slot)
    }

    /// Slot of `name`, searching from the innermost scope outwards.
    pub fn lookup(&self, name: &str) -> CompileResult<u16> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.names.get(name).copied())
            .ok_or_else(|| CompileError::internal(format!("unresolved local '{}'", name)))
    }

    pub fn finish(self) -> CompiledChunk {
        CompiledChunk {
            code: self.code,
            arguments: self.arguments,
            locals: self.max_slots as usize,
        }
    }
}
