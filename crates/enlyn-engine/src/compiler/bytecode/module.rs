//! Executable image format
//!
//! An image is the linked output of compilation: the construct table
//! (built-ins first, user classes appended), the entry construct, the
//! constant pool and the member names referenced by call instructions.
//! Images serialize to JSON for `enlyn build` / `enlyn exec`.

use super::constants::ConstantPool;
use super::opcode::Instruction;
use crate::builtins::{MemberKey, NativeId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format tag of serialized images
pub const MAGIC: &str = "ENLYN";

/// Current image version
pub const VERSION: u32 = 1;

/// Image loading and validation errors
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Malformed image: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid magic: expected {MAGIC}, got {0:?}")]
    InvalidMagic(String),

    #[error("Unsupported version: {0} (current: {VERSION})")]
    UnsupportedVersion(u32),

    #[error("Invalid image: {0}")]
    Invalid(String),
}

/// Index into [`Executable::members`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub u32);

/// A compiled method, constructor or field initializer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledChunk {
    pub code: Vec<Instruction>,
    /// Argument count including the receiver in slot 0
    pub arguments: usize,
    /// Local slot count including the arguments
    pub locals: usize,
}

/// Executable body of a member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Chunk {
    Native { id: NativeId, arguments: usize },
    Compiled(CompiledChunk),
}

impl Chunk {
    pub fn native(id: NativeId) -> Self {
        Chunk::Native {
            id,
            arguments: id.arity(),
        }
    }

    /// Argument count including the receiver
    pub fn arguments(&self) -> usize {
        match self {
            Chunk::Native { arguments, .. } => *arguments,
            Chunk::Compiled(chunk) => chunk.arguments,
        }
    }
}

/// Runtime class descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Construct {
    pub name: String,
    pub parent: Option<u32>,
    /// Total field count including inherited fields
    pub field_count: usize,
    pub chunks: FxHashMap<MemberId, Chunk>,
}

impl Construct {
    pub fn new(name: impl Into<String>, parent: Option<u32>, field_count: usize) -> Self {
        Self {
            name: name.into(),
            parent,
            field_count,
            chunks: FxHashMap::default(),
        }
    }
}

/// Linked program image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Executable {
    pub magic: String,
    pub version: u32,
    pub constructs: Vec<Construct>,
    /// Construct index of the entry class
    pub main: u32,
    pub constants: ConstantPool,
    pub members: Vec<MemberKey>,
    /// Bootstrap chunk: constructs the entry class and halts
    pub entry: CompiledChunk,
}

impl Executable {
    pub fn new(constructs: Vec<Construct>, main: u32, constants: ConstantPool, members: Vec<MemberKey>, entry: CompiledChunk) -> Self {
        Self {
            magic: MAGIC.to_string(),
            version: VERSION,
            constructs,
            main,
            constants,
            members,
            entry,
        }
    }

    pub fn construct(&self, index: u32) -> Option<&Construct> {
        self.constructs.get(index as usize)
    }

    pub fn member(&self, id: MemberId) -> Option<&MemberKey> {
        self.members.get(id.0 as usize)
    }

    pub fn member_id(&self, key: &MemberKey) -> Option<MemberId> {
        self.members
            .iter()
            .position(|member| member == key)
            .map(|index| MemberId(index as u32))
    }

    /// The construct and its ancestors, nearest first.
    ///
    /// Bounded by the table size so a malformed parent link cannot hang.
    pub fn ancestors(&self, index: u32) -> impl Iterator<Item = u32> + '_ {
        std::iter::successors(Some(index), move |current| self.construct(*current).and_then(|c| c.parent))
            .take(self.constructs.len())
    }

    /// Find the chunk for `member`, walking up from `construct`.
    pub fn resolve(&self, construct: u32, member: MemberId) -> Option<(u32, &Chunk)> {
        self.ancestors(construct).find_map(|index| {
            self.construct(index)
                .and_then(|c| c.chunks.get(&member))
                .map(|chunk| (index, chunk))
        })
    }

    /// Whether `index` is `ancestor` or inherits from it
    pub fn is_instance(&self, index: u32, ancestor: u32) -> bool {
        self.ancestors(index).any(|current| current == ancestor)
    }

    pub fn to_json(&self) -> Result<String, ImageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate an image.
    pub fn from_json(json: &str) -> Result<Self, ImageError> {
        let image: Executable = serde_json::from_str(json)?;
        image.validate()?;
        Ok(image)
    }

    /// Check the header and that every index the image uses is in range.
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.magic != MAGIC {
            return Err(ImageError::InvalidMagic(self.magic.clone()));
        }
        if self.version != VERSION {
            return Err(ImageError::UnsupportedVersion(self.version));
        }
        if self.construct(self.main).is_none() {
            return Err(ImageError::Invalid(format!("entry construct {} out of range", self.main)));
        }

        for (index, construct) in self.constructs.iter().enumerate() {
            if let Some(parent) = construct.parent {
                if parent as usize == index || self.construct(parent).is_none() {
                    return Err(ImageError::Invalid(format!(
                        "construct '{}' has invalid parent {}",
                        construct.name, parent
                    )));
                }
            }
            for (member, chunk) in &construct.chunks {
                if self.member(*member).is_none() {
                    return Err(ImageError::Invalid(format!("member {} out of range", member.0)));
                }
                if let Chunk::Compiled(compiled) = chunk {
                    self.validate_chunk(compiled)?;
                }
            }
        }
        self.validate_chunk(&self.entry)
    }

    fn validate_chunk(&self, chunk: &CompiledChunk) -> Result<(), ImageError> {
        if chunk.locals < chunk.arguments {
            return Err(ImageError::Invalid("chunk has fewer locals than arguments".to_string()));
        }
        for instruction in &chunk.code {
            if let Some(target) = instruction.jump_target() {
                if target as usize > chunk.code.len() {
                    return Err(ImageError::Invalid(format!("jump target {} out of range", target)));
                }
            }
            if let Some(construct) = instruction.construct() {
                if self.construct(construct).is_none() {
                    return Err(ImageError::Invalid(format!("construct {} out of range", construct)));
                }
            }
            match instruction {
                Instruction::Const(index) if self.constants.get(*index).is_none() => {
                    return Err(ImageError::Invalid(format!("constant {} out of range", index)));
                }
                Instruction::Load(slot) | Instruction::Store(slot) if *slot as usize >= chunk.locals => {
                    return Err(ImageError::Invalid(format!("local slot {} out of range", slot)));
                }
                Instruction::Invoke { member, .. }
                | Instruction::Virtual { member, .. }
                | Instruction::VirtualOrAny { member, .. }
                    if self.member(*member).is_none() =>
                {
                    return Err(ImageError::Invalid(format!("member {} out of range", member.0)));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
