//! Enlyn virtual machine
//!
//! Executes an [`Executable`] on an explicit stack of frames:
//! - `New` allocates an instance and drains its field-initializer chunk
//! - `Invoke` calls a chunk resolved from a construct known at compile time
//! - `Virtual` resolves the chunk from the receiver's runtime construct
//! - Natives run on the host and push their result directly
//!
//! Faults are fatal: they mean the checker or compiler let something through.

pub mod frame;
pub mod interpreter;
pub mod natives;
pub mod object;
pub mod value;

pub use frame::Frame;
pub use natives::{HostIo, NativeContext};
pub use object::Object;
pub use value::Value;

use crate::builtins::MemberKey;
use crate::compiler::bytecode::{Constant, MemberId};
use crate::compiler::Executable;
use std::io::{BufRead, Write};
use thiserror::Error;

/// Fatal runtime faults
#[derive(Debug, Error)]
pub enum VmError {
    #[error("Stack underflow")]
    StackUnderflow,

    #[error("Null receiver for '{member}'")]
    NullReceiver { member: String },

    #[error("Assertion failed: value is null")]
    NullAssertion,

    #[error("Invalid cast: {value} is not {target}")]
    InvalidCast { value: String, target: String },

    #[error("No chunk for '{member}' on '{construct}'")]
    MissingChunk { construct: String, member: String },

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Invalid bytecode: {0}")]
    InvalidBytecode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type VmResult<T> = Result<T, VmError>;

/// Virtual machine over one executable image
pub struct Vm<'a> {
    executable: &'a Executable,
    /// Constant pool materialized as values
    constants: Vec<Value>,
    /// Member id of the field-initializer chunk, if any construct has one
    initializer: Option<MemberId>,
    frames: Vec<Frame<'a>>,
    io: HostIo<'a>,
}

impl<'a> Vm<'a> {
    /// VM wired to the process stdin and stdout
    pub fn new(executable: &'a Executable) -> Self {
        Self::with_host(executable, HostIo::stdio())
    }

    /// VM reading `IO.in` from `input` and writing `IO.out` to `output`
    pub fn with_io(executable: &'a Executable, input: impl BufRead + 'a, output: impl Write + 'a) -> Self {
        Self::with_host(executable, HostIo::new(input, output))
    }

    fn with_host(executable: &'a Executable, io: HostIo<'a>) -> Self {
        let constants = executable
            .constants
            .iter()
            .map(|constant| match constant {
                Constant::Number(n) => Value::Number(*n),
                Constant::String(s) => Value::string(s.as_str()),
            })
            .collect();
        Self {
            executable,
            constants,
            initializer: executable.member_id(&MemberKey::Initializer),
            frames: Vec::new(),
            io,
        }
    }

    pub fn executable(&self) -> &'a Executable {
        self.executable
    }

    /// Run the entry chunk to completion.
    ///
    /// Returns the value of the outermost `Return`.
    pub fn run(&mut self) -> VmResult<Value> {
        let _span = tracing::info_span!("execute", main = self.executable.main).entered();
        let executable = self.executable;
        self.frames.clear();
        self.frames.push(Frame::new(&executable.entry, Vec::new()));
        let result = self.execute();
        self.frames.clear();
        self.io.flush()?;
        result
    }
}
