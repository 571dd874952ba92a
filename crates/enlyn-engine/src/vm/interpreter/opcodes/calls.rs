//! Call opcode handlers: Invoke, Virtual, VirtualOrAny
//!
//! All forms pop the receiver and arguments as one block whose size is the
//! target chunk's argument count. `Invoke` runs the chunk found from the
//! static construct; `Virtual` only uses the static construct for the
//! arity and re-resolves from the receiver's runtime construct.
//! `VirtualOrAny` resolves a null receiver from `any`.

use crate::builtins::class_id;
use crate::compiler::bytecode::{Chunk, Instruction, MemberId};
use crate::vm::frame::Frame;
use crate::vm::interpreter::OpcodeResult;
use crate::vm::natives::{call_native, NativeContext};
use crate::vm::value::Value;
use crate::vm::{Vm, VmError, VmResult};
use tracing::debug;

impl<'a> Vm<'a> {
    pub(in crate::vm::interpreter) fn exec_call_ops(&mut self, instruction: Instruction) -> VmResult<OpcodeResult> {
        match instruction {
            Instruction::Invoke { construct, member } => {
                let (owner, chunk) = self.resolve(construct, member)?;
                let args = self.frame()?.pop_n(chunk.arguments())?;
                self.call(owner, member, chunk, args)?;
            }

            Instruction::Virtual { construct, member } => self.dispatch_virtual(construct, member, None)?,

            Instruction::VirtualOrAny { construct, member } => {
                self.dispatch_virtual(construct, member, Some(class_id::ANY as u32))?
            }

            other => {
                return Err(VmError::InvalidBytecode(format!("{} is not a call instruction", other.name())));
            }
        }
        Ok(OpcodeResult::Continue)
    }

    /// Call `member` on the receiver's runtime construct. A null receiver
    /// resolves from `on_null` when given and faults otherwise.
    fn dispatch_virtual(&mut self, construct: u32, member: MemberId, on_null: Option<u32>) -> VmResult<()> {
        let (_, declared) = self.resolve(construct, member)?;
        let arity = declared.arguments();
        let runtime = self.frame()?.peek_at(arity.saturating_sub(1))?.construct();
        let runtime = runtime.or(on_null).ok_or_else(|| VmError::NullReceiver {
            member: self.member_name(member),
        })?;

        let (owner, chunk) = self.resolve(runtime, member)?;
        if chunk.arguments() != arity {
            return Err(VmError::InvalidBytecode(format!(
                "'{}' takes {} arguments on '{}' but {} on '{}'",
                self.member_name(member),
                chunk.arguments(),
                self.construct_name(owner),
                arity,
                self.construct_name(construct)
            )));
        }
        let args = self.frame()?.pop_n(arity)?;
        self.call(owner, member, chunk, args)
    }

    /// Run `chunk` with `args` (receiver first).
    ///
    /// Natives complete immediately and push onto the caller's stack;
    /// compiled chunks get a new frame whose `Return` does the push.
    pub(in crate::vm::interpreter) fn call(
        &mut self,
        owner: u32,
        member: MemberId,
        chunk: &'a Chunk,
        args: Vec<Value>,
    ) -> VmResult<()> {
        match chunk {
            Chunk::Native { id, .. } => {
                let mut ctx = NativeContext {
                    executable: self.executable,
                    io: &mut self.io,
                };
                let result = call_native(*id, &args, &mut ctx)?;
                self.frame()?.push(result);
            }
            Chunk::Compiled(compiled) => {
                debug!(
                    construct = %self.construct_name(owner),
                    member = %self.member_name(member),
                    depth = self.frames.len() + 1,
                    "push frame"
                );
                self.frames.push(Frame::new(compiled, args));
            }
        }
        Ok(())
    }

    /// Chunk for `member` on `construct` or its nearest ancestor defining it
    pub(in crate::vm::interpreter) fn resolve(&self, construct: u32, member: MemberId) -> VmResult<(u32, &'a Chunk)> {
        let executable = self.executable;
        executable
            .resolve(construct, member)
            .ok_or_else(|| VmError::MissingChunk {
                construct: self.construct_name(construct),
                member: self.member_name(member),
            })
    }

    pub(in crate::vm) fn construct_name(&self, index: u32) -> String {
        self.executable
            .construct(index)
            .map_or_else(|| format!("@{}", index), |construct| construct.name.clone())
    }

    pub(in crate::vm) fn member_name(&self, member: MemberId) -> String {
        self.executable
            .member(member)
            .map_or_else(|| format!("${}", member.0), |key| key.to_string())
    }
}
