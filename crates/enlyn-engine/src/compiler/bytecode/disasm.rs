//! Human-readable listing of an executable image

use super::constants::Constant;
use super::module::{Chunk, CompiledChunk, Executable};
use super::opcode::Instruction;
use std::fmt::Write;

/// Render every construct and chunk of the image with instruction indices.
///
/// Built-in constructs are listed by name only unless they carry
/// compiled chunks.
pub fn disassemble(image: &Executable) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== {} image v{} ===", image.magic, image.version);
    let _ = writeln!(out, "entry: @{} {}", image.main, construct_name(image, image.main));
    write_constants(&mut out, image);
    write_chunk(&mut out, image, "<entry>", &image.entry);

    for (index, construct) in image.constructs.iter().enumerate() {
        let _ = writeln!(out);
        let parent = construct
            .parent
            .map(|p| format!(" : {}", construct_name(image, p)))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "construct @{} {}{} ({} fields)",
            index, construct.name, parent, construct.field_count
        );

        let mut chunks: Vec<_> = construct.chunks.iter().collect();
        chunks.sort_by_key(|(member, _)| **member);
        for (member, chunk) in chunks {
            let label = image
                .member(*member)
                .map(|key| format!("{}.{}", construct.name, key))
                .unwrap_or_else(|| format!("{}.${}", construct.name, member.0));
            match chunk {
                Chunk::Native { id, arguments } => {
                    let _ = writeln!(out, "  {} = native {:?}/{}", label, id, arguments);
                }
                Chunk::Compiled(compiled) => write_chunk(&mut out, image, &label, compiled),
            }
        }
    }
    out
}

fn write_constants(out: &mut String, image: &Executable) {
    if image.constants.is_empty() {
        return;
    }
    let _ = writeln!(out, "constants:");
    for (index, constant) in image.constants.iter().enumerate() {
        let _ = writeln!(out, "  #{} {}", index, describe_constant(constant));
    }
}

fn write_chunk(out: &mut String, image: &Executable, label: &str, chunk: &CompiledChunk) {
    let _ = writeln!(
        out,
        "  {} (args {}, locals {}, {} instructions)",
        label,
        chunk.arguments,
        chunk.locals,
        chunk.code.len()
    );

    let targets: Vec<u32> = chunk.code.iter().filter_map(Instruction::jump_target).collect();
    for (ip, instruction) in chunk.code.iter().enumerate() {
        let marker = if targets.contains(&(ip as u32)) { "►" } else { " " };
        let _ = write!(out, "    {:04} {} {}", ip, marker, instruction);
        if let Some(comment) = annotate(image, instruction) {
            let _ = write!(out, "  ; {}", comment);
        }
        let _ = writeln!(out);
    }
}

fn annotate(image: &Executable, instruction: &Instruction) -> Option<String> {
    match instruction {
        Instruction::Const(index) => image.constants.get(*index).map(describe_constant),
        Instruction::Invoke { construct, member }
        | Instruction::Virtual { construct, member }
        | Instruction::VirtualOrAny { construct, member } => {
            let key = image.member(*member)?;
            Some(format!("{}.{}", construct_name(image, *construct), key))
        }
        Instruction::New(construct)
        | Instruction::Is { construct, .. }
        | Instruction::Cast { construct, .. } => Some(construct_name(image, *construct).to_string()),
        _ => None,
    }
}

fn construct_name(image: &Executable, index: u32) -> &str {
    image.construct(index).map_or("?", |c| c.name.as_str())
}

fn describe_constant(constant: &Constant) -> String {
    match constant {
        Constant::Number(value) => value.to_string(),
        Constant::String(value) => format!("{:?}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::{MemberKey, NativeId};
    use crate::compiler::bytecode::{ConstantPool, Construct, MemberId};

    #[test]
    fn test_listing_marks_jump_targets() {
        let mut constants = ConstantPool::new();
        constants.add_string("hi");
        let mut any = Construct::new("any", None, 0);
        any.chunks.insert(MemberId(0), Chunk::native(NativeId::AnyNew));
        let entry = CompiledChunk {
            code: vec![
                Instruction::True,
                Instruction::JumpIfFalse(3),
                Instruction::Const(0),
                Instruction::Return,
            ],
            arguments: 0,
            locals: 0,
        };
        let image = Executable::new(vec![any], 0, constants, vec![MemberKey::Constructor], entry);

        let text = disassemble(&image);
        assert!(text.contains("0003 ► RETURN"));
        assert!(text.contains("CONST #0  ; \"hi\""));
        assert!(text.contains("any.new = native AnyNew/1"));
    }
}
