//! Host-provided primitives behind native chunks
//!
//! Every native receives its arguments receiver-first, exactly as a compiled
//! chunk would see them in its leading local slots.

use super::value::Value;
use super::{VmError, VmResult};
use crate::builtins::NativeId;
use crate::compiler::Executable;
use std::io::{BufRead, Write};

/// Process I/O seen by `IO.in` and `IO.out`
pub struct HostIo<'a> {
    input: Box<dyn BufRead + 'a>,
    output: Box<dyn Write + 'a>,
}

impl<'a> HostIo<'a> {
    pub fn new(input: impl BufRead + 'a, output: impl Write + 'a) -> Self {
        Self {
            input: Box::new(input),
            output: Box::new(output),
        }
    }

    /// Process stdin and stdout
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }

    pub fn write_line(&mut self, text: &str) -> VmResult<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// One line without its terminator; empty at end of input.
    pub fn read_line(&mut self) -> VmResult<String> {
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    pub fn flush(&mut self) -> VmResult<()> {
        self.output.flush()?;
        Ok(())
    }
}

/// What a native may touch while it runs
pub struct NativeContext<'c, 'io> {
    pub executable: &'c Executable,
    pub io: &'c mut HostIo<'io>,
}

/// Run a native chunk.
pub fn call_native(id: NativeId, args: &[Value], ctx: &mut NativeContext<'_, '_>) -> VmResult<Value> {
    if args.len() != id.arity() {
        return Err(VmError::InvalidBytecode(format!(
            "native {:?} expects {} arguments, got {}",
            id,
            id.arity(),
            args.len()
        )));
    }

    let result = match id {
        // Constructors return null; the initializer hands back its receiver
        NativeId::AnyNew => Value::Null,
        NativeId::AnyInit => args[0].clone(),
        NativeId::AnyEqual => Value::Boolean(args[0].equals(&args[1])),
        NativeId::AnyNotEqual => Value::Boolean(!args[0].equals(&args[1])),

        NativeId::NumberAdd => Value::Number(number(&args[0])? + number(&args[1])?),
        NativeId::NumberSubtract => Value::Number(number(&args[0])? - number(&args[1])?),
        NativeId::NumberMultiply => Value::Number(number(&args[0])? * number(&args[1])?),
        NativeId::NumberDivide => Value::Number(number(&args[0])? / number(&args[1])?),
        NativeId::NumberModulo => Value::Number(number(&args[0])? % number(&args[1])?),
        NativeId::NumberLess => Value::Boolean(number(&args[0])? < number(&args[1])?),
        NativeId::NumberGreater => Value::Boolean(number(&args[0])? > number(&args[1])?),
        NativeId::NumberLessEqual => Value::Boolean(number(&args[0])? <= number(&args[1])?),
        NativeId::NumberGreaterEqual => Value::Boolean(number(&args[0])? >= number(&args[1])?),
        NativeId::NumberNegate => Value::Number(-number(&args[0])?),

        NativeId::StringConcat => {
            let left = args[0]
                .as_str()
                .ok_or_else(|| VmError::TypeError(format!("expected string, found {}", args[0].kind())))?;
            let mut text = String::from(left);
            text.push_str(&args[1].display(ctx.executable));
            Value::string(text)
        }

        NativeId::BooleanAnd => Value::Boolean(boolean(&args[0])? && boolean(&args[1])?),
        NativeId::BooleanOr => Value::Boolean(boolean(&args[0])? || boolean(&args[1])?),
        NativeId::BooleanNot => Value::Boolean(!boolean(&args[0])?),

        NativeId::IoOut => {
            let text = args[1].display(ctx.executable);
            ctx.io.write_line(&text)?;
            Value::Null
        }
        NativeId::IoIn => Value::string(ctx.io.read_line()?),
    };
    Ok(result)
}

fn number(value: &Value) -> VmResult<f64> {
    value
        .as_number()
        .ok_or_else(|| VmError::TypeError(format!("expected number, found {}", value.kind())))
}

fn boolean(value: &Value) -> VmResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| VmError::TypeError(format!("expected boolean, found {}", value.kind())))
}
