//! Subcommand implementations, one module per command.

pub mod build;
pub mod check;
pub mod disasm;
pub mod exec;
pub mod run;

use crate::output;
use anyhow::Context;
use enlyn_engine::checker::create_files;
use enlyn_engine::{compile_source, EngineError, Executable};
use std::path::Path;
use termcolor::ColorChoice;

pub(crate) fn read_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("could not read `{}`", path.display()))
}

/// Compile a source file, rendering diagnostics on failure.
pub(crate) fn compile_file(path: &Path, color: ColorChoice) -> anyhow::Result<Executable> {
    let source = read_source(path)?;
    compile_source(&source).map_err(|error| report(path, source, error, color))
}

/// Print the diagnostics of a failed stage and turn it into the command's error.
pub(crate) fn report(path: &Path, source: String, error: EngineError, color: ColorChoice) -> anyhow::Error {
    let (files, file_id) = create_files(path, &source);
    let diagnostics = error.diagnostics(file_id);
    if diagnostics.is_empty() {
        return error.into();
    }
    if let Err(emit_error) = output::emit_diagnostics(&diagnostics, &files, color) {
        return emit_error.context(error.to_string());
    }
    anyhow::anyhow!(
        "could not compile `{}` due to {} previous error{}",
        path.display(),
        diagnostics.len(),
        if diagnostics.len() == 1 { "" } else { "s" }
    )
}

/// Load an image written by `enlyn build`.
pub(crate) fn load_image(path: &Path) -> anyhow::Result<Executable> {
    let json = std::fs::read_to_string(path).with_context(|| format!("could not read `{}`", path.display()))?;
    Executable::from_json(&json).with_context(|| format!("`{}` is not a valid Enlyn image", path.display()))
}
