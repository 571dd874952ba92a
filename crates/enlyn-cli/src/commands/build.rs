//! `enlyn build`: compile a source file to a JSON image.

use crate::output;
use anyhow::Context;
use std::path::{Path, PathBuf};
use termcolor::ColorChoice;

pub fn execute(file: &Path, output: Option<PathBuf>, color: ColorChoice) -> anyhow::Result<()> {
    let executable = super::compile_file(file, color)?;
    let out = output.unwrap_or_else(|| file.with_extension("json"));

    let json = executable.to_json()?;
    std::fs::write(&out, json).with_context(|| format!("could not write `{}`", out.display()))?;

    output::success(color, "Built", &format!("{} -> {}", file.display(), out.display()));
    Ok(())
}
