//! `enlyn run`: check, compile and execute a source file.

use enlyn_engine::Vm;
use std::path::Path;
use termcolor::ColorChoice;

pub fn execute(file: &Path, color: ColorChoice) -> anyhow::Result<()> {
    let executable = super::compile_file(file, color)?;
    let mut vm = Vm::new(&executable);
    vm.run()?;
    Ok(())
}
