//! `enlyn disasm`: print the bytecode of a source file or image.

use enlyn_engine::disassemble;
use std::path::Path;
use termcolor::ColorChoice;

pub fn execute(file: &Path, color: ColorChoice) -> anyhow::Result<()> {
    let executable = if file.extension().is_some_and(|ext| ext == "json") {
        super::load_image(file)?
    } else {
        super::compile_file(file, color)?
    };
    print!("{}", disassemble(&executable));
    Ok(())
}
