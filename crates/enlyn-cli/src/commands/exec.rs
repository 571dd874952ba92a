//! `enlyn exec`: run a previously built image.

use enlyn_engine::Vm;
use std::path::Path;

pub fn execute(image: &Path) -> anyhow::Result<()> {
    let executable = super::load_image(image)?;
    tracing::debug!(constructs = executable.constructs.len(), "loaded image");
    Vm::new(&executable).run()?;
    Ok(())
}
