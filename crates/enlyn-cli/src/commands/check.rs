//! `enlyn check`: parse and type-check without compiling.

use super::read_source;
use crate::output;
use enlyn_engine::checker::create_files;
use enlyn_engine::checker::diagnostic::JsonDiagnostic;
use enlyn_engine::{check_program, parse_program, StandardLibrary};
use std::path::PathBuf;
use termcolor::ColorChoice;

pub fn execute(files: &[PathBuf], json: bool, color: ColorChoice) -> anyhow::Result<()> {
    let stdlib = StandardLibrary::new();
    let mut failed = 0usize;
    let mut reports = Vec::new();

    for path in files {
        let source = read_source(path)?;
        let result = parse_program(&source).and_then(|program| check_program(&program, &stdlib).map(|_| ()));

        let error = match result {
            Ok(()) => {
                if !json {
                    output::success(color, "ok", &path.display().to_string());
                }
                continue;
            }
            Err(error) => error,
        };
        failed += 1;

        if json {
            let (sources, file_id) = create_files(path, &source);
            reports.extend(
                error
                    .diagnostics(file_id)
                    .iter()
                    .map(|diagnostic| JsonDiagnostic::from_diagnostic(diagnostic, &sources)),
            );
        } else {
            // Keep going so every file gets reported
            eprintln!("{:#}", super::report(path, source, error, color));
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed to check", failed, files.len());
    }
    Ok(())
}
