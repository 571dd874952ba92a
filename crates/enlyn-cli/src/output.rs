//! Shared colored output utilities for CLI commands.
//!
//! Uses `termcolor` for cross-platform colored terminal output.
//! Respects `NO_COLOR` environment variable and `--color` flag.

use clap::ValueEnum;
use codespan_reporting::files::SimpleFiles;
use enlyn_engine::Diagnostic;
use std::io::{IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Value of the `--color` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

/// Resolve `ColorChoice` from CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > whether stderr is a terminal.
pub fn resolve_color_choice(mode: ColorMode) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match mode {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto if std::io::stderr().is_terminal() => ColorChoice::Auto,
        ColorMode::Auto => ColorChoice::Never,
    }
}

/// Render diagnostics with source context to stderr.
pub fn emit_diagnostics(
    diagnostics: &[Diagnostic],
    files: &SimpleFiles<String, String>,
    choice: ColorChoice,
) -> anyhow::Result<()> {
    let stderr = StandardStream::stderr(choice);
    let mut lock = stderr.lock();
    for diagnostic in diagnostics {
        diagnostic.emit(&mut lock, files)?;
    }
    Ok(())
}

/// Green bold status line on stdout, e.g. `ok file.enl`.
pub fn success(choice: ColorChoice, label: &str, text: &str) {
    let mut stdout = StandardStream::stdout(choice);
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::Green)).set_bold(true);
    let _ = stdout.set_color(&spec);
    let _ = write!(stdout, "{}", label);
    let _ = stdout.reset();
    let _ = writeln!(stdout, " {}", text);
}
