//! Enlyn command-line tool
//!
//! Single command-line interface for the toolchain: run, check, build,
//! exec and disasm.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use output::ColorMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "enlyn")]
#[command(about = "Enlyn programming language toolchain", long_about = None)]
#[command(version)]
struct Cli {
    /// When to color diagnostics
    #[arg(long, value_enum, global = true, default_value_t = ColorMode::Auto)]
    color: ColorMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check, compile and run a source file
    Run {
        /// Input file
        file: PathBuf,
    },

    /// Type-check source files without running them
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile a source file to a JSON executable image
    Build {
        /// Input file
        file: PathBuf,
        /// Output path (defaults to the input with a `.json` extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a previously built executable image
    Exec {
        /// Image produced by `enlyn build`
        image: PathBuf,
    },

    /// Print the bytecode of a source file or image
    Disasm {
        /// Source file, or an image ending in `.json`
        file: PathBuf,
    },
}

/// Log filter comes from `ENLYN_LOG`; warnings only by default.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("ENLYN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let color = output::resolve_color_choice(cli.color);

    match cli.command {
        Commands::Run { file } => commands::run::execute(&file, color),
        Commands::Check { files, json } => commands::check::execute(&files, json, color),
        Commands::Build { file, output } => commands::build::execute(&file, output, color),
        Commands::Exec { image } => commands::exec::execute(&image),
        Commands::Disasm { file } => commands::disasm::execute(&file, color),
    }
}
