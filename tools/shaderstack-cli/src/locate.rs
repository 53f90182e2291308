//! Locate command - map a compiler message back to its source

use anyhow::{Context, Result};
use clap::Args;
use shaderstack_core::diagnostics::{self, Diagnostic};
use std::path::PathBuf;

use crate::includes;

/// Arguments for the locate command
#[derive(Args)]
pub struct LocateArgs {
    /// Source file (.surfshader) or stack file (.stackedshader) that was built
    pub input: PathBuf,

    /// The generated shader the compiler complained about
    #[arg(short, long)]
    pub generated: PathBuf,

    /// 1-based line reported by the compiler
    #[arg(short, long)]
    pub line: usize,

    /// Compiler message to include in the report
    #[arg(short, long, default_value = "shader error")]
    pub message: String,

    /// Treat the message as a warning instead of an error
    #[arg(long)]
    pub warning: bool,
}

/// Execute the locate command
pub fn execute(args: LocateArgs) -> Result<()> {
    let generated = std::fs::read_to_string(&args.generated)
        .with_context(|| format!("Failed to read {}", args.generated.display()))?;
    let (includes, _) = includes::resolve(&args.input)?;

    let diagnostic = if args.warning {
        Diagnostic::warning(args.message, args.line)
    } else {
        Diagnostic::error(args.message, args.line)
    };

    for report in diagnostics::relay(&args.input, &[diagnostic], &generated, &includes) {
        println!("{}", report);
    }
    Ok(())
}
