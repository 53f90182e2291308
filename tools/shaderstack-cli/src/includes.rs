//! Includes command - list the files a shader pulls in

use anyhow::{Context, Result};
use clap::Args;
use shaderstack_core::stack_file::is_stack_file;
use shaderstack_core::{BlockReader, ReadWarning, StackedShader};
use std::path::{Path, PathBuf};

/// Arguments for the includes command
#[derive(Args)]
pub struct IncludesArgs {
    /// Source file (.surfshader) or stack file (.stackedshader)
    pub input: PathBuf,
}

/// Execute the includes command
pub fn execute(args: IncludesArgs) -> Result<()> {
    let (includes, warnings) = resolve(&args.input)?;

    for (i, path) in includes.iter().enumerate() {
        println!("{:3}  {}", i, path.display());
    }
    for warning in &warnings {
        println!("warning: {}", warning);
    }
    Ok(())
}

/// Every file that contributes to `input`, in merge order.
pub fn resolve(input: &Path) -> Result<(Vec<PathBuf>, Vec<ReadWarning>)> {
    let mut reader = BlockReader::new();
    let read = if is_stack_file(input) {
        let stack = StackedShader::load(input)?;
        reader.read_stack(&stack.resolve(input), input)
    } else {
        reader.read(input)
    };
    read.with_context(|| format!("Failed to read {}", input.display()))?;
    Ok(reader.into_parts())
}
