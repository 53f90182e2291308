//! New command - write a starter shader source

use anyhow::{Context, Result, bail};
use clap::Args;
use shaderstack_core::EmbeddedTemplates;
use shaderstack_core::stack_file::SOURCE_EXTENSION;
use std::path::PathBuf;

use crate::build::write_file;

/// Arguments for the new command
#[derive(Args)]
pub struct NewArgs {
    /// Path of the new file (.surfshader is added when missing)
    pub path: PathBuf,

    /// Start from the commented template that lists every block
    #[arg(long, conflicts_with = "tessellation")]
    pub documented: bool,

    /// Start from a tessellated surface
    #[arg(long)]
    pub tessellation: bool,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

/// Execute the new command
pub fn execute(args: NewArgs) -> Result<()> {
    let mut path = args.path;
    if path.extension().is_none_or(|e| e != SOURCE_EXTENSION) {
        path.as_mut_os_string().push(format!(".{SOURCE_EXTENSION}"));
    }
    if path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let starter = if args.documented {
        "New_Documented.txt"
    } else if args.tessellation {
        "New_Tessellation.txt"
    } else {
        "New_Slim.txt"
    };
    let text = EmbeddedTemplates::get(starter)
        .with_context(|| format!("Built-in template missing: {starter}"))?;

    write_file(&path, text)?;
    println!("Created {}", path.display());
    Ok(())
}
