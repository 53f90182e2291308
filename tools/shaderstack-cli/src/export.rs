//! Export command - one shader per render pipeline

use anyhow::{Result, bail};
use clap::Args;
use shaderstack_core::{ERROR_SENTINEL, export_file_name};
use std::path::PathBuf;

use crate::build::write_file;
use crate::config::{Config, ConfigArgs};

/// Arguments for the export command
#[derive(Args)]
pub struct ExportArgs {
    /// Source file (.surfshader) or stack file (.stackedshader)
    pub input: PathBuf,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Extension of the written files
    #[arg(long, default_value = "shader")]
    pub ext: String,

    /// Override the shader name
    #[arg(long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Execute the export command
pub fn execute(args: ExportArgs) -> Result<()> {
    let config = Config::discover(args.config.config.as_deref())?;
    let overrides = config.overrides(args.name, None, None);
    let builder = config.builder(args.config.templates.as_deref())?;

    let dir = config.output_dir(args.output_dir).unwrap_or_else(|| {
        args.input
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default()
    });

    let mut failed = Vec::new();
    for (pipeline, shader) in builder.export_all(&args.input, overrides.as_ref()) {
        if shader == ERROR_SENTINEL {
            failed.push(pipeline.name());
            continue;
        }
        let path = dir.join(export_file_name(&args.input, pipeline, &args.ext));
        write_file(&path, &shader)?;
        println!("  {} -> {}", pipeline, path.display());
    }

    if !failed.is_empty() {
        bail!(
            "Failed to build {} for: {}",
            args.input.display(),
            failed.join(", ")
        );
    }
    Ok(())
}
