//! Build command - assemble one shader for one render pipeline

use anyhow::{Context, Result};
use clap::Args;
use shaderstack_core::{RenderPipeline, SubMaterialList};
use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigArgs};

/// Arguments for the build command
#[derive(Args)]
pub struct BuildArgs {
    /// Source file (.surfshader) or stack file (.stackedshader)
    pub input: PathBuf,

    /// Render pipeline (Standard, URP2019, URP2020, HDRP2019, HDRP2020)
    #[arg(short, long)]
    pub pipeline: Option<RenderPipeline>,

    /// Output file (defaults to stdout, or <output_dir>/<name>_<pipeline>.shader)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for the output when --output is not given
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Override the shader name
    #[arg(long)]
    pub name: Option<String>,

    /// Override the custom editor
    #[arg(long)]
    pub custom_editor: Option<String>,

    /// Override the fallback shader
    #[arg(long)]
    pub fallback: Option<String>,

    /// Also write the sub-material list as JSON next to the output
    #[arg(long)]
    pub materials: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Execute the build command
pub fn execute(args: BuildArgs) -> Result<()> {
    let config = Config::discover(args.config.config.as_deref())?;
    let pipeline = config.pipeline(args.pipeline)?;
    let overrides = config.overrides(args.name, args.custom_editor, args.fallback);
    let builder = config.builder(args.config.templates.as_deref())?;

    let output = builder
        .build_path(&args.input, pipeline, overrides.as_ref())
        .with_context(|| format!("Failed to build {} for {}", args.input.display(), pipeline))?;

    for warning in &output.warnings {
        tracing::warn!("{}", warning);
    }

    let target = match args.output {
        Some(path) => Some(path),
        None => config.output_dir(args.output_dir).map(|dir| {
            dir.join(shaderstack_core::export_file_name(&args.input, pipeline, "shader"))
        }),
    };

    let Some(target) = target else {
        print!("{}", output.shader);
        return Ok(());
    };

    write_file(&target, &output.shader)?;
    println!("Wrote {} ({} files merged)", target.display(), output.includes.len());

    if args.materials {
        let list = SubMaterialList::new(output.sub_materials);
        let json = list.to_json().context("Failed to serialize sub-materials")?;
        let path = target.with_extension("materials.json");
        write_file(&path, &json)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

/// Write `contents`, creating parent directories as needed
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))
}
