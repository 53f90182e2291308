//! ShaderStack CLI - Build tool for stacked surface shaders
//!
//! # Commands
//!
//! - `shaderstack build` - Assemble one shader for one render pipeline
//! - `shaderstack export` - Assemble a shader for every render pipeline
//! - `shaderstack includes` - List the files a shader pulls in
//! - `shaderstack locate` - Map a compiler error line back to its source file
//! - `shaderstack new` - Write a starter `.surfshader`
//!
//! # Usage
//!
//! ```bash
//! # Build for URP 2020 into a file
//! shaderstack build Water.surfshader -p URP2020 -o Water.shader
//!
//! # Build a stack of layers listed in a .stackedshader
//! shaderstack build Terrain.stackedshader -p HDRP2020
//!
//! # One output per pipeline: Water_Standard.shader, Water_URP2019.shader, ...
//! shaderstack export Water.surfshader
//! ```
//!
//! # Configuration (shaderstack.toml)
//!
//! ```toml
//! [build]
//! pipeline = "URP2020"
//! templates = "templates"
//! output_dir = "generated"
//!
//! [overrides]
//! shader_name = "Custom/Name"
//! ```

mod build;
mod config;
mod export;
mod includes;
mod locate;
mod new;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// ShaderStack CLI - Build tool for stacked surface shaders
#[derive(Parser)]
#[command(name = "shaderstack")]
#[command(about = "Assemble surface shader sources into render pipeline shaders")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a shader for one render pipeline
    Build(build::BuildArgs),

    /// Assemble a shader for every render pipeline
    Export(export::ExportArgs),

    /// List the files a shader includes, in merge order
    Includes(includes::IncludesArgs),

    /// Map a compiler message on a generated shader back to its source
    Locate(locate::LocateArgs),

    /// Write a starter shader source
    New(new::NewArgs),
}

fn main() -> Result<()> {
    // Logs go to stderr so shader text on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => build::execute(args),
        Commands::Export(args) => export::execute(args),
        Commands::Includes(args) => includes::execute(args),
        Commands::Locate(args) => locate::execute(args),
        Commands::New(args) => new::execute(args),
    }
}
