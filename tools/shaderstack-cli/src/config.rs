//! shaderstack.toml parsing
//!
//! Shared by every command. The file is optional; command-line flags win
//! over anything it sets.

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use shaderstack_core::templates::{DirectoryTemplates, EmbeddedTemplates, TemplateSource};
use shaderstack_core::{OptionOverrides, RenderPipeline, ShaderBuilder};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "shaderstack.toml";

/// shaderstack.toml structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub build: BuildSection,
    pub overrides: OverridesSection,
}

/// Build defaults
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Pipeline used when `--pipeline` is not given
    pub pipeline: Option<String>,
    /// Directory of template overrides
    pub templates: Option<PathBuf>,
    /// Where build and export write their output
    pub output_dir: Option<PathBuf>,
}

/// Option overrides applied to every build
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OverridesSection {
    pub shader_name: Option<String>,
    pub custom_editor: Option<String>,
    pub fallback: Option<String>,
}

/// Flags every building command accepts
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Path to shaderstack.toml (defaults to ./shaderstack.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory whose templates replace the built-in ones
    #[arg(long)]
    pub templates: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// The explicit config if one was given, else `./shaderstack.toml` when
    /// it exists, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default = Path::new(CONFIG_FILE);
        if default.is_file() {
            tracing::debug!("Using {}", default.display());
            Self::load(default)
        } else {
            Ok(Self::default())
        }
    }

    /// `flag`, else the configured pipeline, else Standard.
    pub fn pipeline(&self, flag: Option<RenderPipeline>) -> Result<RenderPipeline> {
        if let Some(pipeline) = flag {
            return Ok(pipeline);
        }
        match &self.build.pipeline {
            Some(name) => name
                .parse::<RenderPipeline>()
                .with_context(|| format!("Invalid pipeline in {}", CONFIG_FILE)),
            None => Ok(RenderPipeline::Standard),
        }
    }

    /// Configured overrides with any command-line values laid over them.
    pub fn overrides(
        &self,
        shader_name: Option<String>,
        custom_editor: Option<String>,
        fallback: Option<String>,
    ) -> Option<OptionOverrides> {
        let overrides = OptionOverrides {
            shader_name: shader_name.or_else(|| self.overrides.shader_name.clone()),
            custom_editor: custom_editor.or_else(|| self.overrides.custom_editor.clone()),
            fallback: fallback.or_else(|| self.overrides.fallback.clone()),
        };
        (!overrides.is_empty()).then_some(overrides)
    }

    pub fn output_dir(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| self.build.output_dir.clone())
    }

    /// Builder over the template directory from `flag` or the config.
    pub fn builder(&self, flag: Option<&Path>) -> Result<ShaderBuilder<CliTemplates>> {
        let dir = flag.or(self.build.templates.as_deref());
        let templates = match dir {
            Some(dir) => CliTemplates::Directory(
                DirectoryTemplates::scan(dir)
                    .with_context(|| format!("Failed to scan templates in {}", dir.display()))?,
            ),
            None => CliTemplates::Embedded(EmbeddedTemplates),
        };
        Ok(ShaderBuilder::with_templates(templates))
    }
}

/// Built-in templates, or a directory of overrides.
pub enum CliTemplates {
    Embedded(EmbeddedTemplates),
    Directory(DirectoryTemplates),
}

impl TemplateSource for CliTemplates {
    fn load(&self, name: &str) -> Option<String> {
        match self {
            CliTemplates::Embedded(t) => t.load(name),
            CliTemplates::Directory(t) => t.load(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
[build]
pipeline = "URP2020"
templates = "templates"
output_dir = "generated"

[overrides]
shader_name = "Custom/Name"
fallback = "Diffuse"
"#,
        )
        .unwrap();

        assert_eq!(config.pipeline(None).unwrap(), RenderPipeline::Urp2020);
        assert_eq!(
            config.pipeline(Some(RenderPipeline::Hdrp2019)).unwrap(),
            RenderPipeline::Hdrp2019
        );
        assert_eq!(config.output_dir(None), Some(PathBuf::from("generated")));

        let overrides = config.overrides(Some("Flag/Name".into()), None, None).unwrap();
        assert_eq!(overrides.shader_name.as_deref(), Some("Flag/Name"));
        assert_eq!(overrides.fallback.as_deref(), Some("Diffuse"));
        assert!(overrides.custom_editor.is_none());
    }

    #[test]
    fn test_empty_config_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.pipeline(None).unwrap(), RenderPipeline::Standard);
        assert!(config.overrides(None, None, None).is_none());
    }

    #[test]
    fn test_bad_pipeline_is_an_error() {
        let config: Config = toml::from_str("[build]\npipeline = \"Mobile\"\n").unwrap();
        assert!(config.pipeline(None).is_err());
    }
}
