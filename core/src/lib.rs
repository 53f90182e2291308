//! ShaderStack Core - Surface shader assembly
//!
//! This crate turns block-structured `.surfshader` sources into complete
//! shader text for one of several render pipelines.
//!
//! # Architecture
//!
//! - [`BlockReader`] - Include resolution, stacking and merging into one [`FragmentBlock`]
//! - [`Options`] - `OPTIONS` block parsing
//! - [`AdapterRegistry`] / [`PipelineAdapter`] - Per-pipeline template and pass selection
//! - [`ShaderBuilder`] - Token substitution into the final shader
//! - [`diagnostics`] - Mapping compiler messages back to source files

pub mod block;
pub mod builder;
pub mod diagnostics;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod stack_file;
pub mod submaterial;
pub mod templates;
pub mod text;

pub use block::{BlockReader, FragmentBlock, MAX_INCLUDE_DEPTH, ReadWarning, SectionMap};
pub use builder::{BuildOutput, ERROR_SENTINEL, ShaderBuilder, export_file_name};
pub use diagnostics::{Diagnostic, Severity, SourceHint};
pub use error::{BuildError, ParsePipelineError, Result};
pub use options::{AlphaMode, OptionOverrides, Options, TessellationMode, Workflow};
pub use pipeline::{AdapterRegistry, PipelineAdapter, PipelineTemplate, RenderPipeline};
pub use stack_file::StackedShader;
pub use submaterial::{SubMaterialList, SubShaderMaterial};
pub use templates::{DirectoryTemplates, EmbeddedTemplates, TemplateSource};
