//! Error types for shader assembly.

use std::path::PathBuf;

/// Structural failures that abort a build.
///
/// Recoverable problems (missing includes, unknown blocks, bad enum values)
/// are reported as [`crate::block::ReadWarning`]s instead.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("BEGIN_{block} at line {line} in {path} has no matching END_{block}")]
    UnterminatedBlock {
        path: PathBuf,
        block: String,
        line: usize,
    },

    #[error("unresolved template tokens in output: {}", .0.join(", "))]
    UnresolvedTokens(Vec<String>),

    #[error("no pipeline adapter registered for {0}")]
    NoAdapter(crate::pipeline::RenderPipeline),

    #[error("invalid stack file {path}: {source}")]
    StackFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Returned when a render pipeline name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown render pipeline '{0}' (expected Standard, URP2019, URP2020, HDRP2019 or HDRP2020)")]
pub struct ParsePipelineError(pub String);

pub type Result<T> = std::result::Result<T, BuildError>;
