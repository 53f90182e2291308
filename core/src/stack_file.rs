//! `.stackedshader` documents: an ordered list of source files built as one
//! stack, plus the overrides to build them with.
//!
//! ```json
//! {
//!   "shaders": ["Base.surfshader", "layers/Snow.surfshader"],
//!   "optionOverrides": { "shaderName": "Terrain/Snowy" }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};
use crate::options::OptionOverrides;

pub const STACK_EXTENSION: &str = "stackedshader";
pub const SOURCE_EXTENSION: &str = "surfshader";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StackedShader {
    /// Source paths, relative to the stack file unless absolute.
    pub shaders: Vec<PathBuf>,
    #[serde(skip_serializing_if = "OptionOverrides::is_empty")]
    pub option_overrides: OptionOverrides,
}

impl StackedShader {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        Self::parse(path, &text)
    }

    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| BuildError::StackFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Shader paths resolved against the directory of `stack_path`.
    pub fn resolve(&self, stack_path: &Path) -> Vec<PathBuf> {
        let dir = stack_path.parent().unwrap_or(Path::new(""));
        self.shaders
            .iter()
            .map(|p| if p.is_absolute() { p.clone() } else { dir.join(p) })
            .collect()
    }

    pub fn overrides(&self) -> Option<&OptionOverrides> {
        (!self.option_overrides.is_empty()).then_some(&self.option_overrides)
    }
}

/// Whether `path` names a stack document rather than a single source.
pub fn is_stack_file(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case(STACK_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_resolve() {
        let path = Path::new("/project/shaders/Terrain.stackedshader");
        let stack = StackedShader::parse(
            path,
            r#"{
                "shaders": ["Base.surfshader", "/abs/Snow.surfshader"],
                "optionOverrides": { "shaderName": "Terrain/Snowy", "fallback": "Diffuse" }
            }"#,
        )
        .unwrap();

        assert_eq!(
            stack.resolve(path),
            vec![
                PathBuf::from("/project/shaders/Base.surfshader"),
                PathBuf::from("/abs/Snow.surfshader"),
            ]
        );
        let overrides = stack.overrides().unwrap();
        assert_eq!(overrides.shader_name.as_deref(), Some("Terrain/Snowy"));
        assert_eq!(overrides.fallback.as_deref(), Some("Diffuse"));
        assert!(overrides.custom_editor.is_none());
    }

    #[test]
    fn test_missing_overrides() {
        let path = Path::new("a.stackedshader");
        let stack = StackedShader::parse(path, r#"{ "shaders": [] }"#).unwrap();
        assert!(stack.overrides().is_none());
        assert!(is_stack_file(path));
        assert!(!is_stack_file(Path::new("a.surfshader")));
    }

    #[test]
    fn test_invalid_json_names_the_file() {
        let err = StackedShader::parse(Path::new("bad.stackedshader"), "{ nope").unwrap_err();
        assert!(err.to_string().contains("bad.stackedshader"));
    }
}
