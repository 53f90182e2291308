//! Template text sources.
//!
//! Templates are looked up by file name. The built-in set is compiled into
//! the binary; a [`DirectoryTemplates`] source lets a project override any of
//! them by dropping a file with the same name anywhere under a directory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{BuildError, Result};

pub const SHARED: &str = "Shared.txt";
pub const SHADER_DESC: &str = "ShaderDesc.txt";
pub const CHAINS: &str = "Chains.txt";
pub const TESSELLATION: &str = "Tessellation.txt";

/// Something that can produce template text by file name.
pub trait TemplateSource {
    fn load(&self, name: &str) -> Option<String>;
}

macro_rules! embedded {
    ($($name:literal),* $(,)?) => {
        &[$(($name, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $name)))),*]
    };
}

static EMBEDDED: &[(&str, &str)] = embedded![
    "Shared.txt",
    "ShaderDesc.txt",
    "Chains.txt",
    "Tessellation.txt",
    "Template_Standard.txt",
    "Template_Standard_PassForward.txt",
    "Template_Standard_PassForwardAdd.txt",
    "Template_Standard_PassGBuffer.txt",
    "Template_Standard_PassShadow.txt",
    "Template_Standard_PassMeta.txt",
    "Template_Standard_Vert.txt",
    "Template_Standard_CommonHLSL.txt",
    "Template_URP2019.txt",
    "Template_URP2019_PassForward.txt",
    "Template_URP2019_PassShadow.txt",
    "Template_URP2019_PassMeta.txt",
    "Template_URP2019_PassDepthOnly.txt",
    "Template_URP2019_Pass2D.txt",
    "Template_URP2019_Vert.txt",
    "Template_URP2019_include.txt",
    "Template_URP2020.txt",
    "Template_URP2020_PassForward.txt",
    "Template_URP2020_PassShadow.txt",
    "Template_URP2020_PassMeta.txt",
    "Template_URP2020_PassDepthOnly.txt",
    "Template_URP2020_PassDepthNormals.txt",
    "Template_URP2020_Vert.txt",
    "Template_URP2020_include.txt",
    "Template_HDRP2019.txt",
    "Template_HDRP2019_PassGBuffer.txt",
    "Template_HDRP2019_PassShadow.txt",
    "Template_HDRP2019_PassDepthOnly.txt",
    "Template_HDRP2019_PassForward.txt",
    "Template_HDRP2019_PassForwardUnlit.txt",
    "Template_HDRP2019_PassMeta.txt",
    "Template_HDRP2019_PassSceneSelection.txt",
    "Template_HDRP2019_Vert.txt",
    "Template_HDRP2019_shared.txt",
    "Template_HDRP2019_include.txt",
    "Template_HDRP2020.txt",
    "Template_HDRP2020_PassGBuffer.txt",
    "Template_HDRP2020_PassShadow.txt",
    "Template_HDRP2020_PassDepthOnly.txt",
    "Template_HDRP2020_PassDepthForwardOnly.txt",
    "Template_HDRP2020_PassForward.txt",
    "Template_HDRP2020_PassForwardUnlit.txt",
    "Template_HDRP2020_PassMeta.txt",
    "Template_HDRP2020_PassSceneSelection.txt",
    "Template_HDRP2020_PassMotionVector.txt",
    "Template_HDRP2020_PassPicking.txt",
    "Template_HDRP2020_PassTransparentDepthPrepass.txt",
    "Template_HDRP2020_PassFullScreenDebug.txt",
    "Template_HDRP2020_Vert.txt",
    "Template_HDRP2020_shared.txt",
    "Template_HDRP2020_include.txt",
    "New_Slim.txt",
    "New_Documented.txt",
    "New_Tessellation.txt",
];

/// Templates compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplates;

impl EmbeddedTemplates {
    /// File names of every built-in template.
    pub fn names() -> impl Iterator<Item = &'static str> {
        EMBEDDED.iter().map(|(name, _)| *name)
    }

    pub fn get(name: &str) -> Option<&'static str> {
        EMBEDDED.iter().find(|(n, _)| *n == name).map(|(_, text)| *text)
    }
}

impl TemplateSource for EmbeddedTemplates {
    fn load(&self, name: &str) -> Option<String> {
        Self::get(name).map(str::to_string)
    }
}

/// Templates found under a directory, falling back to the built-in set.
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl DirectoryTemplates {
    /// Index every `.txt` file below `root`.
    pub fn scan(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let mut files = Vec::new();
        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                BuildError::io(path, e.into())
            })?;
            if entry.file_type().is_file() && entry.path().extension().is_some_and(|e| e == "txt") {
                files.push(entry.into_path());
            }
        }
        debug!("Found {} template files under {}", files.len(), root.display());
        Ok(Self { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn find(&self, name: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|p| p.file_name().is_some_and(|f| f == name))
            .map(PathBuf::as_path)
    }
}

impl TemplateSource for DirectoryTemplates {
    fn load(&self, name: &str) -> Option<String> {
        if let Some(path) = self.find(name) {
            match std::fs::read_to_string(path) {
                Ok(text) => return Some(text),
                Err(e) => warn!("Failed to read template {}: {}", path.display(), e),
            }
        }
        EmbeddedTemplates.load(name)
    }
}
