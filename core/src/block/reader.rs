use std::fmt;
use std::path::{Path, PathBuf};

use hashbrown::{HashMap, HashSet};
use tracing::{debug, warn};

use super::{FragmentBlock, chain_hook_functions, parse_fragment, rename_for_stack};
use crate::error::{BuildError, Result};
use crate::options::Options;
use crate::text::{find_ci, normalize_path, strip_comments, to_lines};

/// Includes nested deeper than this are skipped as a cycle guard.
pub const MAX_INCLUDE_DEPTH: usize = 30;

const INCLUDE_BEGIN: &str = "BEGIN_SUBSHADERS";
const INCLUDE_END: &str = "END_SUBSHADERS";

/// Recoverable problems found while reading sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadWarning {
    /// A listed include could not be found as given or next to its includer.
    MissingInclude { from: PathBuf, include: String },
    /// An include was skipped because nesting passed [`MAX_INCLUDE_DEPTH`].
    DepthExceeded { path: PathBuf, depth: usize },
    /// `BEGIN_SUBSHADERS` without a closing `END_SUBSHADERS`.
    MissingIncludeEnd { path: PathBuf },
    /// A `BEGIN_<NAME>` block with a name nobody handles.
    UnknownBlock { path: PathBuf, name: String },
}

impl fmt::Display for ReadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadWarning::MissingInclude { from, include } => {
                write!(f, "include '{}' listed in {} could not be found", include, from.display())
            }
            ReadWarning::DepthExceeded { path, depth } => write!(
                f,
                "include {} skipped at depth {} (limit {})",
                path.display(),
                depth,
                MAX_INCLUDE_DEPTH
            ),
            ReadWarning::MissingIncludeEnd { path } => {
                write!(f, "missing {} in {}", INCLUDE_END, path.display())
            }
            ReadWarning::UnknownBlock { path, name } => {
                write!(f, "unknown block {} in {}, discarded", name, path.display())
            }
        }
    }
}

/// Reads a root file (or a stack of files) and everything it includes into
/// one combined [`FragmentBlock`].
///
/// After a read, [`includes`](Self::includes) holds every file that
/// contributed, in merge order, for mapping compiler errors back to sources.
#[derive(Debug, Default)]
pub struct BlockReader {
    includes: Vec<PathBuf>,
    warnings: Vec<ReadWarning>,
}

impl BlockReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn includes(&self) -> &[PathBuf] {
        &self.includes
    }

    pub fn warnings(&self) -> &[ReadWarning] {
        &self.warnings
    }

    pub fn into_parts(self) -> (Vec<PathBuf>, Vec<ReadWarning>) {
        (self.includes, self.warnings)
    }

    /// Read `root` and its includes.
    pub fn read(&mut self, root: &Path) -> Result<FragmentBlock> {
        self.resolve_includes(root, 0)?;
        self.includes.push(root.to_path_buf());
        let fragments = self.render_includes()?;
        Ok(self.combine(fragments))
    }

    /// Read several root files as one stack, in the given order.
    ///
    /// Each entry's own includes are placed ahead of the stacked entries.
    /// Entries that do not exist are skipped with a warning.
    pub fn read_stack(&mut self, paths: &[PathBuf], stack_file: &Path) -> Result<FragmentBlock> {
        for path in paths {
            if path.is_file() {
                self.includes.push(path.clone());
            } else {
                warn!("Stacked shader {} not found, skipping", path.display());
                self.warnings.push(ReadWarning::MissingInclude {
                    from: stack_file.to_path_buf(),
                    include: path.display().to_string(),
                });
            }
        }

        self.includes.reverse();
        let seeds = self.includes.clone();
        for seed in &seeds {
            self.resolve_includes(seed, 0)?;
        }
        self.includes.reverse();

        let fragments = self.render_includes()?;
        Ok(self.combine(fragments))
    }

    /// Append every file listed in `path`'s `BEGIN_SUBSHADERS` blocks, each
    /// after its own includes.
    pub fn resolve_includes(&mut self, path: &Path, depth: usize) -> Result<()> {
        let text = std::fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        let text = strip_comments(&text);

        let mut start = 0;
        while let Some(begin) = find_ci(&text, INCLUDE_BEGIN, start) {
            let Some(end) = find_ci(&text, INCLUDE_END, begin) else {
                warn!("Missing {} in {}", INCLUDE_END, path.display());
                self.warnings.push(ReadWarning::MissingIncludeEnd {
                    path: path.to_path_buf(),
                });
                return Ok(());
            };
            let listed = &text[begin + INCLUDE_BEGIN.len()..end];
            start = end + INCLUDE_END.len();

            for line in to_lines(listed) {
                let entry = line.replace('"', "");
                let entry = entry.trim();
                if entry.is_empty() {
                    continue;
                }

                let Some(include) = locate_include(path, entry) else {
                    warn!("Include '{}' listed in {} could not be found", entry, path.display());
                    self.warnings.push(ReadWarning::MissingInclude {
                        from: path.to_path_buf(),
                        include: entry.to_string(),
                    });
                    continue;
                };

                if depth > MAX_INCLUDE_DEPTH {
                    warn!("Include {} skipped due to recursion depth", include.display());
                    self.warnings.push(ReadWarning::DepthExceeded { path: include, depth });
                    continue;
                }

                debug!("{} includes {}", path.display(), include.display());
                self.resolve_includes(&include, depth + 1)?;
                self.includes.push(include);
            }
        }
        Ok(())
    }

    /// Parse every include, renaming repeats and chaining hooks.
    ///
    /// The first occurrence of a file is kept as-is; later occurrences, however
    /// the path is spelled, get stack indices 1, 2, ... in order.
    fn render_includes(&mut self) -> Result<Vec<FragmentBlock>> {
        let mut next_index: HashMap<PathBuf, u32> = HashMap::new();
        let mut chain = 0;
        let mut fragments = Vec::with_capacity(self.includes.len());

        for path in &self.includes {
            let text = std::fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
            let mut fragment = parse_fragment(path, &text, &mut self.warnings)?;

            let key = normalize_path(path);
            let index = next_index.get(&key).copied();
            if let Some(index) = index {
                debug!("Stacking {} as layer {}", path.display(), index);
                fragment = rename_for_stack(fragment, index);
            }
            let (fragment, next_chain) = chain_hook_functions(fragment, chain);
            chain = next_chain;
            next_index.insert(key, index.map_or(1, |i| i + 1));
            fragments.push(fragment);
        }

        Ok(fragments)
    }

    /// Merge fragments in order into one block.
    ///
    /// A fragment whose own options say `Stackable "False"` is only merged
    /// for the first occurrence of its absolute path.
    pub fn combine(&mut self, fragments: Vec<FragmentBlock>) -> FragmentBlock {
        let mut once: HashSet<PathBuf> = HashSet::new();
        let mut combined = FragmentBlock::default();

        for mut fragment in fragments {
            let options = Options::parse(&fragment.options);
            if !options.stackable && !once.insert(normalize_path(&fragment.path)) {
                debug!("Skipping repeated non-stackable {}", fragment.path.display());
                continue;
            }
            fragment.extract_sub_material(&options);
            if combined.path.as_os_str().is_empty() {
                combined.path = fragment.path.clone();
            }
            combined.merge(fragment);
        }

        combined
    }
}

fn locate_include(from: &Path, entry: &str) -> Option<PathBuf> {
    let given = PathBuf::from(entry);
    if given.is_file() {
        return Some(given);
    }
    let relative = from.parent().map(|dir| dir.join(entry))?;
    relative.is_file().then_some(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_includes_resolve_relative_and_in_order() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib/base.surfshader"), "BEGIN_CODE\nbase\nEND_CODE\n").unwrap();
        fs::write(
            dir.path().join("lib/mid.surfshader"),
            "BEGIN_SUBSHADERS\n\"base.surfshader\"\nEND_SUBSHADERS\nBEGIN_CODE\nmid\nEND_CODE\n",
        )
        .unwrap();
        let root = dir.path().join("root.surfshader");
        fs::write(
            &root,
            "BEGIN_SUBSHADERS\n   \"lib/mid.surfshader\"\nEND_SUBSHADERS\nBEGIN_CODE\nroot\nEND_CODE\n",
        )
        .unwrap();

        let mut reader = BlockReader::new();
        let block = reader.read(&root).unwrap();

        let names: Vec<_> = reader
            .includes()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["base.surfshader", "mid.surfshader", "root.surfshader"]);
        assert_eq!(block.code, "base\n\nmid\n\n\nroot\n\n");
    }

    #[test]
    fn test_missing_include_is_warning() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("root.surfshader");
        fs::write(
            &root,
            "BEGIN_SUBSHADERS\n\"nope.surfshader\"\nEND_SUBSHADERS\nBEGIN_CODE\nroot\nEND_CODE\n",
        )
        .unwrap();

        let mut reader = BlockReader::new();
        let block = reader.read(&root).unwrap();
        assert_eq!(block.code, "root\n");
        assert!(matches!(
            reader.warnings(),
            [ReadWarning::MissingInclude { include, .. }] if include == "nope.surfshader"
        ));
    }

    #[test]
    fn test_missing_include_end_stops_scan() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("root.surfshader");
        fs::write(&root, "BEGIN_SUBSHADERS\n\"x.surfshader\"\n").unwrap();

        let mut reader = BlockReader::new();
        reader.resolve_includes(&root, 0).unwrap();
        assert!(reader.includes().is_empty());
        assert!(matches!(reader.warnings(), [ReadWarning::MissingIncludeEnd { .. }]));
    }

    #[test]
    fn test_commented_include_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.surfshader"), "BEGIN_CODE\na\nEND_CODE\n").unwrap();
        let root = dir.path().join("root.surfshader");
        fs::write(
            &root,
            "/*\nBEGIN_SUBSHADERS\n\"a.surfshader\"\nEND_SUBSHADERS\n*/\n",
        )
        .unwrap();

        let mut reader = BlockReader::new();
        reader.read(&root).unwrap();
        assert_eq!(reader.includes().len(), 1);
    }

    #[test]
    fn test_repeated_include_is_stacked() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("layer.surfshader"),
            "BEGIN_PROPERTIES\n_Tint(\"Tint\", Color) = (1,1,1,1)\nEND_PROPERTIES\n\
             BEGIN_CBUFFER\nhalf4 _Tint;\nEND_CBUFFER\n\
             BEGIN_CODE\nvoid SurfaceFunction(inout Surface o) { o.Albedo *= _Tint.rgb; }\nEND_CODE\n",
        )
        .unwrap();
        let root = dir.path().join("root.surfshader");
        fs::write(
            &root,
            "BEGIN_SUBSHADERS\nlayer.surfshader\nlayer.surfshader\nlayer.surfshader\nEND_SUBSHADERS\n",
        )
        .unwrap();

        let mut reader = BlockReader::new();
        let block = reader.read(&root).unwrap();

        assert!(block.cbuffer.contains("half4 _Tint;"));
        assert!(block.cbuffer.contains("half4 _Tint_Ext_1;"));
        assert!(block.cbuffer.contains("half4 _Tint_Ext_2;"));
        assert!(block.code.contains("Ext_SurfaceFunction0 "));
        assert!(block.code.contains("Ext_SurfaceFunction1 "));
        assert!(block.code.contains("Ext_SurfaceFunction2 "));
        assert_eq!(block.sub_materials.len(), 4);
        assert_eq!(block.sub_materials[1].properties, vec!["_Tint_Ext_1"]);
    }
}
