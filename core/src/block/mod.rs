//! Fragment blocks: the named sections parsed out of one shader source file,
//! and the rules for folding many of them into one combined set.
//!
//! A source file is split into `BEGIN_<NAME>` / `END_<NAME>` sections (see
//! [`parse_fragment`]). The [`BlockReader`] resolves includes, renames
//! repeated fragments so stacked copies do not collide, and merges everything
//! into a single [`FragmentBlock`] that the builder consumes.

mod parse;
mod reader;
mod stack;

use std::path::{Path, PathBuf};

pub use parse::parse_fragment;
pub use reader::{BlockReader, MAX_INCLUDE_DEPTH, ReadWarning};
pub use stack::{
    HOOK_FUNCTIONS, chain_hook_functions, extract_variable_names, find_local_keywords,
    rename_for_stack,
};

use crate::options::Options;
use crate::submaterial::SubShaderMaterial;

/// Keyed text sections that keep their insertion order.
///
/// Used for custom cbuffers, instancing buffers and per-pass blocks, where
/// output order must follow encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    entries: Vec<(String, String)>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set `key` to `text`, replacing any previous value in place.
    pub fn insert(&mut self, key: impl Into<String>, text: String) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = text,
            None => self.entries.push((key, text)),
        }
    }

    /// Append `text` (plus a newline) to an existing key, or insert it.
    pub fn append(&mut self, key: impl Into<String>, text: String) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => {
                v.push_str(&text);
                v.push('\n');
            }
            None => self.entries.push((key, text)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    /// Rewrite every value with `f`.
    pub fn map_values(self, mut f: impl FnMut(&str) -> String) -> Self {
        Self {
            entries: self
                .entries
                .into_iter()
                .map(|(k, v)| {
                    let v = f(&v);
                    (k, v)
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn merge(&mut self, other: SectionMap) {
        for (key, text) in other.entries {
            self.append(key, text);
        }
    }
}

/// One parsed source file, or the combined result of many.
///
/// Text sections are empty when the source had no such block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentBlock {
    pub path: PathBuf,
    /// `Some(n)` once a repeated include has been renamed for stacking.
    pub stack_index: Option<u32>,

    pub subshader: String,
    pub code: String,
    pub defines: String,
    pub options: String,
    pub properties: String,
    pub cbuffer: String,
    pub blackboard: String,
    pub custom_pass: String,

    /// `BEGIN_CBUFFER(name)` blocks.
    pub custom_cbuffers: SectionMap,
    /// `BEGIN_INSTANCING_BUFFER(name)` blocks.
    pub instanced_buffers: SectionMap,
    /// `BEGIN_PASS(name)` blocks keyed by lower-case pass name, `all` if unscoped.
    pub pass_blocks: SectionMap,

    pub sub_materials: Vec<SubShaderMaterial>,
}

impl FragmentBlock {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record which properties this fragment owns and which sub-editor, if
    /// any, should draw them.
    pub fn extract_sub_material(&mut self, options: &Options) {
        let properties = extract_variable_names(&self.properties, "");
        let material = match &options.sub_editor {
            Some(editor) => SubShaderMaterial {
                editor: editor.clone(),
                stack_index: self.stack_index,
                properties,
            },
            None => SubShaderMaterial {
                editor: String::new(),
                stack_index: None,
                properties,
            },
        };
        self.sub_materials = vec![material];
    }

    /// Fold `other` into `self`.
    ///
    /// Text sections are concatenated in encounter order. Blackboard text is
    /// only added when it is not already present, since it holds declarations
    /// that must appear once.
    pub fn merge(&mut self, other: FragmentBlock) {
        merge_text(&mut self.options, other.options);
        merge_text(&mut self.properties, other.properties);
        merge_text(&mut self.cbuffer, other.cbuffer);
        merge_text(&mut self.defines, other.defines);
        merge_text(&mut self.subshader, other.subshader);
        merge_text(&mut self.code, other.code);
        merge_text(&mut self.custom_pass, other.custom_pass);
        self.custom_cbuffers.merge(other.custom_cbuffers);
        self.instanced_buffers.merge(other.instanced_buffers);
        self.pass_blocks.merge(other.pass_blocks);

        if self.blackboard.is_empty() {
            self.blackboard = other.blackboard;
        } else if !other.blackboard.is_empty() && !self.blackboard.contains(&other.blackboard) {
            self.blackboard.push('\n');
            self.blackboard.push_str(&other.blackboard);
            self.blackboard.push('\n');
        }

        self.sub_materials.extend(other.sub_materials);
    }
}

fn merge_text(target: &mut String, src: String) {
    if src.is_empty() {
        return;
    }
    if target.is_empty() {
        *target = src;
    } else {
        target.push('\n');
        target.push_str(&src);
        target.push('\n');
    }
}
