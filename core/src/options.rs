//! `OPTIONS` block parsing.
//!
//! The block is line oriented. Each line is matched against a fixed set of
//! leading keywords:
//!
//! ```text
//! ShaderName "Custom/Water"
//! Alpha "Blend"
//! Tags { "Queue" = "Transparent" }
//! VertexColorRequire "_USE_TINT"
//! AdapterURP2020 MyUrpAdapter
//! ```
//!
//! Unknown lines are ignored and unknown enum values keep the previous value,
//! so a typo degrades instead of failing the build.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::pipeline::RenderPipeline;
use crate::text::{extract_quoted, strip_comments, to_lines};

/// Enum-valued options parsed by case-insensitive name.
pub trait OptionEnum: Sized + Copy + 'static {
    const VARIANTS: &'static [(&'static str, Self)];

    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaMode {
    #[default]
    Opaque,
    Blend,
    PreMultiply,
}

impl OptionEnum for AlphaMode {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("Opaque", AlphaMode::Opaque),
        ("Blend", AlphaMode::Blend),
        ("PreMultiply", AlphaMode::PreMultiply),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Workflow {
    #[default]
    Metallic,
    Specular,
    Unlit,
}

impl OptionEnum for Workflow {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("Metallic", Workflow::Metallic),
        ("Specular", Workflow::Specular),
        ("Unlit", Workflow::Unlit),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TessellationMode {
    #[default]
    None,
    Distance,
    Edge,
}

impl OptionEnum for TessellationMode {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("None", TessellationMode::None),
        ("Distance", TessellationMode::Distance),
        ("Edge", TessellationMode::Edge),
    ];
}

impl OptionEnum for bool {
    const VARIANTS: &'static [(&'static str, Self)] = &[("True", true), ("False", false)];
}

/// Use a non-default adapter for one render pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOverride {
    pub pipeline: RenderPipeline,
    pub adapter: String,
}

/// Caller-supplied values that always beat the parsed options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionOverrides {
    /// Replaces the shader name when non-empty.
    pub shader_name: Option<String>,
    /// `Some("")` removes the custom editor.
    pub custom_editor: Option<String>,
    pub fallback: Option<String>,
}

impl OptionOverrides {
    pub fn is_empty(&self) -> bool {
        self.shader_name.is_none() && self.custom_editor.is_none() && self.fallback.is_none()
    }
}

/// Parsed `OPTIONS` for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub name: Option<String>,
    pub tags: Option<String>,
    pub dependency: Option<String>,
    pub tessellation: TessellationMode,
    pub custom_editor: Option<String>,
    pub sub_editor: Option<String>,
    pub fallback: Option<String>,
    pub alpha: AlphaMode,
    pub workflow: Workflow,
    pub disable_shadow_pass: bool,
    pub disable_gbuffer_pass: bool,
    pub shader_target: Option<String>,
    pub v2f_strip: Option<String>,
    pub grab_pass: Option<String>,
    pub stackable: bool,
    pub enable_transparent_depth_prepass: bool,
    pub template_overrides: Vec<TemplateOverride>,

    pub texcoord_mods: [String; 4],
    pub vertex_color_mod: String,
    pub extra_v2f_mods: [String; 8],

    pub vertex_color_require: String,
    pub texcoord3_require: String,
    pub screen_pos_require: String,
    pub extra_v2f_requires: [String; 8],
}

impl Default for Options {
    fn default() -> Self {
        Self {
            name: None,
            tags: None,
            dependency: None,
            tessellation: TessellationMode::None,
            custom_editor: None,
            sub_editor: None,
            fallback: None,
            alpha: AlphaMode::Opaque,
            workflow: Workflow::Metallic,
            disable_shadow_pass: false,
            disable_gbuffer_pass: false,
            shader_target: None,
            v2f_strip: None,
            grab_pass: None,
            stackable: true,
            enable_transparent_depth_prepass: false,
            template_overrides: Vec::new(),
            texcoord_mods: Default::default(),
            vertex_color_mod: String::new(),
            extra_v2f_mods: Default::default(),
            vertex_color_require: String::new(),
            texcoord3_require: String::new(),
            screen_pos_require: String::new(),
            extra_v2f_requires: Default::default(),
        }
    }
}

const REQUIRE_SEPARATOR: &str = " || ";

impl Options {
    pub fn parse(text: &str) -> Self {
        let mut options = Options::default();
        let stripped = strip_comments(text);
        for line in to_lines(&stripped) {
            options.apply_line(line.trim());
        }
        options
    }

    /// Parse and then apply `overrides`.
    pub fn parse_with(text: &str, overrides: Option<&OptionOverrides>) -> Self {
        let mut options = Self::parse(text);
        if let Some(overrides) = overrides {
            options.apply_overrides(overrides);
        }
        options
    }

    pub fn apply_overrides(&mut self, overrides: &OptionOverrides) {
        if let Some(name) = overrides.shader_name.as_deref().filter(|n| !n.is_empty()) {
            self.name = Some(name.to_string());
        }
        if let Some(editor) = &overrides.custom_editor {
            self.custom_editor = (!editor.is_empty()).then(|| editor.clone());
        }
        if let Some(fallback) = &overrides.fallback {
            self.fallback = Some(fallback.clone());
        }
    }

    /// Adapter name requested for `pipeline`, if any.
    pub fn adapter_override(&self, pipeline: RenderPipeline) -> impl Iterator<Item = &str> {
        self.template_overrides
            .iter()
            .filter(move |o| o.pipeline == pipeline)
            .map(|o| o.adapter.as_str())
    }

    fn apply_line(&mut self, line: &str) {
        set_quoted(line, "ShaderName", &mut self.name);
        set_enum(line, "Tessellation", &mut self.tessellation);
        set_quoted(line, "Fallback", &mut self.fallback);
        set_quoted(line, "CustomEditor", &mut self.custom_editor);
        set_quoted(line, "SubEditor", &mut self.sub_editor);
        set_quoted(line, "ShaderTarget", &mut self.shader_target);
        set_enum(line, "Alpha", &mut self.alpha);
        set_enum(line, "Workflow", &mut self.workflow);
        set_enum(line, "DisableShadowPass", &mut self.disable_shadow_pass);
        set_enum(line, "DisableGBufferPass", &mut self.disable_gbuffer_pass);
        set_braced(line, "Tags", &mut self.tags);
        set_braced(line, "Dependency", &mut self.dependency);
        set_braced(line, "StripV2F", &mut self.v2f_strip);
        set_braced(line, "GrabPass", &mut self.grab_pass);
        set_enum(line, "Stackable", &mut self.stackable);
        set_enum(line, "EnableTransparentDepthPass", &mut self.enable_transparent_depth_prepass);

        set_string(line, "VertexColorModifier", &mut self.vertex_color_mod);
        for (i, slot) in self.texcoord_mods.iter_mut().enumerate() {
            set_string(line, &format!("TexCoord{i}Modifier"), slot);
        }
        for (i, slot) in self.extra_v2f_mods.iter_mut().enumerate() {
            set_string(line, &format!("ExtraV2F{i}Modifier"), slot);
        }

        // Several stacked fragments may each require a channel; their
        // conditions are or'd together.
        append_string(line, "VertexTexCoord3Require", &mut self.texcoord3_require);
        append_string(line, "VertexColorRequire", &mut self.vertex_color_require);
        append_string(line, "ScreenPosRequire", &mut self.screen_pos_require);
        for (i, slot) in self.extra_v2f_requires.iter_mut().enumerate() {
            append_string(line, &format!("ExtraV2F{i}Require"), slot);
        }

        self.parse_adapter(line);
    }

    fn parse_adapter(&mut self, line: &str) {
        if !line.starts_with("Adapter") {
            return;
        }
        for pipeline in RenderPipeline::ALL {
            let key = format!("Adapter{}", pipeline.name());
            if line.contains(&key) {
                let adapter = line.replace(&key, "").trim().to_string();
                if !adapter.is_empty() {
                    self.template_overrides.push(TemplateOverride { pipeline, adapter });
                }
            }
        }
    }
}

fn quoted_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    if !line.starts_with(key) {
        return None;
    }
    extract_quoted(line, '"').filter(|v| !v.is_empty())
}

fn set_quoted(line: &str, key: &str, slot: &mut Option<String>) {
    if let Some(value) = quoted_value(line, key) {
        *slot = Some(value.trim().to_string());
    }
}

fn set_string(line: &str, key: &str, slot: &mut String) {
    if let Some(value) = quoted_value(line, key) {
        *slot = value.trim().to_string();
    }
}

fn append_string(line: &str, key: &str, slot: &mut String) {
    if let Some(value) = quoted_value(line, key) {
        if !slot.is_empty() {
            slot.push_str(REQUIRE_SEPARATOR);
        }
        slot.push_str(value.trim());
    }
}

fn set_braced(line: &str, key: &str, slot: &mut Option<String>) {
    if !line.starts_with(key) {
        return;
    }
    if let (Some(start), Some(end)) = (line.find('{'), line.rfind('}')) {
        if end > start + 1 {
            *slot = Some(line[start + 1..end].trim().to_string());
        }
    }
}

fn set_enum<E: OptionEnum>(line: &str, key: &str, slot: &mut E) {
    let Some(value) = quoted_value(line, key) else {
        return;
    };
    match E::from_name(value) {
        Some(parsed) => *slot = parsed,
        None => warn!("{} does not have an option '{}'", key, value),
    }
}
