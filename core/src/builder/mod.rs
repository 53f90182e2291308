//! Shader assembly.
//!
//! [`ShaderBuilder`] turns a combined [`FragmentBlock`] into shader text for
//! one render pipeline. The pipeline adapter supplies the skeleton; every
//! later step substitutes one family of `%TOKEN%` markers. Defines are
//! substituted last so user defines can override anything the earlier steps
//! emitted. Any token still present at the end is an error.

mod strip;

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

pub use strip::{MAX_LAYERS, strip};

use crate::block::{BlockReader, FragmentBlock, ReadWarning};
use crate::error::{BuildError, Result};
use crate::options::{OptionOverrides, Options, TessellationMode, Workflow};
use crate::pipeline::{AdapterRegistry, RenderPipeline};
use crate::stack_file::{StackedShader, is_stack_file};
use crate::submaterial::SubShaderMaterial;
use crate::templates::{self, EmbeddedTemplates, TemplateSource};
use crate::text::{strip_comments, unresolved_tokens};

/// What [`ShaderBuilder::build_or_sentinel`] returns when a build fails.
pub const ERROR_SENTINEL: &str = "error";

const DEFAULT_SHADER_TARGET: &str = "3.0";
const TESSELLATION_SHADER_TARGET: &str = "4.6";

const PRAGMAS_PLAIN: &str = "   #pragma vertex Vert\n   #pragma fragment Frag";
const PRAGMAS_TESSELLATION: &str = "   #pragma hull Hull\n   #pragma domain Domain\n   #pragma vertex TessVert\n   #pragma fragment Frag\n   #pragma require tesshw\n";

const SRP_MATRIX_PRELUDE: &str = "#ifdef unity_WorldToObject\n#undef unity_WorldToObject\n#endif\n#ifdef unity_ObjectToWorld\n#undef unity_ObjectToWorld\n#endif\n#define unity_ObjectToWorld GetObjectToWorldMatrix()\n#define unity_WorldToObject GetWorldToObjectMatrix()\n";

/// Macro spellings scriptable pipelines replace with function calls.
const SRP_REWRITES: &[(&str, &str)] = &[
    ("fixed", "half"),
    ("UNITY_MATRIX_M", "GetObjectToWorldMatrix()"),
    ("UNITY_MATRIX_I_M", "GetWorldToObjectMatrix()"),
    ("UNITY_MATRIX_VP", "GetWorldToHClipMatrix()"),
    ("UNITY_MATRIX_V", "GetWorldToViewMatrix()"),
    // Trailing character keeps UNITY_MATRIX_PREV_VP and friends intact.
    ("UNITY_MATRIX_P,", "GetViewToHClipMatrix(),"),
    ("UNITY_MATRIX_P ", "GetViewToHClipMatrix() "),
    ("UNITY_MATRIX_P)", "GetViewToHClipMatrix())"),
];

/// Helpers that need the camera depth texture on scriptable pipelines.
const DEPTH_TEXTURE_USERS: &[&str] = &[
    "GetSceneNormal",
    "GetSceneDepth",
    "GetLinear01Depth",
    "GetLinearEyeDepth",
    "WorldPositionFromDepthBuffer",
];

/// User `BEGIN_PASS(name)` tokens and the pass names that fill them.
const USER_PASSES: &[(&str, &str)] = &[
    ("%USERPASSFORWARD%", "forward"),
    ("%USERPASSFORWARDADD%", "forwardadd"),
    ("%USERPASSGBUFFER%", "gbuffer"),
    ("%USERPASSDEPTH%", "depth"),
    ("%USERPASSSHADOW%", "shadow"),
    ("%USERPASSSELECT%", "select"),
    ("%USERPASSMETA%", "meta"),
    ("%USERPASSMOTION%", "motion"),
];

/// Result of building a file or stack from disk.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub shader: String,
    /// Every file that contributed, in merge order.
    pub includes: Vec<PathBuf>,
    pub warnings: Vec<ReadWarning>,
    pub sub_materials: Vec<SubShaderMaterial>,
}

/// Assembles shaders from blocks, templates and a pipeline adapter.
pub struct ShaderBuilder<T: TemplateSource = EmbeddedTemplates> {
    templates: T,
    registry: AdapterRegistry,
}

impl ShaderBuilder<EmbeddedTemplates> {
    pub fn new() -> Self {
        Self::with_templates(EmbeddedTemplates)
    }
}

impl Default for ShaderBuilder<EmbeddedTemplates> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TemplateSource> ShaderBuilder<T> {
    pub fn with_templates(templates: T) -> Self {
        Self {
            templates,
            registry: AdapterRegistry::with_defaults(),
        }
    }

    pub fn with_registry(mut self, registry: AdapterRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry_mut(&mut self) -> &mut AdapterRegistry {
        &mut self.registry
    }

    pub fn templates(&self) -> &T {
        &self.templates
    }

    /// Read `path` (a source file or a `.stackedshader`) and build it.
    pub fn build_path(
        &self,
        path: &Path,
        pipeline: RenderPipeline,
        overrides: Option<&OptionOverrides>,
    ) -> Result<BuildOutput> {
        if is_stack_file(path) {
            self.build_stack(path, pipeline, overrides)
        } else {
            self.build_file(path, pipeline, overrides)
        }
    }

    /// Read one source file with its includes and build it.
    pub fn build_file(
        &self,
        path: &Path,
        pipeline: RenderPipeline,
        overrides: Option<&OptionOverrides>,
    ) -> Result<BuildOutput> {
        let mut reader = BlockReader::new();
        let blocks = reader.read(path)?;
        self.finish(reader, blocks, path, pipeline, overrides)
    }

    /// Build every shader listed in a stack file as one stack.
    ///
    /// The stack's own overrides apply unless `overrides` is given.
    pub fn build_stack(
        &self,
        stack_path: &Path,
        pipeline: RenderPipeline,
        overrides: Option<&OptionOverrides>,
    ) -> Result<BuildOutput> {
        let stack = StackedShader::load(stack_path)?;
        let paths = stack.resolve(stack_path);
        debug!("Stack {} lists {} shaders", stack_path.display(), paths.len());

        let mut reader = BlockReader::new();
        let blocks = reader.read_stack(&paths, stack_path)?;
        let overrides = overrides.or(stack.overrides());
        self.finish(reader, blocks, stack_path, pipeline, overrides)
    }

    /// Like [`build_path`](Self::build_path), but failures are logged and
    /// turned into [`ERROR_SENTINEL`].
    pub fn build_or_sentinel(
        &self,
        path: &Path,
        pipeline: RenderPipeline,
        overrides: Option<&OptionOverrides>,
    ) -> String {
        match self.build_path(path, pipeline, overrides) {
            Ok(output) => output.shader,
            Err(e) => {
                error!("Failed to build {} for {}: {}", path.display(), pipeline, e);
                ERROR_SENTINEL.to_string()
            }
        }
    }

    /// Build `path` once per pipeline. Pipelines that fail get
    /// [`ERROR_SENTINEL`] so the caller still sees every slot.
    pub fn export_all(
        &self,
        path: &Path,
        overrides: Option<&OptionOverrides>,
    ) -> Vec<(RenderPipeline, String)> {
        RenderPipeline::ALL
            .into_iter()
            .map(|pipeline| (pipeline, self.build_or_sentinel(path, pipeline, overrides)))
            .collect()
    }

    fn finish(
        &self,
        reader: BlockReader,
        blocks: FragmentBlock,
        asset_path: &Path,
        pipeline: RenderPipeline,
        overrides: Option<&OptionOverrides>,
    ) -> Result<BuildOutput> {
        let shader = self.build(&blocks, asset_path, pipeline, overrides)?;
        let (includes, warnings) = reader.into_parts();
        info!(
            "Built {} for {} from {} files",
            asset_path.display(),
            pipeline,
            includes.len()
        );
        Ok(BuildOutput {
            shader,
            includes,
            warnings,
            sub_materials: blocks.sub_materials,
        })
    }

    /// Assemble the shader text for `blocks`.
    ///
    /// `asset_path` only supplies the default shader name and the header.
    pub fn build(
        &self,
        blocks: &FragmentBlock,
        asset_path: &Path,
        pipeline: RenderPipeline,
        overrides: Option<&OptionOverrides>,
    ) -> Result<String> {
        let mut defines = blocks.defines.clone();
        push_line(&mut defines, &format!("\n   #define {} 1", pipeline.define()));

        let options = Options::parse_with(&blocks.options, overrides);

        let adapter = self.registry.resolve(pipeline, &options)?;
        let pipeline_template = adapter.template(&options, &self.templates)?;
        for define in &pipeline_template.defines {
            push_line(&mut defines, define);
        }

        let mut shader = header(pipeline, asset_path);
        shader.push_str(&pipeline_template.text);

        let shader = self.apply_shared(shader, blocks, &options, &mut defines)?;
        let shader = apply_option_tags(shader, &options);
        let shader = apply_requires(shader, &options);

        let code = strip_comments(&blocks.code);
        let mut shader_target = shader_target(&code, pipeline, &options);

        let shader = self.apply_tessellation(
            shader,
            &code,
            asset_path,
            &options,
            &mut defines,
            &mut shader_target,
        )?;
        let shader = shader.replace("%SHADERTARGET%", &shader_target);

        match options.workflow {
            Workflow::Specular => {
                push_line(&mut defines, "\n#define _USESPECULAR 1");
                push_line(&mut defines, "\n#define _SPECULAR_SETUP");
                push_line(&mut defines, "#define _MATERIAL_FEATURE_SPECULAR_COLOR 1");
            }
            Workflow::Unlit => push_line(&mut defines, "\n#define _UNLIT 1"),
            Workflow::Metallic => {}
        }
        if code.contains(".outputDepth") {
            push_line(&mut defines, "#define _DEPTHOFFSET_ON");
        }
        if pipeline.is_scriptable() && DEPTH_TEXTURE_USERS.iter().any(|f| code.contains(f)) {
            push_line(&mut defines, "#define REQUIRE_DEPTH_TEXTURE");
        }
        if code.contains(".texcoord1") {
            push_line(&mut defines, "#define _USINGTEXCOORD1 1");
        }
        if code.contains(".texcoord2") {
            push_line(&mut defines, "#define _USINGTEXCOORD2 1");
        }

        let shader_desc = apply_requires(self.load(templates::SHADER_DESC)?, &options);
        let shader = shader
            .replace("%SHADERDESC%", &shader_desc)
            .replace("%SHADERNAME%", &shader_name(&options, asset_path))
            .replace("%PROPERTIES%", &blocks.properties);

        let mut user_code = blocks.code.clone();
        user_code.push('\n');
        user_code.push_str(&apply_requires(self.load(templates::CHAINS)?, &options));
        user_code.push('\n');
        if pipeline.is_scriptable() {
            user_code.insert_str(0, SRP_MATRIX_PRELUDE);
        }
        let shader = shader
            .replace("%CODE%", &user_code)
            .replace("%CBUFFER%", &blocks.cbuffer)
            .replace("%CUSTOMCBUFFER%", &custom_cbuffers(blocks))
            .replace("%CUSTOMINSTANCEPROPS%", &instanced_buffers(blocks));

        let shader = apply_user_passes(shader, blocks);

        if code.contains(".isFrontFace") {
            push_line(&mut defines, "#define NEED_FACING 1");
        }

        let mut shader = strip(&code, shader, options.v2f_strip.as_deref());

        if pipeline.is_scriptable() {
            for (from, to) in SRP_REWRITES {
                shader = shader.replace(from, to);
            }
        }

        let custom_pass = if blocks.custom_pass.len() > 1 {
            blocks.custom_pass.as_str()
        } else {
            ""
        };
        let shader = shader
            .replace("%CUSTOMPREPASS%", custom_pass)
            .replace("%DEFINES%", &defines)
            .replace("%STACKIDX%", "")
            .replace("\r\n", "\n");

        let leftover = unresolved_tokens(&shader);
        if !leftover.is_empty() {
            return Err(BuildError::UnresolvedTokens(leftover));
        }
        Ok(shader)
    }

    fn load(&self, name: &str) -> Result<String> {
        self.templates
            .load(name)
            .ok_or_else(|| BuildError::TemplateNotFound(name.to_string()))
    }

    fn apply_shared(
        &self,
        shader: String,
        blocks: &FragmentBlock,
        options: &Options,
        defines: &mut String,
    ) -> Result<String> {
        let shared = self.load(templates::SHARED)?.replace("%BLACKBOARD%", &blocks.blackboard);
        let shared = match &options.grab_pass {
            Some(grab) => {
                push_line(defines, "#define _GRABPASSUSED 1");
                push_line(defines, "#define REQUIRE_OPAQUE_TEXTURE");
                shared.replace("%GRABTEXTURE%", &grab.replace('"', ""))
            }
            None => shared.replace("%GRABTEXTURE%", "_GrabTexture"),
        };
        Ok(shader.replace("%TEMPLATE_SHARED%", &shared))
    }

    fn apply_tessellation(
        &self,
        shader: String,
        code: &str,
        asset_path: &Path,
        options: &Options,
        defines: &mut String,
        shader_target: &mut String,
    ) -> Result<String> {
        if options.tessellation == TessellationMode::None {
            return Ok(shader
                .replace("%TESSELLATION%", "")
                .replace("%PRAGMAS%", PRAGMAS_PLAIN));
        }

        if !(code.contains(" GetTessFactors") && code.contains(" Ext_ModifyTessellatedVertex")) {
            warn!(
                "Could not compile tessellation into {} because GetTessFactors or ModifyTessellatedVertex is missing",
                asset_path.display()
            );
            return Ok(shader
                .replace("%TESSELLATION%", "")
                .replace("%PRAGMAS%", PRAGMAS_PLAIN));
        }

        let tessellation = apply_requires(self.load(templates::TESSELLATION)?, options);
        push_line(defines, "\n      #define _TESSELLATION_ON 1");
        if options.tessellation == TessellationMode::Edge {
            push_line(defines, "      #define _TESSEDGE 1");
        }
        let below_minimum = shader_target
            .trim()
            .parse::<f32>()
            .map_or(true, |target| target < 4.6);
        if below_minimum {
            *shader_target = TESSELLATION_SHADER_TARGET.to_string();
        }
        Ok(shader
            .replace("%TESSELLATION%", &tessellation)
            .replace("%PRAGMAS%", PRAGMAS_TESSELLATION))
    }
}

/// `<stem>_<Pipeline>.<ext>`, the file name an exported build is written to.
pub fn export_file_name(source: &Path, pipeline: RenderPipeline, extension: &str) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}_{}.{extension}", pipeline.name())
}

fn push_line(text: &mut String, line: &str) {
    text.push_str(line);
    text.push('\n');
}

fn header(pipeline: RenderPipeline, asset_path: &Path) -> String {
    let source = asset_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(
        "////////////////////////////////////////\n\
         // Generated with ShaderStack {}\n\
         //\n\
         // Auto-generated shader code, don't hand edit!\n\
         //\n\
         //   Render Pipeline: {}\n\
         //   Source: {}\n\
         ////////////////////////////////////////\n\n\n",
        env!("CARGO_PKG_VERSION"),
        pipeline,
        source
    )
}

/// `Tag "value"` when the option is set, nothing otherwise.
fn tag_or_remove(shader: String, token: &str, tag: &str, value: Option<&str>) -> String {
    match value.filter(|v| !v.is_empty()) {
        Some(value) => shader.replace(token, &format!("{tag} \"{value}\"")),
        None => shader.replace(token, ""),
    }
}

fn apply_option_tags(shader: String, options: &Options) -> String {
    let mut shader = tag_or_remove(shader, "%CUSTOMEDITOR%", "CustomEditor", options.custom_editor.as_deref());
    shader = tag_or_remove(shader, "%FALLBACK%", "Fallback", options.fallback.as_deref());
    // Dependency values keep their own quoting: `"BaseMapShader" = "Hidden/Base"`.
    shader = match options.dependency.as_deref().filter(|d| !d.is_empty()) {
        Some(dependency) => shader.replace("%DEPENDENCY%", &format!("Dependency {dependency}")),
        None => shader.replace("%DEPENDENCY%", ""),
    };

    for (i, modifier) in options.texcoord_mods.iter().enumerate() {
        shader = shader.replace(&format!("%TEXCOORD{i}MOD%"), modifier);
    }
    shader = shader.replace("%VERTEXCOLORMOD%", &options.vertex_color_mod);
    for (i, modifier) in options.extra_v2f_mods.iter().enumerate() {
        shader = shader.replace(&format!("%EXTRAV2F{i}MOD%"), modifier);
    }
    shader
}

/// Resolve the interpolator-require tokens.
///
/// With a condition, `%XREQUIRE%` is removed and `%XREQUIREKEY%` becomes the
/// condition. Without one, `%XREQUIRE%` comments its line out and the key
/// token is removed.
pub fn apply_requires(text: String, options: &Options) -> String {
    let mut text = require(text, "VERTEXCOLOR", &options.vertex_color_require);
    text = require(text, "TEXCOORD3", &options.texcoord3_require);
    text = require(text, "SCREENPOS", &options.screen_pos_require);
    for (i, condition) in options.extra_v2f_requires.iter().enumerate() {
        text = require(text, &format!("EXTRAV2F{i}"), condition);
    }
    text
}

fn require(text: String, channel: &str, condition: &str) -> String {
    let token = format!("%{channel}REQUIRE%");
    let key = format!("%{channel}REQUIREKEY%");
    if condition.is_empty() {
        text.replace(&token, "//").replace(&key, "")
    } else {
        text.replace(&key, condition).replace(&token, "")
    }
}

fn shader_target(code: &str, pipeline: RenderPipeline, options: &Options) -> String {
    if let Some(target) = &options.shader_target {
        return target.clone();
    }
    let target = if options.tessellation != TessellationMode::None {
        TESSELLATION_SHADER_TARGET
    } else if pipeline.is_high_definition() {
        "4.5"
    } else if code.contains(".vertexID") {
        "3.5"
    } else {
        DEFAULT_SHADER_TARGET
    };
    target.to_string()
}

fn shader_name(options: &Options, asset_path: &Path) -> String {
    match options.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => {
            let stem = asset_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("ShaderStack/{stem}")
        }
    }
}

fn custom_cbuffers(blocks: &FragmentBlock) -> String {
    blocks
        .custom_cbuffers
        .iter()
        .map(|(name, body)| format!("CBUFFER_START({name})\n{body}\nCBUFFER_END\n"))
        .collect()
}

fn instanced_buffers(blocks: &FragmentBlock) -> String {
    blocks
        .instanced_buffers
        .iter()
        .map(|(name, body)| {
            format!("UNITY_INSTANCING_BUFFER_START({name})\n{body}\nUNITY_INSTANCING_BUFFER_END({name})\n")
        })
        .collect()
}

/// Fill the user pass tokens from `BEGIN_PASS` blocks. An unscoped block
/// goes into every pass and hides the named ones.
fn apply_user_passes(shader: String, blocks: &FragmentBlock) -> String {
    let all = blocks.pass_blocks.get("all");
    USER_PASSES.iter().fold(shader, |shader, (token, name)| {
        let text = match all {
            Some(all) => all,
            None => blocks.pass_blocks.get(name).unwrap_or(""),
        };
        shader.replace(token, text)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn build(blocks: &FragmentBlock, pipeline: RenderPipeline) -> String {
        ShaderBuilder::new()
            .build(blocks, Path::new("Assets/Water.surfshader"), pipeline, None)
            .unwrap()
    }

    #[test]
    fn test_export_file_name() {
        let path = Path::new("Assets/Shaders/Water.surfshader");
        assert_eq!(
            export_file_name(path, RenderPipeline::Hdrp2020, "shader"),
            "Water_HDRP2020.shader"
        );
    }

    #[test]
    fn test_requires() {
        let options = Options::parse("VertexColorRequire \"_USE_TINT\"");
        let text = "%VERTEXCOLORREQUIRE%#if %VERTEXCOLORREQUIREKEY%\n%SCREENPOSREQUIRE%#if %SCREENPOSREQUIREKEY%\n";
        assert_eq!(
            apply_requires(text.to_string(), &options),
            "#if _USE_TINT\n//#if \n"
        );
    }

    #[test]
    fn test_shader_target_ladder() {
        let plain = Options::default();
        assert_eq!(shader_target("", RenderPipeline::Standard, &plain), "3.0");
        assert_eq!(shader_target("d.vertexID", RenderPipeline::Urp2020, &plain), "3.5");
        assert_eq!(shader_target("d.vertexID", RenderPipeline::Hdrp2019, &plain), "4.5");
        let tess = Options::parse("Tessellation \"Distance\"");
        assert_eq!(shader_target("", RenderPipeline::Hdrp2020, &tess), "4.6");
        let explicit = Options::parse("ShaderTarget \"5.0\"\nTessellation \"Edge\"");
        assert_eq!(shader_target("", RenderPipeline::Standard, &explicit), "5.0");
    }

    #[test]
    fn test_default_name_and_defines() {
        let mut blocks = FragmentBlock::new("Assets/Water.surfshader");
        blocks.code = "void SurfaceFunction(inout Surface o, ShaderData d) { o.Albedo = d.texcoord1.xyz; }\n".into();
        let shader = build(&blocks, RenderPipeline::Standard);
        assert!(shader.contains("Shader \"ShaderStack/Water\""));
        assert!(shader.contains("#define _STANDARD 1"));
        assert!(shader.contains("#define _USINGTEXCOORD1 1"));
        assert!(!shader.contains("_USINGTEXCOORD2"));
    }

    #[test]
    fn test_scriptable_rewrites() {
        let mut blocks = FragmentBlock::new("a.surfshader");
        blocks.code = "fixed4 p = mul(UNITY_MATRIX_VP, x);\nfloat4 q = mul(UNITY_MATRIX_P, y);\n".into();
        let shader = build(&blocks, RenderPipeline::Urp2020);
        assert!(shader.contains("half4 p = mul(GetWorldToHClipMatrix(), x);"));
        assert!(shader.contains("mul(GetViewToHClipMatrix(), y)"));
        assert!(shader.contains("#define unity_ObjectToWorld GetObjectToWorldMatrix()"));

        let standard = build(&blocks, RenderPipeline::Standard);
        assert!(standard.contains("fixed4 p = mul(UNITY_MATRIX_VP, x);"));
    }

    #[test]
    fn test_user_pass_blocks() {
        let mut blocks = FragmentBlock::new("a.surfshader");
        blocks.pass_blocks.insert("shadow", "Cull Off\n".into());
        let shader = build(&blocks, RenderPipeline::Standard);
        assert_eq!(shader.matches("Cull Off\n").count(), 1);

        blocks.pass_blocks.insert("all", "Stencil { Ref 2 }\n".into());
        let shader = build(&blocks, RenderPipeline::Standard);
        assert!(shader.matches("Stencil { Ref 2 }").count() >= 4);
        assert!(!shader.contains("Cull Off\n"));
    }

    #[test]
    fn test_custom_buffers() {
        let mut blocks = FragmentBlock::new("a.surfshader");
        blocks.custom_cbuffers.insert("Layer", "float _Weight;\n".into());
        blocks.instanced_buffers.insert("Props", "UNITY_DEFINE_INSTANCED_PROP(float4, _Tint)\n".into());
        let shader = build(&blocks, RenderPipeline::Standard);
        assert!(shader.contains("CBUFFER_START(Layer)\nfloat _Weight;\n\nCBUFFER_END\n"));
        assert!(shader.contains("UNITY_INSTANCING_BUFFER_START(Props)"));
        assert!(shader.contains("UNITY_INSTANCING_BUFFER_END(Props)"));
    }

    #[test]
    fn test_custom_prepass_and_user_defines() {
        let mut blocks = FragmentBlock::new("a.surfshader");
        blocks.defines = "#define MY_FLAG 1\n".into();
        blocks.custom_pass = "Pass { Name \"Outline\" }\n".into();
        let shader = build(&blocks, RenderPipeline::Standard);
        assert!(shader.contains("Pass { Name \"Outline\" }"));
        assert!(shader.contains("#define MY_FLAG 1\n"));

        blocks.custom_pass = "\n".into();
        let shader = build(&blocks, RenderPipeline::Standard);
        assert!(!shader.contains("Outline"));
    }
}
