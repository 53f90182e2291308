use super::{
    BLEND_TRANSPARENT, PassSet, PipelineAdapter, PipelineTemplate, require_template,
};
use crate::error::Result;
use crate::options::{AlphaMode, Options, Workflow};
use crate::templates::TemplateSource;

const PIPELINE_TAG: &str = "\"RenderPipeline\" = \"HDRenderPipeline\"";
const DEFAULT_QUEUE: &str = "Geometry+225";

/// High definition render pipeline, in its 2019 or 2020 template layout.
#[derive(Debug, Clone, Copy)]
pub struct HdAdapter {
    prefix: &'static str,
    /// 2020 adds depth-forward, motion vector, picking, transparent depth
    /// prepass and full screen debug passes.
    extended_passes: bool,
}

impl HdAdapter {
    pub fn hdrp2019() -> Self {
        Self {
            prefix: "Template_HDRP2019",
            extended_passes: false,
        }
    }

    pub fn hdrp2020() -> Self {
        Self {
            prefix: "Template_HDRP2020",
            extended_passes: true,
        }
    }

    fn file(&self, part: &str) -> String {
        format!("{}_{}.txt", self.prefix, part)
    }
}

impl PipelineAdapter for HdAdapter {
    fn template(&self, options: &Options, templates: &dyn TemplateSource) -> Result<PipelineTemplate> {
        let template = require_template(templates, &format!("{}.txt", self.prefix))?;
        let mut defines = Vec::new();

        let mut passes = PassSet::default();
        passes.load(templates, "%PASSGBUFFER%", &self.file("PassGBuffer"));
        passes.load(templates, "%PASSSHADOW%", &self.file("PassShadow"));
        passes.load(templates, "%PASSDEPTHONLY%", &self.file("PassDepthOnly"));
        passes.load(templates, "%PASSFORWARD%", &self.file("PassForward"));
        passes.load(templates, "%PASSMETA%", &self.file("PassMeta"));
        passes.load(templates, "%PASSSCENESELECT%", &self.file("PassSceneSelection"));
        if self.extended_passes {
            passes.load(templates, "%PASSDEPTHFORWARDONLY%", &self.file("PassDepthForwardOnly"));
            passes.load(templates, "%PASSMOTIONVECTOR%", &self.file("PassMotionVector"));
            passes.load(templates, "%PASSSCENEPICKING%", &self.file("PassPicking"));
            passes.load(
                templates,
                "%PASSTRANSPARENTDEPTHPREPASS%",
                &self.file("PassTransparentDepthPrepass"),
            );
            passes.load(templates, "%PASSFULLSCREENDEBUG%", &self.file("PassFullScreenDebug"));

            if !options.enable_transparent_depth_prepass {
                passes.clear("%PASSTRANSPARENTDEPTHPREPASS%");
            }
        }

        if options.disable_shadow_pass {
            passes.clear("%PASSSHADOW%");
        }
        if options.disable_gbuffer_pass {
            passes.clear("%PASSGBUFFER%");
        }
        if options.workflow == Workflow::Unlit {
            let unlit = templates.load(&self.file("PassForwardUnlit")).unwrap_or_default();
            passes.set("%PASSFORWARD%", unlit);
            passes.clear("%PASSGBUFFER%");
        } else {
            passes.clear("%PASSDEPTHFORWARDONLY%");
        }

        if options.alpha == AlphaMode::Opaque {
            passes.replace_in("%PASSFORWARD%", "%FORWARDBASEBLEND%", "");
        } else {
            passes.clear("%PASSSHADOW%");
            passes.clear("%PASSDEPTHONLY%");
            passes.clear("%PASSGBUFFER%");
            defines.push(
                if options.alpha == AlphaMode::PreMultiply {
                    "#define _BLENDMODE_PRE_MULTIPLY 1"
                } else {
                    "#define _BLENDMODE_ALPHA 1"
                }
                .to_string(),
            );
            defines.push("#define _SURFACE_TYPE_TRANSPARENT 1".to_string());
            passes.replace_in("%PASSFORWARD%", "%FORWARDBASEBLEND%", BLEND_TRANSPARENT);
        }

        let template = passes.apply(template);
        let shared = templates.load(&self.file("shared")).unwrap_or_default();
        let include = templates.load(&self.file("include")).unwrap_or_default();
        let vert = templates.load(&self.file("Vert")).unwrap_or_default();
        let template = template
            .replace("%HDRPSHARED%", &shared)
            .replace("%HDRPINCLUDE%", &include)
            .replace("%VERT%", &vert);

        let mut tags = match &options.tags {
            Some(tags) => format!("{PIPELINE_TAG} {}", tags.replace("Opaque", "HDLitShader")),
            None => format!(
                "{PIPELINE_TAG} \"RenderType\" = \"HDLitShader\" \"Queue\" = \"{DEFAULT_QUEUE}\""
            ),
        };
        if options.alpha != AlphaMode::Opaque {
            tags = tags.replace(DEFAULT_QUEUE, "Transparent");
        }

        let text = template
            .replace("%TAGS%", &tags)
            .replace("%SUBSHADERTAGS%", "");
        Ok(PipelineTemplate { text, defines })
    }
}
