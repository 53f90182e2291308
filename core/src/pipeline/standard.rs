use super::{
    DEFINE_ALPHA_BLEND, DEFINE_ALPHA_PREMULTIPLY, PassSet, PipelineAdapter, PipelineTemplate,
    ZWRITE_OFF_PREFIX, require_template, transparent_tags,
};
use crate::error::Result;
use crate::options::{AlphaMode, Options, Workflow};
use crate::templates::TemplateSource;

const DEFAULT_TAGS: &str = "\"RenderType\" = \"Opaque\" \"Queue\" = \"Geometry\"";

/// Built-in (non-scriptable) render pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAdapter;

impl PipelineAdapter for StandardAdapter {
    fn template(&self, options: &Options, templates: &dyn TemplateSource) -> Result<PipelineTemplate> {
        let template = require_template(templates, "Template_Standard.txt")?;
        let mut defines = Vec::new();

        let mut passes = PassSet::default();
        passes.load(templates, "%PASSFORWARD%", "Template_Standard_PassForward.txt");
        passes.load(templates, "%PASSFORWARDADD%", "Template_Standard_PassForwardAdd.txt");
        passes.load(templates, "%PASSGBUFFER%", "Template_Standard_PassGBuffer.txt");
        passes.load(templates, "%PASSSHADOW%", "Template_Standard_PassShadow.txt");
        passes.load(templates, "%PASSMETA%", "Template_Standard_PassMeta.txt");

        if options.disable_shadow_pass {
            passes.clear("%PASSSHADOW%");
        }
        if options.disable_gbuffer_pass {
            passes.clear("%PASSGBUFFER%");
        }
        if options.workflow == Workflow::Unlit {
            passes.clear("%PASSFORWARDADD%");
            passes.clear("%PASSGBUFFER%");
        }

        if options.alpha == AlphaMode::Opaque {
            passes.replace_in("%PASSFORWARD%", "%FORWARDBASEBLEND%", "");
            passes.replace_in("%PASSFORWARDADD%", "%FORWARDADDBLEND%", "");
        } else {
            passes.clear("%PASSGBUFFER%");
            passes.clear("%PASSSHADOW%");
            passes.replace_in(
                "%PASSFORWARD%",
                "%FORWARDBASEBLEND%",
                "Blend SrcAlpha OneMinusSrcAlpha",
            );
            passes.replace_in("%PASSFORWARDADD%", "%FORWARDADDBLEND%", "Blend SrcAlpha One");
            defines.push(
                if options.alpha == AlphaMode::PreMultiply {
                    DEFINE_ALPHA_PREMULTIPLY
                } else {
                    DEFINE_ALPHA_BLEND
                }
                .to_string(),
            );
            passes.prepend("%PASSFORWARD%", ZWRITE_OFF_PREFIX);
        }

        let template = passes.apply(template);

        // Standard has no engine library for sampling helpers, so ship our own.
        if let Some(common) = templates.load("Template_Standard_CommonHLSL.txt") {
            defines.push(common);
        }

        let vert = templates.load("Template_Standard_Vert.txt").unwrap_or_default();
        let template = template.replace("%VERT%", &vert);

        let mut tags = options.tags.clone().unwrap_or_else(|| DEFAULT_TAGS.to_string());
        if options.alpha != AlphaMode::Opaque {
            tags = transparent_tags(&tags);
        }
        let template = template.replace("%TAGS%", &tags);

        let subshader_tags = match &options.grab_pass {
            Some(grab) => format!("      GrabPass {{{grab}}}\n"),
            None => String::new(),
        };
        let text = template.replace("%SUBSHADERTAGS%", &subshader_tags);

        Ok(PipelineTemplate { text, defines })
    }
}
