use super::{
    BLEND_TRANSPARENT, DEFINE_ALPHA_BLEND, DEFINE_ALPHA_PREMULTIPLY, PassSet, PipelineAdapter,
    PipelineTemplate, ZWRITE_OFF_PREFIX, require_template, transparent_tags,
};
use crate::error::Result;
use crate::options::{AlphaMode, Options};
use crate::templates::TemplateSource;

const BLEND_OPAQUE: &str = "Blend One Zero, One Zero\nCull Back\nZTest LEqual\nZWrite On";
const PIPELINE_TAG: &str = "\"RenderPipeline\"=\"UniversalPipeline\"";

/// Universal render pipeline, in its 2019 or 2020 template layout.
#[derive(Debug, Clone, Copy)]
pub struct UniversalAdapter {
    prefix: &'static str,
    has_depth_normals: bool,
}

impl UniversalAdapter {
    pub fn urp2019() -> Self {
        Self {
            prefix: "Template_URP2019",
            has_depth_normals: false,
        }
    }

    pub fn urp2020() -> Self {
        Self {
            prefix: "Template_URP2020",
            has_depth_normals: true,
        }
    }

    fn file(&self, part: &str) -> String {
        format!("{}_{}.txt", self.prefix, part)
    }
}

impl PipelineAdapter for UniversalAdapter {
    fn template(&self, options: &Options, templates: &dyn TemplateSource) -> Result<PipelineTemplate> {
        let template = require_template(templates, &format!("{}.txt", self.prefix))?;
        let mut defines = Vec::new();

        let mut passes = PassSet::default();
        passes.load(templates, "%PASSFORWARD%", &self.file("PassForward"));
        passes.load(templates, "%PASSSHADOW%", &self.file("PassShadow"));
        passes.load(templates, "%PASSMETA%", &self.file("PassMeta"));
        passes.load(templates, "%PASSDEPTHONLY%", &self.file("PassDepthOnly"));
        if self.has_depth_normals {
            passes.load(templates, "%PASSDEPTHNORMALS%", &self.file("PassDepthNormals"));
            // 2020 reserves a deferred slot that has no pass yet.
            passes.set("%PASSGBUFFER%", String::new());
        } else {
            passes.load(templates, "%PASS2D%", &self.file("Pass2D"));
        }

        if options.disable_shadow_pass {
            passes.clear("%PASSSHADOW%");
        }
        if options.disable_gbuffer_pass {
            passes.clear("%PASSGBUFFER%");
        }

        if options.alpha == AlphaMode::Opaque {
            passes.replace_in("%PASSFORWARD%", "%FORWARDBASEBLEND%", BLEND_OPAQUE);
        } else {
            passes.clear("%PASSSHADOW%");
            passes.clear("%PASSDEPTHONLY%");
            passes.clear("%PASSGBUFFER%");
            passes.replace_in("%PASSFORWARD%", "%FORWARDBASEBLEND%", BLEND_TRANSPARENT);
            defines.push(
                if options.alpha == AlphaMode::PreMultiply {
                    DEFINE_ALPHA_PREMULTIPLY
                } else {
                    DEFINE_ALPHA_BLEND
                }
                .to_string(),
            );
            passes.prepend("%PASSFORWARD%", ZWRITE_OFF_PREFIX);
            defines.push("#define _ALPHABLEND_ON 1\n#define _SURFACE_TYPE_TRANSPARENT 1".to_string());
        }

        let template = passes.apply(template);
        let vert = templates.load(&self.file("Vert")).unwrap_or_default();
        let include = templates.load(&self.file("include")).unwrap_or_default();
        let template = template
            .replace("%VERT%", &vert)
            .replace("%URPINCLUDE%", &include);

        let tags = match &options.tags {
            Some(tags) => format!("{PIPELINE_TAG} {tags}"),
            None if self.has_depth_normals => format!(
                "{PIPELINE_TAG} \"RenderType\" = \"Opaque\" \"UniversalMaterialType\" = \"Lit\" \"Queue\" = \"Geometry\""
            ),
            None => format!("{PIPELINE_TAG} \"RenderType\" = \"Opaque\" \"Queue\" = \"Geometry\""),
        };
        let tags = if options.alpha == AlphaMode::Opaque {
            tags
        } else {
            transparent_tags(&tags)
        };

        let text = template
            .replace("%TAGS%", &tags)
            .replace("%SUBSHADERTAGS%", "");
        Ok(PipelineTemplate { text, defines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::EmbeddedTemplates;

    #[test]
    fn test_urp2020_transparent() {
        let options = Options::parse("Alpha \"PreMultiply\"");
        let out = UniversalAdapter::urp2020()
            .template(&options, &EmbeddedTemplates)
            .unwrap();
        assert!(!out.text.contains("\"LightMode\" = \"ShadowCaster\""));
        assert!(!out.text.contains("\"LightMode\" = \"DepthOnly\""));
        assert!(out.text.contains("\"LightMode\" = \"DepthNormals\""));
        assert!(out.defines.iter().any(|d| d.contains("_ALPHAPREMULTIPLY_ON")));
        assert!(out.defines.iter().any(|d| d.contains("_SURFACE_TYPE_TRANSPARENT")));
        assert!(out.text.contains("\"Queue\" = \"Transparent\""));
    }

    #[test]
    fn test_urp2019_opaque_has_2d_pass() {
        let out = UniversalAdapter::urp2019()
            .template(&Options::default(), &EmbeddedTemplates)
            .unwrap();
        assert!(out.text.contains("\"LightMode\" = \"Universal2D\""));
        assert!(out.text.contains("ZWrite On"));
        assert!(out.text.contains("\"RenderPipeline\"=\"UniversalPipeline\""));
        assert!(out.defines.is_empty());
    }
}
