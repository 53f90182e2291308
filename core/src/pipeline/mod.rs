//! Render pipelines and the adapters that supply their templates.
//!
//! Each adapter loads its main template plus one template per pass, drops
//! passes the options rule out, and returns the composed text together with
//! any defines it wants added. Adapters are looked up through an explicit
//! [`AdapterRegistry`] keyed by pipeline and adapter name.

mod hd;
mod standard;
mod universal;

use std::fmt;
use std::str::FromStr;

use hashbrown::HashMap;
use tracing::{debug, warn};

pub use hd::HdAdapter;
pub use standard::StandardAdapter;
pub use universal::UniversalAdapter;

use crate::error::{BuildError, ParsePipelineError, Result};
use crate::options::Options;
use crate::templates::TemplateSource;

/// Target render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPipeline {
    Standard,
    Urp2019,
    Urp2020,
    Hdrp2019,
    Hdrp2020,
}

impl RenderPipeline {
    pub const ALL: [RenderPipeline; 5] = [
        RenderPipeline::Standard,
        RenderPipeline::Urp2019,
        RenderPipeline::Urp2020,
        RenderPipeline::Hdrp2019,
        RenderPipeline::Hdrp2020,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RenderPipeline::Standard => "Standard",
            RenderPipeline::Urp2019 => "URP2019",
            RenderPipeline::Urp2020 => "URP2020",
            RenderPipeline::Hdrp2019 => "HDRP2019",
            RenderPipeline::Hdrp2020 => "HDRP2020",
        }
    }

    pub fn is_universal(self) -> bool {
        matches!(self, RenderPipeline::Urp2019 | RenderPipeline::Urp2020)
    }

    pub fn is_high_definition(self) -> bool {
        matches!(self, RenderPipeline::Hdrp2019 | RenderPipeline::Hdrp2020)
    }

    /// Anything but the built-in Standard pipeline.
    pub fn is_scriptable(self) -> bool {
        self != RenderPipeline::Standard
    }

    /// Preprocessor symbol every build for this pipeline defines.
    pub fn define(self) -> &'static str {
        if self.is_high_definition() {
            "_HDRP"
        } else if self.is_universal() {
            "_URP"
        } else {
            "_STANDARD"
        }
    }

    /// Registered name of the built-in adapter.
    pub fn default_adapter(self) -> &'static str {
        match self {
            RenderPipeline::Standard => "PipelineStandard",
            RenderPipeline::Urp2019 => "PipelineURP2019",
            RenderPipeline::Urp2020 => "PipelineURP2020",
            RenderPipeline::Hdrp2019 => "PipelineHDRP2019",
            RenderPipeline::Hdrp2020 => "PipelineHDRP2020",
        }
    }
}

impl fmt::Display for RenderPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderPipeline {
    type Err = ParsePipelineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RenderPipeline::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParsePipelineError(s.to_string()))
    }
}

/// Template text produced by an adapter, plus define lines to add.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineTemplate {
    pub text: String,
    pub defines: Vec<String>,
}

/// Supplies the pipeline-specific template and pass selection.
pub trait PipelineAdapter {
    fn template(&self, options: &Options, templates: &dyn TemplateSource) -> Result<PipelineTemplate>;
}

pub type AdapterFactory = fn() -> Box<dyn PipelineAdapter>;

/// Maps `(pipeline, adapter name)` to a constructor.
///
/// An `Adapter<Pipeline> <Name>` line in the options selects a registered
/// adapter; otherwise the pipeline's default is used.
pub struct AdapterRegistry {
    factories: HashMap<(RenderPipeline, String), AdapterFactory>,
}

impl AdapterRegistry {
    /// A registry with nothing in it.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// The five built-in adapters under their default names.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(RenderPipeline::Standard, "PipelineStandard", || {
            Box::new(StandardAdapter)
        });
        registry.register(RenderPipeline::Urp2019, "PipelineURP2019", || {
            Box::new(UniversalAdapter::urp2019())
        });
        registry.register(RenderPipeline::Urp2020, "PipelineURP2020", || {
            Box::new(UniversalAdapter::urp2020())
        });
        registry.register(RenderPipeline::Hdrp2019, "PipelineHDRP2019", || {
            Box::new(HdAdapter::hdrp2019())
        });
        registry.register(RenderPipeline::Hdrp2020, "PipelineHDRP2020", || {
            Box::new(HdAdapter::hdrp2020())
        });
        registry
    }

    pub fn register(&mut self, pipeline: RenderPipeline, name: impl Into<String>, factory: AdapterFactory) {
        self.factories.insert((pipeline, name.into()), factory);
    }

    pub fn contains(&self, pipeline: RenderPipeline, name: &str) -> bool {
        self.factories.contains_key(&(pipeline, name.to_string()))
    }

    /// The adapter to use for `pipeline` given `options`.
    pub fn resolve(&self, pipeline: RenderPipeline, options: &Options) -> Result<Box<dyn PipelineAdapter>> {
        for name in options.adapter_override(pipeline) {
            if let Some(factory) = self.factories.get(&(pipeline, name.to_string())) {
                debug!("Using adapter override {} for {}", name, pipeline);
                return Ok(factory());
            }
            warn!("Adapter override {} is not registered for {}", name, pipeline);
        }
        self.factories
            .get(&(pipeline, pipeline.default_adapter().to_string()))
            .map(|factory| factory())
            .ok_or(BuildError::NoAdapter(pipeline))
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Pass templates keyed by the main-template token they replace.
#[derive(Debug, Default)]
pub(crate) struct PassSet {
    passes: Vec<(&'static str, String)>,
}

impl PassSet {
    /// Load `file` for `token`. A missing pass template becomes empty.
    pub(crate) fn load(&mut self, templates: &dyn TemplateSource, token: &'static str, file: &str) {
        let text = templates.load(file).unwrap_or_else(|| {
            warn!("Pass template {} not found, pass left empty", file);
            String::new()
        });
        self.passes.push((token, text));
    }

    pub(crate) fn set(&mut self, token: &'static str, text: String) {
        match self.passes.iter_mut().find(|(t, _)| *t == token) {
            Some((_, slot)) => *slot = text,
            None => self.passes.push((token, text)),
        }
    }

    pub(crate) fn take(&mut self, token: &str) -> String {
        self.passes
            .iter_mut()
            .find(|(t, _)| *t == token)
            .map(|(_, text)| std::mem::take(text))
            .unwrap_or_default()
    }

    pub(crate) fn clear(&mut self, token: &str) {
        self.take(token);
    }

    /// Replace `from` with `to` inside one pass.
    pub(crate) fn replace_in(&mut self, token: &str, from: &str, to: &str) {
        if let Some((_, text)) = self.passes.iter_mut().find(|(t, _)| *t == token) {
            *text = text.replace(from, to);
        }
    }

    pub(crate) fn prepend(&mut self, token: &str, prefix: &str) {
        if let Some((_, text)) = self.passes.iter_mut().find(|(t, _)| *t == token) {
            if !text.is_empty() {
                text.insert_str(0, prefix);
            }
        }
    }

    /// Substitute every pass into `template`.
    pub(crate) fn apply(self, template: String) -> String {
        self.passes
            .into_iter()
            .fold(template, |acc, (token, text)| acc.replace(token, &text))
    }
}

pub(crate) fn require_template(templates: &dyn TemplateSource, file: &str) -> Result<String> {
    templates
        .load(file)
        .ok_or_else(|| BuildError::TemplateNotFound(file.to_string()))
}

/// Swap opaque tag values for transparent ones.
pub(crate) fn transparent_tags(tags: &str) -> String {
    tags.replace("Geometry", "Transparent").replace("Opaque", "Transparent")
}

pub(crate) const BLEND_TRANSPARENT: &str =
    "Blend SrcAlpha OneMinusSrcAlpha, One OneMinusSrcAlpha\nCull Back\n ZTest LEqual\nZWrite Off";
pub(crate) const ZWRITE_OFF_PREFIX: &str = "\nZWrite Off ColorMask RGB\n\n";
pub(crate) const DEFINE_ALPHA_PREMULTIPLY: &str = "\n   #define _ALPHAPREMULTIPLY_ON 1";
pub(crate) const DEFINE_ALPHA_BLEND: &str = "\n   #define _ALPHABLEND_ON 1";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::EmbeddedTemplates;

    struct NamedAdapter;

    impl PipelineAdapter for NamedAdapter {
        fn template(&self, _: &Options, _: &dyn TemplateSource) -> Result<PipelineTemplate> {
            Ok(PipelineTemplate {
                text: "custom".into(),
                defines: vec![],
            })
        }
    }

    #[test]
    fn test_pipeline_names_round_trip() {
        for pipeline in RenderPipeline::ALL {
            assert_eq!(pipeline.name().parse::<RenderPipeline>().unwrap(), pipeline);
        }
        assert_eq!("urp2020".parse::<RenderPipeline>().unwrap(), RenderPipeline::Urp2020);
        assert!("Mobile".parse::<RenderPipeline>().is_err());
    }

    #[test]
    fn test_registry_uses_override_when_registered() {
        let mut registry = AdapterRegistry::with_defaults();
        registry.register(RenderPipeline::Urp2020, "MyAdapter", || Box::new(NamedAdapter));

        let options = Options::parse("AdapterURP2020 MyAdapter");
        let adapter = registry.resolve(RenderPipeline::Urp2020, &options).unwrap();
        let out = adapter.template(&options, &EmbeddedTemplates).unwrap();
        assert_eq!(out.text, "custom");

        // The override only applies to the pipeline it names.
        let adapter = registry.resolve(RenderPipeline::Standard, &options).unwrap();
        let out = adapter.template(&options, &EmbeddedTemplates).unwrap();
        assert_ne!(out.text, "custom");
    }

    #[test]
    fn test_registry_falls_back_for_unknown_override() {
        let registry = AdapterRegistry::with_defaults();
        let options = Options::parse("AdapterStandard DoesNotExist");
        assert!(registry.resolve(RenderPipeline::Standard, &options).is_ok());
    }

    #[test]
    fn test_empty_registry_has_no_adapter() {
        let registry = AdapterRegistry::empty();
        let err = registry
            .resolve(RenderPipeline::Hdrp2020, &Options::default())
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::NoAdapter(RenderPipeline::Hdrp2020)));
    }

    #[test]
    fn test_pass_set_apply() {
        let mut passes = PassSet::default();
        passes.set("%PASSA%", "a".into());
        passes.set("%PASSB%", "b".into());
        passes.clear("%PASSB%");
        passes.prepend("%PASSA%", ">");
        assert_eq!(passes.apply("[%PASSA%][%PASSB%]".into()), "[>a][]");
    }
}
