//! Per-fragment material sections.
//!
//! Every merged fragment records which properties it contributed and, when
//! its options name a `SubEditor`, which editor should draw them. Material
//! inspectors consume the list as JSON.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubShaderMaterial {
    /// Empty when the fragment's properties use the default inspector.
    pub editor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_index: Option<u32>,
    pub properties: Vec<String>,
}

impl SubShaderMaterial {
    pub fn has_editor(&self) -> bool {
        !self.editor.is_empty()
    }
}

/// The sub-materials of one build, in merge order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubMaterialList {
    pub materials: Vec<SubShaderMaterial>,
}

impl SubMaterialList {
    pub fn new(materials: Vec<SubShaderMaterial>) -> Self {
        Self { materials }
    }

    /// Only the entries that name a custom editor.
    pub fn with_editors(&self) -> impl Iterator<Item = &SubShaderMaterial> {
        self.materials.iter().filter(|m| m.has_editor())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let list = SubMaterialList::new(vec![
            SubShaderMaterial {
                editor: String::new(),
                stack_index: None,
                properties: vec!["_MainTex".into()],
            },
            SubShaderMaterial {
                editor: "LayerEditor".into(),
                stack_index: Some(1),
                properties: vec!["_Tint_Ext_1".into()],
            },
        ]);

        let json = list.to_json().unwrap();
        assert!(json.contains("\"stackIndex\": 1"));
        assert_eq!(json.matches("stackIndex").count(), 1);
        assert_eq!(SubMaterialList::from_json(&json).unwrap(), list);
        assert_eq!(list.with_editors().count(), 1);
    }
}
