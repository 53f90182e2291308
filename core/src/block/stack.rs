//! Renaming for stacked fragments and hook-function chaining.
//!
//! Variable discovery is a line heuristic, not a tokenizer: property lines
//! contribute their first word, cbuffer lines the word before the `;`.
//! Several declarations on one line only yield the last name.

use super::FragmentBlock;
use crate::text::{replace_variable, strip_between, strip_comments, to_lines};

/// Hook functions user code may define; each stacked copy gets its own
/// numbered name so the chains template can call them in sequence.
pub const HOOK_FUNCTIONS: [&str; 5] = [
    "SurfaceFunction",
    "ModifyVertex",
    "ModifyTessellatedVertex",
    "FinalColorForward",
    "FinalGBufferStandard",
];

const ENGINE_SUFFIXES: [&str; 3] = ["_ST", "_TexelSize", "_HDR"];

/// Declared variable names, longest first.
///
/// Engine-generated companions (`_ST`, `_TexelSize`, `_HDR`) are reduced to
/// their base name so renaming the base also renames them.
pub fn extract_variable_names(properties: &str, cbuffer: &str) -> Vec<String> {
    let mut names = property_names(properties);
    names.extend(cbuffer_names(cbuffer));

    let mut names: Vec<String> = names
        .into_iter()
        .map(|name| {
            ENGINE_SUFFIXES
                .iter()
                .find_map(|suffix| name.strip_suffix(suffix))
                .map(str::to_string)
                .unwrap_or(name)
        })
        .filter(|name| is_identifier(name))
        .collect();
    longest_first(&mut names);
    names
}

fn property_names(properties: &str) -> Vec<String> {
    let stripped = strip_comments(properties);
    to_lines(&stripped)
        .into_iter()
        .filter_map(|line| {
            let line = strip_between(line, '[', ']');
            let first = line.trim().split(' ').next()?;
            let name = first.split('(').next().unwrap_or(first);
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

fn cbuffer_names(cbuffer: &str) -> Vec<String> {
    let stripped = strip_comments(cbuffer);
    let mut names = Vec::new();
    for line in to_lines(&stripped) {
        let words: Vec<&str> = line.split_whitespace().collect();
        for (i, word) in words.iter().enumerate().rev() {
            let candidate = if *word == ";" {
                match i.checked_sub(1) {
                    Some(prev) => words[prev],
                    None => break,
                }
            } else if word.ends_with(';') {
                word.trim_end_matches(';')
            } else {
                continue;
            };
            let candidate = candidate.split('[').next().unwrap_or(candidate);
            names.push(candidate.trim_end_matches(')').to_string());
            break;
        }
    }
    names
}

/// Keywords declared with `#pragma shader_feature_local*`, longest first.
pub fn find_local_keywords(defines: &str) -> Vec<String> {
    let mut keywords = Vec::new();
    for line in to_lines(defines) {
        let line = strip_comments(line);
        let line = line.trim();
        if !(line.contains("#pragma") && line.contains("shader_feature_local")) {
            continue;
        }
        keywords.extend(
            line.split(' ')
                .filter(|w| {
                    !w.is_empty() && *w != "#pragma" && *w != "_" && !w.contains("shader_feature_local")
                })
                .map(str::to_string),
        );
    }
    longest_first(&mut keywords);
    keywords
}

/// Give a repeated fragment its own copy of every variable and local keyword.
///
/// Variables become `<name>_Ext_<n>` and keywords `<name>_DEF_<n>`;
/// `%STACKIDX%` becomes `n`.
pub fn rename_for_stack(mut fragment: FragmentBlock, stack_index: u32) -> FragmentBlock {
    let mut vars = extract_variable_names(&fragment.properties, &fragment.cbuffer);
    for text in fragment
        .custom_cbuffers
        .values()
        .chain(fragment.instanced_buffers.values())
    {
        vars.extend(extract_variable_names("", text));
    }
    longest_first(&mut vars);

    for var in &vars {
        let to = format!("{var}_Ext_{stack_index}");
        fragment.cbuffer = replace_variable(&fragment.cbuffer, var, &to);
        fragment.properties = replace_variable(&fragment.properties, var, &to);
        fragment.code = replace_variable(&fragment.code, var, &to);
        fragment.custom_cbuffers = fragment
            .custom_cbuffers
            .map_values(|text| replace_variable(text, var, &to));
        fragment.instanced_buffers = fragment
            .instanced_buffers
            .map_values(|text| replace_variable(text, var, &to));
    }

    for keyword in find_local_keywords(&fragment.defines) {
        let to = format!("{keyword}_DEF_{stack_index}");
        fragment.cbuffer = replace_variable(&fragment.cbuffer, &keyword, &to);
        fragment.properties = replace_variable(&fragment.properties, &keyword, &to);
        fragment.code = replace_variable(&fragment.code, &keyword, &to);
        fragment.defines = replace_variable(&fragment.defines, &keyword, &to);
    }

    let index = stack_index.to_string();
    fragment.cbuffer = fragment.cbuffer.replace("%STACKIDX%", &index);
    fragment.properties = fragment.properties.replace("%STACKIDX%", &index);
    fragment.code = fragment.code.replace("%STACKIDX%", &index);
    fragment.defines = fragment.defines.replace("%STACKIDX%", &index);

    fragment.stack_index = Some(stack_index);
    fragment
}

/// Rename hook functions defined in `fragment` to `Ext_<Hook><counter>`.
///
/// Returns the fragment and the next counter, which only advances when at
/// least one hook was found.
pub fn chain_hook_functions(mut fragment: FragmentBlock, counter: u32) -> (FragmentBlock, u32) {
    let code = strip_comments(&fragment.code);
    let mut chained = false;
    for hook in HOOK_FUNCTIONS {
        if code.contains(&format!(" {hook}")) {
            fragment.code = fragment.code.replace(hook, &format!("Ext_{hook}{counter} "));
            chained = true;
        }
    }
    let next = if chained { counter + 1 } else { counter };
    (fragment, next)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn longest_first(names: &mut Vec<String>) {
    let mut seen = hashbrown::HashSet::new();
    names.retain(|name| seen.insert(name.clone()));
    names.sort_by(|a, b| b.len().cmp(&a.len()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_names() {
        let props = "\
   [HDR]_Color (\"Color\", Color) = (1,1,1,1)
   _MainTex(\"Albedo\", 2D) = \"white\" {}
   // _Commented (\"x\", Float) = 0
";
        let names = extract_variable_names(props, "");
        assert_eq!(names, vec!["_MainTex", "_Color"]);
    }

    #[test]
    fn test_cbuffer_names_and_suffixes() {
        let cbuffer = "\
   float4 _MainTex_ST;
   float4 _BumpMap_TexelSize ;
   half4 _Emission_HDR;
   float _Weights[4];
";
        let names = extract_variable_names("", cbuffer);
        assert_eq!(names, vec!["_Emission", "_MainTex", "_BumpMap", "_Weights"]);
    }

    #[test]
    fn test_instancing_macro_names() {
        let names = extract_variable_names("", "UNITY_DEFINE_INSTANCED_PROP(float4, _Tint);\n");
        assert_eq!(names, vec!["_Tint"]);
    }

    #[test]
    fn test_find_local_keywords() {
        let defines = "#pragma shader_feature_local _ _DETAIL _DETAIL_NORMAL\n#define X 1\n";
        assert_eq!(find_local_keywords(defines), vec!["_DETAIL_NORMAL", "_DETAIL"]);
    }

    #[test]
    fn test_rename_longest_first() {
        let mut block = FragmentBlock::new("layer.surfshader");
        block.properties = "Foo(\"Foo\", Float) = 0\nFooBar(\"FooBar\", Float) = 0\n".into();
        block.cbuffer = "float Foo;\nfloat FooBar;\n".into();
        block.code = "o.Albedo = Foo * FooBar;\n".into();

        let block = rename_for_stack(block, 1);
        assert_eq!(block.code, "o.Albedo = Foo_Ext_1 * FooBar_Ext_1;\n");
        assert!(!block.cbuffer.contains("Foo_Ext_1Bar"));
        assert_eq!(block.stack_index, Some(1));
    }

    #[test]
    fn test_rename_keywords_and_stack_token() {
        let mut block = FragmentBlock::new("layer.surfshader");
        block.defines = "#pragma shader_feature_local _ _GLOW\n".into();
        block.code = "#if _GLOW\nfloat layer = %STACKIDX%;\n#endif\n".into();

        let block = rename_for_stack(block, 3);
        assert_eq!(block.defines, "#pragma shader_feature_local _ _GLOW_DEF_3\n");
        assert_eq!(block.code, "#if _GLOW_DEF_3\nfloat layer = 3;\n#endif\n");
    }

    #[test]
    fn test_chain_hook_functions() {
        let mut block = FragmentBlock::new("a.surfshader");
        block.code = "void SurfaceFunction(inout Surface o, ShaderData d) {}\n".into();
        let (block, next) = chain_hook_functions(block, 0);
        assert_eq!(next, 1);
        assert_eq!(block.code, "void Ext_SurfaceFunction0 (inout Surface o, ShaderData d) {}\n");

        let mut other = FragmentBlock::new("b.surfshader");
        other.code = "// void SurfaceFunction() {}\nfloat x;\n".into();
        let (other, next) = chain_hook_functions(other, next);
        assert_eq!(next, 1);
        assert!(other.code.contains("// void SurfaceFunction"));
    }
}
