use std::path::Path;

use tracing::warn;

use super::{FragmentBlock, ReadWarning};
use crate::error::{BuildError, Result};
use crate::text::{extract_between, starts_with_ci};

/// Split one source file into its named sections.
///
/// `.cginc` files are taken whole as defines. Otherwise every
/// `BEGIN_<NAME>` line opens a section that runs until the matching
/// `END_<NAME>` line; an argument in parentheses (`BEGIN_CBUFFER(Mine)`) is
/// not part of the end tag. Unknown section names are reported through
/// `warnings` and dropped.
pub fn parse_fragment(
    path: &Path,
    text: &str,
    warnings: &mut Vec<ReadWarning>,
) -> Result<FragmentBlock> {
    let mut block = FragmentBlock::new(path);

    if path.extension().is_some_and(|ext| ext == "cginc") {
        block.defines = text.to_string();
        return Ok(block);
    }

    let lines: Vec<&str> = text.lines().collect();
    let mut n = 0;
    while n < lines.len() {
        let line = lines[n].trim();
        n += 1;
        if !starts_with_ci(line, "BEGIN_") {
            continue;
        }

        let begin_line = n;
        let name = line["BEGIN_".len()..].trim();
        let end_tag = match name.find('(') {
            Some(paren) => format!("END_{}", name[..paren].trim()),
            None => format!("END_{name}"),
        };

        let mut body = String::new();
        let mut closed = false;
        while n < lines.len() {
            let inner = lines[n];
            n += 1;
            if starts_with_ci(inner.trim(), &end_tag) {
                closed = true;
                break;
            }
            body.push_str(inner);
            body.push('\n');
        }

        if !closed {
            return Err(BuildError::UnterminatedBlock {
                path: path.to_path_buf(),
                block: end_tag["END_".len()..].to_string(),
                line: begin_line,
            });
        }

        store_section(&mut block, name, body, warnings);
    }

    Ok(block)
}

fn store_section(block: &mut FragmentBlock, name: &str, body: String, warnings: &mut Vec<ReadWarning>) {
    let upper = name.to_ascii_uppercase();
    let has_arg = name.contains('(') && name.contains(')');
    let arg = || extract_between(name, '(', ')').replace('"', "").trim().to_string();

    match upper.as_str() {
        "CODE" => block.code = body,
        "PROPERTIES" => block.properties = body,
        "CBUFFER" => block.cbuffer = body,
        "BLACKBOARD" => block.blackboard = body,
        "CUSTOM_PASS" => block.custom_pass = body,
        "DEFINES" => block.defines = body,
        "SUBSHADER" | "SUBSHADERS" => block.subshader = body,
        "OPTIONS" => block.options = body,
        "PASS" => block.pass_blocks.insert("all", body),
        _ if has_arg && upper.starts_with("CBUFFER") => block.custom_cbuffers.insert(arg(), body),
        _ if has_arg && upper.starts_with("INSTANCING_BUFFER") => {
            block.instanced_buffers.insert(arg(), body)
        }
        _ if has_arg && upper.starts_with("PASS") => {
            let pass = arg();
            let pass = if pass.is_empty() {
                "all".to_string()
            } else {
                pass.to_lowercase()
            };
            block.pass_blocks.insert(pass, body);
        }
        _ => {
            warn!("Unknown block {} in {}, discarding", name, block.path.display());
            warnings.push(ReadWarning::UnknownBlock {
                path: block.path.clone(),
                name: name.to_string(),
            });
        }
    }
}
