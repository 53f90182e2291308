//! Map compiler messages on generated shaders back to the source files.
//!
//! The host compiler reports lines in the generated text. Those lines are
//! mostly copied verbatim from some include, so the few lines around the
//! reported one are searched for in every file that contributed to the build.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

/// Lines taken on each side of the reported line when searching sources.
const CONTEXT_LINES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One message from the host compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// 1-based line in the generated shader.
    pub line: usize,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, line: usize) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            line,
        }
    }

    pub fn warning(message: impl Into<String>, line: usize) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            line,
        }
    }
}

/// Where a generated line probably came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceHint {
    pub path: PathBuf,
    /// 1-based line in `path`.
    pub line: usize,
}

/// Search the contents of `sources` for the generated text around the
/// diagnostic's line.
///
/// The surrounding snippet is tried first; when it is not found anywhere the
/// reported line alone is matched, ignoring indentation.
pub fn locate_in(
    diagnostic: &Diagnostic,
    generated: &str,
    sources: &[(PathBuf, String)],
) -> Vec<SourceHint> {
    let lines: Vec<&str> = generated.lines().collect();
    if diagnostic.line == 0 || diagnostic.line > lines.len() {
        return Vec::new();
    }
    let target = diagnostic.line - 1;
    let first = target.saturating_sub(CONTEXT_LINES);
    let last = (target + CONTEXT_LINES).min(lines.len() - 1);
    let snippet = lines[first..=last].join("\n");

    let mut hints = Vec::new();
    if !snippet.trim().is_empty() {
        for (path, text) in sources {
            let text = text.replace("\r\n", "\n");
            if let Some(pos) = text.find(&snippet) {
                let start_line = text[..pos].matches('\n').count() + 1;
                hints.push(SourceHint {
                    path: path.clone(),
                    line: start_line + (target - first),
                });
            }
        }
    }
    if !hints.is_empty() {
        return hints;
    }

    let wanted = lines[target].trim();
    if wanted.is_empty() {
        return hints;
    }
    for (path, text) in sources {
        if let Some(n) = text.lines().position(|l| l.trim() == wanted) {
            hints.push(SourceHint {
                path: path.clone(),
                line: n + 1,
            });
        }
    }
    hints
}

/// [`locate_in`] over files on disk. Unreadable files are skipped.
pub fn locate(diagnostic: &Diagnostic, generated: &str, includes: &[PathBuf]) -> Vec<SourceHint> {
    let sources: Vec<(PathBuf, String)> = includes
        .iter()
        .filter_map(|path| match std::fs::read_to_string(path) {
            Ok(text) => Some((path.clone(), text)),
            Err(e) => {
                debug!("Skipping {} while locating diagnostic: {}", path.display(), e);
                None
            }
        })
        .collect();
    locate_in(diagnostic, generated, &sources)
}

/// Human-readable report for one diagnostic.
pub fn format_report(
    asset_path: &Path,
    diagnostic: &Diagnostic,
    hints: &[SourceHint],
    generated: &str,
) -> String {
    let kind = match diagnostic.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };
    let mut report = format!(
        "Shader {} in {}: {}\n  generated line {}",
        kind,
        asset_path.display(),
        diagnostic.message,
        diagnostic.line
    );
    for hint in hints {
        let _ = write!(report, "\n  found in {} at line {}", hint.path.display(), hint.line);
    }
    if let Some(line) = diagnostic
        .line
        .checked_sub(1)
        .and_then(|i| generated.lines().nth(i))
    {
        let _ = write!(report, "\n\n  {}", line.trim());
    }
    report
}

/// Locate and log every diagnostic, returning the reports.
pub fn relay(
    asset_path: &Path,
    diagnostics: &[Diagnostic],
    generated: &str,
    includes: &[PathBuf],
) -> Vec<String> {
    diagnostics
        .iter()
        .map(|diagnostic| {
            let hints = locate(diagnostic, generated, includes);
            let report = format_report(asset_path, diagnostic, &hints, generated);
            match diagnostic.severity {
                Severity::Error => error!("{}", report),
                Severity::Warning => warn!("{}", report),
            }
            report
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATED: &str = "\
header
   float4 c = tex2D(_MainTex, uv);
   c.rgb *= _Tint.rgb;
   o.Albedo = c.rgb
   o.Alpha = c.a;
   return o;
footer
";

    fn sources() -> Vec<(PathBuf, String)> {
        vec![
            (PathBuf::from("other.surfshader"), "BEGIN_CODE\nunrelated\nEND_CODE\n".into()),
            (
                PathBuf::from("layer.surfshader"),
                "BEGIN_CODE\nvoid SurfaceFunction()\n{\n   float4 c = tex2D(_MainTex, uv);\n   c.rgb *= _Tint.rgb;\n   o.Albedo = c.rgb\n   o.Alpha = c.a;\n   return o;\n}\nEND_CODE\n"
                    .into(),
            ),
        ]
    }

    #[test]
    fn test_snippet_match_maps_line() {
        let hints = locate_in(&Diagnostic::error("syntax error", 4), GENERATED, &sources());
        assert_eq!(
            hints,
            vec![SourceHint {
                path: PathBuf::from("layer.surfshader"),
                line: 6
            }]
        );
    }

    #[test]
    fn test_falls_back_to_single_line() {
        let generated = "renamed\n   c.rgb *= _Tint.rgb;\nchanged\n";
        let hints = locate_in(&Diagnostic::warning("implicit truncation", 2), generated, &sources());
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].line, 5);
    }

    #[test]
    fn test_out_of_range_line() {
        assert!(locate_in(&Diagnostic::error("x", 0), GENERATED, &sources()).is_empty());
        assert!(locate_in(&Diagnostic::error("x", 99), GENERATED, &sources()).is_empty());
    }

    #[test]
    fn test_report_lists_hints() {
        let hints = vec![SourceHint {
            path: PathBuf::from("layer.surfshader"),
            line: 6,
        }];
        let report = format_report(
            Path::new("Water.surfshader"),
            &Diagnostic::error("syntax error", 4),
            &hints,
            GENERATED,
        );
        assert!(report.starts_with("Shader error in Water.surfshader: syntax error"));
        assert!(report.contains("found in layer.surfshader at line 6"));
        assert!(report.ends_with("o.Albedo = c.rgb"));
    }
}
