//! Text helpers shared by the block reader, option parser and builder.
//!
//! Everything here works on plain `&str` and returns fresh `String`s; no
//! helper mutates its input.

use std::path::{Component, Path, PathBuf};

/// Remove `//` line comments and `/* */` block comments.
///
/// String literals are copied through untouched so a `//` inside quotes
/// survives. Line comments keep their terminating newline and block comments
/// keep any newlines they span, so line numbers in the result match the input.
pub fn strip_comments(src: &str) -> String {
    let bytes = src.as_bytes();
    let mut out = String::with_capacity(src.len());
    let mut i = 0;
    let mut copied_from = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' && bytes[i] != b'\n' {
                    if bytes[i] == b'\\' && i + 1 < bytes.len() && bytes[i + 1] != b'\n' {
                        i += 1;
                    }
                    i += 1;
                }
                if i < bytes.len() && bytes[i] == b'"' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                out.push_str(&src[copied_from..i]);
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                copied_from = i;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                out.push_str(&src[copied_from..i]);
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    if bytes[i] == b'\n' {
                        out.push('\n');
                    }
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
                copied_from = i;
            }
            _ => i += 1,
        }
    }

    out.push_str(&src[copied_from..]);
    out
}

/// Text between the first `begin` and the first `end` after it.
///
/// Returns an empty string when either delimiter is missing.
pub fn extract_between(s: &str, begin: char, end: char) -> &str {
    let Some(start) = s.find(begin) else {
        return "";
    };
    let inner = &s[start + begin.len_utf8()..];
    match inner.find(end) {
        Some(stop) => &inner[..stop],
        None => "",
    }
}

/// Text between the first and the last occurrence of `quote`.
pub fn extract_quoted(s: &str, quote: char) -> Option<&str> {
    let start = s.find(quote)?;
    let stop = s.rfind(quote)?;
    if stop <= start {
        return None;
    }
    Some(&s[start + quote.len_utf8()..stop])
}

/// Remove every non-nested `begin ... end` span (delimiters included).
pub fn strip_between(s: &str, begin: char, end: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find(begin) {
        let after = &rest[start + begin.len_utf8()..];
        match after.find(end) {
            Some(stop) => {
                out.push_str(&rest[..start]);
                rest = &after[stop + end.len_utf8()..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Split into non-empty lines, treating both `\r` and `\n` as separators.
pub fn to_lines(s: &str) -> Vec<&str> {
    s.split(['\n', '\r']).filter(|l| !l.is_empty()).collect()
}

/// Replace every occurrence of `from` that is not followed by an ASCII letter
/// or digit.
///
/// Only the trailing edge is checked: `Foo` is replaced inside `Foo_ST` and
/// `MyFoo` but not inside `FooBar`. Callers rename longest names first.
pub fn replace_variable(s: &str, from: &str, to: &str) -> String {
    if from.is_empty() {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find(from) {
        let tail = &rest[pos + from.len()..];
        out.push_str(&rest[..pos]);
        if tail.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()) {
            out.push_str(from);
        } else {
            out.push_str(to);
        }
        rest = tail;
    }
    out.push_str(rest);
    out
}

/// Case-insensitive (ASCII) search for `needle` starting at byte `from`.
pub fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay = haystack.as_bytes();
    let pat = needle.as_bytes();
    if pat.is_empty() || from > hay.len() || pat.len() > hay.len() - from {
        return None;
    }
    (from..=hay.len() - pat.len()).find(|&i| hay[i..i + pat.len()].eq_ignore_ascii_case(pat))
}

/// ASCII case-insensitive `starts_with`.
pub fn starts_with_ci(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Every `%NAME%` placeholder left in `text`, in order, without duplicates.
///
/// A placeholder name starts with an upper-case ASCII letter and continues
/// with upper-case letters, digits or underscores.
pub fn unresolved_tokens(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut found: Vec<String> = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        if j < bytes.len() && bytes[j].is_ascii_uppercase() {
            while j < bytes.len()
                && (bytes[j].is_ascii_uppercase() || bytes[j].is_ascii_digit() || bytes[j] == b'_')
            {
                j += 1;
            }
            if j < bytes.len() && bytes[j] == b'%' {
                let token = &text[i..=j];
                if !found.iter().any(|t| t == token) {
                    found.push(token.to_string());
                }
                i = j + 1;
                continue;
            }
        }
        i += 1;
    }
    found
}

/// Make `path` absolute against the current directory and fold `.`/`..`
/// components without touching the file system.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments_keeps_line_count() {
        let src = "a // one\nb /* two\nthree */ c\n";
        let stripped = strip_comments(src);
        assert_eq!(stripped, "a \nb \n c\n");
        assert_eq!(stripped.lines().count(), src.lines().count());
    }

    #[test]
    fn test_strip_comments_ignores_strings() {
        let src = "ShaderName \"Tools//Thing\" // trailing";
        assert_eq!(strip_comments(src), "ShaderName \"Tools//Thing\" ");
    }

    #[test]
    fn test_extract_between() {
        assert_eq!(extract_between("CBUFFER(Mine)", '(', ')'), "Mine");
        assert_eq!(extract_between("CBUFFER", '(', ')'), "");
        assert_eq!(extract_between("Tags { \"A\" = \"B\" }", '{', '}'), " \"A\" = \"B\" ");
    }

    #[test]
    fn test_extract_quoted_uses_outer_quotes() {
        assert_eq!(extract_quoted("Key \"a \"b\" c\"", '"'), Some("a \"b\" c"));
        assert_eq!(extract_quoted("Key \"", '"'), None);
    }

    #[test]
    fn test_strip_between() {
        assert_eq!(strip_between("[HDR]_Color(\"C\", Color)", '[', ']'), "_Color(\"C\", Color)");
        assert_eq!(strip_between("[A][B] x", '[', ']'), " x");
    }

    #[test]
    fn test_to_lines_drops_empty() {
        assert_eq!(to_lines("a\r\n\r\nb\n"), vec!["a", "b"]);
    }

    #[test]
    fn test_replace_variable_trailing_boundary() {
        let src = "_Foo _FooBar _Foo_ST _Foo.x";
        assert_eq!(
            replace_variable(src, "_Foo", "_Foo_Ext_1"),
            "_Foo_Ext_1 _FooBar _Foo_Ext_1_ST _Foo_Ext_1.x"
        );
    }

    #[test]
    fn test_find_ci() {
        assert_eq!(find_ci("xx begin_SubShaders", "BEGIN_SUBSHADERS", 0), Some(3));
        assert_eq!(find_ci("abc", "abcd", 0), None);
        assert_eq!(find_ci("abcabc", "ABC", 1), Some(3));
    }

    #[test]
    fn test_unresolved_tokens() {
        let text = "a %CODE% b %CODE% 50% c %V2FUV0% %lower% %%";
        assert_eq!(unresolved_tokens(text), vec!["%CODE%", "%V2FUV0%"]);
    }

    #[test]
    fn test_normalize_path_folds_dots() {
        let p = normalize_path(Path::new("/a/b/./c/../d.surfshader"));
        assert_eq!(p, PathBuf::from("/a/b/d.surfshader"));
    }
}
