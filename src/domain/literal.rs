//! Literal values embedded in cells
//!
//! Nested device fields reach the donor CSVs either as JSON or as Python
//! `repr` text: single-quoted strings, `True`/`False`/`None` and `nan`.
//! [`parse_literal`] accepts both.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// A quoted token found in a literal
pub(crate) struct Quoted {
    /// Byte range of the token's content, quotes excluded
    pub start: usize,
    pub end: usize,
    /// Nesting depth of `{`/`[` at the opening quote
    pub depth: usize,
}

/// Lists quoted string tokens, honoring backslash escapes
pub(crate) fn quoted_tokens(text: &str) -> Vec<Quoted> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            quote @ (b'\'' | b'"') => {
                let start = i + 1;
                let mut j = start;
                while j < bytes.len() && bytes[j] != quote {
                    if bytes[j] == b'\\' {
                        j += 1;
                    }
                    j += 1;
                }
                if j >= bytes.len() {
                    break;
                }
                tokens.push(Quoted {
                    start,
                    end: j,
                    depth,
                });
                i = j;
            }
            _ => {}
        }
        i += 1;
    }
    tokens
}

fn bare_words() -> &'static Regex {
    static WORDS: OnceLock<Regex> = OnceLock::new();
    WORDS.get_or_init(|| {
        Regex::new(r"\b(True|False|None|nan|NaN)\b").expect("bare word pattern is a valid regex")
    })
}

fn unescape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(escaped @ ('\\' | '\'' | '"')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn replace_bare_words(segment: &str, out: &mut String) {
    let replaced = bare_words().replace_all(segment, |caps: &regex::Captures<'_>| {
        match &caps[1] {
            "True" => "true",
            "False" => "false",
            _ => "null",
        }
    });
    out.push_str(&replaced);
}

/// Rewrites Python `repr` text as JSON
fn python_to_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for token in quoted_tokens(text) {
        replace_bare_words(&text[last..token.start - 1], &mut out);
        let content = unescape(&text[token.start..token.end]);
        match serde_json::to_string(&content) {
            Ok(quoted) => out.push_str(&quoted),
            Err(_) => out.push_str(&text[token.start - 1..=token.end]),
        }
        last = token.end + 1;
    }
    replace_bare_words(&text[last..], &mut out);
    out
}

/// Parses a JSON or Python literal
///
/// ```
/// use donor_export::domain::literal::parse_literal;
///
/// let value = parse_literal("{'reading': 120, 'ok': True, 'note': None}").unwrap();
/// assert_eq!(value["reading"], 120);
/// assert_eq!(value["ok"], true);
/// assert!(value["note"].is_null());
/// ```
pub fn parse_literal(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str(trimmed)
        .ok()
        .or_else(|| serde_json::from_str(&python_to_json(trimmed)).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json_literal() {
        assert_eq!(
            parse_literal(r#"{"calibration_reading": 120}"#),
            Some(json!({"calibration_reading": 120}))
        );
    }

    #[test]
    fn test_parse_python_dict() {
        assert_eq!(
            parse_literal("{'calibration_reading': 120, 'units': 'mg/dL'}"),
            Some(json!({"calibration_reading": 120, "units": "mg/dL"}))
        );
    }

    #[test]
    fn test_parse_python_list_of_dicts() {
        assert_eq!(
            parse_literal("[{'code': 'tandem/basal/x'}, {'code': 'other'}]"),
            Some(json!([{"code": "tandem/basal/x"}, {"code": "other"}]))
        );
    }

    #[test]
    fn test_bare_words_inside_strings_are_kept() {
        assert_eq!(
            parse_literal("{'note': 'None of True', 'flag': False, 'x': nan}"),
            Some(json!({"note": "None of True", "flag": false, "x": null}))
        );
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(
            parse_literal(r#"{'name': 'Kid\'s "day"'}"#),
            Some(json!({"name": "Kid's \"day\""}))
        );
    }

    #[test]
    fn test_not_a_literal() {
        assert_eq!(parse_literal(""), None);
        assert_eq!(parse_literal("{'open': "), None);
        assert_eq!(parse_literal("plain text"), None);
    }

    #[test]
    fn test_quoted_tokens_depth() {
        let text = "{'a': [{'b': 1}]}";
        let depths: Vec<_> = quoted_tokens(text)
            .iter()
            .map(|t| (&text[t.start..t.end], t.depth))
            .collect();
        assert_eq!(depths, vec![("a", 1), ("b", 2)]);
    }
}
