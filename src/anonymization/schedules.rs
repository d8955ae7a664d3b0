//! Hashing of user-chosen schedule names
//!
//! Pump settings carry schedules as dict literals keyed by names the user typed
//! on the device (`{'Weekend': [...], 'Standard': [...]}`). Those names can be
//! identifying, so each one is replaced by its salted hash wherever it appears
//! as a quoted token in the column.

use super::hashing::SaltedHasher;
use crate::domain::frame::{map_text_column, text_column};
use crate::domain::literal::quoted_tokens;
use polars::prelude::{DataFrame, PolarsResult};
use std::collections::{BTreeMap, BTreeSet};

/// Columns holding named schedules
pub const SCHEDULE_COLUMNS: [&str; 4] = [
    "basalSchedules",
    "bgTargets",
    "carbRatios",
    "insulinSensitivities",
];

/// Top-level keys of a dict literal
///
/// ```
/// use donor_export::anonymization::schedules::top_level_keys;
///
/// let keys = top_level_keys("{'Standard': [{'rate': 0.5}], \"Sick day\": []}");
/// assert_eq!(keys, vec!["Standard", "Sick day"]);
/// ```
pub fn top_level_keys(literal: &str) -> Vec<&str> {
    quoted_tokens(literal)
        .into_iter()
        .filter(|t| t.depth == 1 && literal[t.end + 1..].trim_start().starts_with(':'))
        .map(|t| &literal[t.start..t.end])
        .collect()
}

/// Rewrites every quoted token found in `replacements`
fn rewrite_tokens(text: &str, replacements: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for token in quoted_tokens(text) {
        if let Some(hashed) = replacements.get(&text[token.start..token.end]) {
            out.push_str(&text[last..token.start]);
            out.push_str(hashed);
            last = token.end;
        }
    }
    out.push_str(&text[last..]);
    out
}

/// Replaces schedule names in every schedule column with their hashes
///
/// Names are collected per column across all rows, so a name that only appears
/// as a value in one row is still rewritten when it is a key in another.
/// Returns the number of distinct names hashed.
pub fn hash_schedule_names(df: &mut DataFrame, hasher: &SaltedHasher<'_>) -> PolarsResult<usize> {
    let mut hashed = 0;
    for column in SCHEDULE_COLUMNS {
        let Some(literals) = text_column(df, column) else {
            continue;
        };
        let names: BTreeSet<String> = literals
            .into_iter()
            .flatten()
            .flat_map(|literal| top_level_keys(literal).into_iter().map(str::to_string))
            .collect();
        if names.is_empty() {
            continue;
        }

        let replacements: BTreeMap<String, String> = names
            .into_iter()
            .map(|name| {
                let token = hasher.hash(&name);
                (name, token)
            })
            .collect();
        hashed += replacements.len();
        map_text_column(df, column, |literal| rewrite_tokens(literal, &replacements))?;
    }
    Ok(hashed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::{frame, text_at};

    #[test]
    fn test_top_level_keys_ignores_nested() {
        let keys = top_level_keys("{'Standard': [{'rate': 0.5, 'start': 0}]}");
        assert_eq!(keys, vec!["Standard"]);
    }

    #[test]
    fn test_top_level_keys_handles_escapes() {
        let keys = top_level_keys(r#"{"Kid\"s": [], 'Night': []}"#);
        assert_eq!(keys, vec![r#"Kid\"s"#, "Night"]);
    }

    #[test]
    fn test_top_level_keys_not_a_dict() {
        assert!(top_level_keys("nan").is_empty());
        assert!(top_level_keys("['a', 'b']").is_empty());
    }

    #[test]
    fn test_hash_schedule_names_rewrites_keys_only() {
        let mut df = frame(
            &["basalSchedules", "activeSchedule"],
            &[
                &[
                    "{'Standard': [{'rate': 0.5, 'start': 0}], 'Weekend': []}",
                    "Standard",
                ],
                &["", ""],
            ],
        );
        let hasher = SaltedHasher::new("salt", "user", 8);

        let count = hash_schedule_names(&mut df, &hasher).unwrap();

        assert_eq!(count, 2);
        let expected = format!(
            "{{'{}': [{{'rate': 0.5, 'start': 0}}], '{}': []}}",
            hasher.hash("Standard"),
            hasher.hash("Weekend")
        );
        assert_eq!(text_at(&df, 0, "basalSchedules"), Some(expected.as_str()));
        assert_eq!(text_at(&df, 0, "activeSchedule"), Some("Standard"));
    }

    #[test]
    fn test_hash_schedule_names_leaves_substrings() {
        let mut df = frame(&["carbRatios"], &[&["{'A': [{'note': 'A day'}]}"]]);
        let hasher = SaltedHasher::new("salt", "user", 8);

        hash_schedule_names(&mut df, &hasher).unwrap();

        let expected = format!("{{'{}': [{{'note': 'A day'}}]}}", hasher.hash("A"));
        assert_eq!(text_at(&df, 0, "carbRatios"), Some(expected.as_str()));
    }
}
