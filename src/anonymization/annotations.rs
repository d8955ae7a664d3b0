//! Manufacturer names in annotation codes
//!
//! Device drivers tag odd records with codes such as
//! `medtronic/basal/fabricated-from-schedule`. The vendor prefix reveals the
//! donor's hardware and is dropped.

use crate::domain::frame::map_text_column;
use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use regex::Regex;

/// Columns holding annotation codes, including those of suppressed records
pub const ANNOTATION_CODE_COLUMNS: [&str; 3] = [
    "annotations.code",
    "suppressed.annotations.code",
    "suppressed.suppressed.annotations.code",
];

/// Strips configured manufacturer prefixes from annotation codes
#[derive(Debug, Clone)]
pub struct ManufacturerStripper {
    pattern: Option<Regex>,
}

impl ManufacturerStripper {
    /// Builds a stripper for the given prefixes, matched literally
    pub fn new(manufacturers: &[String]) -> Result<Self> {
        if manufacturers.is_empty() {
            return Ok(Self { pattern: None });
        }
        let alternation = manufacturers
            .iter()
            .map(|m| regex::escape(m))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation).context("Failed to compile manufacturer pattern")?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Removes every manufacturer occurrence from one code
    pub fn strip(&self, code: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern.replace_all(code, "").into_owned(),
            None => code.to_string(),
        }
    }

    /// Rewrites all annotation code columns present in `df`
    ///
    /// Returns the number of cells changed.
    pub fn remove_manufacturers_from_annotations_code(&self, df: &mut DataFrame) -> Result<usize> {
        let mut changed = 0;
        for column in ANNOTATION_CODE_COLUMNS {
            changed += map_text_column(df, column, |code| self.strip(code))
                .with_context(|| format!("Failed to rewrite {column}"))?;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::config::DEFAULT_MANUFACTURERS;
    use crate::domain::frame::{frame, text_at};
    use test_case::test_case;

    fn stripper() -> ManufacturerStripper {
        let list: Vec<String> = DEFAULT_MANUFACTURERS.iter().map(|m| m.to_string()).collect();
        ManufacturerStripper::new(&list).unwrap()
    }

    #[test_case("medtronic/basal/fabricated-from-schedule", "basal/fabricated-from-schedule")]
    #[test_case("tandem/bolus/extended", "bolus/extended")]
    #[test_case("carelink/wizard/long-bolus-id", "wizard/long-bolus-id")]
    #[test_case("basal/unknown-duration", "basal/unknown-duration")]
    #[test_case("animas/bayer/x", "x")]
    fn test_strip(input: &str, expected: &str) {
        assert_eq!(stripper().strip(input), expected);
    }

    #[test]
    fn test_prefixes_are_literal() {
        let stripper = ManufacturerStripper::new(&["a.b/".to_string()]).unwrap();
        assert_eq!(stripper.strip("axb/code"), "axb/code");
        assert_eq!(stripper.strip("a.b/code"), "code");
    }

    #[test]
    fn test_annotation_code_columns() {
        let mut df = frame(
            &["annotations.code", "suppressed.annotations.code", "type"],
            &[
                &["insulet/bolus/split", "medtronic/basal/x", "tandem/"],
                &["", "basal/y", "basal"],
            ],
        );

        let changed = stripper()
            .remove_manufacturers_from_annotations_code(&mut df)
            .unwrap();

        assert_eq!(changed, 2);
        assert_eq!(text_at(&df, 0, "annotations.code"), Some("bolus/split"));
        assert_eq!(text_at(&df, 0, "suppressed.annotations.code"), Some("basal/x"));
        assert_eq!(text_at(&df, 0, "type"), Some("tandem/"));
    }

    #[test]
    fn test_empty_list_is_noop() {
        let stripper = ManufacturerStripper::new(&[]).unwrap();
        assert_eq!(stripper.strip("tandem/x"), "tandem/x");
    }
}
