//! Per-type split of a donor's cleaned records
//!
//! Every output format is built from the same bundle: one dataframe per record
//! `type`, each sorted by `time`, with bolus calculator (wizard) records
//! folded into the bolus group.

use crate::domain::frame::{
    drop_empty_columns, has_column, set_text_column, sort_by_text, text_at, text_values,
};
use crate::domain::Result;
use polars::prelude::*;
use std::collections::BTreeMap;

/// Column that splits a donor's records into groups
pub const TYPE_COLUMN: &str = "type";

/// Column every group is sorted by
pub const TIME_COLUMN: &str = "time";

/// Wizard columns carried onto the bolus records they produced
pub const WIZARD_FIELDS: [&str; 15] = [
    "bgInput",
    "bgTarget.high",
    "bgTarget.low",
    "bgTarget.range",
    "bgTarget.target",
    "bolus",
    "carbInput",
    "calculatorId",
    "insulinCarbRatio",
    "insulinOnBoard",
    "insulinSensitivity",
    "recommended.carb",
    "recommended.correction",
    "recommended.net",
    "units",
];

/// Dataframes keyed by record type, in type-name order
#[derive(Debug, Clone, Default)]
pub struct ExportBundle {
    groups: BTreeMap<String, DataFrame>,
}

impl ExportBundle {
    /// Splits a donor's records by `type`
    ///
    /// Records without a type are left out. Each group is sorted by `time`
    /// and loses the columns that are empty for every record of the group.
    pub fn from_table(df: &DataFrame) -> Result<Self> {
        let mut groups = BTreeMap::new();
        if has_column(df, TYPE_COLUMN) {
            for group in df.partition_by_stable([TYPE_COLUMN], true)? {
                let Some(record_type) = text_at(&group, 0, TYPE_COLUMN).map(str::to_string) else {
                    continue;
                };
                let group = drop_empty_columns(&sort_by_text(&group, TIME_COLUMN)?)?;
                groups.insert(record_type, group);
            }
        }

        let mut bundle = Self { groups };
        bundle.merge_wizard_into_bolus()?;
        Ok(bundle)
    }

    /// Left-joins wizard details onto bolus records and drops the wizard group
    ///
    /// A bolus matches the wizard whose `bolus` field holds the bolus `id`.
    /// Other shared columns are suffixed `_x` on the bolus side and `_y` on
    /// the wizard side. When either join column is absent the groups are left
    /// as they are.
    fn merge_wizard_into_bolus(&mut self) -> Result<()> {
        let (Some(bolus), Some(wizard)) = (self.groups.get("bolus"), self.groups.get("wizard"))
        else {
            return Ok(());
        };
        if !has_column(bolus, "id") || !has_column(wizard, "bolus") {
            tracing::warn!(
                bolus_rows = bolus.height(),
                wizard_rows = wizard.height(),
                "Cannot link wizard records to boluses; exporting them separately"
            );
            return Ok(());
        }

        let mut wizard = wizard.clone();
        if has_column(&wizard, "id") {
            let ids = text_values(&wizard, "id");
            set_text_column(&mut wizard, "calculatorId", ids)?;
        }
        let picks: Vec<&str> = WIZARD_FIELDS
            .iter()
            .copied()
            .filter(|field| has_column(&wizard, field))
            .collect();
        let mut wizard = wizard.select(picks)?;

        let mut bolus = bolus.clone();
        let shared: Vec<String> = wizard
            .get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != "bolus" && has_column(&bolus, name))
            .map(|name| name.to_string())
            .collect();
        for name in &shared {
            bolus.rename(name, format!("{name}_x").into())?;
            wizard.rename(name, format!("{name}_y").into())?;
        }

        let wizard_rows = wizard.height();
        let args = JoinArgs {
            maintain_order: MaintainOrderJoin::Left,
            ..JoinArgs::new(JoinType::Left)
        };
        let mut merged = bolus
            .lazy()
            .join(wizard.lazy(), [col("id")], [col("bolus")], args)
            .collect()?;
        if has_column(&merged, "bolus") {
            merged.drop_in_place("bolus")?;
        }

        tracing::debug!(
            bolus_rows = merged.height(),
            wizard_rows,
            "Merged wizard records into bolus"
        );

        self.groups.insert("bolus".to_string(), merged);
        self.groups.remove("wizard");
        Ok(())
    }

    /// Groups in type-name order
    pub fn groups(&self) -> impl Iterator<Item = (&str, &DataFrame)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, record_type: &str) -> Option<&DataFrame> {
        self.groups.get(record_type)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total records across all groups
    pub fn row_count(&self) -> usize {
        self.groups.values().map(DataFrame::height).sum()
    }

    /// All groups stacked into one dataframe sorted by `time`
    ///
    /// Columns are the union of the groups' columns, in first-seen order.
    pub fn combined(&self) -> Result<DataFrame> {
        let frames: Vec<DataFrame> = self.groups.values().cloned().collect();
        if frames.is_empty() {
            return Ok(DataFrame::default());
        }
        let stacked = polars::functions::concat_df_diagonal(&frames)?;
        Ok(sort_by_text(&stacked, TIME_COLUMN)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::{add_row_index, column_names, frame};
    use crate::domain::ROW_INDEX_COLUMN;

    fn donor_frame() -> DataFrame {
        add_row_index(&frame(
            &["type", "time", "id", "value", "bolus", "carbInput", "normal"],
            &[
                &["cbg", "2017-01-02T00:00:00", "c1", "5.5", "", "", ""],
                &["bolus", "2017-01-01T08:00:00", "b1", "", "", "", "2.5"],
                &["wizard", "2017-01-01T08:00:00", "w1", "", "b1", "40", ""],
                &["cbg", "2017-01-01T00:00:00", "c0", "6.1", "", "", ""],
                &["", "2017-01-01T00:00:00", "x", "", "", "", ""],
            ],
        ))
        .unwrap()
    }

    #[test]
    fn test_groups_sorted_and_trimmed() {
        let bundle = ExportBundle::from_table(&donor_frame()).unwrap();

        let names: Vec<&str> = bundle.groups().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["bolus", "cbg"]);

        let cbg = bundle.get("cbg").unwrap();
        assert_eq!(
            column_names(cbg),
            vec![ROW_INDEX_COLUMN, "type", "time", "id", "value"]
        );
        assert_eq!(text_at(cbg, 0, "id"), Some("c0"));
        assert_eq!(text_at(cbg, 0, ROW_INDEX_COLUMN), Some("3"));
    }

    #[test]
    fn test_wizard_merged_into_bolus() {
        let bundle = ExportBundle::from_table(&donor_frame()).unwrap();

        assert!(bundle.get("wizard").is_none());
        let bolus = bundle.get("bolus").unwrap();
        assert!(!has_column(bolus, "bolus"));
        assert_eq!(text_at(bolus, 0, "carbInput"), Some("40"));
        assert_eq!(text_at(bolus, 0, "calculatorId"), Some("w1"));
        assert_eq!(text_at(bolus, 0, "normal"), Some("2.5"));
        assert_eq!(text_at(bolus, 0, ROW_INDEX_COLUMN), Some("1"));
    }

    #[test]
    fn test_shared_wizard_columns_are_suffixed() {
        let df = frame(
            &["type", "time", "id", "bolus", "units"],
            &[
                &["bolus", "t1", "b1", "", "U"],
                &["bolus", "t2", "b2", "", "U"],
                &["wizard", "t1", "w1", "b1", "mmol/L"],
            ],
        );

        let bundle = ExportBundle::from_table(&df).unwrap();

        let bolus = bundle.get("bolus").unwrap();
        assert_eq!(bolus.height(), 2);
        assert_eq!(text_at(bolus, 0, "units_x"), Some("U"));
        assert_eq!(text_at(bolus, 0, "units_y"), Some("mmol/L"));
        assert_eq!(text_at(bolus, 1, "id"), Some("b2"));
        assert_eq!(text_at(bolus, 1, "units_y"), None);
    }

    #[test]
    fn test_unlinked_wizard_kept_separate() {
        let df = frame(
            &["type", "time", "id", "carbInput"],
            &[&["bolus", "t1", "b1", ""], &["wizard", "t1", "w1", "10"]],
        );

        let bundle = ExportBundle::from_table(&df).unwrap();

        assert_eq!(bundle.len(), 2);
        assert!(bundle.get("wizard").is_some());
    }

    #[test]
    fn test_combined_sorted_by_time() {
        let bundle = ExportBundle::from_table(&donor_frame()).unwrap();
        let combined = bundle.combined().unwrap();

        assert_eq!(combined.height(), 3);
        assert_eq!(bundle.row_count(), 3);
        assert_eq!(
            text_values(&combined, "time"),
            vec![
                Some("2017-01-01T00:00:00".to_string()),
                Some("2017-01-01T08:00:00".to_string()),
                Some("2017-01-02T00:00:00".to_string())
            ]
        );
        assert_eq!(text_at(&combined, 0, "carbInput"), None);
        assert_eq!(text_at(&combined, 1, "carbInput"), Some("40"));
    }

    #[test]
    fn test_empty_bundle() {
        let bundle = ExportBundle::from_table(&frame(&["time"], &[&["t1"]])).unwrap();
        assert!(bundle.is_empty());
        assert_eq!(bundle.combined().unwrap().height(), 0);
    }
}
