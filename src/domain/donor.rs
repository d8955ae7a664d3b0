//! Donor export job
//!
//! A [`DonorJob`] is one qualified row of the control table: who to export,
//! which date window to keep and what to call the output.

use super::ids::{HashId, QualificationTier, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One donor to anonymize and export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorJob {
    /// Row label of the donor in the control table (`dIndex`)
    pub d_index: String,

    /// Platform user ID (PHI)
    pub user_id: UserId,

    /// Anonymous donor ID used in output names
    pub hash_id: HashId,

    /// Top qualification tier
    pub tier: QualificationTier,

    /// First qualified day (inclusive)
    pub start_date: NaiveDate,

    /// Last qualified day (inclusive, through 23:59:59)
    pub end_date: NaiveDate,
}

impl DonorJob {
    /// Base name shared by every file exported for this donor
    ///
    /// # Examples
    ///
    /// ```
    /// use donor_export::domain::{DonorJob, HashId, QualificationTier, UserId};
    /// use chrono::NaiveDate;
    ///
    /// let job = DonorJob {
    ///     d_index: "7".to_string(),
    ///     user_id: UserId::new("u-1").unwrap(),
    ///     hash_id: HashId::new("abcd1234").unwrap(),
    ///     tier: QualificationTier::new("D1").unwrap(),
    ///     start_date: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2017, 6, 30).unwrap(),
    /// };
    /// assert_eq!(job.output_name(), "D1_abcd1234");
    /// ```
    pub fn output_name(&self) -> String {
        format!("{}_{}", self.tier, self.hash_id)
    }

    /// File name of the donor's pre-flattened CSV in the donor folder
    pub fn source_file_name(&self) -> String {
        format!("PHI-{}.csv", self.user_id)
    }

    /// Lower bound of the qualified window as a timestamp prefix
    pub fn start_bound(&self) -> String {
        self.start_date.format("%Y-%m-%d").to_string()
    }

    /// Upper bound of the qualified window; includes the whole end day
    pub fn end_bound(&self) -> String {
        format!("{}T23:59:59", self.end_date.format("%Y-%m-%d"))
    }
}
