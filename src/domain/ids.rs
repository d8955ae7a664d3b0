//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers carried by the control table.
//! Each type trims its input and rejects empty values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Donor user identifier newtype wrapper
///
/// This is the platform user ID of the data subject. It is PHI: it is
/// used as part of the hash input and to locate the donor CSV, but it never
/// appears in exported files or log fields.
///
/// # Examples
///
/// ```
/// use donor_export::domain::ids::UserId;
/// use std::str::FromStr;
///
/// let user_id = UserId::from_str("0d4524bc11").unwrap();
/// assert_eq!(user_id.as_str(), "0d4524bc11");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err("User ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the user ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Pre-computed anonymous donor identifier
///
/// Produced upstream alongside the control table and used in output file names.
///
/// # Examples
///
/// ```
/// use donor_export::domain::ids::HashId;
/// use std::str::FromStr;
///
/// let hash_id = HashId::from_str("a1b2c3d4e5").unwrap();
/// assert_eq!(hash_id.to_string(), "a1b2c3d4e5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashId(String);

impl HashId {
    /// Creates a new HashId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err("Hash ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the hash ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HashId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HashId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Qualification tier of a donor (e.g. `D1`, `D2`)
///
/// The tier names the control-table columns holding the qualified date range
/// (`{tier}.qualified.beginDate` / `{tier}.qualified.endDate`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualificationTier(String);

impl QualificationTier {
    /// Tier assigned to donors that did not qualify
    pub const NOT_QUALIFIED: &'static str = "D0";

    /// Creates a new QualificationTier from a string
    pub fn new(tier: impl Into<String>) -> Result<Self, String> {
        let tier = tier.into().trim().to_string();
        if tier.is_empty() {
            return Err("Qualification tier cannot be empty".to_string());
        }
        Ok(Self(tier))
    }

    /// Returns the tier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this tier makes the donor eligible for export
    pub fn is_qualified(&self) -> bool {
        self.0 != Self::NOT_QUALIFIED
    }

    /// Control-table column holding the first qualified day
    pub fn begin_date_column(&self) -> String {
        format!("{}.qualified.beginDate", self.0)
    }

    /// Control-table column holding the last qualified day
    pub fn end_date_column(&self) -> String {
        format!("{}.qualified.endDate", self.0)
    }
}

impl fmt::Display for QualificationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QualificationTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_trims_and_rejects_empty() {
        let id = UserId::new("  abc123 ").unwrap();
        assert_eq!(id.as_str(), "abc123");
        assert!(UserId::new("   ").is_err());
        assert!(UserId::from_str("").is_err());
    }

    #[test]
    fn test_hash_id_display() {
        let id = HashId::from_str("f00dbabe").unwrap();
        assert_eq!(format!("{id}"), "f00dbabe");
        assert!(HashId::new("").is_err());
    }

    #[test]
    fn test_tier_qualification() {
        assert!(QualificationTier::new("D1").unwrap().is_qualified());
        assert!(!QualificationTier::new("D0").unwrap().is_qualified());
    }

    #[test]
    fn test_tier_date_columns() {
        let tier = QualificationTier::new("D2").unwrap();
        assert_eq!(tier.begin_date_column(), "D2.qualified.beginDate");
        assert_eq!(tier.end_date_column(), "D2.qualified.endDate");
    }
}
