//! Salted SHA-256 hashing of identifying fields

use crate::domain::frame::{has_column, map_text_column, non_null_count};
use polars::prelude::{DataFrame, PolarsResult};
use sha2::{Digest, Sha256};

/// Salted hasher bound to one data owner
///
/// Every value is hashed as `sha256(value + salt + user_id)` so the same device
/// serial number yields different tokens for different donors.
pub struct SaltedHasher<'a> {
    salt: &'a str,
    user_id: &'a str,
    length: usize,
}

impl<'a> SaltedHasher<'a> {
    pub fn new(salt: &'a str, user_id: &'a str, length: usize) -> Self {
        Self {
            salt,
            user_id,
            length,
        }
    }

    /// Hashes a single value
    pub fn hash(&self, value: &str) -> String {
        hash_value(value, self.salt, self.user_id, self.length)
    }
}

/// First `length` lowercase hex characters of `sha256(value + salt + user_id)`
///
/// # Examples
///
/// ```
/// use donor_export::anonymization::hashing::hash_value;
///
/// let token = hash_value("tandem12345", "pepper", "0d4524bc11", 8);
/// assert_eq!(token.len(), 8);
/// assert_eq!(token, hash_value("tandem12345", "pepper", "0d4524bc11", 8));
/// ```
pub fn hash_value(value: &str, salt: &str, user_id: &str, length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hasher.update(salt.as_bytes());
    hasher.update(user_id.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest.chars().take(length).collect()
}

/// Replaces every non-empty cell of each listed column with its hash
///
/// Columns that are not in the frame are skipped. Returns the number of cells
/// hashed per column, in `hash_fields` order.
pub fn hash_with_salt(
    df: &mut DataFrame,
    hash_fields: &[String],
    hasher: &SaltedHasher<'_>,
) -> PolarsResult<Vec<(String, usize)>> {
    let mut counts = Vec::with_capacity(hash_fields.len());
    for field in hash_fields {
        if !has_column(df, field) {
            continue;
        }
        let count = non_null_count(df, field);
        map_text_column(df, field, |value| hasher.hash(value))?;
        counts.push((field.clone(), count));
    }
    Ok(counts)
}
