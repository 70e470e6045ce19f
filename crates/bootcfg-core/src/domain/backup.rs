//! Backup file naming.
//!
//! Every fix writes a full copy of the config file next to it, named
//!
//! ```text
//! <config file name>.backup.<YYYYMMDDHHMMSS>
//! config.txt.backup.20240101120000
//! ```
//!
//! The timestamp is fixed width, so sorting names lexicographically is the
//! same as sorting them chronologically.  [`BackupId`] derives `Ord` on the
//! parsed timestamp to make that explicit.

use std::fmt;

use chrono::{Duration, NaiveDateTime, Timelike};
use thiserror::Error;

/// Separator between the config file name and the timestamp.
pub const BACKUP_INFIX: &str = ".backup.";

/// `chrono` format of the timestamp suffix (second granularity).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

const TIMESTAMP_LEN: usize = 14;

/// Reasons a file name is not a backup name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BackupNameError {
    /// The name does not contain `.backup.`.
    #[error("not a backup file name: {0}")]
    MissingInfix(String),

    /// The name belongs to a different config file.
    #[error("backup {name} does not belong to {expected}")]
    ForeignConfig { name: String, expected: String },

    /// The suffix is not a 14-digit `YYYYMMDDHHMMSS` timestamp.
    #[error("invalid backup timestamp in {0}")]
    BadTimestamp(String),
}

/// Identifier of one backup: the config file name plus the creation time.
///
/// Field order matters: the derived ordering compares timestamps first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BackupId {
    timestamp: NaiveDateTime,
    config_name: String,
}

impl BackupId {
    /// Creates the id of a backup of `config_name` taken at `timestamp`.
    ///
    /// Sub-second precision is dropped.
    pub fn new(config_name: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        let timestamp = timestamp.with_nanosecond(0).unwrap_or(timestamp);
        Self {
            timestamp,
            config_name: config_name.into(),
        }
    }

    /// Parses any backup file name, whatever config file it belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`BackupNameError`] if the name lacks the infix or the
    /// timestamp is malformed.
    pub fn parse(file_name: &str) -> Result<Self, BackupNameError> {
        let (config_name, stamp) = file_name
            .rsplit_once(BACKUP_INFIX)
            .ok_or_else(|| BackupNameError::MissingInfix(file_name.to_string()))?;
        if config_name.is_empty() {
            return Err(BackupNameError::MissingInfix(file_name.to_string()));
        }
        let timestamp = stamp
            .parse_timestamp()
            .ok_or_else(|| BackupNameError::BadTimestamp(file_name.to_string()))?;
        Ok(Self {
            timestamp,
            config_name: config_name.to_string(),
        })
    }

    /// Parses `file_name` and checks it belongs to `config_name`.
    ///
    /// # Errors
    ///
    /// Returns [`BackupNameError::ForeignConfig`] if the name is a valid backup
    /// of another file, or any error from [`BackupId::parse`].
    pub fn parse_for(file_name: &str, config_name: &str) -> Result<Self, BackupNameError> {
        let id = Self::parse(file_name)?;
        if id.config_name != config_name {
            return Err(BackupNameError::ForeignConfig {
                name: file_name.to_string(),
                expected: config_name.to_string(),
            });
        }
        Ok(id)
    }

    /// The file name of this backup, e.g. `config.txt.backup.20240101120000`.
    pub fn file_name(&self) -> String {
        format!(
            "{}{}{}",
            self.config_name,
            BACKUP_INFIX,
            self.timestamp.format(TIMESTAMP_FORMAT)
        )
    }

    /// Name of the config file this backup was taken from.
    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    /// Creation time, second granularity, in local time.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// The id one second later; used to step past a name that is already taken.
    pub fn next_second(&self) -> Self {
        Self {
            timestamp: self.timestamp + Duration::seconds(1),
            config_name: self.config_name.clone(),
        }
    }
}

impl fmt::Display for BackupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// Strict `YYYYMMDDHHMMSS` parsing.  `chrono` alone accepts signs and
/// variable-width years, so the shape is checked first.
trait ParseTimestamp {
    fn parse_timestamp(&self) -> Option<NaiveDateTime>;
}

impl ParseTimestamp for str {
    fn parse_timestamp(&self) -> Option<NaiveDateTime> {
        if self.len() != TIMESTAMP_LEN || !self.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        NaiveDateTime::parse_from_str(self, TIMESTAMP_FORMAT).ok()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_file_name_uses_fixed_width_timestamp() {
        let id = BackupId::new("config.txt", at(2024, 1, 2, 3, 4, 5));
        assert_eq!(id.file_name(), "config.txt.backup.20240102030405");
        assert_eq!(id.to_string(), id.file_name());
    }

    #[test]
    fn test_new_drops_sub_second_precision() {
        let ts = at(2024, 1, 1, 12, 0, 0) + Duration::milliseconds(750);
        let id = BackupId::new("config.txt", ts);
        assert_eq!(id.timestamp(), at(2024, 1, 1, 12, 0, 0));
    }

    #[test]
    fn test_parse_recovers_config_name_and_timestamp() {
        let id = BackupId::parse("config.txt.backup.20240101120000").unwrap();
        assert_eq!(id.config_name(), "config.txt");
        assert_eq!(id.timestamp(), at(2024, 1, 1, 12, 0, 0));
    }

    #[test]
    fn test_parse_uses_last_infix_occurrence() {
        let id = BackupId::parse("config.txt.backup.20240101120000.backup.20240202120000").unwrap();
        assert_eq!(id.config_name(), "config.txt.backup.20240101120000");
    }

    #[test]
    fn test_parse_rejects_names_without_infix() {
        assert!(matches!(
            BackupId::parse("config.txt"),
            Err(BackupNameError::MissingInfix(_))
        ));
        assert!(matches!(
            BackupId::parse(".backup.20240101120000"),
            Err(BackupNameError::MissingInfix(_))
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_timestamps() {
        for name in [
            "config.txt.backup.2024010112000",
            "config.txt.backup.202401011200000",
            "config.txt.backup.+2024010112000",
            "config.txt.backup.20241301120000",
            "config.txt.backup.latest",
        ] {
            assert!(
                matches!(BackupId::parse(name), Err(BackupNameError::BadTimestamp(_))),
                "{name} must be rejected"
            );
        }
    }

    #[test]
    fn test_parse_for_rejects_other_config_files() {
        let result = BackupId::parse_for("cmdline.txt.backup.20240101120000", "config.txt");
        assert!(matches!(result, Err(BackupNameError::ForeignConfig { .. })));
    }

    #[test]
    fn test_ordering_is_chronological_and_matches_lexicographic_order() {
        let mut ids = vec![
            BackupId::new("config.txt", at(2024, 3, 1, 0, 0, 0)),
            BackupId::new("config.txt", at(2023, 12, 31, 23, 59, 59)),
            BackupId::new("config.txt", at(2024, 1, 1, 0, 0, 0)),
        ];
        let mut names: Vec<String> = ids.iter().map(BackupId::file_name).collect();

        ids.sort();
        names.sort();

        let sorted_names: Vec<String> = ids.iter().map(BackupId::file_name).collect();
        assert_eq!(sorted_names, names);
        assert_eq!(ids[0].timestamp(), at(2023, 12, 31, 23, 59, 59));
    }

    #[test]
    fn test_next_second_rolls_over_minute_boundary() {
        let id = BackupId::new("config.txt", at(2024, 1, 1, 12, 59, 59));
        assert_eq!(id.next_second().file_name(), "config.txt.backup.20240101130000");
    }
}
