//! Normalized per-extension calibration metadata
//!
//! One `CalibRecord` is produced for each extension of a candidate file
//! (or a single record when the file carries everything in its primary
//! header). Records are immutable after translation and consumed once by
//! destination resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Observation date in ISO `YYYY-MM-DD` form, or the `"unknown"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalibDate {
    Known(String),
    Unknown,
}

impl CalibDate {
    pub fn is_unknown(&self) -> bool {
        matches!(self, CalibDate::Unknown)
    }
}

impl fmt::Display for CalibDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibDate::Known(date) => f.write_str(date),
            CalibDate::Unknown => f.write_str("unknown"),
        }
    }
}

/// Filter name: a physical band, `"NONE"` for zero/bias frames (which
/// have no meaningful filter), or the `"unknown"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterName {
    Band(String),
    NotApplicable,
    Unknown,
}

impl fmt::Display for FilterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterName::Band(name) => f.write_str(name),
            FilterName::NotApplicable => f.write_str("NONE"),
            FilterName::Unknown => f.write_str("unknown"),
        }
    }
}

/// Normalized identifying metadata for one file extension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibRecord {
    /// Source file location; identical on every record from one file
    pub path: PathBuf,

    /// Extension index this record describes; 1 when the source cannot
    /// report it
    pub calib_hdu: i64,

    /// Observation date; `None` when no source yielded one
    pub calib_date: Option<CalibDate>,

    /// Filter name; `None` when no source yielded one
    pub filter: Option<FilterName>,

    /// Detector identifier; `None` if unresolvable
    pub ccdnum: Option<i64>,

    /// Internal extension label (EXTNAME), when present
    pub extension_name: Option<String>,
}

impl CalibRecord {
    /// New record for `path` with default extension index and all
    /// metadata fields absent.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            calib_hdu: 1,
            calib_date: None,
            filter: None,
            ccdnum: None,
            extension_name: None,
        }
    }

    /// Date rendered for template expansion (`"unknown"` when absent).
    pub fn calib_date_str(&self) -> String {
        self.calib_date
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Filter rendered for template expansion (`"unknown"` when absent).
    pub fn filter_str(&self) -> String {
        self.filter
            .as_ref()
            .map(|f| f.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_rendering() {
        assert_eq!(CalibDate::Unknown.to_string(), "unknown");
        assert_eq!(CalibDate::Known("2020-05-13".into()).to_string(), "2020-05-13");
        assert_eq!(FilterName::NotApplicable.to_string(), "NONE");
        assert_eq!(FilterName::Unknown.to_string(), "unknown");
        assert_eq!(FilterName::Band("g".into()).to_string(), "g");
    }

    #[test]
    fn test_new_record_defaults() {
        let record = CalibRecord::new("/data/flat.fits");
        assert_eq!(record.calib_hdu, 1);
        assert_eq!(record.calib_date_str(), "unknown");
        assert_eq!(record.filter_str(), "unknown");
        assert_eq!(record.ccdnum, None);
    }
}
