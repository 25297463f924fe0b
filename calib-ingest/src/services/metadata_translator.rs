//! Metadata translation for calibration products
//!
//! Derives a normalized `CalibRecord` per file extension. Each field is
//! extracted through a fixed precedence of sources: the direct header
//! keyword first, then the packed CALIB_ID identifier, then a sentinel.
//! A `YYYY-MM-DD` substring of the filename fills `calib_date` as a last
//! resort, never overwriting a date found in a header.

use calib_common::header::{CardValue, FitsHeader, Hdu, HeaderSource};
use calib_common::{Error, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::warn;

use crate::models::{CalibDate, CalibRecord, FilterName};

/// `YYYY-MM-DD` digit run, as found in DATE-OBS values and filenames.
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("date pattern is valid")
});

/// Extension index substituted for products lacking extension bookkeeping.
const DEFAULT_CALIB_HDU: i64 = 1;

/// First `YYYY-MM-DD` substring of `text` that is a real calendar date.
///
/// Stricter than a bare digit-run match: impossible dates such as
/// `2020-13-45` are rejected and fall through to the caller's
/// unknown-date handling.
fn find_iso_date(text: &str) -> Option<&str> {
    DATE_RE
        .find(text)
        .map(|m| m.as_str())
        .filter(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok())
}

/// Filter-name normalization fallback.
///
/// DECam FILTER values carry a full description
/// ("g DECam SDSS c0001 4720.0 1520.0"); normalization reduces that to a
/// mere filter name. Pluggable so an orchestrator can substitute its own
/// instrument policy.
pub trait FilterNormalizer {
    fn normalize(&self, raw: &str) -> FilterName;
}

/// Default normalization: trim and keep the first whitespace-delimited
/// token.
#[derive(Debug, Clone, Default)]
pub struct FirstTokenNormalizer;

impl FilterNormalizer for FirstTokenNormalizer {
    fn normalize(&self, raw: &str) -> FilterName {
        match raw.split_whitespace().next() {
            Some(token) => FilterName::Band(token.to_string()),
            None => FilterName::Unknown,
        }
    }
}

/// Metadata translator service
pub struct MetadataTranslator {
    normalizer: Box<dyn FilterNormalizer + Send + Sync>,
}

impl MetadataTranslator {
    /// Create a translator with the default filter normalization.
    pub fn new() -> Self {
        Self {
            normalizer: Box::new(FirstTokenNormalizer),
        }
    }

    /// Create a translator with a custom filter normalization fallback.
    pub fn with_normalizer(normalizer: Box<dyn FilterNormalizer + Send + Sync>) -> Self {
        Self { normalizer }
    }

    /// Translate one file into a primary record plus per-extension records.
    ///
    /// **Algorithm:**
    /// 1. Build a record from the primary header and one per extension HDU.
    /// 2. If there are no extension HDUs, the primary record doubles as
    ///    the sole extension record (single-extension CP products carry
    ///    all data in the primary header).
    /// 3. Every record gets `path`; `calib_hdu` comes from the reported
    ///    extension index, defaulting to 1.
    /// 4. A `YYYY-MM-DD` substring of the filename fills `calib_date` on
    ///    records where it is still absent or `"unknown"`; header-derived
    ///    dates already in place are left untouched.
    pub fn translate(
        &self,
        path: &Path,
        primary: &FitsHeader,
        hdus: &[Hdu],
    ) -> Result<(CalibRecord, Vec<CalibRecord>)> {
        let primary_record = self.record_from(path, primary, None);

        let mut records: Vec<CalibRecord> = if hdus.is_empty() {
            vec![primary_record.clone()]
        } else {
            hdus.iter()
                .map(|hdu| self.record_from(path, &hdu.header, hdu.index))
                .collect()
        };

        if let Some(date) = find_iso_date(&path.to_string_lossy()) {
            for record in &mut records {
                let absent_or_unknown = record
                    .calib_date
                    .as_ref()
                    .map_or(true, CalibDate::is_unknown);
                if absent_or_unknown {
                    record.calib_date = Some(CalibDate::Known(date.to_string()));
                }
            }
        }

        // Single-extension products: the sole record stands in for the
        // primary as well, filename date included.
        let primary_record = if hdus.is_empty() {
            records.first().cloned().unwrap_or(primary_record)
        } else {
            primary_record
        };

        Ok((primary_record, records))
    }

    /// Build one record from a single header, degrading field-by-field:
    /// a failed field translation is logged and leaves that field absent,
    /// never aborting the record.
    fn record_from(&self, path: &Path, md: &FitsHeader, index: Option<i64>) -> CalibRecord {
        let mut record = CalibRecord::new(path);
        record.calib_hdu = index.unwrap_or(DEFAULT_CALIB_HDU);

        match self.translate_ccdnum(md) {
            Ok(ccdnum) => record.ccdnum = ccdnum,
            Err(e) => warn!(path = %path.display(), error = %e, "ccdnum translation failed"),
        }
        match self.translate_date(md) {
            Ok(date) => record.calib_date = Some(date),
            Err(e) => warn!(path = %path.display(), error = %e, "calibDate translation failed"),
        }
        match self.translate_filter(md) {
            Ok(filter) => record.filter = Some(filter),
            Err(e) => warn!(path = %path.display(), error = %e, "filter translation failed"),
        }
        if md.exists("EXTNAME") {
            match self.extension_name(md) {
                Ok(name) => record.extension_name = Some(name),
                Err(e) => warn!(path = %path.display(), error = %e, "EXTNAME translation failed"),
            }
        }

        record
    }

    /// CCDNUM as a single integer.
    ///
    /// Some MasterCal products from the NOAO archive carry two CCDNUM
    /// cards per HDU; those surface as a sequence and only the first
    /// entry counts (`None` when the sequence is empty). Falls back to
    /// the CALIB_ID `ccdnum` token when the keyword is absent.
    pub fn translate_ccdnum(&self, md: &dyn HeaderSource) -> Result<Option<i64>> {
        let value = match md.get("CCDNUM") {
            Some(value) => value,
            None => {
                let token = self.from_calib_id(md, "ccdnum")?;
                let ccdnum = token.parse::<i64>().map_err(|_| {
                    Error::InvalidInput(format!("CALIB_ID ccdnum '{}' is not an integer", token))
                })?;
                return Ok(Some(ccdnum));
            }
        };

        match value {
            CardValue::Sequence(values) => Ok(values.first().and_then(CardValue::as_int)),
            scalar => Ok(scalar.as_int()),
        }
    }

    /// Observation date as `YYYY-MM-DD`.
    ///
    /// DATE-OBS first; a non-textual value or one without a valid ISO
    /// date is recovered to `"unknown"` with a warning. Falls back to
    /// the CALIB_ID `calibDate` token, then to the sentinel.
    pub fn translate_date(&self, md: &dyn HeaderSource) -> Result<CalibDate> {
        if md.exists("DATE-OBS") {
            let raw = md.get("DATE-OBS").and_then(CardValue::as_str);
            match raw.and_then(find_iso_date) {
                Some(date) => Ok(CalibDate::Known(date.to_string())),
                None => {
                    warn!(value = ?raw, "DATE-OBS does not match format YYYY-MM-DD");
                    Ok(CalibDate::Unknown)
                }
            }
        } else if md.exists("CALIB_ID") {
            Ok(CalibDate::Known(self.from_calib_id(md, "calibDate")?))
        } else {
            Ok(CalibDate::Unknown)
        }
    }

    /// Filter name.
    ///
    /// Zero/bias frames (OBSTYPE containing "zero") have no meaningful
    /// filter and force `"NONE"` regardless of the FILTER value; other
    /// frames go through the pluggable normalization. Falls back to the
    /// CALIB_ID `filter` token, then to the sentinel.
    pub fn translate_filter(&self, md: &dyn HeaderSource) -> Result<FilterName> {
        if md.exists("FILTER") {
            if let Some(obstype) = md.get("OBSTYPE").and_then(CardValue::as_str) {
                if obstype.trim().to_lowercase().contains("zero") {
                    return Ok(FilterName::NotApplicable);
                }
            }
            let raw = md.get_str("FILTER")?;
            Ok(self.normalizer.normalize(raw))
        } else if md.exists("CALIB_ID") {
            Ok(FilterName::Band(self.from_calib_id(md, "filter")?))
        } else {
            Ok(FilterName::Unknown)
        }
    }

    /// The EXTNAME card.
    pub fn extension_name(&self, md: &dyn HeaderSource) -> Result<String> {
        Ok(md.get_str("EXTNAME")?.to_string())
    }

    /// Fetch one field from the packed CALIB_ID identifier.
    ///
    /// CALIB_ID is a single string of `key=value` tokens written by the
    /// calibration construction pipeline. Callers must verify the
    /// keyword exists first; a missing identifier or token propagates as
    /// `Error::MissingKeyword`.
    pub fn from_calib_id(&self, md: &dyn HeaderSource, field: &str) -> Result<String> {
        let packed = md.get_str("CALIB_ID")?;
        let pattern = Regex::new(&format!(r"{}=(\S+)", regex::escape(field)))
            .map_err(|e| Error::InvalidInput(format!("Bad CALIB_ID field '{}': {}", field, e)))?;
        let caps = pattern.captures(packed).ok_or_else(|| {
            Error::MissingKeyword(format!("CALIB_ID field '{}'", field))
        })?;
        Ok(caps[1].to_string())
    }
}

impl Default for MetadataTranslator {
    fn default() -> Self {
        Self::new()
    }
}
