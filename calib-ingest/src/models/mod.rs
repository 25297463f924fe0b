//! Data models for calibration ingest

pub mod calib_record;
pub mod manifest;

pub use calib_record::{CalibDate, CalibRecord, FilterName};
pub use manifest::{CalibManifest, ManifestEntry};
