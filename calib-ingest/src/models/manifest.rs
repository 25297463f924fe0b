//! JSON manifest of candidate calibration files
//!
//! The calibration file format itself is external: an external header
//! dumper writes one JSON manifest describing each candidate file's
//! primary header and extension HDUs, and the driver consumes that.

use calib_common::header::{FitsHeader, Hdu};
use calib_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One candidate calibration file with its decoded headers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Source file location
    pub path: PathBuf,

    /// Primary header unit metadata
    pub primary: FitsHeader,

    /// Extension HDUs; empty for single-extension products
    #[serde(default)]
    pub extensions: Vec<Hdu>,
}

/// Candidate files awaiting translation and destination resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalibManifest {
    pub entries: Vec<ManifestEntry>,
}

impl CalibManifest {
    /// Load a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::InvalidInput(format!("Malformed manifest {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calib_common::header::HeaderSource;

    #[test]
    fn test_manifest_deserialization() {
        let manifest: CalibManifest = serde_json::from_str(
            r#"[
                {
                    "path": "/data/cpBias-2018-05-30.fits",
                    "primary": {"OBSTYPE": "zero", "FILTER": "solid plate 0.0 0.0"},
                    "extensions": [
                        {"index": 2, "header": {"EXTNAME": "S2", "CCDNUM": 2}}
                    ]
                },
                {
                    "path": "/data/cpFlat.fits",
                    "primary": {"FILTER": "g DECam SDSS c0001 4720.0 1520.0"}
                }
            ]"#,
        )
        .unwrap();

        assert_eq!(manifest.entries.len(), 2);
        assert_eq!(manifest.entries[0].extensions.len(), 1);
        assert_eq!(manifest.entries[0].extensions[0].index, Some(2));
        assert!(manifest.entries[1].extensions.is_empty());
        assert!(manifest.entries[1].primary.exists("FILTER"));
    }
}
