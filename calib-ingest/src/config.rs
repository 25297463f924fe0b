//! Configuration for the calibration ingest driver
//!
//! TOML-backed: an optional archive root plus the destination path
//! template for each calibration kind. Defaults are compiled in; a
//! config file overrides them.

use calib_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::CalibRecord;
use crate::services::TemplateLookup;

/// Driver configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub templates: PathTemplateSet,
}

impl IngestConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read config failed: {}", e)))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Parse config failed: {}", e)))
    }
}

/// Destination path templates with `{calibDate}`, `{filter}`, `{ccdnum}`
/// and `{calibHdu}` placeholders.
///
/// These play the role of the archive mapper's policy templates; the
/// trailing `[{calibHdu}]` extension selector is stripped again by the
/// resolver, which wants whole-file paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathTemplateSet {
    /// Prefix prepended to every expanded template
    pub root: Option<PathBuf>,
    pub cp_flat: String,
    pub cp_bias: String,
    pub cp_illumcor: String,
}

impl Default for PathTemplateSet {
    fn default() -> Self {
        Self {
            root: None,
            cp_flat: "cpFlat/{calibDate}/{filter}/flat-{calibDate}-{ccdnum}.fits[{calibHdu}]"
                .to_string(),
            cp_bias: "cpBias/{calibDate}/zero-{calibDate}-{ccdnum}.fits[{calibHdu}]".to_string(),
            cp_illumcor:
                "cpIllumcor/{calibDate}/{filter}/illumcor-{calibDate}-{ccdnum}.fits[{calibHdu}]"
                    .to_string(),
        }
    }
}

impl PathTemplateSet {
    fn pattern_for(&self, template: &str) -> Result<&str> {
        match template {
            "cpFlat_filename" => Ok(&self.cp_flat),
            "cpBias_filename" => Ok(&self.cp_bias),
            "cpIllumcor_filename" => Ok(&self.cp_illumcor),
            other => Err(Error::Config(format!("Unknown template '{}'", other))),
        }
    }

    fn expand(&self, pattern: &str, record: &CalibRecord) -> String {
        let ccdnum = record
            .ccdnum
            .map_or_else(|| "unknown".to_string(), |v| v.to_string());
        let expanded = pattern
            .replace("{calibDate}", &record.calib_date_str())
            .replace("{filter}", &record.filter_str())
            .replace("{ccdnum}", &ccdnum)
            .replace("{calibHdu}", &record.calib_hdu.to_string());

        match &self.root {
            Some(root) => root.join(expanded).to_string_lossy().into_owned(),
            None => expanded,
        }
    }
}

impl TemplateLookup for PathTemplateSet {
    fn candidates(&self, template: &str, record: &CalibRecord) -> Result<Vec<String>> {
        let pattern = self.pattern_for(template)?;
        Ok(vec![self.expand(pattern, record)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalibDate, FilterName};

    fn record() -> CalibRecord {
        let mut record = CalibRecord::new("/data/cpFlat.fits");
        record.calib_date = Some(CalibDate::Known("2018-05-30".to_string()));
        record.filter = Some(FilterName::Band("g".to_string()));
        record.ccdnum = Some(1);
        record
    }

    #[test]
    fn test_default_template_expansion() {
        let templates = PathTemplateSet::default();
        let candidates = templates.candidates("cpFlat_filename", &record()).unwrap();

        assert_eq!(
            candidates,
            vec!["cpFlat/2018-05-30/g/flat-2018-05-30-1.fits[1]".to_string()]
        );
    }

    #[test]
    fn test_root_prefix() {
        let templates = PathTemplateSet {
            root: Some(PathBuf::from("/archive")),
            ..Default::default()
        };
        let candidates = templates.candidates("cpBias_filename", &record()).unwrap();

        assert!(candidates[0].starts_with("/archive/cpBias/2018-05-30/"));
    }

    #[test]
    fn test_unknown_template_is_config_error() {
        let templates = PathTemplateSet::default();
        assert!(matches!(
            templates.candidates("cpFringe_filename", &record()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_absent_fields_render_unknown() {
        let templates = PathTemplateSet::default();
        let bare = CalibRecord::new("/data/x.fits");
        let candidates = templates.candidates("cpFlat_filename", &bare).unwrap();

        assert_eq!(
            candidates,
            vec!["cpFlat/unknown/unknown/flat-unknown-unknown.fits[1]".to_string()]
        );
    }

    #[test]
    fn test_toml_override() {
        let config: IngestConfig = toml::from_str(
            r#"
            [templates]
            root = "/archive/decam"
            cp_bias = "bias/{calibDate}.fits"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.templates.root.as_deref(),
            Some(Path::new("/archive/decam"))
        );
        assert_eq!(config.templates.cp_bias, "bias/{calibDate}.fits");
        // Unset keys keep their defaults
        assert!(config.templates.cp_flat.starts_with("cpFlat/"));
    }
}
