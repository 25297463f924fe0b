//! Destination resolution for calibration products
//!
//! Decides which calibration-type template applies to a translated
//! record and computes the canonical whole-file destination path.

use calib_common::{Error, Result};
use std::path::Path;
use tracing::debug;

use crate::models::CalibRecord;

/// Closed set of calibration kinds with a destination template.
///
/// Any new kind must be added here explicitly; there is no silent
/// fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibKind {
    Flat,
    Bias,
    IlluminationCorrection,
}

impl CalibKind {
    /// Classify a free-form calibration-type label.
    ///
    /// Case-insensitive substring dispatch: `flat`, `bias` or `zero`,
    /// `illumcor`. Anything else is a classification defect upstream and
    /// fails with `Error::InvalidCalibType`.
    pub fn classify(calib_type: &str) -> Result<Self> {
        let lower = calib_type.to_lowercase();
        if lower.contains("flat") {
            Ok(CalibKind::Flat)
        } else if lower.contains("bias") || lower.contains("zero") {
            Ok(CalibKind::Bias)
        } else if lower.contains("illumcor") {
            Ok(CalibKind::IlluminationCorrection)
        } else {
            Err(Error::InvalidCalibType(calib_type.to_string()))
        }
    }

    /// Template name used for destination lookup.
    pub fn template_name(self) -> &'static str {
        match self {
            CalibKind::Flat => "cpFlat_filename",
            CalibKind::Bias => "cpBias_filename",
            CalibKind::IlluminationCorrection => "cpIllumcor_filename",
        }
    }
}

/// Classifies a candidate file into a calibration-type label.
pub trait FileClassifier {
    fn calib_type(&self, path: &Path) -> Result<String>;
}

/// Labels a file by its name; CP products are named after their kind
/// ("cpBias", "cpFlat", ...), so the file name itself is the label.
#[derive(Debug, Clone, Default)]
pub struct FilenameClassifier;

impl FileClassifier for FilenameClassifier {
    fn calib_type(&self, path: &Path) -> Result<String> {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.to_string())
            .ok_or_else(|| Error::InvalidInput(format!("Invalid file name: {}", path.display())))
    }
}

/// Ordered destination-path candidates for a template name and a lookup
/// record. Must be safe for concurrent read access; the resolver always
/// uses the first candidate.
pub trait TemplateLookup {
    fn candidates(&self, template: &str, record: &CalibRecord) -> Result<Vec<String>>;
}

/// Destination resolver service
pub struct DestinationResolver<C: FileClassifier> {
    classifier: C,
}

impl<C: FileClassifier> DestinationResolver<C> {
    /// Create a resolver over a file classifier.
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// Compute the whole-file destination for a translated record.
    ///
    /// **Algorithm:**
    /// 1. Force `ccdnum` and `calib_hdu` to 1 on a lookup copy: the
    ///    template requires them populated, but the file-level
    ///    destination does not depend on per-extension values.
    /// 2. Classify the source file into a calibration kind; an
    ///    unrecognized label is fatal for this file.
    /// 3. Take the first candidate path for the kind's template.
    /// 4. Truncate any `[...]` extension selector so the path names the
    ///    whole file, not one internal extension.
    pub fn resolve(&self, record: &CalibRecord, templates: &dyn TemplateLookup) -> Result<String> {
        let mut lookup = record.clone();
        lookup.ccdnum = Some(1);
        lookup.calib_hdu = 1;

        let calib_type = self.classifier.calib_type(&lookup.path)?;
        let kind = CalibKind::classify(&calib_type)?;

        let candidates = templates.candidates(kind.template_name(), &lookup)?;
        let raw = candidates.into_iter().next().ok_or_else(|| {
            Error::Config(format!(
                "No destination candidate for template '{}'",
                kind.template_name()
            ))
        })?;

        let destination = match raw.find('[') {
            Some(pos) if pos > 0 => raw[..pos].to_string(),
            _ => raw,
        };

        debug!(
            source = %record.path.display(),
            kind = ?kind,
            destination = %destination,
            "Resolved destination"
        );

        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Classifier returning a fixed label regardless of path.
    struct FixedClassifier(&'static str);

    impl FileClassifier for FixedClassifier {
        fn calib_type(&self, _path: &Path) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    /// Lookup echoing the template name and the (forced) record fields.
    struct EchoLookup;

    impl TemplateLookup for EchoLookup {
        fn candidates(&self, template: &str, record: &CalibRecord) -> Result<Vec<String>> {
            Ok(vec![format!(
                "/archive/{}/ccd{}.fits[{}]",
                template,
                record.ccdnum.unwrap_or(0),
                record.calib_hdu
            )])
        }
    }

    #[test]
    fn test_classify_dispatch() {
        assert_eq!(CalibKind::classify("dome flat").unwrap(), CalibKind::Flat);
        assert_eq!(CalibKind::classify("BIAS").unwrap(), CalibKind::Bias);
        assert_eq!(CalibKind::classify("zero").unwrap(), CalibKind::Bias);
        assert_eq!(
            CalibKind::classify("illumcor g").unwrap(),
            CalibKind::IlluminationCorrection
        );
        assert!(matches!(
            CalibKind::classify("bar"),
            Err(Error::InvalidCalibType(_))
        ));
    }

    #[test]
    fn test_resolve_forces_ccdnum_and_hdu() {
        let mut record = CalibRecord::new("/data/file.fits");
        record.ccdnum = Some(42);
        record.calib_hdu = 7;

        let resolver = DestinationResolver::new(FixedClassifier("dome flat"));
        let destination = resolver.resolve(&record, &EchoLookup).unwrap();

        assert_eq!(destination, "/archive/cpFlat_filename/ccd1.fits");
        // The caller's record is untouched
        assert_eq!(record.ccdnum, Some(42));
        assert_eq!(record.calib_hdu, 7);
    }

    #[test]
    fn test_resolve_zero_uses_bias_template() {
        let record = CalibRecord::new("/data/file.fits");
        let resolver = DestinationResolver::new(FixedClassifier("zero"));

        let destination = resolver.resolve(&record, &EchoLookup).unwrap();
        assert!(destination.starts_with("/archive/cpBias_filename/"));
    }

    #[test]
    fn test_resolve_unknown_kind_is_fatal() {
        let record = CalibRecord::new("/data/file.fits");
        let resolver = DestinationResolver::new(FixedClassifier("bar"));

        assert!(matches!(
            resolver.resolve(&record, &EchoLookup),
            Err(Error::InvalidCalibType(_))
        ));
    }

    #[test]
    fn test_resolve_truncates_extension_selector() {
        struct BracketLookup;
        impl TemplateLookup for BracketLookup {
            fn candidates(&self, _: &str, _: &CalibRecord) -> Result<Vec<String>> {
                Ok(vec!["/archive/cpFlat/file.fits[1]".to_string()])
            }
        }

        let record = CalibRecord::new("/data/file.fits");
        let resolver = DestinationResolver::new(FixedClassifier("flat"));

        let destination = resolver.resolve(&record, &BracketLookup).unwrap();
        assert_eq!(destination, "/archive/cpFlat/file.fits");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let record = CalibRecord::new(PathBuf::from("/data/file.fits"));
        let resolver = DestinationResolver::new(FixedClassifier("illumcor"));

        let first = resolver.resolve(&record, &EchoLookup).unwrap();
        let second = resolver.resolve(&record, &EchoLookup).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_filename_classifier_uses_file_name() {
        let classifier = FilenameClassifier;
        let label = classifier
            .calib_type(Path::new("/data/cpBias-2018-05-30.fits"))
            .unwrap();
        assert_eq!(label, "cpBias-2018-05-30.fits");
        assert_eq!(CalibKind::classify(&label).unwrap(), CalibKind::Bias);
    }
}
