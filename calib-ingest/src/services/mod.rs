//! Service modules for calibration ingest

pub mod archive_copier;
pub mod destination_resolver;
pub mod metadata_translator;

pub use archive_copier::copy_into_archive;
pub use destination_resolver::{
    CalibKind, DestinationResolver, FileClassifier, FilenameClassifier, TemplateLookup,
};
pub use metadata_translator::{FilterNormalizer, FirstTokenNormalizer, MetadataTranslator};
