//! calib-ingest - calibration archive ingest driver
//!
//! Reads a JSON manifest of candidate calibration files (paths plus
//! decoded headers), translates each file's identifying metadata, and
//! resolves the archive destination. With `--copy` the files are also
//! copied into place; the registry consuming these destinations is a
//! separate system.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use calib_ingest::config::IngestConfig;
use calib_ingest::models::CalibManifest;
use calib_ingest::services::{
    copy_into_archive, DestinationResolver, FilenameClassifier, MetadataTranslator,
};

#[derive(Parser, Debug)]
#[command(name = "calib-ingest", about = "Resolve archive destinations for calibration files")]
struct Args {
    /// JSON manifest of candidate calibration files
    #[arg(long)]
    manifest: PathBuf,

    /// TOML configuration with destination templates
    #[arg(long)]
    config: Option<PathBuf>,

    /// Copy files into the archive instead of only reporting destinations
    #[arg(long)]
    copy: bool,

    /// Enable debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting calib-ingest");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => {
            info!("Config: {}", path.display());
            IngestConfig::load(path)?
        }
        None => IngestConfig::default(),
    };

    let manifest = CalibManifest::load(&args.manifest)?;
    info!(
        "Manifest: {} ({} files)",
        args.manifest.display(),
        manifest.entries.len()
    );

    let translator = MetadataTranslator::new();
    let resolver = DestinationResolver::new(FilenameClassifier);

    for entry in &manifest.entries {
        let (_primary, records) =
            translator.translate(&entry.path, &entry.primary, &entry.extensions)?;

        // All records from one file share a path; the file-level
        // destination is computed from the first.
        let record = match records.first() {
            Some(record) => record,
            None => continue,
        };

        // An unrecognized calibration kind aborts the run: it indicates a
        // classification defect, not bad data.
        let destination = resolver.resolve(record, &config.templates)?;
        info!(
            source = %entry.path.display(),
            destination = %destination,
            "Resolved"
        );

        if args.copy {
            copy_into_archive(&entry.path, Path::new(&destination))?;
        }
    }

    Ok(())
}
