//! Archive placement for resolved calibration files
//!
//! The resolver answers "where does this file live"; this module puts it
//! there. The registry consuming the destinations is a separate system.

use calib_common::Result;
use std::path::Path;
use tracing::info;

/// Copy one file to its resolved destination, creating parent
/// directories as needed.
pub fn copy_into_archive(source: &Path, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(source, destination)?;
    info!(
        source = %source.display(),
        destination = %destination.display(),
        "Copied into archive"
    );
    Ok(())
}
