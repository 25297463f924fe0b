//! # Calibration Ingest Common Library
//!
//! Shared code for the calibration ingest tools:
//! - Error types
//! - FITS header key/value abstractions (`HeaderSource`, `FitsHeader`)

pub mod error;
pub mod header;

pub use error::{Error, Result};
