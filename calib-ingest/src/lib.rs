//! calib-ingest library interface
//!
//! Exposes the metadata-translation and destination-resolution services
//! for integration testing and for the CLI driver.

pub mod config;
pub mod models;
pub mod services;

pub use calib_common::{Error, Result};
