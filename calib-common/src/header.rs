//! FITS header key/value abstractions
//!
//! Thin read-only view over a calibration file's metadata: existence
//! checks and scalar retrieval, nothing more. The on-disk FITS format is
//! external; headers arrive here already decoded into key/value form.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Error, Result};

/// A single header card value.
///
/// Some MasterCal products from the NOAO archive emit a keyword twice per
/// HDU; those surface as `Sequence`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardValue {
    Integer(i64),
    Float(f64),
    Logical(bool),
    Text(String),
    Sequence(Vec<CardValue>),
}

impl CardValue {
    /// Value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CardValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Value as text, if it is textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CardValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for CardValue {
    fn from(v: i64) -> Self {
        CardValue::Integer(v)
    }
}

impl From<f64> for CardValue {
    fn from(v: f64) -> Self {
        CardValue::Float(v)
    }
}

impl From<bool> for CardValue {
    fn from(v: bool) -> Self {
        CardValue::Logical(v)
    }
}

impl From<&str> for CardValue {
    fn from(v: &str) -> Self {
        CardValue::Text(v.to_string())
    }
}

impl From<String> for CardValue {
    fn from(v: String) -> Self {
        CardValue::Text(v)
    }
}

impl From<Vec<i64>> for CardValue {
    fn from(v: Vec<i64>) -> Self {
        CardValue::Sequence(v.into_iter().map(CardValue::Integer).collect())
    }
}

/// Read-only contract over a header's key/value metadata.
pub trait HeaderSource {
    /// Report whether a keyword is present.
    fn exists(&self, key: &str) -> bool;

    /// Fetch the value stored under `key`.
    fn get(&self, key: &str) -> Option<&CardValue>;

    /// Fetch `key` as text, failing when it is absent or not textual.
    fn get_str(&self, key: &str) -> Result<&str> {
        self.get(key)
            .and_then(CardValue::as_str)
            .ok_or_else(|| Error::MissingKeyword(key.to_string()))
    }
}

/// In-memory header: keyword → value map.
///
/// Deserializes directly from a JSON object as written by an external
/// header dumper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FitsHeader {
    cards: HashMap<String, CardValue>,
}

impl FitsHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a card, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<CardValue>) {
        self.cards.insert(key.into(), value.into());
    }

    /// Builder-style `set`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CardValue>) -> Self {
        self.set(key, value);
        self
    }
}

impl HeaderSource for FitsHeader {
    fn exists(&self, key: &str) -> bool {
        self.cards.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&CardValue> {
        self.cards.get(key)
    }
}

/// One extension HDU as reported by the external file reader.
///
/// `index` is `None` for older calibration products that lack extension
/// bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hdu {
    #[serde(default)]
    pub index: Option<i64>,
    pub header: FitsHeader,
}
