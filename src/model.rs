//! Record types shared by the scraper, the persisted files and the HTTP API.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

use crate::UNKNOWN;

/// Identifier of a landmark. The grouped dataset uses region codes (`C-01`),
/// the flat dataset a running number (`1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LandmarkId {
    Sequence(u32),
    Code(String),
}

impl fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandmarkId::Sequence(n) => write!(f, "{n}"),
            LandmarkId::Code(code) => f.write_str(code),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Normal,
    Removed,
}

/// Marker position. An axis is `None` when the source had no value for it or the
/// landmark had no marker at all; on disk that shows up as `"Unknown"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default, serialize_with = "ser_axis", deserialize_with = "de_axis")]
    pub x: Option<Number>,
    #[serde(default, serialize_with = "ser_axis", deserialize_with = "de_axis")]
    pub y: Option<Number>,
    #[serde(default, serialize_with = "ser_axis", deserialize_with = "de_axis")]
    pub z: Option<Number>,
}

impl Coordinates {
    /// All three axes missing.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_known(&self) -> bool {
        self.x.is_some() && self.y.is_some() && self.z.is_some()
    }

    /// Numeric triple, if every axis is present.
    pub fn as_f64(&self) -> Option<(f64, f64, f64)> {
        Some((
            self.x.as_ref()?.as_f64()?,
            self.y.as_ref()?.as_f64()?,
            self.z.as_ref()?.as_f64()?,
        ))
    }
}

fn ser_axis<S: Serializer>(axis: &Option<Number>, s: S) -> Result<S::Ok, S::Error> {
    match axis {
        Some(n) => n.serialize(s),
        None => s.serialize_str(UNKNOWN),
    }
}

fn de_axis<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Number>, D::Error> {
    match Value::deserialize(d)? {
        Value::Number(n) => Ok(Some(n)),
        _ => Ok(None),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRecord {
    pub id: LandmarkId,
    pub name: String,
    pub grade: String,
    pub status: Status,
    pub coordinates: Coordinates,
}
