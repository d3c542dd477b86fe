use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Record key as it appears in the asset files: numeric in practice, but
/// strings are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

/// One pin on the globe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationRecord {
    pub id: RecordId,
    pub location_name: String,
    pub branch_url: String,
    /// Degrees, -90..90.
    pub latitude: f64,
    /// Degrees, -180..180.
    pub longitude: f64,
}

/// Parses the `locations.json` array.
///
/// Coordinates are taken as-is; out-of-range values are not rejected.
pub fn parse_locations(payload: &str) -> Result<Vec<LocationRecord>, FormatError> {
    let records: Vec<LocationRecord> = serde_json::from_str(payload)?;
    log::debug!("parsed {} location records", records.len());
    Ok(records)
}
