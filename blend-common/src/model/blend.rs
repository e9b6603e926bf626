//! Blend rows, snapshots and persisted records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use super::coerce;
use crate::{Error, Result};

/// Fixed number of coal rows on the entry form
pub const ROW_COUNT: usize = 3;

/// Mills fed by each coal row
pub const MILL_COUNT: usize = 6;

/// Message returned when `rows` or `flows` is not a list
pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid payload: rows[] and flows[] required";

/// Opaque record identifier assigned by the record store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlendId(String);

impl BlendId {
    /// Wrap an identifier received from the server or the operator
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocate a fresh identifier (UUIDv4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BlendId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One coal entry in a blend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendRow {
    #[serde(default, deserialize_with = "coerce::text")]
    pub coal: String,
    /// One percentage per mill; always [`MILL_COUNT`] long
    #[serde(default = "zero_percentages", deserialize_with = "mill_percentages")]
    pub percentages: Vec<f64>,
    #[serde(default, deserialize_with = "coerce::number")]
    pub gcv: f64,
    #[serde(default, deserialize_with = "coerce::number")]
    pub cost: f64,
}

impl Default for BlendRow {
    fn default() -> Self {
        Self {
            coal: String::new(),
            percentages: vec![0.0; MILL_COUNT],
            gcv: 0.0,
            cost: 0.0,
        }
    }
}

fn zero_percentages() -> Vec<f64> {
    vec![0.0; MILL_COUNT]
}

/// Coerced percentages padded with zeros or cut to one per mill
fn mill_percentages<'de, D>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut values = coerce::number_seq(deserializer)?;
    values.resize(MILL_COUNT, 0.0);
    Ok(values)
}

/// One submission captured from the entry form
///
/// Built fresh for every save attempt and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendSnapshot {
    pub rows: [BlendRow; ROW_COUNT],
    pub flows: Vec<f64>,
    pub generation: f64,
    /// Client capture time in ms since epoch; informational only
    pub ts: i64,
}

/// Validated create/update body as accepted by the server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendPayload {
    pub rows: Vec<BlendRow>,
    pub flows: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<f64>,
}

impl BlendPayload {
    /// Validate a raw JSON body.
    ///
    /// `rows` and `flows` must both be lists; row fields and flow readings
    /// are coerced leniently. Extra fields such as `ts` are ignored.
    pub fn from_value(body: &Value) -> Result<Self> {
        let rows = body.get("rows").and_then(Value::as_array);
        let flows = body.get("flows").and_then(Value::as_array);

        let (rows, flows) = match (rows, flows) {
            (Some(rows), Some(flows)) => (rows, flows),
            _ => return Err(Error::InvalidInput(INVALID_PAYLOAD_MESSAGE.to_string())),
        };

        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                BlendRow::deserialize(row)
                    .map_err(|e| Error::InvalidInput(format!("Invalid payload: rows[{}]: {}", i, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        let flows = flows
            .iter()
            .enumerate()
            .map(|(i, flow)| {
                coerce::value_to_f64(flow)
                    .map_err(|e| Error::InvalidInput(format!("Invalid payload: flows[{}]: {}", i, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        let generation = match body.get("generation") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                coerce::value_to_f64(value)
                    .map_err(|e| Error::InvalidInput(format!("Invalid payload: generation: {}", e)))?,
            ),
        };

        Ok(Self {
            rows,
            flows,
            generation,
        })
    }
}

/// Persisted blend as reported by Get-latest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendRecord {
    #[serde(rename = "_id")]
    pub id: BlendId,
    pub rows: Vec<BlendRow>,
    pub flows: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<f64>,
    /// Set once at creation; defines "latest" ordering
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Refreshed by every update
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
