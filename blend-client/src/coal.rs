//! Coal reference adapter
//!
//! The coal list comes from whichever reference endpoint answers, and its
//! envelope is not fixed. Accepted shapes, tried in this order:
//!
//! 1. a bare JSON list
//! 2. an object whose first list-valued key among [`ENVELOPE_KEYS`] holds it
//!
//! Anything else, and an empty list, means "no data". A lone object is never
//! treated as a one-element list.

use blend_common::model::coerce::value_to_f64;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::BlendClient;
use crate::error::CoalError;

/// Envelope keys in priority order
pub const ENVELOPE_KEYS: [&str; 7] = ["coals", "result", "data", "docs", "items", "list", "rows"];

/// Reference endpoints tried in order, relative to the API base
pub const COAL_ENDPOINTS: [&str; 4] = ["/coal", "/coals", "/coal/list", "/coalnames"];

/// Normalize a reference response to its list of entries
pub fn normalize_envelope(body: &Value) -> Option<Vec<Value>> {
    let list = match body {
        Value::Array(items) => items,
        Value::Object(map) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))?,
        _ => return None,
    };

    if list.is_empty() {
        None
    } else {
        Some(list.clone())
    }
}

/// Ash oxide composition, percent by mass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Oxides {
    pub sio2: f64,
    pub al2o3: f64,
    pub fe2o3: f64,
    pub cao: f64,
    pub mgo: f64,
    pub na2o: f64,
    pub k2o: f64,
    pub tio2: f64,
    pub so3: f64,
}

/// One normalized coal reference entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoalRef {
    pub id: String,
    pub name: String,
    pub gcv: f64,
    pub cost: f64,
    pub oxides: Oxides,
    /// Entry exactly as received
    pub raw: Value,
}

impl CoalRef {
    /// Normalize an entry whose field spellings vary by source
    pub fn from_value(entry: &Value) -> Self {
        let id = ["_id", "id", "coal"]
            .iter()
            .find_map(|key| entry.get(*key).and_then(id_text))
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let name = ["coal", "Coal", "name"]
            .iter()
            .find_map(|key| entry.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
            .unwrap_or_default()
            .to_string();

        Self {
            id,
            name,
            gcv: number(entry, &["gcv", "GCV"]),
            cost: number(entry, &["cost", "Cost"]),
            oxides: Oxides {
                sio2: number(entry, &["SiO2", "SiO₂"]),
                al2o3: number(entry, &["Al2O3", "Al₂O₃"]),
                fe2o3: number(entry, &["Fe2O3", "Fe₂O₃"]),
                cao: number(entry, &["CaO"]),
                mgo: number(entry, &["MgO"]),
                na2o: number(entry, &["Na2O", "Na₂O"]),
                k2o: number(entry, &["K2O", "K₂O"]),
                tio2: number(entry, &["TiO2", "TiO₂"]),
                so3: number(entry, &["SO3", "SO₃"]),
            },
            raw: entry.clone(),
        }
    }

    /// Label for selection lists
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            format!("Coal {}", self.id)
        } else {
            self.name.clone()
        }
    }
}

/// Ids may be strings, numbers, or `{"$oid": "..."}` documents
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("$oid").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// First present key that coerces to a number; 0 otherwise
fn number(entry: &Value, keys: &[&str]) -> f64 {
    keys.iter()
        .filter_map(|key| entry.get(*key))
        .find_map(|value| value_to_f64(value).ok().filter(|v| *v != 0.0))
        .unwrap_or(0.0)
}

/// Normalized coal reference list
#[derive(Debug, Clone, Default)]
pub struct CoalCatalog {
    coals: Vec<CoalRef>,
}

impl CoalCatalog {
    pub fn from_entries(entries: &[Value]) -> Self {
        Self {
            coals: entries.iter().map(CoalRef::from_value).collect(),
        }
    }

    /// Look up by id first, then by case-insensitive name
    pub fn find(&self, value: &str) -> Option<&CoalRef> {
        if value.is_empty() {
            return None;
        }
        self.coals.iter().find(|c| c.id == value).or_else(|| {
            let wanted = value.to_lowercase();
            self.coals.iter().find(|c| c.name.to_lowercase() == wanted)
        })
    }

    pub fn len(&self) -> usize {
        self.coals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coals.is_empty()
    }
}

impl BlendClient {
    /// Fetch the coal list from the first reference endpoint with data
    ///
    /// Never fails: an unreachable or empty reference yields an empty
    /// catalog and rows are simply not prefilled.
    pub async fn fetch_coal_catalog(&self) -> CoalCatalog {
        for path in COAL_ENDPOINTS {
            match self.fetch_coal_endpoint(path).await {
                Ok(Some(entries)) => {
                    info!(endpoint = path, count = entries.len(), "Loaded coal reference list");
                    return CoalCatalog::from_entries(&entries);
                }
                Ok(None) => debug!(endpoint = path, "Coal endpoint returned no list"),
                Err(e) => debug!(endpoint = path, "Coal endpoint failed: {}", e),
            }
        }

        warn!("No coal list found from any reference endpoint");
        CoalCatalog::default()
    }

    async fn fetch_coal_endpoint(&self, path: &str) -> Result<Option<Vec<Value>>, CoalError> {
        let response = self
            .http()
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(|e| CoalError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoalError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CoalError::Parse(e.to_string()))?;

        Ok(normalize_envelope(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_list() {
        let list = normalize_envelope(&json!([{"coal": "A"}])).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_envelope_priority_order() {
        let body = json!({
            "data": [{"coal": "from-data"}],
            "coals": [{"coal": "from-coals"}]
        });
        let list = normalize_envelope(&body).unwrap();
        assert_eq!(list[0]["coal"], "from-coals");

        let body = json!({"rows": [1], "items": [2]});
        assert_eq!(normalize_envelope(&body).unwrap(), vec![json!(2)]);
    }

    #[test]
    fn test_non_list_shapes_are_no_data() {
        assert!(normalize_envelope(&json!({"coal": "lonely", "gcv": 4000})).is_none());
        assert!(normalize_envelope(&json!({"data": {"coal": "nested object"}})).is_none());
        assert!(normalize_envelope(&json!("text")).is_none());
        assert!(normalize_envelope(&json!(null)).is_none());
    }

    #[test]
    fn test_empty_list_is_no_data() {
        assert!(normalize_envelope(&json!([])).is_none());
        assert!(normalize_envelope(&json!({"coals": []})).is_none());
    }

    #[test]
    fn test_coal_ref_field_variants() {
        let coal = CoalRef::from_value(&json!({
            "id": 17,
            "Coal": "Kalimantan",
            "GCV": "4300",
            "Cost": 2.75,
            "SiO₂": 40.5,
            "Al2O3": "22",
            "Fe₂O₃": 8
        }));

        assert_eq!(coal.id, "17");
        assert_eq!(coal.name, "Kalimantan");
        assert_eq!(coal.gcv, 4300.0);
        assert_eq!(coal.cost, 2.75);
        assert_eq!(coal.oxides.sio2, 40.5);
        assert_eq!(coal.oxides.al2o3, 22.0);
        assert_eq!(coal.oxides.fe2o3, 8.0);
        assert_eq!(coal.oxides.cao, 0.0);
    }

    #[test]
    fn test_coal_ref_object_id_and_fallback() {
        let coal = CoalRef::from_value(&json!({"_id": {"$oid": "65a1"}, "name": "X"}));
        assert_eq!(coal.id, "65a1");

        let by_name = CoalRef::from_value(&json!({"coal": "Named"}));
        assert_eq!(by_name.id, "Named");

        let anonymous = CoalRef::from_value(&json!({"gcv": "bad"}));
        assert!(!anonymous.id.is_empty());
        assert_eq!(anonymous.gcv, 0.0);
        assert_eq!(anonymous.label(), format!("Coal {}", anonymous.id));
    }

    #[test]
    fn test_catalog_find_by_id_then_name() {
        let catalog = CoalCatalog::from_entries(&[
            json!({"_id": "a1", "coal": "Indo"}),
            json!({"_id": "b2", "coal": "a1"}),
        ]);

        assert_eq!(catalog.find("a1").unwrap().name, "Indo");
        assert_eq!(catalog.find("INDO").unwrap().id, "a1");
        assert!(catalog.find("missing").is_none());
        assert!(catalog.find("").is_none());
        assert_eq!(catalog.len(), 2);
    }
}
