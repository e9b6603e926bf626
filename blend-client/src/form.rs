//! Form Snapshot Builder
//!
//! Reads the entry form into a [`BlendSnapshot`]. Pure: no network, no
//! persistence, no state carried between calls.
//!
//! Field naming follows the entry form:
//! - `coalName{r}`, `gcvBox{r}`, `costBox{r}` for rows r = 1..=3
//! - `pct{r}_{m}` for the percentage of row r on mill m = 0..6
//! - `generation`
//! - flow inputs are an ordered list whose length varies with the plant

use blend_common::model::coerce::parse_float_safe;
use blend_common::time::now_millis;
use blend_common::{BlendRow, BlendSnapshot, MILL_COUNT};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::coal::CoalRef;

/// Raw values of the entry form; `None` means the input is absent
///
/// Rows are 1-based like the form slots, mills 0-based.
pub trait FormSource {
    fn coal_name(&self, row: usize) -> Option<&str>;
    fn percentage(&self, row: usize, mill: usize) -> Option<&str>;
    fn gcv(&self, row: usize) -> Option<&str>;
    fn cost(&self, row: usize) -> Option<&str>;
    /// Every flow input present, in form order
    fn flows(&self) -> Vec<&str>;
    fn generation(&self) -> Option<&str>;
}

/// Capture the form into a snapshot stamped with the current time
///
/// Always yields [`blend_common::ROW_COUNT`] rows of [`MILL_COUNT`] percentages no matter
/// how many inputs the form actually has.
pub fn build_snapshot(form: &impl FormSource) -> BlendSnapshot {
    BlendSnapshot {
        rows: std::array::from_fn(|i| build_row(form, i + 1)),
        flows: form.flows().into_iter().map(|v| parse_float_safe(Some(v))).collect(),
        generation: parse_float_safe(form.generation()),
        ts: now_millis(),
    }
}

fn build_row(form: &impl FormSource, row: usize) -> BlendRow {
    BlendRow {
        coal: form.coal_name(row).map(str::trim).unwrap_or_default().to_string(),
        percentages: (0..MILL_COUNT)
            .map(|mill| parse_float_safe(form.percentage(row, mill)))
            .collect(),
        gcv: parse_float_safe(form.gcv(row)),
        cost: parse_float_safe(form.cost(row)),
    }
}

/// Form state as a flat map of named fields plus the flow list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldMap {
    fields: BTreeMap<String, String>,
    flows: Vec<String>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from JSON: `{"fields": {"coalName1": "...", ...}, "flows": [...]}`
    ///
    /// Scalar values are taken as the text an operator would have typed;
    /// nulls, lists and objects count as absent inputs.
    pub fn from_json(value: &Value) -> Self {
        let mut map = Self::new();

        if let Some(fields) = value.get("fields").and_then(Value::as_object) {
            for (name, raw) in fields {
                if let Some(text) = scalar_text(raw) {
                    map.fields.insert(name.clone(), text);
                }
            }
        }

        if let Some(flows) = value.get("flows").and_then(Value::as_array) {
            // A flow input exists even when blank, so keep its slot
            map.flows = flows
                .iter()
                .map(|raw| scalar_text(raw).unwrap_or_default())
                .collect();
        }

        map
    }

    /// Load a form file written by an operator or another tool
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        Ok(Self::from_json(&value))
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn push_flow(&mut self, value: impl Into<String>) -> &mut Self {
        self.flows.push(value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Select a coal for a row: the row takes the coal's id, and gcv/cost
    /// are prefilled only where the operator left them blank.
    pub fn select_coal(&mut self, row: usize, coal: &CoalRef) {
        self.set(format!("coalName{}", row), coal.id.clone());

        for (field, value) in [
            (format!("gcvBox{}", row), coal.gcv),
            (format!("costBox{}", row), coal.cost),
        ] {
            let blank = self.get(&field).map_or(true, |v| v.trim().is_empty());
            if blank {
                self.set(field, value.to_string());
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl FormSource for FieldMap {
    fn coal_name(&self, row: usize) -> Option<&str> {
        self.get(&format!("coalName{}", row))
    }

    fn percentage(&self, row: usize, mill: usize) -> Option<&str> {
        self.get(&format!("pct{}_{}", row, mill))
    }

    fn gcv(&self, row: usize) -> Option<&str> {
        self.get(&format!("gcvBox{}", row))
    }

    fn cost(&self, row: usize) -> Option<&str> {
        self.get(&format!("costBox{}", row))
    }

    fn flows(&self) -> Vec<&str> {
        self.flows.iter().map(String::as_str).collect()
    }

    fn generation(&self) -> Option<&str> {
        self.get("generation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blend_common::ROW_COUNT;
    use serde_json::json;

    #[test]
    fn test_empty_form_has_full_shape() {
        let snapshot = build_snapshot(&FieldMap::new());

        assert_eq!(snapshot.rows.len(), ROW_COUNT);
        for row in &snapshot.rows {
            assert_eq!(row.coal, "");
            assert_eq!(row.percentages, vec![0.0; MILL_COUNT]);
            assert_eq!(row.gcv, 0.0);
            assert_eq!(row.cost, 0.0);
        }
        assert!(snapshot.flows.is_empty());
        assert_eq!(snapshot.generation, 0.0);
        assert!(snapshot.ts > 0);
    }

    #[test]
    fn test_partial_form_fills_missing_mills() {
        let mut form = FieldMap::new();
        form.set("pct2_0", "25").set("pct2_5", "75").set("pct2_9", "99");

        let snapshot = build_snapshot(&form);

        assert_eq!(snapshot.rows[1].percentages, vec![25.0, 0.0, 0.0, 0.0, 0.0, 75.0]);
        for row in &snapshot.rows {
            assert_eq!(row.percentages.len(), MILL_COUNT);
        }
    }

    #[test]
    fn test_values_are_coerced() {
        let mut form = FieldMap::new();
        form.set("coalName1", "  Indo 4200 \n")
            .set("gcvBox1", "4200 kcal")
            .set("costBox1", "abc")
            .set("generation", " 512.5")
            .push_flow("10")
            .push_flow("")
            .push_flow("20.5t/h");

        let snapshot = build_snapshot(&form);

        assert_eq!(snapshot.rows[0].coal, "Indo 4200");
        assert_eq!(snapshot.rows[0].gcv, 4200.0);
        assert_eq!(snapshot.rows[0].cost, 0.0);
        assert_eq!(snapshot.flows, vec![10.0, 0.0, 20.5]);
        assert_eq!(snapshot.generation, 512.5);
    }

    #[test]
    fn test_repeated_builds_do_not_accumulate() {
        let mut form = FieldMap::new();
        form.push_flow("1");

        let first = build_snapshot(&form);
        let second = build_snapshot(&form);

        assert_eq!(first.rows, second.rows);
        assert_eq!(first.flows, second.flows);
    }

    #[test]
    fn test_from_json_stringifies_scalars() {
        let form = FieldMap::from_json(&json!({
            "fields": {"coalName3": "SA", "gcvBox3": 5500, "costBox3": null, "pct3_1": "40"},
            "flows": [12, "13", null]
        }));

        assert_eq!(form.get("gcvBox3"), Some("5500"));
        assert_eq!(form.get("costBox3"), None);
        assert_eq!(form.flows(), vec!["12", "13", ""]);

        let snapshot = build_snapshot(&form);
        assert_eq!(snapshot.rows[2].gcv, 5500.0);
        assert_eq!(snapshot.rows[2].percentages[1], 40.0);
        assert_eq!(snapshot.flows, vec![12.0, 13.0, 0.0]);
    }

    #[test]
    fn test_select_coal_only_fills_blank_fields() {
        let coal = CoalRef::from_value(&json!({"_id": "c-1", "coal": "Indo", "gcv": 4200, "cost": 3.5}));

        let mut form = FieldMap::new();
        form.set("gcvBox1", "4000").set("costBox1", " ");
        form.select_coal(1, &coal);

        assert_eq!(form.get("coalName1"), Some("c-1"));
        assert_eq!(form.get("gcvBox1"), Some("4000"));
        assert_eq!(form.get("costBox1"), Some("3.5"));
    }
}
