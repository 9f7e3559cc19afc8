//! Validation boundary for backend JSON payloads.
//!
//! The backend is duck-typed: identifiers may be numbers or strings, weights
//! may arrive as numbers or numeric strings, and whole fields may be absent.
//! Everything is normalized into the typed [`crate::records`] shapes here so
//! the rollup engine never sees raw JSON.

use anyhow::{Result, bail};
use serde_json::Value;
use tracing::warn;

use crate::records::{Entry, Truck, WasteCategory, WasteItem};
use crate::rollup::types::{DailySummary, WasteTypeRollup};

/// Parses the `GET /trucks` response into the truck list.
///
/// # Errors
///
/// Returns an error if the payload is not a JSON array.
pub fn parse_trucks(raw: &Value) -> Result<Vec<Truck>> {
    let Some(items) = raw.as_array() else {
        bail!("truck list is not a JSON array: {raw}");
    };

    let trucks = items
        .iter()
        .filter_map(|item| {
            let truck_number = item["truck_number"].as_str()?.to_string();
            Some(Truck { truck_number })
        })
        .collect();

    Ok(trucks)
}

/// Parses the `GET /waste-types` response into the category list.
///
/// Records without a `name` are dropped with a warning; a missing `id` is
/// tolerated since nothing downstream dereferences it.
pub fn parse_categories(raw: &Value) -> Result<Vec<WasteCategory>> {
    let Some(items) = raw.as_array() else {
        bail!("waste-type list is not a JSON array: {raw}");
    };

    let categories = items
        .iter()
        .filter_map(|item| {
            let Some(name) = item["name"].as_str() else {
                warn!(record = %item, "Skipping waste type without a name");
                return None;
            };
            Some(WasteCategory {
                id: opaque_id(&item["id"]).unwrap_or_default(),
                name: name.to_string(),
            })
        })
        .collect();

    Ok(categories)
}

/// Parses a `GET /truck/{number}/history` response into entries.
///
/// Accepts either `{ "entries": [...] }` or a bare array. Each entry is
/// tagged with `truck_number`, which the history payload itself omits.
pub fn parse_history(truck_number: &str, raw: &Value) -> Result<Vec<Entry>> {
    let items = match (&raw["entries"], raw) {
        (Value::Array(items), _) => items,
        (_, Value::Array(items)) => items,
        _ => bail!("history for truck {truck_number} has no entries array: {raw}"),
    };

    let entries = items
        .iter()
        .filter_map(|item| {
            if !item.is_object() {
                warn!(truck_number, record = %item, "Skipping non-object history entry");
                return None;
            }
            Some(parse_entry(truck_number, item))
        })
        .collect();

    Ok(entries)
}

fn parse_entry(truck_number: &str, item: &Value) -> Entry {
    let waste_breakdown = item["waste_breakdown"]
        .as_array()
        .map(|items| items.iter().filter_map(parse_waste_item).collect())
        .unwrap_or_default();

    Entry {
        id: opaque_id(&item["id"]),
        truck_number: truck_number.to_string(),
        timestamp: item["timestamp"].as_str().map(|s| s.to_string()),
        total_weight: parse_weight(&item["total_weight"]),
        waste_breakdown,
    }
}

fn parse_waste_item(item: &Value) -> Option<WasteItem> {
    let Some(waste_type) = item["type"].as_str() else {
        warn!(record = %item, "Skipping waste item without a type");
        return None;
    };

    Some(WasteItem {
        waste_type: waste_type.to_string(),
        weight: parse_weight(&item["weight"]),
    })
}

/// Parses the backend's `GET /summary/daily` response.
///
/// Same shape the local rollup produces, so the two can be diffed.
pub fn parse_daily_summary(raw: &Value) -> Result<DailySummary> {
    let Some(groups) = raw["breakdown"].as_array() else {
        bail!("daily summary has no breakdown array: {raw}");
    };

    let breakdown = groups
        .iter()
        .filter_map(|group| {
            let Some(waste_type) = group["waste_type"].as_str() else {
                warn!(record = %group, "Skipping summary group without a waste type");
                return None;
            };
            let truck_numbers = group["truck_numbers"]
                .as_array()
                .map(|names| {
                    names
                        .iter()
                        .filter_map(|n| n.as_str().map(|s| s.to_string()))
                        .collect()
                })
                .unwrap_or_default();
            Some(WasteTypeRollup {
                waste_type: waste_type.to_string(),
                total_weight: parse_weight(&group["total_weight"]),
                truck_numbers,
            })
        })
        .collect();

    Ok(DailySummary {
        total_weight: parse_weight(&raw["total_weight"]),
        breakdown,
    })
}

/// Normalizes a weight field into `f64`.
///
/// The backend sends weights as JSON numbers or as numeric strings;
/// anything absent or unparseable counts as 0.0 rather than failing the
/// record.
pub fn parse_weight(raw: &Value) -> f64 {
    match raw {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Stringifies an opaque backend identifier, which may arrive as a JSON
/// string or number.
fn opaque_id(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_weight_number() {
        assert_eq!(parse_weight(&json!(12.5)), 12.5);
        assert_eq!(parse_weight(&json!(7)), 7.0);
    }

    #[test]
    fn test_parse_weight_numeric_string() {
        assert_eq!(parse_weight(&json!("10")), 10.0);
        assert_eq!(parse_weight(&json!(" 3.25 ")), 3.25);
    }

    #[test]
    fn test_parse_weight_garbage_is_zero() {
        assert_eq!(parse_weight(&json!("")), 0.0);
        assert_eq!(parse_weight(&json!("n/a")), 0.0);
        assert_eq!(parse_weight(&json!(null)), 0.0);
        assert_eq!(parse_weight(&json!([1, 2])), 0.0);
        assert_eq!(parse_weight(&Value::Null), 0.0);
    }

    #[test]
    fn test_parse_trucks() {
        let raw = json!([
            { "truck_number": "T1" },
            { "truck_number": "T2" },
            { "unrelated": true }
        ]);
        let trucks = parse_trucks(&raw).unwrap();
        assert_eq!(trucks.len(), 2);
        assert_eq!(trucks[0].truck_number, "T1");
    }

    #[test]
    fn test_parse_trucks_rejects_non_array() {
        assert!(parse_trucks(&json!({ "error": "nope" })).is_err());
    }

    #[test]
    fn test_parse_categories_numeric_ids() {
        let raw = json!([
            { "id": 1, "name": "Plastic" },
            { "id": "cat-2", "name": "Metal" },
            { "id": 3 }
        ]);
        let cats = parse_categories(&raw).unwrap();
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0].id, "1");
        assert_eq!(cats[1].id, "cat-2");
        assert_eq!(cats[1].name, "Metal");
    }

    #[test]
    fn test_parse_history_wrapped_entries() {
        let raw = json!({
            "entries": [
                {
                    "id": 42,
                    "timestamp": "2024-01-05T10:00:00Z",
                    "total_weight": "15",
                    "waste_breakdown": [
                        { "type": "Plastic", "weight": "10" },
                        { "type": "Metal", "weight": 5 }
                    ]
                }
            ]
        });

        let entries = parse_history("T1", &raw).unwrap();
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.id.as_deref(), Some("42"));
        assert_eq!(entry.truck_number, "T1");
        assert_eq!(entry.timestamp.as_deref(), Some("2024-01-05T10:00:00Z"));
        assert_eq!(entry.total_weight, 15.0);
        assert_eq!(entry.waste_breakdown.len(), 2);
        assert_eq!(entry.waste_breakdown[0].weight, 10.0);
        assert_eq!(entry.waste_breakdown[1].weight, 5.0);
    }

    #[test]
    fn test_parse_history_bare_array() {
        let raw = json!([{ "timestamp": "2024-02-01T08:00:00Z" }]);
        let entries = parse_history("T3", &raw).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].waste_breakdown.is_empty());
        assert_eq!(entries[0].total_weight, 0.0);
    }

    #[test]
    fn test_parse_history_missing_entries_is_error() {
        assert!(parse_history("T1", &json!({ "error": "no such truck" })).is_err());
    }

    #[test]
    fn test_parse_history_skips_malformed_records() {
        let raw = json!({ "entries": ["not-an-object", { "timestamp": null }] });
        let entries = parse_history("T1", &raw).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].timestamp.is_none());
    }

    #[test]
    fn test_parse_daily_summary() {
        let raw = json!({
            "total_weight": "15",
            "breakdown": [
                {
                    "waste_type": "Plastic",
                    "total_weight": 10,
                    "truck_numbers": ["T1", "T2"]
                },
                { "waste_type": "Metal", "total_weight": "5" }
            ]
        });

        let summary = parse_daily_summary(&raw).unwrap();
        assert_eq!(summary.total_weight, 15.0);
        assert_eq!(summary.breakdown.len(), 2);
        assert_eq!(summary.breakdown[0].truck_numbers, vec!["T1", "T2"]);
        assert_eq!(summary.breakdown[1].total_weight, 5.0);
        assert!(summary.breakdown[1].truck_numbers.is_empty());
    }

    #[test]
    fn test_parse_daily_summary_missing_breakdown_is_error() {
        assert!(parse_daily_summary(&json!({ "total_weight": 1 })).is_err());
    }

    #[test]
    fn test_waste_item_without_type_is_dropped() {
        let raw = json!({
            "entries": [{
                "waste_breakdown": [
                    { "weight": "10" },
                    { "type": "Metal", "weight": "5" }
                ]
            }]
        });
        let entries = parse_history("T1", &raw).unwrap();
        assert_eq!(entries[0].waste_breakdown.len(), 1);
        assert_eq!(entries[0].waste_breakdown[0].waste_type, "Metal");
    }
}
