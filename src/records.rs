//! Typed records exchanged with the waste-collection backend.
//!
//! All inbound records are produced by [`crate::parser`], which validates
//! the backend's duck-typed JSON before anything downstream touches it.

use serde::Serialize;

/// A collection vehicle known to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truck {
    pub truck_number: String,
}

/// One entry of the authoritative waste-category list.
///
/// Category totals are keyed by this set, not by whatever type strings
/// happen to appear in entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WasteCategory {
    pub id: String,
    pub name: String,
}

/// A single line of an entry's weight breakdown.
///
/// `weight` has already been normalized by the parser: the backend may send
/// it as a number or a numeric string, and anything unparseable became 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WasteItem {
    #[serde(rename = "type")]
    pub waste_type: String,
    pub weight: f64,
}

/// One recorded truck visit.
///
/// `total_weight` is stored independently upstream and is NOT guaranteed to
/// equal the breakdown sum; the rollup engine never reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: Option<String>,
    pub truck_number: String,
    /// ISO-8601 timestamp, kept as text: date filtering is a string prefix
    /// match, never a parsed-date comparison.
    pub timestamp: Option<String>,
    pub total_weight: f64,
    pub waste_breakdown: Vec<WasteItem>,
}

/// One truck paired with its fetched entry history.
#[derive(Debug, Clone)]
pub struct TruckHistory {
    pub truck_number: String,
    pub entries: Vec<Entry>,
}

/// Outbound payload for `POST /entry`.
///
/// The backend calls the breakdown `waste_distribution` on this endpoint,
/// unlike the `waste_breakdown` it returns from history reads.
#[derive(Debug, Clone, Serialize)]
pub struct NewEntry {
    pub truck_number: String,
    pub total_weight: f64,
    pub waste_distribution: Vec<WasteItem>,
}

impl NewEntry {
    /// Builds a new entry with `total_weight` recalculated from the items.
    /// The total is never user-supplied.
    pub fn from_items(truck_number: &str, items: Vec<WasteItem>) -> Self {
        let total_weight = items.iter().map(|w| w.weight).sum();
        Self {
            truck_number: truck_number.to_string(),
            total_weight,
            waste_distribution: items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_recalculates_total() {
        let entry = NewEntry::from_items(
            "T1",
            vec![
                WasteItem {
                    waste_type: "Plastic".to_string(),
                    weight: 10.0,
                },
                WasteItem {
                    waste_type: "Metal".to_string(),
                    weight: 5.5,
                },
            ],
        );

        assert_eq!(entry.truck_number, "T1");
        assert_eq!(entry.total_weight, 15.5);
    }

    #[test]
    fn test_new_entry_empty_items() {
        let entry = NewEntry::from_items("T2", vec![]);
        assert_eq!(entry.total_weight, 0.0);
        assert!(entry.waste_distribution.is_empty());
    }

    #[test]
    fn test_waste_item_serializes_type_field() {
        let item = WasteItem {
            waste_type: "Glass".to_string(),
            weight: 3.0,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "Glass");
        assert_eq!(json["weight"], 3.0);
    }
}
