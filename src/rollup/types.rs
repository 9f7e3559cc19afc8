//! Result types produced by the rollup operations.

use serde::Serialize;
use std::collections::HashMap;

/// Per-category weight totals across the filtered entry set.
///
/// `totals` always holds exactly one key per known category name, even for
/// categories no entry references. `grand_total` is the sum of the weights
/// that matched a known category; weights under unknown type names are in
/// neither.
#[derive(Debug, Serialize)]
pub struct CategoryTotals {
    pub totals: HashMap<String, f64>,
    pub grand_total: f64,
}

impl CategoryTotals {
    /// Looks up one category's total, 0.0 for names outside the known set.
    pub fn total_for(&self, name: &str) -> f64 {
        self.totals.get(name).copied().unwrap_or(0.0)
    }
}

/// One waste type's share of a daily summary.
#[derive(Debug, Serialize, PartialEq)]
pub struct WasteTypeRollup {
    pub waste_type: String,
    pub total_weight: f64,
    /// Distinct contributing trucks, in order of first appearance.
    pub truck_numbers: Vec<String>,
}

/// Per-date rollup: grand total plus the per-type breakdown in first-seen
/// waste-type order. Matches the shape the backend's own
/// `GET /summary/daily` report uses.
#[derive(Debug, Serialize, PartialEq)]
pub struct DailySummary {
    pub total_weight: f64,
    pub breakdown: Vec<WasteTypeRollup>,
}
