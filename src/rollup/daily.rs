//! Per-date daily summary over a flat entry set.

use std::collections::HashMap;

use crate::records::Entry;
use crate::rollup::RollupError;
use crate::rollup::types::{DailySummary, WasteTypeRollup};

/// Rolls entries for one calendar date up into per-waste-type groups.
///
/// `date` is mandatory (`YYYY-MM-DD`); an empty date is a validation error
/// and nothing is computed. Filtering is a textual prefix match on the
/// timestamp, and entries WITHOUT a timestamp are excluded, the opposite of
/// [`crate::rollup::totals::category_totals`], which keeps them. Both
/// behaviors are preserved for compatibility with the original reports.
///
/// Groups are keyed by whatever type strings appear in the data, with no
/// check against the known category list, in first-seen order. Each group
/// lists its distinct contributing truck numbers in first-seen order.
pub fn daily_summary(entries: &[Entry], date: &str) -> Result<DailySummary, RollupError> {
    if date.is_empty() {
        return Err(RollupError::DateRequired);
    }

    let mut breakdown: Vec<WasteTypeRollup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut total_weight = 0.0;

    for entry in entries {
        let Some(ts) = entry.timestamp.as_deref() else {
            continue;
        };
        if !ts.starts_with(date) {
            continue;
        }

        for item in &entry.waste_breakdown {
            let slot = *index.entry(item.waste_type.clone()).or_insert_with(|| {
                breakdown.push(WasteTypeRollup {
                    waste_type: item.waste_type.clone(),
                    total_weight: 0.0,
                    truck_numbers: Vec::new(),
                });
                breakdown.len() - 1
            });

            let row = &mut breakdown[slot];
            row.total_weight += item.weight;
            if !row.truck_numbers.contains(&entry.truck_number) {
                row.truck_numbers.push(entry.truck_number.clone());
            }
            total_weight += item.weight;
        }
    }

    Ok(DailySummary {
        total_weight,
        breakdown,
    })
}
