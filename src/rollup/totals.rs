//! Per-category totals across truck histories.

use std::collections::HashMap;

use crate::records::{TruckHistory, WasteCategory};
use crate::rollup::types::CategoryTotals;

/// Sums breakdown weights per known category across all truck histories.
///
/// `date_filter` is a `YYYY-MM-DD` string matched as a textual prefix of the
/// entry timestamp. Entries with no timestamp are NOT filtered out; only an
/// actual non-matching timestamp excludes an entry. Weights whose type is
/// not in `categories` (exact, case-sensitive match) contribute to neither
/// the per-category totals nor the grand total; the entry's own
/// `total_weight` field is never consulted.
pub fn category_totals(
    categories: &[WasteCategory],
    histories: &[TruckHistory],
    date_filter: Option<&str>,
) -> CategoryTotals {
    let mut totals: HashMap<String, f64> =
        categories.iter().map(|c| (c.name.clone(), 0.0)).collect();
    let mut grand_total = 0.0;

    for history in histories {
        for entry in &history.entries {
            if let (Some(filter), Some(ts)) = (date_filter, entry.timestamp.as_deref()) {
                if !ts.starts_with(filter) {
                    continue;
                }
            }

            for item in &entry.waste_breakdown {
                if let Some(total) = totals.get_mut(&item.waste_type) {
                    *total += item.weight;
                    grand_total += item.weight;
                }
            }
        }
    }

    CategoryTotals {
        totals,
        grand_total,
    }
}
