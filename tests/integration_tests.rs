//! Full-pipeline tests: backend-shaped JSON fixture through the parser and
//! both rollup operations.

use serde_json::Value;
use waste_console::parser::{parse_categories, parse_history, parse_trucks};
use waste_console::records::{Entry, TruckHistory, WasteCategory};
use waste_console::rollup::RollupError;
use waste_console::rollup::daily::daily_summary;
use waste_console::rollup::totals::category_totals;

const TOLERANCE: f64 = 1e-9;

fn load_fixture() -> (Vec<WasteCategory>, Vec<TruckHistory>) {
    let raw: Value = serde_json::from_str(include_str!("fixtures/sample_backend.json"))
        .expect("fixture is valid JSON");

    let categories = parse_categories(&raw["waste_types"]).expect("waste types parse");
    let trucks = parse_trucks(&raw["trucks"]).expect("trucks parse");

    let histories = trucks
        .iter()
        .map(|t| {
            let entries = parse_history(&t.truck_number, &raw["histories"][t.truck_number.as_str()])
                .expect("history parses");
            TruckHistory {
                truck_number: t.truck_number.clone(),
                entries,
            }
        })
        .collect();

    (categories, histories)
}

fn flat_entries(histories: &[TruckHistory]) -> Vec<Entry> {
    histories
        .iter()
        .flat_map(|h| h.entries.clone())
        .collect()
}

#[test]
fn test_category_totals_all_time() {
    let (categories, histories) = load_fixture();
    let totals = category_totals(&categories, &histories, None);

    assert!((totals.total_for("Plastic") - 22.0).abs() < TOLERANCE);
    assert!((totals.total_for("Metal") - 6.5).abs() < TOLERANCE);
    assert!((totals.total_for("Organic") - 2.0).abs() < TOLERANCE);
    // The Glass item exists in the data but not in the category list
    assert!(!totals.totals.contains_key("Glass"));
    assert!((totals.grand_total - 30.5).abs() < TOLERANCE);
}

#[test]
fn test_category_totals_date_filter_keeps_undated_entries() {
    let (categories, histories) = load_fixture();
    let totals = category_totals(&categories, &histories, Some("2024-01-05"));

    // The Organic 2.0 entry has no timestamp and survives the filter
    assert!((totals.total_for("Plastic") - 18.0).abs() < TOLERANCE);
    assert!((totals.total_for("Metal") - 6.5).abs() < TOLERANCE);
    assert!((totals.total_for("Organic") - 2.0).abs() < TOLERANCE);
    assert!((totals.grand_total - 26.5).abs() < TOLERANCE);
}

#[test]
fn test_daily_summary_excludes_undated_entries() {
    let (_, histories) = load_fixture();
    let entries = flat_entries(&histories);

    let summary = daily_summary(&entries, "2024-01-05").unwrap();

    // The undated Organic 2.0 entry is excluded here, but the unparseable
    // weight on T2's Organic item still creates a 0.0 group.
    assert!((summary.total_weight - 24.5).abs() < TOLERANCE);

    let types: Vec<_> = summary
        .breakdown
        .iter()
        .map(|g| g.waste_type.as_str())
        .collect();
    assert_eq!(types, vec!["Plastic", "Metal", "Organic"]);

    assert_eq!(summary.breakdown[0].truck_numbers, vec!["T1", "T2"]);
    assert!((summary.breakdown[0].total_weight - 18.0).abs() < TOLERANCE);
    assert_eq!(summary.breakdown[2].truck_numbers, vec!["T2"]);
    assert_eq!(summary.breakdown[2].total_weight, 0.0);
}

#[test]
fn test_daily_summary_unknown_type_forms_group() {
    let (_, histories) = load_fixture();
    let entries = flat_entries(&histories);

    let summary = daily_summary(&entries, "2024-01-06").unwrap();

    assert!((summary.total_weight - 7.0).abs() < TOLERANCE);
    let glass = summary
        .breakdown
        .iter()
        .find(|g| g.waste_type == "Glass")
        .expect("Glass groups even though it is not a known category");
    assert!((glass.total_weight - 3.0).abs() < TOLERANCE);
    assert_eq!(glass.truck_numbers, vec!["T1"]);
}

#[test]
fn test_daily_summary_requires_date() {
    let (_, histories) = load_fixture();
    let entries = flat_entries(&histories);

    assert_eq!(
        daily_summary(&entries, ""),
        Err(RollupError::DateRequired)
    );
}
