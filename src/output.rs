//! Output formatting and persistence for rollup reports.
//!
//! Supports JSON pretty-printing and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::records::Entry;
use crate::rollup::types::CategoryTotals;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Flat per-entry row for the entry-listing CSV.
#[derive(Debug, Serialize)]
pub struct EntryRow {
    pub truck_number: String,
    pub timestamp: String,
    pub total_weight: f64,
    pub waste_breakdown: String,
}

impl EntryRow {
    /// Flattens an entry the way the entry table renders it, breakdown
    /// joined as `"Plastic: 10kg, Metal: 5kg"`.
    pub fn from_entry(entry: &Entry) -> Self {
        let waste_breakdown = if entry.waste_breakdown.is_empty() {
            "N/A".to_string()
        } else {
            entry
                .waste_breakdown
                .iter()
                .map(|w| format!("{}: {}kg", w.waste_type, w.weight))
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            truck_number: entry.truck_number.clone(),
            timestamp: entry.timestamp.clone().unwrap_or_default(),
            total_weight: entry.total_weight,
            waste_breakdown,
        }
    }
}

/// One category's line in the totals CSV.
#[derive(Debug, Serialize)]
pub struct TotalsRow {
    pub category: String,
    pub total_weight: f64,
}

impl TotalsRow {
    /// Expands a totals result into rows, one per category in the given
    /// display order, with the grand total appended last.
    pub fn from_totals(category_order: &[String], totals: &CategoryTotals) -> Vec<Self> {
        let mut rows: Vec<Self> = category_order
            .iter()
            .map(|name| Self {
                category: name.clone(),
                total_weight: totals.total_for(name),
            })
            .collect();
        rows.push(Self {
            category: "TOTAL".to_string(),
            total_weight: totals.grand_total,
        });
        rows
    }
}

/// Logs a report as pretty-printed JSON.
pub fn print_json<S: Serialize>(report: &S) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Appends serializable rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records<S: Serialize>(path: &str, rows: &[S]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = rows.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
