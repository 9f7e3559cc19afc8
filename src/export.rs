//! XLSX report export.

use anyhow::Result;
use chrono::Utc;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

use crate::rollup::types::{CategoryTotals, DailySummary};

/// Writes a category-totals workbook: one row per category in display
/// order, the grand total, and the filter scope in the header block.
pub fn export_category_totals(
    output_path: &Path,
    category_order: &[String],
    totals: &CategoryTotals,
    date_filter: Option<&str>,
) -> Result<()> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Category Totals")?;

    let header_format = Format::new().set_bold();

    sheet.write_string_with_format(0, 0, "Waste Category Totals", &header_format)?;
    sheet.write_string(1, 0, "Generated:")?;
    sheet.write_string(1, 1, &Utc::now().to_rfc3339())?;
    sheet.write_string(2, 0, "Scope:")?;
    sheet.write_string(2, 1, date_filter.unwrap_or("all time"))?;

    sheet.write_string_with_format(4, 0, "Category", &header_format)?;
    sheet.write_string_with_format(4, 1, "Total Weight (kg)", &header_format)?;

    let mut row = 5;
    for name in category_order {
        sheet.write_string(row, 0, name)?;
        sheet.write_number(row, 1, totals.total_for(name))?;
        row += 1;
    }

    sheet.write_string_with_format(row, 0, "TOTAL", &header_format)?;
    sheet.write_number(row, 1, totals.grand_total)?;

    workbook.save(output_path)?;
    Ok(())
}

/// Writes a daily-summary workbook matching the daily report table:
/// waste type, total weight, and contributing trucks per row.
pub fn export_daily_summary(output_path: &Path, date: &str, summary: &DailySummary) -> Result<()> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Daily Summary")?;

    let header_format = Format::new().set_bold();

    sheet.write_string_with_format(0, 0, "Daily Summary", &header_format)?;
    sheet.write_string(1, 0, "Date:")?;
    sheet.write_string(1, 1, date)?;
    sheet.write_string(2, 0, "Total Weight (kg):")?;
    sheet.write_number(2, 1, summary.total_weight)?;

    write_breakdown_rows(sheet, summary, &header_format)?;

    workbook.save(output_path)?;
    Ok(())
}

fn write_breakdown_rows(
    sheet: &mut Worksheet,
    summary: &DailySummary,
    header_format: &Format,
) -> Result<()> {
    let headers = ["Waste Type", "Total Weight (kg)", "Trucks"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(4, col as u16, *header, header_format)?;
    }

    let mut row = 5;
    for group in &summary.breakdown {
        sheet.write_string(row, 0, &group.waste_type)?;
        sheet.write_number(row, 1, group.total_weight)?;
        let trucks = if group.truck_numbers.is_empty() {
            "N/A".to_string()
        } else {
            group.truck_numbers.join(", ")
        };
        sheet.write_string(row, 2, &trucks)?;
        row += 1;
    }

    Ok(())
}
