//! CLI entry point for the waste-collection console.
//!
//! Provides subcommands for listing trucks and waste types, browsing entry
//! histories, computing category totals and daily summaries client-side,
//! recording and deleting entries, and exporting reports.

mod infra;
mod services;

use crate::infra::backend::BackendClient;
use crate::services::backend_api::BackendApi;
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Instrument;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use waste_console::records::{NewEntry, Truck, TruckHistory, WasteCategory, WasteItem};
use waste_console::rollup::{
    RollupError, daily::daily_summary, totals::category_totals, types::DailySummary,
};
use waste_console::{export, output};

const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Parser)]
#[command(name = "waste_console")]
#[command(about = "Console for a waste-collection operation's backend", long_about = None)]
struct Cli {
    /// Backend base URL (falls back to WASTE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token for deployments that require one (falls back to
    /// WASTE_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every truck's entries
    Entries {
        /// CSV file to append the entry rows to
        #[arg(short, long)]
        output: Option<String>,

        /// Maximum number of concurrent history fetches
        #[arg(short, long, default_value_t = 5)]
        concurrency: usize,
    },
    /// Compute per-category weight totals across all truck histories
    CategoryTotals {
        /// Only include entries from this date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// CSV file to append the totals to
        #[arg(short, long)]
        output: Option<String>,

        /// XLSX report file to write
        #[arg(long)]
        xlsx: Option<PathBuf>,

        /// Maximum number of concurrent history fetches
        #[arg(short, long, default_value_t = 5)]
        concurrency: usize,
    },
    /// Compute the per-waste-type daily summary for one date
    DailySummary {
        /// Report date (YYYY-MM-DD), required
        #[arg(short, long)]
        date: String,

        /// Fetch the backend's server-side summary instead of computing
        /// locally
        #[arg(long)]
        remote: bool,

        /// XLSX report file to write
        #[arg(long)]
        xlsx: Option<PathBuf>,

        /// Maximum number of concurrent history fetches
        #[arg(short, long, default_value_t = 5)]
        concurrency: usize,
    },
    /// List all known trucks
    Trucks,
    /// List the authoritative waste-category set
    WasteTypes,
    /// Record a truck entry; total weight is recalculated from the items
    AddEntry {
        /// Truck number
        #[arg(short, long)]
        truck: String,

        /// Waste item as TYPE=WEIGHT, repeatable
        #[arg(short, long = "item", value_name = "TYPE=WEIGHT")]
        items: Vec<String>,
    },
    /// Replace a truck entry; total weight is recalculated from the items
    UpdateEntry {
        #[arg(long)]
        id: String,

        /// Truck number
        #[arg(short, long)]
        truck: String,

        /// Waste item as TYPE=WEIGHT, repeatable
        #[arg(short, long = "item", value_name = "TYPE=WEIGHT")]
        items: Vec<String>,
    },
    /// Delete a truck entry by id
    DeleteEntry {
        #[arg(long)]
        id: String,
    },
    /// Look up a user profile by email
    Profile {
        #[arg(long)]
        email: String,
    },
    /// Verify credentials and print the profile
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
    /// Register a console user
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/waste_console.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("waste_console.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let api_url = cli
        .api_url
        .or_else(|| std::env::var("WASTE_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let token = cli.token.or_else(|| std::env::var("WASTE_API_TOKEN").ok());

    let client = Arc::new(BackendClient::new(&api_url, token.as_deref())?);

    match cli.command {
        Commands::Entries {
            output,
            concurrency,
        } => {
            list_entries(client, output.as_deref(), concurrency).await?;
        }
        Commands::CategoryTotals {
            date,
            output,
            xlsx,
            concurrency,
        } => {
            if let Some(date) = date.as_deref() {
                validate_date(date)?;
            }
            run_category_totals(client, date.as_deref(), output.as_deref(), xlsx, concurrency)
                .await?;
        }
        Commands::DailySummary {
            date,
            remote,
            xlsx,
            concurrency,
        } => {
            if !date.is_empty() {
                validate_date(&date)?;
            }
            run_daily_summary(client, &date, remote, xlsx, concurrency).await?;
        }
        Commands::Trucks => {
            let trucks = client.list_trucks().await?;
            info!(total = trucks.len(), "Truck list fetched");
            for truck in &trucks {
                info!(truck_number = %truck.truck_number, "Truck");
            }
        }
        Commands::WasteTypes => {
            let categories = client.list_waste_types().await?;
            info!(total = categories.len(), "Waste-type list fetched");
            for category in &categories {
                info!(id = %category.id, name = %category.name, "Waste type");
            }
        }
        Commands::AddEntry { truck, items } => {
            let items = parse_items(&items)?;
            let entry = NewEntry::from_items(&truck, items);
            client.add_entry(&entry).await?;
            info!(
                truck_number = %entry.truck_number,
                total_weight = entry.total_weight,
                "Entry recorded successfully"
            );
        }
        Commands::UpdateEntry { id, truck, items } => {
            let items = parse_items(&items)?;
            let entry = NewEntry::from_items(&truck, items);
            client.update_entry(&id, &entry).await?;
            info!(%id, total_weight = entry.total_weight, "Entry updated");
        }
        Commands::DeleteEntry { id } => {
            client.delete_entry(&id).await?;
            info!(%id, "Entry deleted");
        }
        Commands::Profile { email } => {
            let profile = client.profile(&email).await?;
            info!(name = %profile.name, email = %profile.email, "Profile");
        }
        Commands::Login { email, password } => {
            let profile = client.login(&email, &password).await?;
            info!(name = %profile.name, email = %profile.email, "Login successful");
        }
        Commands::Register {
            name,
            email,
            password,
        } => {
            client.register(&name, &email, &password).await?;
            info!(%email, "User registered");
        }
    }

    Ok(())
}

/// Lists every truck's entries, optionally appending them to a CSV file.
#[tracing::instrument(skip(client, output))]
async fn list_entries(
    client: Arc<BackendClient>,
    output: Option<&str>,
    concurrency: usize,
) -> Result<()> {
    let trucks = client.list_trucks().await?;
    let histories = assemble_histories(client, &trucks, concurrency).await?;

    let rows: Vec<_> = histories
        .iter()
        .flat_map(|h| &h.entries)
        .map(output::EntryRow::from_entry)
        .collect();

    info!(entries = rows.len(), trucks = trucks.len(), "Entries fetched");
    for row in &rows {
        info!(
            truck_number = %row.truck_number,
            timestamp = %row.timestamp,
            total_weight = row.total_weight,
            waste_breakdown = %row.waste_breakdown,
            "Entry"
        );
    }

    if let Some(path) = output {
        output::append_records(path, &rows)?;
        info!(path, "Entry rows appended");
    }

    Ok(())
}

/// Computes and reports per-category totals across all trucks.
#[tracing::instrument(skip(client, output, xlsx))]
async fn run_category_totals(
    client: Arc<BackendClient>,
    date: Option<&str>,
    output: Option<&str>,
    xlsx: Option<PathBuf>,
    concurrency: usize,
) -> Result<()> {
    let categories = client.list_waste_types().await?;
    let trucks = client.list_trucks().await?;
    let histories = assemble_histories(client, &trucks, concurrency).await?;

    let totals = category_totals(&categories, &histories, date);
    warn_on_unknown_types(&histories, &categories, date);

    let category_order: Vec<String> = categories.iter().map(|c| c.name.clone()).collect();
    for name in &category_order {
        info!(category = %name, total_weight = totals.total_for(name), "Category total");
    }
    info!(
        grand_total = totals.grand_total,
        scope = date.unwrap_or("all time"),
        "Category totals computed"
    );

    if let Some(path) = output {
        let rows = output::TotalsRow::from_totals(&category_order, &totals);
        output::append_records(path, &rows)?;
        info!(path, "Totals appended");
    }
    if let Some(path) = xlsx {
        export::export_category_totals(&path, &category_order, &totals, date)?;
        info!(path = %path.display(), "XLSX report written");
    }

    Ok(())
}

/// Computes (or fetches) and reports the daily summary for one date.
#[tracing::instrument(skip(client, xlsx))]
async fn run_daily_summary(
    client: Arc<BackendClient>,
    date: &str,
    remote: bool,
    xlsx: Option<PathBuf>,
    concurrency: usize,
) -> Result<()> {
    // The date is validated before any request goes out: an empty date must
    // not trigger history fetches or a bad query to the backend.
    if date.is_empty() {
        return Err(RollupError::DateRequired.into());
    }

    let summary: DailySummary = if remote {
        client.daily_summary(date).await?
    } else {
        let trucks = client.list_trucks().await?;
        let histories = assemble_histories(client, &trucks, concurrency).await?;
        let entries: Vec<_> = histories.into_iter().flat_map(|h| h.entries).collect();
        daily_summary(&entries, date)?
    };

    info!(
        date,
        total_weight = summary.total_weight,
        groups = summary.breakdown.len(),
        remote,
        "Daily summary"
    );
    for group in &summary.breakdown {
        info!(
            waste_type = %group.waste_type,
            total_weight = group.total_weight,
            trucks = %group.truck_numbers.join(", "),
            "Summary group"
        );
    }
    output::print_json(&summary)?;

    if let Some(path) = xlsx {
        export::export_daily_summary(&path, date, &summary)?;
        info!(path = %path.display(), "XLSX report written");
    }

    Ok(())
}

/// Fetches each truck's history concurrently and assembles the complete
/// collection before any aggregation runs. Any fetch failure fails the whole
/// assembly; aggregation is never invoked on partial data.
async fn assemble_histories(
    client: Arc<BackendClient>,
    trucks: &[Truck],
    concurrency: usize,
) -> Result<Vec<TruckHistory>> {
    let semaphore = Arc::new(tokio::sync::Semaphore::new(concurrency));
    let mut tasks = Vec::new();

    for truck in trucks {
        let sem = semaphore.clone();
        let client = client.clone();
        let truck_number = truck.truck_number.clone();

        let span = tracing::info_span!("fetch_history", truck_number = %truck_number);
        tasks.push(tokio::spawn(
            async move {
                let _permit = sem.acquire().await?;
                let entries = client.truck_history(&truck_number).await?;
                anyhow::Ok(TruckHistory {
                    truck_number,
                    entries,
                })
            }
            .instrument(span),
        ));
    }

    // Awaiting in spawn order keeps the assembled collection in truck order.
    let mut histories = Vec::with_capacity(tasks.len());
    for task in tasks {
        histories.push(task.await??);
    }

    Ok(histories)
}

/// Surfaces the silent data drop of the totals report: weights under type
/// names outside the known category set are excluded from all totals.
fn warn_on_unknown_types(
    histories: &[TruckHistory],
    categories: &[WasteCategory],
    date: Option<&str>,
) {
    let known: HashSet<&str> = categories.iter().map(|c| c.name.as_str()).collect();

    let skipped = histories
        .iter()
        .flat_map(|h| &h.entries)
        .filter(|e| match (date, e.timestamp.as_deref()) {
            (Some(filter), Some(ts)) => ts.starts_with(filter),
            _ => true,
        })
        .flat_map(|e| &e.waste_breakdown)
        .filter(|w| !known.contains(w.waste_type.as_str()))
        .count();

    if skipped > 0 {
        warn!(
            skipped,
            "Waste items with unknown types were excluded from the totals"
        );
    }
}

/// Parses repeated `TYPE=WEIGHT` arguments into waste items. Unlike backend
/// payloads, a malformed weight here is operator input and is rejected.
fn parse_items(raw: &[String]) -> Result<Vec<WasteItem>> {
    if raw.is_empty() {
        bail!("at least one --item TYPE=WEIGHT is required");
    }

    raw.iter()
        .map(|item| {
            let Some((waste_type, weight)) = item.split_once('=') else {
                bail!("item '{item}' is not in TYPE=WEIGHT form");
            };
            let weight: f64 = weight
                .trim()
                .parse()
                .with_context(|| format!("item '{item}' has a non-numeric weight"))?;
            Ok(WasteItem {
                waste_type: waste_type.trim().to_string(),
                weight,
            })
        })
        .collect()
}

fn validate_date(date: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("date '{date}' is not in YYYY-MM-DD form"))?;
    Ok(())
}
