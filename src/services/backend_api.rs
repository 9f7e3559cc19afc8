//! Read surface of the waste-collection backend.

use anyhow::Result;
use waste_console::records::{Entry, Truck, WasteCategory};

/// The three read operations the rollup engine is fed from.
///
/// Abstracted as a trait so orchestration can run against a stub backend in
/// tests. Write and auth operations live on the concrete client; the engine
/// never needs them.
#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
    /// Returns the authoritative waste-category list.
    async fn list_waste_types(&self) -> Result<Vec<WasteCategory>>;

    /// Returns all known collection trucks.
    async fn list_trucks(&self) -> Result<Vec<Truck>>;

    /// Returns one truck's entry history, each entry tagged with the truck
    /// number.
    async fn truck_history(&self, truck_number: &str) -> Result<Vec<Entry>>;
}
