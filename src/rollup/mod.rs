//! Client-side rollup of truck entries into weight reports.
//!
//! Both operations are pure and synchronous; they run only after the caller
//! has fully assembled the input data, so fetch failures never reach them.

pub mod daily;
pub mod totals;
pub mod types;

use thiserror::Error;

/// Validation failures surfaced by the rollup operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RollupError {
    /// The daily summary requires a calendar date; there is no "all time"
    /// variant of that report.
    #[error("date required")]
    DateRequired,
}
