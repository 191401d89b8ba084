//! The `OutputWriter` trait implemented by all backend writers.

use crate::{ActivationRow, EnergyRow, LoadTypeColumns, OutputResult, TotalRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`HouseholdOutputObserver::take_error`][crate::HouseholdOutputObserver::take_error].
pub trait OutputWriter {
    /// Announce a load type and its column headers.  Called once per load
    /// type before any of its energy rows.
    fn begin_load_type(&mut self, columns: &LoadTypeColumns) -> OutputResult<()>;

    /// Write one energy row.
    fn write_energy(&mut self, row: &EnergyRow) -> OutputResult<()>;

    /// Write a batch of activation log entries.
    fn write_activations(&mut self, rows: &[ActivationRow]) -> OutputResult<()>;

    /// Write the end-of-run totals.
    fn write_totals(&mut self, rows: &[TotalRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
