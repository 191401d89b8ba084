//! `hh-output` — result writers for the household energy simulator.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                                    |
//! |-----------|---------|------------------------------------------------------------------|
//! | *(none)*  | CSV     | `energy_<load type>.csv`, `activations.csv`, `totals.csv`        |
//! | `sqlite`  | SQLite  | `output.db`                                                      |
//! | `parquet` | Parquet | `energy.parquet`, `activations.parquet`, `totals.parquet`        |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`HouseholdOutputObserver`], which implements `hh_sim::HouseholdObserver`.
//! Energy values are written in each load type's sum unit.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hh_output::{CsvWriter, HouseholdOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"), params.csv_delimiter)?;
//! let mut obs = HouseholdOutputObserver::new(writer, &params);
//! household.run(&mut obs, None)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::HouseholdOutputObserver;
pub use row::{ActivationRow, EnergyRow, LoadTypeColumns, TotalRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
