//! `hh-storage` — energy storages (batteries, hot water tanks, …).
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`storage`] | `CalcEnergyStorage`, `EnergyStorageConfig`, `balance_storages`  |
//! | [`signal`]  | `EnergyStorageSignal`, `EnergyStorageSignalConfig`              |
//! | [`error`]   | `StorageError`, `StorageResult<T>`                              |
//!
//! Storages run after the ODAP has built a step's rows and before the rows
//! are finalized.  They only write their own columns.

pub mod error;
pub mod signal;
pub mod storage;


pub use error::{StorageError, StorageResult};
pub use signal::{EnergyStorageSignal, EnergyStorageSignalConfig};
pub use storage::{balance_storages, CalcEnergyStorage, EnergyStorageConfig, MAX_STORAGE_PASSES};
