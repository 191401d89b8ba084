//! `hh-core` — foundational types for the household energy simulator.
//!
//! This crate is a dependency of every other `hh-*` crate.  It has no `hh-*`
//! dependencies and minimal external ones (`rand`, `rand_distr`, `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `PersonId`, `LocationId`, `SiteId`, `DeviceId`, …          |
//! | [`time`]        | `TimeStep`, `CalcParameters`, `OutputOptions`, `SimClock`  |
//! | [`busy`]        | `BusyArray`: per-internal-step occupancy bitmap            |
//! | [`load_type`]   | `CalcLoadType`: energy carrier reference data              |
//! | [`rng`]         | `HouseholdRng`, `NormalRandom`                             |
//! | [`error`]       | `HhError`, `HhResult`                                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod busy;
pub mod error;
pub mod ids;
pub mod load_type;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use busy::BusyArray;
pub use error::{HhError, HhResult};
pub use ids::{
    AffordanceId, DeviceId, HouseholdId, LoadTypeId, LocationId, PersonId, RouteId, SiteId,
    StorageId, TransportCategoryId, VariableId,
};
pub use load_type::CalcLoadType;
pub use rng::{HouseholdRng, NormalRandom};
pub use time::{CalcParameters, OutputOptions, SimClock, TimeStep};

/// Tolerance used for every floating-point "did this value change" comparison
/// in the engine.  Writes that differ by less than this are treated as equal
/// so repeated identical writes don't produce log or output churn.
pub const EPSILON: f64 = 1e-7;
