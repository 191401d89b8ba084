//! `hh-affordance` — the activities persons can do.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                                   |
//! |------------------|----------------------------------------------------------------------------|
//! | [`affordance`]   | `CalcAffordance`, `AffordanceConfig`, `DeviceProfile`, `SatisfactionValue` |
//! | [`sub`]          | `CalcSubAffordance`, `SubAffordanceConfig`                                 |
//! | [`busyness`]     | `BusynessType`: result of an availability check                            |
//! | [`interruption`] | `ActionAfterInterruption`                                                  |
//! | [`person`]       | `PersonDescriptor`, `Gender`, `PermittedGender`                            |
//! | [`time_limit`]   | `TimeLimit`: per-step start permission mask                                |
//! | [`context`]      | `BusyContext`, `ActivationContext`: borrowed household state               |
//! | [`log`]          | `ActivationLog`, `ActivationEntry`                                         |
//! | [`serial`]       | `AffordanceSerialGenerator`                                                |
//! | [`error`]        | `AffordanceError`, `AffordanceResult<T>`                                   |
//!
//! # Contract
//!
//! The household loop asks [`CalcAffordance::is_busy`] first and only calls
//! [`CalcAffordance::activate`] after seeing `BusynessType::NotBusy` for the
//! same step and person.  Activating an occupied slot is a bug in the caller
//! and fails with [`AffordanceError::AlreadyBusy`].

pub mod affordance;
pub mod busyness;
pub mod context;
pub mod error;
pub mod interruption;
pub mod log;
pub mod person;
pub mod serial;
pub mod sub;
pub mod time_limit;


pub use affordance::{AffordanceConfig, CalcAffordance, DeviceProfile, SatisfactionValue};
pub use busyness::BusynessType;
pub use context::{ActivationContext, BusyContext};
pub use error::{AffordanceError, AffordanceResult};
pub use interruption::ActionAfterInterruption;
pub use log::{ActivationEntry, ActivationLog};
pub use person::{Gender, PermittedGender, PersonDescriptor};
pub use serial::AffordanceSerialGenerator;
pub use sub::{CalcSubAffordance, SubAffordanceConfig};
pub use time_limit::TimeLimit;
