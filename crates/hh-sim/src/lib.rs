//! `hh-sim` — household step loop for the household energy simulator.
//!
//! # One step
//!
//! ```text
//! for step in 0..params.internal_timesteps:
//!   ① Variables   — apply operations scheduled for this step.
//!   ② Auto        — restart idle auto devices whose requirements hold.
//!   ③ Persons     — each idle person checks every activity from where they
//!                   are; the ActivityChooser picks a free one; it is
//!                   activated (travel included) and the person is busy
//!                   for the returned profile.  Persons in an interruptible
//!                   activity may switch to a free interrupting one.
//!   ④ Ledger      — Odap::process_one_timestep builds the rows; storages
//!                   balance them until none changes.
//!   ⑤ Finalize    — rows go into the totals and to the observer.
//! ```
//!
//! Households never share state, so many of them can run at once; see
//! [`run_households`].
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs households on Rayon's thread pool.                |
//! | `serde`    | Serialize/deserialize the configuration types.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use hh_sim::{HouseholdBuilder, NoopObserver, WeightedChooser};
//!
//! let mut b = HouseholdBuilder::new(HouseholdId(0), params, load_types, WeightedChooser)?;
//! // add locations, devices, affordances, persons …
//! let mut household = b.build()?;
//! household.run(&mut NoopObserver, None)?;
//! ```

pub mod builder;
pub mod chooser;
pub mod error;
pub mod household;
pub mod observer;
pub mod person;
pub mod runner;


pub use builder::HouseholdBuilder;
pub use chooser::{ActivityChooser, Candidate, WeightedChooser};
pub use error::{SimError, SimResult};
pub use household::Household;
pub use observer::{HouseholdObserver, NoopObserver};
pub use person::{CalcPerson, CurrentActivity, SuspendedActivity};
pub use runner::{run_households, RunOutcome};
