//! `hh-profile` — load curves for devices and persons.
//!
//! # Crate layout
//!
//! | Module      | Contents                                            |
//! |-------------|-----------------------------------------------------|
//! | [`profile`] | `CalcProfile`, `ProfileType`, `TimePoint`           |
//! | [`loader`]  | `load_profiles_csv`, `load_profiles_reader`         |
//! | [`error`]   | `ProfileError`, `ProfileResult<T>`                  |
//!
//! A profile is built once from configuration, converted to the run's
//! internal step length with [`CalcProfile::convert_to_timesteps`], and read
//! by devices and affordances for the rest of the run.

pub mod error;
pub mod loader;
pub mod profile;

#[cfg(test)]
mod tests;

pub use error::{ProfileError, ProfileResult};
pub use loader::{load_profiles_csv, load_profiles_reader};
pub use profile::{CalcProfile, ProfileType, TimePoint};
