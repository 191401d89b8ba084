//! `hh-transport` — travel between sites.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                          |
//! |--------------|-------------------------------------------------------------------|
//! | [`network`]  | `CalcSite`, `TransportCategory`, `CalcTravelRoute`, `RouteStep`, `CalcTransportationDevice` |
//! | [`handler`]  | `TransportationHandler`: route choice and trip execution          |
//! | [`cache`]    | `RouteCache`: per-(person, step) route memo                       |
//! | [`routed`]   | `RoutedActivity` decorator, `TravelContext`                       |
//! | [`activity`] | `Activity`: `Direct` or `Routed`                                  |
//! | [`log`]      | `TransportationLog`, status lines and trip events                 |
//! | [`error`]    | `TransportError`, `TransportResult<T>`                            |
//!
//! # Travel model
//!
//! Persons teleport at arrival: while travelling they are busy with dead
//! time (value `1.0`) in their person profile, and the wrapped affordance
//! starts at the arrival step.  Vehicles are occupied for their legs and
//! emit their energy loads while driving.

pub mod activity;
pub mod cache;
pub mod error;
pub mod handler;
pub mod log;
pub mod network;
pub mod routed;

#[cfg(test)]
mod tests;

pub use activity::Activity;
pub use cache::RouteCache;
pub use error::{TransportError, TransportResult};
pub use handler::{PlannedLeg, RouteChoice, SelectedRoute, TransportationHandler};
pub use log::{TransportationEvent, TransportationLog, TransportationStatus};
pub use network::{CalcSite, CalcTransportationDevice, CalcTravelRoute, RouteStep, TransportCategory};
pub use routed::{RoutedActivity, TravelContext};
