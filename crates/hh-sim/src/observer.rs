//! Household observer trait for progress reporting and data collection.

use hh_affordance::ActivationLog;
use hh_core::{HouseholdId, TimeStep};
use hh_odap::{Odap, OnlineEnergyFileRow};

/// Callbacks invoked by [`Household::run`][crate::Household::run] at key
/// points of the step loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl HouseholdObserver for Progress {
///     fn on_rows(&mut self, hh: HouseholdId, time: TimeStep, _rows: &[OnlineEnergyFileRow]) {
///         if time.internal_step % 1_440 == 0 {
///             println!("{hh}: day {}", time.internal_step / 1_440);
///         }
///     }
/// }
/// ```
pub trait HouseholdObserver {
    /// Called once before the first step.  Every device, storage and signal
    /// column is registered by now, so writers can emit headers.
    fn on_run_start(&mut self, _household: HouseholdId, _odap: &Odap) {}

    /// Called at the very start of each step, before any processing.
    fn on_step_start(&mut self, _household: HouseholdId, _time: TimeStep) {}

    /// Called with the final rows of a step, one per load type, after
    /// storages have balanced them.
    fn on_rows(&mut self, _household: HouseholdId, _time: TimeStep, _rows: &[OnlineEnergyFileRow]) {}

    /// Called once after the last step, or after a cancelled run stopped.
    fn on_run_end(&mut self, _household: HouseholdId, _odap: &Odap, _log: &ActivationLog) {}
}

/// A [`HouseholdObserver`] that does nothing.
pub struct NoopObserver;

impl HouseholdObserver for NoopObserver {}
