//! Simulation time model.
//!
//! # Design
//!
//! Time advances in fixed **internal steps** (the finest resolution, e.g. one
//! minute).  A [`TimeStep`] carries the internal index plus the derived
//! external index used for reporting:
//!
//! ```text
//! external_step = internal_step - settling_steps
//! wall_time     = start_unix_secs + internal_step * internal_step_secs
//! ```
//!
//! The settling period lets persons and storages reach a steady state before
//! the reported window starts; rows from that period carry a negative
//! external step.
//!
//! Equality, ordering and hashing of `TimeStep` use the internal step only.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{HhError, HhResult};

// ── TimeStep ──────────────────────────────────────────────────────────────────

/// One discrete simulation instant.
///
/// Created once per scheduler tick and never mutated; use
/// [`add_steps`](Self::add_steps) to derive later instants.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeStep {
    /// Index at the simulation's finest resolution, counted from run start.
    pub internal_step: u32,
    /// Reporting index: `internal_step - settling_steps`.
    pub external_step: i64,
    /// `true` when the step is reported against the absolute run start
    /// (settling period shown) instead of the external window.
    pub is_absolute: bool,
}

impl TimeStep {
    /// Build the step for `internal_step` under `params`.
    pub fn new(internal_step: u32, params: &CalcParameters) -> Self {
        Self {
            internal_step,
            external_step: i64::from(internal_step) - i64::from(params.settling_steps),
            is_absolute: params.show_settling_period,
        }
    }

    /// A step with no settling offset.  Handy in tests and for synthetic
    /// profiles that are not tied to a run.
    pub const fn raw(internal_step: u32) -> Self {
        Self {
            internal_step,
            external_step: internal_step as i64,
            is_absolute: false,
        }
    }

    /// The step `n` internal steps after `self`.
    #[inline]
    pub fn add_steps(self, n: u32) -> TimeStep {
        Self {
            internal_step: self.internal_step + n,
            external_step: self.external_step + i64::from(n),
            is_absolute: self.is_absolute,
        }
    }

    /// Steps elapsed from `earlier` to `self` (saturating at zero).
    #[inline]
    pub fn since(self, earlier: TimeStep) -> u32 {
        self.internal_step.saturating_sub(earlier.internal_step)
    }

    /// Absolute minute offset from the start of the run.
    #[inline]
    pub fn minute_offset(self, params: &CalcParameters) -> u64 {
        u64::from(self.internal_step) * u64::from(params.internal_step_secs) / 60
    }

    /// The index shown in reports: internal when absolute, external otherwise.
    #[inline]
    pub fn display_step(self) -> i64 {
        if self.is_absolute {
            i64::from(self.internal_step)
        } else {
            self.external_step
        }
    }

    /// Internal step as a `usize` for indexing per-step arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.internal_step as usize
    }
}

impl PartialEq for TimeStep {
    fn eq(&self, other: &Self) -> bool {
        self.internal_step == other.internal_step
    }
}

impl Eq for TimeStep {}

impl PartialOrd for TimeStep {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeStep {
    fn cmp(&self, other: &Self) -> Ordering {
        self.internal_step.cmp(&other.internal_step)
    }
}

impl Hash for TimeStep {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.internal_step.hash(state);
    }
}

impl fmt::Display for TimeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.internal_step)
    }
}

// ── OutputOptions ─────────────────────────────────────────────────────────────

/// Which optional result streams a run records.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OutputOptions {
    /// Per-timestep energy rows (one per load type).
    pub energy_rows: bool,
    /// Affordance activation log.
    pub activation_log: bool,
    /// Transportation status and event log.
    pub transportation_log: bool,
    /// Energy storage fill-level change log.
    pub storage_log: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            energy_rows:        true,
            activation_log:     true,
            transportation_log: false,
            storage_log:        false,
        }
    }
}

// ── CalcParameters ────────────────────────────────────────────────────────────

/// Read-only run configuration.
///
/// Typically loaded from a JSON file by the application crate and shared by
/// reference with every component of a household simulation.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalcParameters {
    /// Unix timestamp of internal step 0 (start of the settling period).
    pub start_unix_secs: i64,

    /// Seconds per internal step.  Default: 60.
    pub internal_step_secs: u32,

    /// Seconds per external (reported) step.  Must be a multiple of
    /// `internal_step_secs`.
    pub external_step_secs: u32,

    /// Total internal steps simulated, settling period included.  This is the
    /// simulation horizon: busy bitmaps have exactly this length.
    pub internal_timesteps: u32,

    /// Leading steps simulated before the reported window starts.
    pub settling_steps: u32,

    /// Report settling-period rows with absolute step indices.
    pub show_settling_period: bool,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Field delimiter for CSV outputs.
    pub csv_delimiter: char,

    /// Worker thread count for multi-household runs.  `None` uses all cores.
    pub num_threads: Option<usize>,

    /// Enabled result streams.
    pub options: OutputOptions,
}

impl Default for CalcParameters {
    /// One simulated day at one-minute resolution, no settling period.
    fn default() -> Self {
        Self {
            start_unix_secs:      0,
            internal_step_secs:   60,
            external_step_secs:   60,
            internal_timesteps:   1_440,
            settling_steps:       0,
            show_settling_period: false,
            seed:                 42,
            csv_delimiter:        ';',
            num_threads:          None,
            options:              OutputOptions::default(),
        }
    }
}

impl CalcParameters {
    /// Reject configurations the engine cannot step through.
    pub fn validate(&self) -> HhResult<()> {
        if self.internal_step_secs == 0 {
            return Err(HhError::Config("internal_step_secs must be > 0".into()));
        }
        if self.internal_timesteps == 0 {
            return Err(HhError::Config("internal_timesteps must be > 0".into()));
        }
        if self.external_step_secs == 0 || self.external_step_secs % self.internal_step_secs != 0 {
            return Err(HhError::Config(format!(
                "external_step_secs ({}) must be a positive multiple of internal_step_secs ({})",
                self.external_step_secs, self.internal_step_secs
            )));
        }
        if self.settling_steps >= self.internal_timesteps {
            return Err(HhError::Config(format!(
                "settling_steps ({}) must be smaller than internal_timesteps ({})",
                self.settling_steps, self.internal_timesteps
            )));
        }
        Ok(())
    }

    /// The first step past the horizon (exclusive upper bound).
    #[inline]
    pub fn end_step(&self) -> TimeStep {
        TimeStep::new(self.internal_timesteps, self)
    }

    /// Build the step for `internal_step`.
    #[inline]
    pub fn step(&self, internal_step: u32) -> TimeStep {
        TimeStep::new(internal_step, self)
    }

    /// Steps remaining from `step` (inclusive) to the horizon.
    #[inline]
    pub fn remaining_steps(&self, step: TimeStep) -> u32 {
        self.internal_timesteps.saturating_sub(step.internal_step)
    }

    /// How many internal steps span `secs` seconds (rounds up).
    #[inline]
    pub fn steps_for_secs(&self, secs: u64) -> u64 {
        secs.div_ceil(u64::from(self.internal_step_secs))
    }

    /// Fail with [`HhError::BeyondHorizon`] if `step` is not simulated.
    pub fn check_within_horizon(&self, step: TimeStep) -> HhResult<()> {
        if step.internal_step >= self.internal_timesteps {
            return Err(HhError::BeyondHorizon {
                step:    step.internal_step,
                horizon: self.internal_timesteps,
            });
        }
        Ok(())
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_unix_secs, self.internal_step_secs, self.settling_steps)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current step and converts it to Unix wall-clock seconds.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Unix timestamp of internal step 0.
    pub start_unix_secs: i64,
    /// How many real seconds one internal step represents.
    pub step_secs: u32,
    /// Leading settling steps, used to derive external indices.
    pub settling_steps: u32,
    /// The current internal step, advanced by `SimClock::advance()`.
    pub current_step: u32,
}

impl SimClock {
    pub fn new(start_unix_secs: i64, step_secs: u32, settling_steps: u32) -> Self {
        Self {
            start_unix_secs,
            step_secs,
            settling_steps,
            current_step: 0,
        }
    }

    /// Advance the clock by one internal step.
    #[inline]
    pub fn advance(&mut self) {
        self.current_step += 1;
    }

    /// The current step as a `TimeStep` under `params`.
    #[inline]
    pub fn now(&self, params: &CalcParameters) -> TimeStep {
        TimeStep::new(self.current_step, params)
    }

    /// Elapsed simulated seconds since step 0.
    #[inline]
    pub fn elapsed_secs(&self) -> i64 {
        i64::from(self.current_step) * i64::from(self.step_secs)
    }

    /// Unix timestamp of an arbitrary step.
    #[inline]
    pub fn unix_secs_at(&self, step: TimeStep) -> i64 {
        self.start_unix_secs + i64::from(step.internal_step) * i64::from(self.step_secs)
    }

    /// Break elapsed time into (day, hour, minute) components from run start.
    pub fn elapsed_dhm(&self) -> (u64, u32, u32) {
        let total_secs = self.elapsed_secs().max(0) as u64;
        let days = total_secs / 86_400;
        let hours = ((total_secs % 86_400) / 3_600) as u32;
        let minutes = ((total_secs % 3_600) / 60) as u32;
        (days, hours, minutes)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m) = self.elapsed_dhm();
        write!(f, "T{} (day {} {:02}:{:02})", self.current_step, d, h, m)
    }
}
