//! Time windows in which an affordance may start.

use std::ops::Range;

use hh_core::{BusyArray, TimeStep};

/// Per-step permission mask.  A set bit means starting is allowed.
///
/// Steps outside the mask are not permitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeLimit {
    pub name: String,
    allowed:  BusyArray,
}

impl TimeLimit {
    /// A limit that forbids every step until ranges are allowed.
    pub fn new(name: impl Into<String>, horizon: usize) -> Self {
        Self { name: name.into(), allowed: BusyArray::new(horizon) }
    }

    /// A limit that permits the whole horizon.
    pub fn always(name: impl Into<String>, horizon: usize) -> Self {
        let mut limit = Self::new(name, horizon);
        limit.allow(0..horizon);
        limit
    }

    /// Build from one flag per step.
    pub fn from_bools(name: impl Into<String>, flags: &[bool], horizon: usize) -> Self {
        Self { name: name.into(), allowed: BusyArray::from_bools(flags, horizon) }
    }

    /// Permit every step in `steps` (clamped to the horizon).
    pub fn allow(&mut self, steps: Range<usize>) {
        self.allowed.set_range(steps);
    }

    /// Permit `range` on every day of the horizon, given the number of
    /// steps per day.  `range` is relative to the start of each day.
    pub fn allow_daily(&mut self, range: Range<usize>, steps_per_day: usize) {
        if steps_per_day == 0 {
            return;
        }
        let mut day = 0;
        while day < self.allowed.len() {
            self.allow(day + range.start..day + range.end);
            day += steps_per_day;
        }
    }

    #[inline]
    pub fn permits(&self, time: TimeStep) -> bool {
        self.allowed.get(time.index())
    }

    pub fn permitted_steps(&self) -> usize {
        self.allowed.count_busy()
    }
}
