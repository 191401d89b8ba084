//! Transportation status lines and trip events.
//!
//! Status lines are free text for debugging route choices; events are one
//! record per trip.  Both are only collected when the log is enabled.

use hh_core::TimeStep;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportationStatus {
    pub time:    TimeStep,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportationEvent {
    pub time:           TimeStep,
    pub person:         String,
    pub src_site:       String,
    pub dst_site:       String,
    pub route:          String,
    /// `name(steps)` for each vehicle used, comma separated.
    pub used_devices:   String,
    pub duration_steps: u32,
    pub activity_steps: u32,
    pub affordance:     String,
}

#[derive(Clone, Debug, Default)]
pub struct TransportationLog {
    enabled:  bool,
    statuses: Vec<TransportationStatus>,
    events:   Vec<TransportationEvent>,
}

impl TransportationLog {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, ..Self::default() }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a status line.  The message is only built when enabled.
    pub fn status(&mut self, time: TimeStep, message: impl FnOnce() -> String) {
        if self.enabled {
            self.statuses.push(TransportationStatus { time, message: message() });
        }
    }

    pub fn event(&mut self, event: TransportationEvent) {
        if self.enabled {
            self.events.push(event);
        }
    }

    pub fn statuses(&self) -> &[TransportationStatus] {
        &self.statuses
    }

    pub fn events(&self) -> &[TransportationEvent] {
        &self.events
    }
}
