//! Per-person run state.

use hh_affordance::{ActionAfterInterruption, PersonDescriptor};
use hh_core::{LocationId, TimeStep};
use hh_profile::CalcProfile;

/// What a person is doing right now.
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentActivity {
    pub name:               String,
    pub start:              TimeStep,
    /// The profile returned by the activation, travel time included.
    pub profile:            CalcProfile,
    pub location:           LocationId,
    pub interruptible:      bool,
    pub after_interruption: ActionAfterInterruption,
}

/// An activity put on hold by an interruption.
#[derive(Clone, Debug, PartialEq)]
pub struct SuspendedActivity {
    pub activity:        CurrentActivity,
    /// Steps the activity still had when it was interrupted.
    pub remaining_steps: u32,
}

#[derive(Clone, Debug)]
pub struct CalcPerson {
    pub descriptor: PersonDescriptor,
    /// Where the person is, or will be once the current activity started.
    pub location:   LocationId,
    /// First step at which the person may choose again.
    busy_until:     u32,
    current:        Option<CurrentActivity>,
    suspended:      Option<SuspendedActivity>,
}

impl CalcPerson {
    pub fn new(descriptor: PersonDescriptor, location: LocationId) -> Self {
        Self { descriptor, location, busy_until: 0, current: None, suspended: None }
    }

    pub fn is_idle_at(&self, time: TimeStep) -> bool {
        time.internal_step >= self.busy_until
    }

    pub fn busy_until(&self) -> u32 {
        self.busy_until
    }

    pub fn current(&self) -> Option<&CurrentActivity> {
        self.current.as_ref()
    }

    pub fn suspended(&self) -> Option<&SuspendedActivity> {
        self.suspended.as_ref()
    }

    /// Busy with an interruptible activity and not already interrupted.
    pub fn is_interruptible_at(&self, time: TimeStep) -> bool {
        !self.is_idle_at(time)
            && self.suspended.is_none()
            && self.current.as_ref().is_some_and(|c| c.interruptible)
    }

    /// Occupy the person for the length of `activity.profile` (at least one
    /// step).
    pub(crate) fn start(&mut self, time: TimeStep, activity: CurrentActivity) {
        let steps = activity.profile.len().max(1) as u32;
        self.busy_until = time.internal_step.saturating_add(steps);
        self.location = activity.location;
        self.current = Some(activity);
    }

    /// Put the current activity on hold and start `activity` instead.
    pub(crate) fn interrupt(&mut self, time: TimeStep, activity: CurrentActivity) {
        let remaining_steps = self.busy_until.saturating_sub(time.internal_step);
        if let Some(old) = self.current.take() {
            self.suspended = Some(SuspendedActivity { activity: old, remaining_steps });
        }
        self.start(time, activity);
    }

    /// Called when the person falls idle.  Returns to a suspended activity
    /// if it asked for that and the person is still where it takes place;
    /// otherwise drops it.  Returns whether the person resumed.
    pub(crate) fn resume(&mut self, time: TimeStep) -> bool {
        let Some(held) = self.suspended.take() else {
            return false;
        };
        if held.activity.after_interruption != ActionAfterInterruption::GoBackToOld
            || held.activity.location != self.location
        {
            return false;
        }
        self.busy_until = time.internal_step.saturating_add(held.remaining_steps.max(1));
        self.current = Some(held.activity);
        true
    }

    /// Nothing was free: wait one step and choose again.
    pub(crate) fn idle(&mut self, time: TimeStep) {
        self.busy_until = time.internal_step.saturating_add(1);
        self.current = None;
    }
}
