//! Sub-affordances: follow-up slots that open when a parent affordance
//! starts, e.g. "eat dinner" after "cook dinner".
//!
//! A sub-affordance starts `delay_steps` after its parent and occupies its
//! own busy bitmap for `duration_steps`.

use tracing::debug;

use hh_core::{BusyArray, LocationId, TimeStep};

use crate::{ActivationEntry, ActivationLog, AffordanceError, AffordanceResult, SatisfactionValue};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubAffordanceConfig {
    pub name:                String,
    pub delay_steps:         u32,
    pub duration_steps:      u32,
    pub is_interrupting:     bool,
    pub satisfaction_values: Vec<SatisfactionValue>,
}

#[derive(Clone, Debug)]
pub struct CalcSubAffordance {
    pub name:                String,
    pub location:            LocationId,
    pub delay_steps:         u32,
    pub duration_steps:      u32,
    pub is_interrupting:     bool,
    pub satisfaction_values: Vec<SatisfactionValue>,
    busy:                    BusyArray,
}

impl CalcSubAffordance {
    pub fn new(config: SubAffordanceConfig, location: LocationId, horizon: usize) -> Self {
        Self {
            name: config.name,
            location,
            delay_steps: config.delay_steps,
            duration_steps: config.duration_steps,
            is_interrupting: config.is_interrupting,
            satisfaction_values: config.satisfaction_values,
            busy: BusyArray::new(horizon),
        }
    }

    #[inline]
    pub fn is_busy(&self, time: TimeStep) -> bool {
        self.busy.get(time.index())
    }

    /// Occupy the slot from `start`.  Returns the number of steps marked,
    /// which is shorter than `duration_steps` near the end of the run.
    pub fn activate(
        &mut self,
        start: TimeStep,
        activator: &str,
        location_name: &str,
        log: &mut ActivationLog,
    ) -> AffordanceResult<u32> {
        if self.is_busy(start) {
            return Err(AffordanceError::AlreadyBusy { affordance: self.name.clone(), time: start });
        }
        let from = start.index();
        let to = (from + self.duration_steps as usize).min(self.busy.len());
        self.busy.set_range(from..to);
        let steps = to.saturating_sub(from) as u32;
        log.push(ActivationEntry {
            time:           start,
            person:         activator.to_owned(),
            affordance:     self.name.clone(),
            location:       location_name.to_owned(),
            duration_steps: steps,
            data_source:    "sub-affordance".into(),
        });
        debug!(sub_affordance = %self.name, %start, person = activator, steps, "sub-affordance activated");
        Ok(steps)
    }
}
