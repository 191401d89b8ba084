//! Auto devices: always-on appliances (fridge, router, standby loads) that
//! restart their profile whenever they fall idle.
//!
//! Each step, an auto device whose load is idle and whose variable
//! requirements all hold runs its profile again.  The profile duration is
//! stretched by a factor drawn from `N(1, time_std_dev²)`, clamped to
//! `[0.1, 3]` so a single unlucky sample cannot freeze or skip the device.
//! A restart only happens when the whole stretched run is free; a booking
//! further ahead (an activity's offset device profile) holds it back.

use tracing::trace;

use hh_core::{DeviceId, LoadTypeId, TimeStep};
use hh_profile::CalcProfile;
use hh_variables::{all_met, VariableRepository, VariableRequirement};

use crate::{DeviceEnv, DeviceResult, DeviceStore};

const MIN_TIME_FACTOR: f64 = 0.1;
const MAX_TIME_FACTOR: f64 = 3.0;

#[derive(Clone, Debug)]
pub struct CalcAutoDevice {
    pub device:       DeviceId,
    pub profile:      CalcProfile,
    pub load_type:    LoadTypeId,
    pub time_std_dev: f64,
    pub requirements: Vec<VariableRequirement>,
}

impl CalcAutoDevice {
    pub fn new(
        device: DeviceId,
        profile: CalcProfile,
        load_type: LoadTypeId,
        time_std_dev: f64,
        requirements: Vec<VariableRequirement>,
    ) -> Self {
        Self { device, profile, load_type, time_std_dev, requirements }
    }

    /// Activate if idle and permitted.  Returns whether an activation started.
    pub fn step(
        &self,
        time: TimeStep,
        devices: &mut DeviceStore,
        variables: &VariableRepository,
        env: &mut DeviceEnv<'_>,
    ) -> DeviceResult<bool> {
        let device = devices.get_mut(self.device)?;
        if device.is_busy(time, self.load_type)? || !all_met(&self.requirements, variables)? {
            return Ok(false);
        }
        let factor = env
            .normal
            .next_double(1.0, self.time_std_dev)
            .clamp(MIN_TIME_FACTOR, MAX_TIME_FACTOR);
        let span = self.profile.compress_expand(factor)?.step_values()?.len();
        if device.is_busy_during_timespan(time, span, 1.0, self.load_type)? {
            trace!(device = %device.name, %time, "auto device blocked by a later booking");
            return Ok(false);
        }
        let steps = device.activate(time, &self.profile, self.load_type, factor, env)?;
        trace!(device = %device.name, %time, steps, "auto device restarted");
        Ok(true)
    }
}
