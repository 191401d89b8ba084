//! Devices and their loads.
//!
//! A device belongs to one location and has one load per load type it
//! consumes.  Each load registers one ledger column at construction; an
//! activation samples the load's power once with gaussian noise, multiplies
//! it by the profile's step values and queues the result in the ledger.
//! Ledger values stay in the load type's power unit; conversion to the sum
//! unit happens when totals are reported.  Busy state is tracked per load
//! type.

use std::ops::Range;

use tracing::debug;

use hh_core::{
    BusyArray, CalcLoadType, CalcParameters, DeviceId, HouseholdId, LoadTypeId, LocationId,
    NormalRandom, TimeStep,
};
use hh_odap::{ActivationProcessor, OefcDeviceType, OefcKey};
use hh_profile::CalcProfile;

use crate::{DeviceError, DeviceResult};

// ── LoadTypeTable ─────────────────────────────────────────────────────────────

/// Load types of one run, indexed by `LoadTypeId`.
#[derive(Clone, Debug, Default)]
pub struct LoadTypeTable {
    load_types: Vec<CalcLoadType>,
}

impl LoadTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a load type; its id is assigned from the table position.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        unit_of_power: impl Into<String>,
        unit_of_sum: impl Into<String>,
        conversion_factor: f64,
    ) -> DeviceResult<LoadTypeId> {
        let name = name.into();
        if self.by_name(&name).is_some() {
            return Err(DeviceError::DuplicateLoadType(name));
        }
        let id = LoadTypeId(self.load_types.len() as u16);
        self.load_types
            .push(CalcLoadType::new(id, name, unit_of_power, unit_of_sum, conversion_factor));
        Ok(id)
    }

    pub fn get(&self, id: LoadTypeId) -> DeviceResult<&CalcLoadType> {
        self.load_types
            .get(id.index())
            .ok_or(DeviceError::UnregisteredLoadType(id))
    }

    pub fn set_show_in_charts(&mut self, id: LoadTypeId, show: bool) {
        if let Some(lt) = self.load_types.get_mut(id.index()) {
            lt.show_in_charts = show;
        }
    }

    pub fn by_name(&self, name: &str) -> Option<&CalcLoadType> {
        self.load_types.iter().find(|lt| lt.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalcLoadType> {
        self.load_types.iter()
    }

    pub fn len(&self) -> usize {
        self.load_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.load_types.is_empty()
    }
}

// ── DeviceEnv ─────────────────────────────────────────────────────────────────

/// Everything a device activation touches outside the device itself.
pub struct DeviceEnv<'a> {
    pub params:     &'a CalcParameters,
    pub load_types: &'a LoadTypeTable,
    pub odap:       &'a mut dyn ActivationProcessor,
    pub normal:     &'a mut NormalRandom,
}

// ── CalcDeviceLoad ────────────────────────────────────────────────────────────

/// Power draw of a device on one load type.  `value` is the mean in the load
/// type's power unit; each activation samples `N(value, std_dev²)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalcDeviceLoad {
    pub name:      String,
    pub load_type: LoadTypeId,
    pub value:     f64,
    pub std_dev:   f64,
}

// ── CalcDevice ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct CalcDevice {
    pub id:          DeviceId,
    pub name:        String,
    pub location:    LocationId,
    pub category:    String,
    pub device_type: OefcDeviceType,
    loads:           Vec<CalcDeviceLoad>,
    keys:            Vec<OefcKey>,
    busy:            Vec<BusyArray>,
}

impl CalcDevice {
    /// Build a device and register one ledger column per load.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: DeviceId,
        name: impl Into<String>,
        location: LocationId,
        category: impl Into<String>,
        device_type: OefcDeviceType,
        loads: Vec<CalcDeviceLoad>,
        household: HouseholdId,
        env: &mut DeviceEnv<'_>,
    ) -> DeviceResult<Self> {
        let name = name.into();
        let category = category.into();
        let mut keys = Vec::with_capacity(loads.len());
        for load in &loads {
            let load_type = env.load_types.get(load.load_type)?;
            let key = OefcKey::new(household, device_type, id.0, location.0, load.load_type, category.clone());
            env.odap.register_device(&name, key.clone(), &load.name, load_type);
            keys.push(key);
        }
        let horizon = env.params.internal_timesteps as usize;
        let busy = loads.iter().map(|_| BusyArray::new(horizon)).collect();
        Ok(Self {
            id,
            name,
            location,
            category,
            device_type,
            loads,
            keys,
            busy,
        })
    }

    pub fn loads(&self) -> &[CalcDeviceLoad] {
        &self.loads
    }

    /// Ledger key of the load on `load_type`.
    pub fn key_for(&self, load_type: LoadTypeId) -> DeviceResult<&OefcKey> {
        Ok(&self.keys[self.load_index(load_type)?])
    }

    fn load_index(&self, load_type: LoadTypeId) -> DeviceResult<usize> {
        self.loads
            .iter()
            .position(|l| l.load_type == load_type)
            .ok_or_else(|| DeviceError::NoLoadForType { device: self.name.clone(), load_type })
    }

    pub fn has_load(&self, load_type: LoadTypeId) -> bool {
        self.loads.iter().any(|l| l.load_type == load_type)
    }

    /// Whether the load on `load_type` is busy at step `time`.
    pub fn is_busy(&self, time: TimeStep, load_type: LoadTypeId) -> DeviceResult<bool> {
        Ok(self.busy[self.load_index(load_type)?].get(time.index()))
    }

    /// Whether the load on `load_type` is busy anywhere in the span an
    /// activation of `duration_steps` stretched by `time_factor` would
    /// cover.
    pub fn is_busy_during_timespan(
        &self,
        start: TimeStep,
        duration_steps: usize,
        time_factor: f64,
        load_type: LoadTypeId,
    ) -> DeviceResult<bool> {
        let span = ((duration_steps as f64 * time_factor).ceil() as usize).max(1);
        let from = start.index();
        Ok(self.busy[self.load_index(load_type)?].any_in(from..from + span))
    }

    /// Run `profile` on the load of `load_type` starting at `start`.
    ///
    /// The profile is stretched by `time_factor` (relative profiles only) and
    /// cut at the horizon.  Returns the number of steps the device is busy.
    pub fn activate(
        &mut self,
        start: TimeStep,
        profile: &CalcProfile,
        load_type: LoadTypeId,
        time_factor: f64,
        env: &mut DeviceEnv<'_>,
    ) -> DeviceResult<u32> {
        let idx = self.load_index(load_type)?;
        let lt = env.load_types.get(load_type)?;
        let scaled = profile.compress_expand(time_factor)?;
        let remaining = env.params.remaining_steps(start) as usize;
        let steps = scaled.step_values()?;
        let steps = &steps[..steps.len().min(remaining)];

        let load = &self.loads[idx];
        let power = env.normal.next_double(load.value, load.std_dev);
        let values: Vec<f64> = steps.iter().map(|v| v * power).collect();

        env.odap.add_activation(&self.keys[idx], start, &values)?;
        let from = start.index();
        self.busy[idx].set_range(from..from + values.len());
        debug!(
            device = %self.name,
            %start,
            load_type = %lt.name,
            steps = values.len(),
            power,
            "device activated"
        );
        Ok(values.len() as u32)
    }

    /// Switch every load on for `duration_steps` at constant mean-sampled
    /// power.  Used for lights and vehicle energy loads.
    ///
    /// Steps where a load is already running stay as they are; only the free
    /// stretches of the span get a new activation, so overlapping requests
    /// (two people in one lit room) never stack in the ledger.
    pub fn activate_constant(
        &mut self,
        start: TimeStep,
        duration_steps: u32,
        env: &mut DeviceEnv<'_>,
    ) -> DeviceResult<()> {
        let from = start.index();
        let to = from + env.params.remaining_steps(start).min(duration_steps) as usize;
        let load_types: Vec<LoadTypeId> = self.loads.iter().map(|l| l.load_type).collect();
        for lt in load_types {
            for run in self.free_runs(lt, from..to)? {
                let flat = CalcProfile::dead_time(run.len(), format!("{} on", self.name), "constant");
                let run_start = start.add_steps((run.start - from) as u32);
                self.activate(run_start, &flat, lt, 1.0, env)?;
            }
        }
        Ok(())
    }

    /// Maximal idle stretches of the load on `load_type` inside `span`.
    fn free_runs(&self, load_type: LoadTypeId, span: Range<usize>) -> DeviceResult<Vec<Range<usize>>> {
        let busy = &self.busy[self.load_index(load_type)?];
        let mut runs = Vec::new();
        let mut open: Option<usize> = None;
        for i in span.clone() {
            match (busy.get(i), open) {
                (false, None) => open = Some(i),
                (true, Some(s)) => {
                    runs.push(s..i);
                    open = None;
                }
                _ => {}
            }
        }
        if let Some(s) = open {
            runs.push(s..span.end);
        }
        Ok(runs)
    }
}

// ── DeviceStore ───────────────────────────────────────────────────────────────

/// Arena of every device in one household, addressed by `DeviceId`.
#[derive(Clone, Debug, Default)]
pub struct DeviceStore {
    devices: Vec<CalcDevice>,
}

impl DeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next inserted device must carry.
    pub fn next_id(&self) -> DeviceId {
        DeviceId(self.devices.len() as u32)
    }

    /// Build and insert a device in one go.
    #[allow(clippy::too_many_arguments)]
    pub fn add(
        &mut self,
        name: impl Into<String>,
        location: LocationId,
        category: impl Into<String>,
        device_type: OefcDeviceType,
        loads: Vec<CalcDeviceLoad>,
        household: HouseholdId,
        env: &mut DeviceEnv<'_>,
    ) -> DeviceResult<DeviceId> {
        let id = self.next_id();
        let device = CalcDevice::new(id, name, location, category, device_type, loads, household, env)?;
        self.devices.push(device);
        Ok(id)
    }

    pub fn get(&self, id: DeviceId) -> DeviceResult<&CalcDevice> {
        self.devices.get(id.index()).ok_or(DeviceError::UnknownDevice(id))
    }

    pub fn get_mut(&mut self, id: DeviceId) -> DeviceResult<&mut CalcDevice> {
        self.devices.get_mut(id.index()).ok_or(DeviceError::UnknownDevice(id))
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalcDevice> {
        self.devices.iter()
    }
}
