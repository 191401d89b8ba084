//! Locations: rooms or places where affordances happen.

use hh_core::{DeviceId, LocationId, SiteId, TimeStep};

use crate::{DeviceEnv, DeviceResult, DeviceStore};

/// A place in or outside the house.  Owns its light devices; belongs to at
/// most one site, which the transportation layer uses to decide whether
/// getting there needs travel.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalcLocation {
    pub id:            LocationId,
    pub name:          String,
    pub site:          Option<SiteId>,
    pub light_devices: Vec<DeviceId>,
}

impl CalcLocation {
    pub fn new(id: LocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            site: None,
            light_devices: Vec::new(),
        }
    }

    /// Turn on every light of this location for `duration_steps`.
    pub fn switch_on_lights(
        &self,
        start: TimeStep,
        duration_steps: u32,
        devices: &mut DeviceStore,
        env: &mut DeviceEnv<'_>,
    ) -> DeviceResult<()> {
        for &light in &self.light_devices {
            devices.get_mut(light)?.activate_constant(start, duration_steps, env)?;
        }
        Ok(())
    }
}
