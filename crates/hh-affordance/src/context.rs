//! Borrowed household state an affordance reads or mutates.
//!
//! `BusyContext` is the read-only half used by availability checks;
//! `ActivationContext` is the mutable half used when an affordance actually
//! starts.  Both are assembled by the household loop for the duration of
//! one call.

use hh_core::{CalcParameters, LocationId};
use hh_device::{CalcLocation, DeviceEnv, DeviceError, DeviceStore};
use hh_variables::VariableRepository;

use crate::{ActivationLog, AffordanceResult};

pub struct BusyContext<'a> {
    pub params:    &'a CalcParameters,
    pub variables: &'a VariableRepository,
    pub devices:   &'a DeviceStore,
}

pub struct ActivationContext<'a, 'e> {
    pub devices:   &'a mut DeviceStore,
    pub locations: &'a [CalcLocation],
    pub variables: &'a mut VariableRepository,
    pub env:       &'a mut DeviceEnv<'e>,
    pub log:       &'a mut ActivationLog,
}

impl ActivationContext<'_, '_> {
    pub fn location(&self, id: LocationId) -> AffordanceResult<&CalcLocation> {
        Ok(self
            .locations
            .get(id.index())
            .ok_or(DeviceError::UnknownLocation(id))?)
    }

    /// Read-only view over the same state.
    pub fn busy_context(&self) -> BusyContext<'_> {
        BusyContext {
            params:    self.env.params,
            variables: self.variables,
            devices:   self.devices,
        }
    }
}
