//! Ledger column keys.

use std::fmt;

use hh_core::{HouseholdId, LoadTypeId};

/// What kind of entity owns a ledger column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OefcDeviceType {
    Device,
    Light,
    AutoDevice,
    Storage,
    Signal,
    Transportation,
}

impl fmt::Display for OefcDeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OefcDeviceType::Device => "Device",
            OefcDeviceType::Light => "Light",
            OefcDeviceType::AutoDevice => "AutoDevice",
            OefcDeviceType::Storage => "Storage",
            OefcDeviceType::Signal => "Signal",
            OefcDeviceType::Transportation => "Transportation",
        };
        f.write_str(s)
    }
}

/// Identifies one ledger column: one entity emitting one load type.
///
/// `entity` is the owner's index within its own arena (device, storage,
/// signal, …); `related` carries the owning location where one exists and
/// `u32::MAX` otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OefcKey {
    pub household:       HouseholdId,
    pub device_type:     OefcDeviceType,
    pub entity:          u32,
    pub related:         u32,
    pub load_type:       LoadTypeId,
    pub device_category: String,
}

impl OefcKey {
    pub const NO_RELATION: u32 = u32::MAX;

    pub fn new(
        household: HouseholdId,
        device_type: OefcDeviceType,
        entity: u32,
        related: u32,
        load_type: LoadTypeId,
        device_category: impl Into<String>,
    ) -> Self {
        Self {
            household,
            device_type,
            entity,
            related,
            load_type,
            device_category: device_category.into(),
        }
    }
}

impl fmt::Display for OefcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}#{} ({}, {})",
            self.household, self.device_type, self.entity, self.load_type, self.device_category
        )
    }
}

/// Registration record of one ledger column.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnEntry {
    pub column:      usize,
    pub name:        String,
    pub description: String,
    pub key:         OefcKey,
}
