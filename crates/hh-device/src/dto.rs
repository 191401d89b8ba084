//! Input DTOs and their conversion into in-memory entities.
//!
//! DTOs reference load types by name; conversion resolves every reference
//! once, before the run starts, so unknown names surface as configuration
//! errors rather than mid-run failures.

use hh_core::{HouseholdId, LocationId, SiteId};
use hh_odap::OefcDeviceType;

use crate::{
    CalcDeviceLoad, CalcLocation, DeviceEnv, DeviceError, DeviceResult, DeviceStore, LoadTypeTable,
};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalcLoadTypeDto {
    pub name:              String,
    pub unit_of_power:     String,
    pub unit_of_sum:       String,
    pub conversion_factor: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub show_in_charts:    bool,
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalcDeviceLoadDto {
    pub name:      String,
    pub load_type: String,
    pub value:     f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub std_dev:   f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalcDeviceDto {
    pub name:     String,
    pub category: String,
    pub loads:    Vec<CalcDeviceLoadDto>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalcLocationDto {
    pub name:          String,
    pub id:            LocationId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub site:          Option<SiteId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub light_devices: Vec<CalcDeviceDto>,
}

/// Build the load type table.  Names must be unique.
pub fn make_load_types(dtos: &[CalcLoadTypeDto]) -> DeviceResult<LoadTypeTable> {
    let mut table = LoadTypeTable::new();
    for dto in dtos {
        let id = table.add(&dto.name, &dto.unit_of_power, &dto.unit_of_sum, dto.conversion_factor)?;
        if !dto.show_in_charts {
            table.set_show_in_charts(id, false);
        }
    }
    Ok(table)
}

/// Resolve load references by name.
pub fn make_loads(dtos: &[CalcDeviceLoadDto], load_types: &LoadTypeTable) -> DeviceResult<Vec<CalcDeviceLoad>> {
    dtos.iter()
        .map(|d| {
            let lt = load_types
                .by_name(&d.load_type)
                .ok_or_else(|| DeviceError::UnknownLoadType(d.load_type.clone()))?;
            Ok(CalcDeviceLoad {
                name:      d.name.clone(),
                load_type: lt.id,
                value:     d.value,
                std_dev:   d.std_dev,
            })
        })
        .collect()
}

/// Build a regular device at `location` and add it to `devices`.
pub fn make_device(
    dto: &CalcDeviceDto,
    location: LocationId,
    household: HouseholdId,
    devices: &mut DeviceStore,
    env: &mut DeviceEnv<'_>,
) -> DeviceResult<hh_core::DeviceId> {
    let loads = make_loads(&dto.loads, env.load_types)?;
    devices.add(&dto.name, location, &dto.category, OefcDeviceType::Device, loads, household, env)
}

/// Build locations and their light devices.
///
/// Location ids must equal their position in `dtos`.
pub fn make_locations(
    dtos: &[CalcLocationDto],
    household: HouseholdId,
    devices: &mut DeviceStore,
    env: &mut DeviceEnv<'_>,
) -> DeviceResult<Vec<CalcLocation>> {
    let mut locations = Vec::with_capacity(dtos.len());
    for (i, dto) in dtos.iter().enumerate() {
        if dto.id.index() != i {
            return Err(DeviceError::UnknownLocation(dto.id));
        }
        let mut loc = CalcLocation::new(dto.id, &dto.name);
        loc.site = dto.site;
        for light in &dto.light_devices {
            let loads = make_loads(&light.loads, env.load_types)?;
            let id = devices.add(&light.name, dto.id, &light.category, OefcDeviceType::Light, loads, household, env)?;
            loc.light_devices.push(id);
        }
        locations.push(loc);
    }
    Ok(locations)
}
