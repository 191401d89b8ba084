//! `hh-device` — devices, loads and locations.
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`device`]   | `CalcDevice`, `CalcDeviceLoad`, `DeviceStore`, `LoadTypeTable`, `DeviceEnv` |
//! | [`location`] | `CalcLocation`                                                |
//! | [`auto`]     | `CalcAutoDevice`                                              |
//! | [`dto`]      | Input DTOs and `make_*` conversion functions                  |
//! | [`error`]    | `DeviceError`, `DeviceResult<T>`                              |
//!
//! Devices register their ledger columns with the household's
//! [`ActivationProcessor`](hh_odap::ActivationProcessor) when they are built
//! and only ever write to those columns.

pub mod auto;
pub mod device;
pub mod dto;
pub mod error;
pub mod location;

#[cfg(test)]
mod tests;

pub use auto::CalcAutoDevice;
pub use device::{CalcDevice, CalcDeviceLoad, DeviceEnv, DeviceStore, LoadTypeTable};
pub use dto::{
    make_device, make_load_types, make_loads, make_locations, CalcDeviceDto, CalcDeviceLoadDto,
    CalcLoadTypeDto, CalcLocationDto,
};
pub use error::{DeviceError, DeviceResult};
pub use location::CalcLocation;
