use hh_core::{DeviceId, LoadTypeId, LocationId};
use hh_odap::OdapError;
use hh_profile::ProfileError;
use hh_variables::VariableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("unknown load type {0:?}")]
    UnknownLoadType(String),

    #[error("load type {0} is not registered")]
    UnregisteredLoadType(LoadTypeId),

    #[error("device {device:?} has no load of type {load_type}")]
    NoLoadForType { device: String, load_type: LoadTypeId },

    #[error("device {0} does not exist")]
    UnknownDevice(DeviceId),

    #[error("location {0} does not exist")]
    UnknownLocation(LocationId),

    #[error("duplicate load type name {0:?}")]
    DuplicateLoadType(String),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Odap(#[from] OdapError),

    #[error(transparent)]
    Variable(#[from] VariableError),
}

pub type DeviceResult<T> = Result<T, DeviceError>;
