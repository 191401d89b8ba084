use hh_affordance::AffordanceError;
use hh_core::HhError;
use hh_device::DeviceError;
use hh_odap::OdapError;
use hh_profile::ProfileError;
use hh_storage::StorageError;
use hh_transport::TransportError;
use hh_variables::VariableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("household configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] HhError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Variable(#[from] VariableError),

    #[error(transparent)]
    Odap(#[from] OdapError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Affordance(#[from] AffordanceError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type SimResult<T> = Result<T, SimError>;
