use hh_core::TimeStep;
use hh_device::DeviceError;
use hh_profile::ProfileError;
use hh_variables::VariableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AffordanceError {
    /// `activate` was called for a step the affordance is already occupied
    /// at.  Callers must see `BusynessType::NotBusy` first.
    #[error("affordance {affordance:?} is already busy at {time}")]
    AlreadyBusy { affordance: String, time: TimeStep },

    #[error("affordance {affordance:?}: {reason}")]
    InvalidConfig { affordance: String, reason: String },

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Variable(#[from] VariableError),
}

pub type AffordanceResult<T> = Result<T, AffordanceError>;
