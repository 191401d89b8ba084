use hh_affordance::AffordanceError;
use hh_core::{LocationId, PersonId, RouteId, SiteId, TimeStep, TransportCategoryId};
use hh_device::DeviceError;
use hh_profile::ProfileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    /// `activate` without a preceding `is_busy` for the same step, person
    /// and source location, or after `is_busy` reported no usable route.
    #[error("{affordance:?} activated at {time} for {person} from {location} without a matching busy check")]
    ActivateWithoutBusyCheck {
        affordance: String,
        time:       TimeStep,
        person:     PersonId,
        location:   LocationId,
    },

    #[error("site {0} does not exist")]
    UnknownSite(SiteId),

    #[error("transport category {0} does not exist")]
    UnknownCategory(TransportCategoryId),

    #[error("route {0} does not exist")]
    UnknownRoute(RouteId),

    #[error("transport device {0} does not exist")]
    UnknownTransportDevice(usize),

    #[error("invalid transport configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Affordance(#[from] AffordanceError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

pub type TransportResult<T> = Result<T, TransportError>;
