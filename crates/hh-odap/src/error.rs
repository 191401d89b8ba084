use hh_core::{LoadTypeId, TimeStep};
use thiserror::Error;

use crate::OefcKey;

#[derive(Debug, Error)]
pub enum OdapError {
    #[error("no ledger column registered for {0}")]
    UnregisteredKey(OefcKey),

    #[error("load type {0} has no registered columns")]
    UnknownLoadType(LoadTypeId),

    #[error("activation of {key} starts at {start}, but {processed} was already processed")]
    PastActivation { key: OefcKey, start: TimeStep, processed: TimeStep },

    #[error("no ledger row for load type {load_type} at {time}")]
    MissingRow { load_type: LoadTypeId, time: TimeStep },
}

pub type OdapResult<T> = Result<T, OdapError>;
