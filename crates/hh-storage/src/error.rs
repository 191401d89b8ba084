use hh_core::{LoadTypeId, TimeStep};
use hh_odap::OdapError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage {storage:?}: no ledger row for signal load type {load_type} at {time}")]
    MissingSignalRow { storage: String, load_type: LoadTypeId, time: TimeStep },

    #[error("storage {storage:?}: invalid configuration: {reason}")]
    InvalidConfig { storage: String, reason: String },

    #[error("storages did not settle within {0} passes")]
    NoConvergence(usize),

    #[error(transparent)]
    Odap(#[from] OdapError),
}

pub type StorageResult<T> = Result<T, StorageError>;
