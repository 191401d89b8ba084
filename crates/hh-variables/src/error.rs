use hh_core::VariableId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VariableError {
    #[error("variable {0} is not registered")]
    Unknown(VariableId),

    #[error("no variable named {0:?}")]
    UnknownName(String),

    #[error("variable {0:?} is already registered")]
    DuplicateName(String),
}

pub type VariableResult<T> = Result<T, VariableError>;
