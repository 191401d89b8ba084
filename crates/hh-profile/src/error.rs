use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile parse error: {0}")]
    Parse(String),

    #[error("profile {name:?}: time point at {offset_secs}s precedes the previous point at {previous_secs}s")]
    UnorderedPoint { name: String, offset_secs: u64, previous_secs: u64 },

    #[error("profile {name:?}: value {value} is not finite")]
    NonFiniteValue { name: String, value: f64 },

    #[error("profile {name:?} needs at least two time points, has {count}")]
    TooFewPoints { name: String, count: usize },

    #[error("profile {0:?} has not been converted to time steps")]
    NotConverted(String),

    #[error("profile {name:?} covers {available} steps, {requested} requested")]
    TooShort { name: String, available: usize, requested: usize },

    #[error("step length must be > 0")]
    ZeroStepLength,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ProfileResult<T> = Result<T, ProfileError>;
