//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `HhError` as one variant
//! via `#[from]`.

use thiserror::Error;

/// The top-level error type for `hh-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum HhError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("time step {step} is outside the simulation horizon of {horizon} steps")]
    BeyondHorizon { step: u32, horizon: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `hh-*` crates.
pub type HhResult<T> = Result<T, HhError>;
