//! Why an affordance can or cannot be started right now.

use std::fmt;

/// Outcome of an availability check.  Only `NotBusy` permits activation;
/// every other variant names the first check that failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BusynessType {
    NotBusy,
    /// Someone else holds the slot, a device is running, or the person is
    /// not eligible.
    Occupied,
    /// A route exists but no transport device is free.
    NoTransportation,
    VariableRequirementsNotMet,
    BeyondTimeLimit,
    /// The affordance's site cannot be reached from where the person is.
    NoRoute,
}

impl BusynessType {
    #[inline]
    pub fn is_busy(self) -> bool {
        self != BusynessType::NotBusy
    }
}

impl fmt::Display for BusynessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BusynessType::NotBusy => "not busy",
            BusynessType::Occupied => "occupied",
            BusynessType::NoTransportation => "no transportation",
            BusynessType::VariableRequirementsNotMet => "variable requirements not met",
            BusynessType::BeyondTimeLimit => "beyond time limit",
            BusynessType::NoRoute => "no route",
        };
        f.write_str(s)
    }
}
