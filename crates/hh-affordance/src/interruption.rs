//! What a person does once an interrupting activity pulled them away.

use std::fmt;

/// Set on the affordance that gets interrupted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionAfterInterruption {
    /// Return to the interrupted affordance for the steps it had left.
    GoBackToOld,
    /// Drop the interrupted affordance and choose again.
    #[default]
    LookForNew,
}

impl fmt::Display for ActionAfterInterruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionAfterInterruption::GoBackToOld => "go back to old",
            ActionAfterInterruption::LookForNew => "look for new",
        })
    }
}
