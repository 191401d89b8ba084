//! Running many independent households.

use std::sync::atomic::AtomicBool;

use hh_core::TimeStep;

use crate::{ActivityChooser, Household, HouseholdObserver, SimResult};

/// How a household run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every step up to the horizon was simulated.
    Completed,
    /// The cancellation flag was seen before step `at` started.
    Cancelled { at: TimeStep },
}

/// Run every `(household, observer)` pair to completion.
///
/// With the `parallel` feature households run on Rayon's thread pool;
/// without it they run one after another.  Results come back in input order
/// either way.  One household failing does not stop the others; setting
/// `cancel` stops all of them at their next step boundary.
pub fn run_households<C, O>(jobs: &mut [(Household<C>, O)], cancel: &AtomicBool) -> Vec<SimResult<RunOutcome>>
where
    C: ActivityChooser,
    O: HouseholdObserver + Send,
{
    #[cfg(not(feature = "parallel"))]
    {
        jobs.iter_mut()
            .map(|(household, observer)| household.run(observer, Some(cancel)))
            .collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        jobs.par_iter_mut()
            .map(|(household, observer)| household.run(observer, Some(cancel)))
            .collect()
    }
}
