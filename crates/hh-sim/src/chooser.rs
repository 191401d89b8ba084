//! The `ActivityChooser` trait: which free activity a person starts next.

use hh_affordance::PersonDescriptor;
use hh_core::{HouseholdRng, TimeStep};
use hh_transport::Activity;

/// An activity that reported `NotBusy` for the person this step.
#[derive(Clone, Copy)]
pub struct Candidate<'a> {
    /// Position in the household's activity list.
    pub index:    usize,
    pub activity: &'a Activity,
}

/// Pluggable decision rule.
///
/// The household calls `choose` once per idle person per step with every
/// activity that is free for that person.  Returning `None` (or an
/// out-of-range position) leaves the person idle for one step.
///
/// Implementations must be `Send` so households can run on worker threads.
pub trait ActivityChooser: Send + 'static {
    /// Pick a position in `candidates`.
    fn choose(
        &mut self,
        person:     &PersonDescriptor,
        time:       TimeStep,
        candidates: &[Candidate<'_>],
        rng:        &mut HouseholdRng,
    ) -> Option<usize>;
}

/// Random choice proportional to each activity's weight.
#[derive(Clone, Copy, Debug, Default)]
pub struct WeightedChooser;

impl ActivityChooser for WeightedChooser {
    fn choose(
        &mut self,
        _person:    &PersonDescriptor,
        _time:      TimeStep,
        candidates: &[Candidate<'_>],
        rng:        &mut HouseholdRng,
    ) -> Option<usize> {
        let weights: Vec<f64> = candidates.iter().map(|c| f64::from(c.activity.weight())).collect();
        rng.choose_weighted(&weights)
    }
}
