//! `Activity`: what a person can choose, with or without travel.

use hh_affordance::{ActivationContext, BusyContext, BusynessType, CalcAffordance, PersonDescriptor};
use hh_core::{LocationId, TimeStep};
use hh_profile::CalcProfile;

use crate::{RoutedActivity, TransportResult, TravelContext};

#[derive(Clone, Debug)]
pub enum Activity {
    /// Done where the person already is.
    Direct(CalcAffordance),
    /// Needs a trip to the affordance's site first.
    Routed(RoutedActivity),
}

impl Activity {
    pub fn affordance(&self) -> &CalcAffordance {
        match self {
            Activity::Direct(a) => a,
            Activity::Routed(r) => r.affordance(),
        }
    }

    pub fn name(&self) -> &str {
        &self.affordance().name
    }

    pub fn pretty_name(&self) -> String {
        match self {
            Activity::Direct(a) => a.name.clone(),
            Activity::Routed(r) => r.pretty_name(),
        }
    }

    pub fn location(&self) -> LocationId {
        self.affordance().location
    }

    pub fn weight(&self) -> u32 {
        self.affordance().weight
    }

    pub fn is_busy(
        &mut self,
        time: TimeStep,
        source: LocationId,
        person: &PersonDescriptor,
        ctx: &BusyContext<'_>,
        travel: &mut TravelContext<'_>,
    ) -> TransportResult<BusynessType> {
        match self {
            Activity::Direct(a) => Ok(a.is_busy(time, person, ctx)?),
            Activity::Routed(r) => r.is_busy(time, source, person, ctx, travel),
        }
    }

    pub fn activate(
        &mut self,
        time: TimeStep,
        person: &PersonDescriptor,
        source: LocationId,
        ctx: &mut ActivationContext<'_, '_>,
        travel: &mut TravelContext<'_>,
    ) -> TransportResult<CalcProfile> {
        match self {
            Activity::Direct(a) => Ok(a.activate(time, person, source, ctx)?),
            Activity::Routed(r) => r.activate(time, person, source, ctx, travel),
        }
    }
}
