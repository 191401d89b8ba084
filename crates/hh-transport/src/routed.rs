//! `RoutedActivity`: an affordance reached by travelling to its site.
//!
//! The wrapper forwards everything to the inner affordance except the two
//! calls that depend on where the person is:
//!
//! * `is_busy` checks the inner affordance's requirements and eligibility,
//!   resolves a trip from the source location, then asks the inner
//!   affordance about the arrival step.  Arrivals at or past the end of the
//!   run count as free.
//! * `activate` carries out the cached trip and starts the inner affordance
//!   at the arrival step.  The returned person profile is the travel time
//!   as dead time followed by the inner profile.  If the run ends during
//!   the trip only the dead time is returned and the inner affordance is
//!   not started.

use hh_affordance::{ActivationContext, BusyContext, BusynessType, CalcAffordance, PersonDescriptor};
use hh_core::{HouseholdRng, LocationId, PersonId, SiteId, TimeStep};
use hh_device::CalcLocation;
use hh_profile::CalcProfile;

use crate::{
    RouteCache, RouteChoice, TransportError, TransportResult, TransportationEvent,
    TransportationHandler,
};

/// Transport state borrowed for one call.
pub struct TravelContext<'a> {
    pub handler: &'a mut TransportationHandler,
    pub rng:     &'a mut HouseholdRng,
}

#[derive(Clone, Debug)]
pub struct RoutedActivity {
    inner: CalcAffordance,
    site:  SiteId,
    cache: Option<RouteCache>,
}

fn location_name(locations: &[CalcLocation], id: LocationId) -> String {
    locations
        .get(id.index())
        .map_or_else(|| id.to_string(), |l| l.name.clone())
}

impl RoutedActivity {
    /// Wrap `inner`, which must sit at a location of `site`.
    pub fn new(inner: CalcAffordance, site: SiteId, handler: &mut TransportationHandler) -> TransportResult<Self> {
        if !handler.site(site)?.contains(inner.location) {
            return Err(TransportError::InvalidConfig(format!(
                "affordance {:?} is not located at site {}",
                inner.name, site
            )));
        }
        handler.log.status(TimeStep::raw(0), || {
            format!("Initializing affordance base transport decorator for {}", inner.name)
        });
        Ok(Self { inner, site, cache: None })
    }

    pub fn affordance(&self) -> &CalcAffordance {
        &self.inner
    }

    pub fn site(&self) -> SiteId {
        self.site
    }

    pub fn pretty_name(&self) -> String {
        format!("{} (including transportation)", self.inner.name)
    }

    pub fn cache(&self) -> Option<&RouteCache> {
        self.cache.as_ref()
    }

    /// The trip for `(person, time, source)`, chosen once and then reused.
    fn route_for(
        &mut self,
        time: TimeStep,
        person: PersonId,
        source: LocationId,
        travel: &mut TravelContext<'_>,
    ) -> RouteChoice {
        if !self.cache.as_ref().is_some_and(|c| c.is_for(person, time)) {
            self.cache = Some(RouteCache::new(person, time));
        }
        let cache = self.cache.get_or_insert_with(|| RouteCache::new(person, time));
        if let Some(choice) = cache.get(source) {
            return choice.clone();
        }
        let choice = travel.handler.select_route(source, self.site, time, travel.rng);
        cache.insert(source, choice.clone());
        choice
    }

    pub fn is_busy(
        &mut self,
        time: TimeStep,
        source: LocationId,
        person: &PersonDescriptor,
        ctx: &BusyContext<'_>,
        travel: &mut TravelContext<'_>,
    ) -> TransportResult<BusynessType> {
        let pre = self.inner.check_preconditions(person, ctx)?;
        if pre.is_busy() {
            return Ok(pre);
        }
        let selected = match self.route_for(time, person.id, source, travel) {
            RouteChoice::Found(selected) => selected,
            RouteChoice::NoRoute => return Ok(BusynessType::NoRoute),
            RouteChoice::NoTransportation => return Ok(BusynessType::NoTransportation),
        };
        let arrival = time.add_steps(selected.duration_steps);
        if arrival.internal_step >= ctx.params.internal_timesteps {
            return Ok(BusynessType::NotBusy);
        }
        let result = self.inner.is_busy(arrival, person, ctx)?;
        travel.handler.log.status(time, || {
            format!(
                "\t\t{} @{} by {} checking {} for busyness: {} @time {} with the route {} and a travel duration of {}",
                time, source, person.name, self.inner.name, result, arrival, selected.name, selected.duration_steps
            )
        });
        Ok(result)
    }

    pub fn activate(
        &mut self,
        time: TimeStep,
        person: &PersonDescriptor,
        source: LocationId,
        ctx: &mut ActivationContext<'_, '_>,
        travel: &mut TravelContext<'_>,
    ) -> TransportResult<CalcProfile> {
        let selected = match self
            .cache
            .as_ref()
            .filter(|c| c.is_for(person.id, time))
            .and_then(|c| c.get(source))
        {
            Some(RouteChoice::Found(selected)) => selected.clone(),
            _ => {
                return Err(TransportError::ActivateWithoutBusyCheck {
                    affordance: self.inner.name.clone(),
                    time,
                    person: person.id,
                    location: source,
                });
            }
        };

        let used = travel
            .handler
            .activate_route(&selected, time, &person.name, ctx.devices, ctx.env)?;
        let duration = selected.duration_steps;
        let src_name = location_name(ctx.locations, source);
        let dst_name = location_name(ctx.locations, self.inner.location);
        let pretty = self.pretty_name();
        if duration == 0 {
            travel.handler.log.status(time, || {
                format!(
                    "\tActivating {pretty} at {time} with no transportation and moving from {src_name} to {dst_name} for affordance {}",
                    self.inner.name
                )
            });
        } else {
            travel.handler.log.status(time, || {
                format!(
                    "\tActivating {pretty} at {time} with a transportation duration of {duration} for moving from {src_name} to {dst_name}"
                )
            });
        }

        let label = format!("Travel Profile for Route {} to affordance {}", selected.name, self.inner.name);
        let arrival = time.add_steps(duration);
        let (profile, activity_steps) = if arrival.internal_step < ctx.env.params.internal_timesteps {
            let wrapped = self.inner.activate(arrival, person, source, ctx)?;
            let steps = wrapped.len() as u32;
            if duration == 0 {
                (wrapped, steps)
            } else {
                let mut composed = CalcProfile::dead_time(duration as usize, label, wrapped.data_source.clone());
                composed.append(&wrapped)?;
                (composed, steps)
            }
        } else {
            let dead = CalcProfile::dead_time(duration as usize, label, self.inner.name.clone());
            let steps = dead.len() as u32;
            (dead, steps)
        };

        let used_devices = used
            .iter()
            .map(|(name, steps)| format!("{name}({steps})"))
            .collect::<Vec<_>>()
            .join(", ");
        let src_site = travel
            .handler
            .site_of(source)
            .map(|s| travel.handler.site_label(s))
            .unwrap_or_default();
        let dst_site = travel.handler.site_label(self.site);
        travel.handler.log.event(TransportationEvent {
            time,
            person: person.name.clone(),
            src_site,
            dst_site,
            route: selected.name.clone(),
            used_devices,
            duration_steps: duration,
            activity_steps,
            affordance: self.inner.name.clone(),
        });
        Ok(profile)
    }
}
