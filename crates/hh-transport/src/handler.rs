//! `TransportationHandler`: owns the transport network of one household and
//! turns "get from this location to that site" into a concrete trip.
//!
//! # Route choice
//!
//! ```text
//! source location ─site_of─▶ source site
//!   same as destination      → zero-length trip, no vehicles
//!   no route between sites   → NoRoute
//!   routes, none plannable   → NoTransportation
//!   otherwise                → one plannable route, picked uniformly at random
//! ```
//!
//! Planning a route assigns one free vehicle of the right category to every
//! leg.  A leg lasts `ceil(distance / speed / step_secs)` steps; legs run
//! back to back.

use tracing::debug;

use hh_core::{
    BusyArray, CalcParameters, DeviceId, HouseholdRng, LocationId, RouteId, SiteId, TimeStep,
    TransportCategoryId,
};
use hh_device::{DeviceEnv, DeviceStore};

use crate::network::{CalcSite, CalcTransportationDevice, CalcTravelRoute, RouteStep, TransportCategory};
use crate::{TransportError, TransportResult, TransportationLog};

/// A vehicle assigned to one leg of a planned trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedLeg {
    pub device:       usize,
    pub offset_steps: u32,
    pub steps:        u32,
}

/// A route with vehicles assigned, valid for the step it was planned at.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedRoute {
    /// `None` when source and destination share a site.
    pub route:          Option<RouteId>,
    pub name:           String,
    pub from:           SiteId,
    pub to:             SiteId,
    pub duration_steps: u32,
    pub legs:           Vec<PlannedLeg>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RouteChoice {
    Found(SelectedRoute),
    NoRoute,
    NoTransportation,
}

pub struct TransportationHandler {
    step_secs:  u32,
    horizon:    usize,
    sites:      Vec<CalcSite>,
    categories: Vec<TransportCategory>,
    devices:    Vec<CalcTransportationDevice>,
    routes:     Vec<CalcTravelRoute>,
    pub log:    TransportationLog,
}

impl TransportationHandler {
    pub fn new(params: &CalcParameters) -> Self {
        Self {
            step_secs:  params.internal_step_secs,
            horizon:    params.internal_timesteps as usize,
            sites:      Vec::new(),
            categories: Vec::new(),
            devices:    Vec::new(),
            routes:     Vec::new(),
            log:        TransportationLog::new(params.options.transportation_log),
        }
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Add a site.  A location may belong to one site only.
    pub fn add_site(&mut self, name: impl Into<String>, locations: Vec<LocationId>) -> TransportResult<SiteId> {
        let name = name.into();
        if let Some(&loc) = locations.iter().find(|l| self.site_of(**l).is_some()) {
            return Err(TransportError::InvalidConfig(format!(
                "site {name:?}: location {loc} already belongs to another site"
            )));
        }
        let id = SiteId(self.sites.len() as u32);
        self.sites.push(CalcSite { id, name, locations });
        Ok(id)
    }

    pub fn add_category(&mut self, name: impl Into<String>) -> TransportCategoryId {
        let id = TransportCategoryId(self.categories.len() as u32);
        self.categories.push(TransportCategory { id, name: name.into() });
        id
    }

    /// Add a vehicle.  With `parked_at` set the vehicle is only available
    /// at that site and moves with every trip it makes.
    pub fn add_device(
        &mut self,
        name: impl Into<String>,
        category: TransportCategoryId,
        speed_m_s: f64,
        parked_at: Option<SiteId>,
        energy: Option<DeviceId>,
    ) -> TransportResult<usize> {
        let name = name.into();
        self.category(category)?;
        if let Some(site) = parked_at {
            self.site(site)?;
        }
        if speed_m_s <= 0.0 || !speed_m_s.is_finite() {
            return Err(TransportError::InvalidConfig(format!(
                "transport device {name:?}: speed must be > 0"
            )));
        }
        let index = self.devices.len();
        self.devices.push(CalcTransportationDevice {
            index,
            name,
            category,
            speed_m_s,
            energy,
            current_site: parked_at,
            busy: BusyArray::new(self.horizon),
        });
        Ok(index)
    }

    pub fn add_route(
        &mut self,
        name: impl Into<String>,
        from: SiteId,
        to: SiteId,
        steps: Vec<RouteStep>,
    ) -> TransportResult<RouteId> {
        let name = name.into();
        self.site(from)?;
        self.site(to)?;
        for step in &steps {
            self.category(step.category)?;
            if step.distance_m < 0.0 || !step.distance_m.is_finite() {
                return Err(TransportError::InvalidConfig(format!(
                    "route {name:?}: leg {:?} has an invalid distance",
                    step.name
                )));
            }
        }
        let id = RouteId(self.routes.len() as u32);
        self.routes.push(CalcTravelRoute { id, name, from, to, steps });
        Ok(id)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn site(&self, id: SiteId) -> TransportResult<&CalcSite> {
        self.sites.get(id.index()).ok_or(TransportError::UnknownSite(id))
    }

    pub fn category(&self, id: TransportCategoryId) -> TransportResult<&TransportCategory> {
        self.categories.get(id.index()).ok_or(TransportError::UnknownCategory(id))
    }

    pub fn route(&self, id: RouteId) -> TransportResult<&CalcTravelRoute> {
        self.routes.get(id.index()).ok_or(TransportError::UnknownRoute(id))
    }

    pub fn device(&self, index: usize) -> TransportResult<&CalcTransportationDevice> {
        self.devices.get(index).ok_or(TransportError::UnknownTransportDevice(index))
    }

    pub fn devices(&self) -> &[CalcTransportationDevice] {
        &self.devices
    }

    pub fn sites(&self) -> &[CalcSite] {
        &self.sites
    }

    /// The site `location` belongs to, if any.
    pub fn site_of(&self, location: LocationId) -> Option<SiteId> {
        self.sites.iter().find(|s| s.contains(location)).map(|s| s.id)
    }

    fn site_name(&self, id: SiteId) -> &str {
        self.sites.get(id.index()).map_or("", |s| s.name.as_str())
    }

    // ── Planning ──────────────────────────────────────────────────────────

    fn leg_steps(&self, distance_m: f64, speed_m_s: f64) -> u32 {
        let secs = distance_m / speed_m_s;
        (secs / f64::from(self.step_secs)).ceil() as u32
    }

    /// Assign vehicles to every leg of `route` for a departure at `time`.
    fn plan(&self, route: &CalcTravelRoute, time: TimeStep) -> Option<SelectedRoute> {
        let mut legs: Vec<PlannedLeg> = Vec::with_capacity(route.steps.len());
        let mut offset = 0u32;
        for step in &route.steps {
            let from = time.index() + offset as usize;
            let leg = self.devices.iter().find_map(|d| {
                if d.category != step.category || legs.iter().any(|l| l.device == d.index) {
                    return None;
                }
                let steps = self.leg_steps(step.distance_m, d.speed_m_s);
                d.is_available(route.from, from, steps as usize).then_some(PlannedLeg {
                    device: d.index,
                    offset_steps: offset,
                    steps,
                })
            })?;
            offset += leg.steps;
            legs.push(leg);
        }
        Some(SelectedRoute {
            route: Some(route.id),
            name: route.name.clone(),
            from: route.from,
            to: route.to,
            duration_steps: offset,
            legs,
        })
    }

    /// Pick a trip from `source` to `destination` departing at `time`.
    pub fn select_route(
        &self,
        source: LocationId,
        destination: SiteId,
        time: TimeStep,
        rng: &mut HouseholdRng,
    ) -> RouteChoice {
        let Some(src_site) = self.site_of(source) else {
            return RouteChoice::NoRoute;
        };
        if src_site == destination {
            return RouteChoice::Found(SelectedRoute {
                route:          None,
                name:           format!("within {}", self.site_name(src_site)),
                from:           src_site,
                to:             destination,
                duration_steps: 0,
                legs:           Vec::new(),
            });
        }
        let candidates: Vec<&CalcTravelRoute> = self
            .routes
            .iter()
            .filter(|r| r.from == src_site && r.to == destination)
            .collect();
        if candidates.is_empty() {
            return RouteChoice::NoRoute;
        }
        let mut feasible: Vec<SelectedRoute> = candidates.into_iter().filter_map(|r| self.plan(r, time)).collect();
        if feasible.is_empty() {
            return RouteChoice::NoTransportation;
        }
        let pick = rng.gen_range(0..feasible.len());
        RouteChoice::Found(feasible.swap_remove(pick))
    }

    /// Carry out a planned trip: occupy the vehicles, move parked ones to
    /// the destination and run their energy loads.  Returns `(name, steps)`
    /// for every vehicle used.
    pub fn activate_route(
        &mut self,
        selected: &SelectedRoute,
        time: TimeStep,
        person: &str,
        devices: &mut DeviceStore,
        env: &mut DeviceEnv<'_>,
    ) -> TransportResult<Vec<(String, u32)>> {
        let mut used = Vec::with_capacity(selected.legs.len());
        for leg in &selected.legs {
            let vehicle = self
                .devices
                .get_mut(leg.device)
                .ok_or(TransportError::UnknownTransportDevice(leg.device))?;
            let start = time.add_steps(leg.offset_steps);
            let from = start.index();
            vehicle.busy.set_range(from..from + leg.steps as usize);
            if vehicle.current_site.is_some() {
                vehicle.current_site = Some(selected.to);
            }
            if let Some(energy) = vehicle.energy {
                if leg.steps > 0 && from < self.horizon {
                    devices.get_mut(energy)?.activate_constant(start, leg.steps, env)?;
                }
            }
            debug!(vehicle = %vehicle.name, %start, steps = leg.steps, person, "transport device used");
            used.push((vehicle.name.clone(), leg.steps));
        }
        Ok(used)
    }

    pub(crate) fn site_label(&self, id: SiteId) -> String {
        self.site_name(id).to_owned()
    }
}
