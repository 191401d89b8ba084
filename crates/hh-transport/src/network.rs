//! Static transport data: sites, categories, vehicles and routes.
//!
//! A **site** groups locations that can be reached from each other on foot
//! without travel time (the house, the office building).  A **route** leads
//! from one site to another as a sequence of legs; each leg names a
//! transport category and a distance.  A **transport device** (car, bike,
//! bus pass) belongs to a category, moves at a fixed speed and may be tied
//! to the site where it was last parked.

use hh_core::{BusyArray, DeviceId, LocationId, RouteId, SiteId, TransportCategoryId};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalcSite {
    pub id:        SiteId,
    pub name:      String,
    pub locations: Vec<LocationId>,
}

impl CalcSite {
    pub fn contains(&self, location: LocationId) -> bool {
        self.locations.contains(&location)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportCategory {
    pub id:   TransportCategoryId,
    pub name: String,
}

/// One leg of a route.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteStep {
    pub name:       String,
    pub category:   TransportCategoryId,
    pub distance_m: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalcTravelRoute {
    pub id:    RouteId,
    pub name:  String,
    pub from:  SiteId,
    pub to:    SiteId,
    pub steps: Vec<RouteStep>,
}

/// A vehicle or other means of transport.
#[derive(Clone, Debug)]
pub struct CalcTransportationDevice {
    pub index:        usize,
    pub name:         String,
    pub category:     TransportCategoryId,
    pub speed_m_s:    f64,
    /// Ledger device that carries the vehicle's energy loads, if it has any.
    pub energy:       Option<DeviceId>,
    /// Where the vehicle is parked.  `None` means it is available at every
    /// site (walking, public transport).
    pub current_site: Option<SiteId>,
    pub(crate) busy:  BusyArray,
}

impl CalcTransportationDevice {
    /// Whether the vehicle can start a leg at `site` for steps
    /// `from..from + steps`.
    pub fn is_available(&self, site: SiteId, from: usize, steps: usize) -> bool {
        self.current_site.is_none_or(|s| s == site) && !self.busy.any_in(from..from + steps.max(1))
    }

    pub fn is_busy_at(&self, step: usize) -> bool {
        self.busy.get(step)
    }
}
