//! Per-(person, step) memo of route choices.
//!
//! A routed activity is asked about the same person and step several times
//! (once per candidate source location, then once more on activation).  The
//! cache keeps the route chosen for each source location so every call in
//! that window sees the same trip.  When the person or step changes the
//! whole cache is replaced, never patched.

use rustc_hash::FxHashMap;

use hh_core::{LocationId, PersonId, TimeStep};

use crate::RouteChoice;

#[derive(Clone, Debug)]
pub struct RouteCache {
    pub person: PersonId,
    pub time:   TimeStep,
    routes:     FxHashMap<LocationId, RouteChoice>,
}

impl RouteCache {
    pub fn new(person: PersonId, time: TimeStep) -> Self {
        Self { person, time, routes: FxHashMap::default() }
    }

    #[inline]
    pub fn is_for(&self, person: PersonId, time: TimeStep) -> bool {
        self.person == person && self.time == time
    }

    pub fn get(&self, source: LocationId) -> Option<&RouteChoice> {
        self.routes.get(&source)
    }

    pub fn insert(&mut self, source: LocationId, choice: RouteChoice) {
        self.routes.insert(source, choice);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
