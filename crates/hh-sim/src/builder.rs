//! Builder for constructing a [`Household`].

use tracing::debug;

use hh_affordance::{ActivationLog, AffordanceConfig, AffordanceSerialGenerator, CalcAffordance, PersonDescriptor};
use hh_core::{
    AffordanceId, CalcParameters, DeviceId, HouseholdId, HouseholdRng, LoadTypeId, LocationId, NormalRandom,
    PersonId, SiteId, StorageId, VariableId,
};
use hh_device::{
    make_locations, CalcAutoDevice, CalcDeviceLoad, CalcLocation, CalcLocationDto, DeviceEnv, DeviceStore,
    LoadTypeTable,
};
use hh_odap::{Odap, OefcDeviceType};
use hh_profile::CalcProfile;
use hh_storage::{CalcEnergyStorage, EnergyStorageConfig, EnergyStorageSignalConfig};
use hh_transport::{Activity, RoutedActivity, TransportationHandler};
use hh_variables::{VariableRepository, VariableRequirement};

use crate::{ActivityChooser, CalcPerson, Household, SimError, SimResult};

/// Incremental builder for [`Household<C>`].
///
/// Entities are added one at a time and get their ids back immediately, so
/// later entities can reference earlier ones (a light needs its location,
/// an affordance its devices, a routed affordance its site).  Devices and
/// storages register their ledger columns as they are added; the column
/// order is the order of the `add_*` calls.
///
/// # Example
///
/// ```rust,ignore
/// let mut b = HouseholdBuilder::new(HouseholdId(0), params, load_types, WeightedChooser)?;
/// let kitchen = b.add_location("Kitchen");
/// let stove = b.add_device("stove", kitchen, "cooking", loads)?;
/// b.add_affordance(cook_config)?;
/// b.add_person(alice, kitchen)?;
/// let mut household = b.build()?;
/// household.run(&mut NoopObserver, None)?;
/// ```
pub struct HouseholdBuilder<C: ActivityChooser> {
    id:           HouseholdId,
    params:       CalcParameters,
    load_types:   LoadTypeTable,
    odap:         Odap,
    normal:       NormalRandom,
    devices:      DeviceStore,
    locations:    Vec<CalcLocation>,
    variables:    VariableRepository,
    auto_devices: Vec<CalcAutoDevice>,
    storages:     Vec<CalcEnergyStorage>,
    activities:   Vec<Activity>,
    transport:    TransportationHandler,
    persons:      Vec<CalcPerson>,
    serials:      AffordanceSerialGenerator,
    chooser:      C,
}

/// Borrow the builder's fields as a `DeviceEnv` next to `&mut devices`.
macro_rules! device_env {
    ($b:expr) => {
        DeviceEnv {
            params:     &$b.params,
            load_types: &$b.load_types,
            odap:       &mut $b.odap,
            normal:     &mut $b.normal,
        }
    };
}

impl<C: ActivityChooser> HouseholdBuilder<C> {
    /// Start a household.  Fails if `params` cannot be stepped through.
    pub fn new(id: HouseholdId, params: CalcParameters, load_types: LoadTypeTable, chooser: C) -> SimResult<Self> {
        params.validate()?;
        Ok(Self {
            id,
            odap: Odap::new(id, &params),
            normal: NormalRandom::new(params.seed, id),
            transport: TransportationHandler::new(&params),
            params,
            load_types,
            devices: DeviceStore::new(),
            locations: Vec::new(),
            variables: VariableRepository::new(),
            auto_devices: Vec::new(),
            storages: Vec::new(),
            activities: Vec::new(),
            persons: Vec::new(),
            serials: AffordanceSerialGenerator::new(),
            chooser,
        })
    }

    pub fn params(&self) -> &CalcParameters {
        &self.params
    }

    pub fn load_types(&self) -> &LoadTypeTable {
        &self.load_types
    }

    // ── Locations and devices ─────────────────────────────────────────────

    pub fn add_location(&mut self, name: impl Into<String>) -> LocationId {
        let id = LocationId(self.locations.len() as u32);
        self.locations.push(CalcLocation::new(id, name));
        id
    }

    /// Replace all locations with the ones described by `dtos`, lights
    /// included.  Must be called before any other location is added.
    pub fn locations_from_dtos(&mut self, dtos: &[CalcLocationDto]) -> SimResult<()> {
        if !self.locations.is_empty() {
            return Err(SimError::Config("locations_from_dtos called after locations were added".into()));
        }
        let mut env = device_env!(self);
        self.locations = make_locations(dtos, self.id, &mut self.devices, &mut env)?;
        Ok(())
    }

    fn check_location(&self, location: LocationId) -> SimResult<()> {
        if location.index() >= self.locations.len() {
            return Err(SimError::Config(format!("unknown location {location}")));
        }
        Ok(())
    }

    pub fn add_device(
        &mut self,
        name:     impl Into<String>,
        location: LocationId,
        category: impl Into<String>,
        loads:    Vec<CalcDeviceLoad>,
    ) -> SimResult<DeviceId> {
        self.check_location(location)?;
        let mut env = device_env!(self);
        let id = self
            .devices
            .add(name, location, category, OefcDeviceType::Device, loads, self.id, &mut env)?;
        Ok(id)
    }

    /// Add a light that every `needs_light` affordance at `location` switches on.
    pub fn add_light(
        &mut self,
        name:     impl Into<String>,
        location: LocationId,
        loads:    Vec<CalcDeviceLoad>,
    ) -> SimResult<DeviceId> {
        self.check_location(location)?;
        let mut env = device_env!(self);
        let id = self
            .devices
            .add(name, location, "Light", OefcDeviceType::Light, loads, self.id, &mut env)?;
        self.locations[location.index()].light_devices.push(id);
        Ok(id)
    }

    /// Make an existing device restart `profile` whenever it falls idle.
    pub fn add_auto_device(
        &mut self,
        device:       DeviceId,
        profile:      CalcProfile,
        load_type:    LoadTypeId,
        time_std_dev: f64,
        requirements: Vec<VariableRequirement>,
    ) -> SimResult<()> {
        if !self.devices.get(device)?.has_load(load_type) {
            return Err(SimError::Config(format!("auto device {device} has no load of type {load_type}")));
        }
        profile.step_values()?;
        self.auto_devices
            .push(CalcAutoDevice::new(device, profile, load_type, time_std_dev, requirements));
        Ok(())
    }

    pub fn register_variable(
        &mut self,
        name:     impl Into<String>,
        location: LocationId,
        initial:  f64,
    ) -> SimResult<VariableId> {
        self.check_location(location)?;
        Ok(self.variables.register(name, location, initial)?)
    }

    // ── Storages ──────────────────────────────────────────────────────────

    pub fn add_storage(&mut self, config: &EnergyStorageConfig) -> SimResult<StorageId> {
        let id = StorageId(self.storages.len() as u32);
        let load_type = self.load_types.get(config.load_type)?;
        let storage = CalcEnergyStorage::new(id, config, load_type, self.id, &mut self.odap)?;
        self.storages.push(storage);
        Ok(id)
    }

    pub fn add_storage_signal(
        &mut self,
        storage: StorageId,
        config:  EnergyStorageSignalConfig,
        dst:     LoadTypeId,
    ) -> SimResult<()> {
        let dst = self.load_types.get(dst)?;
        let storage = self
            .storages
            .get_mut(storage.index())
            .ok_or_else(|| SimError::Config(format!("unknown storage {storage}")))?;
        storage.add_signal(config, dst, &mut self.odap)?;
        Ok(())
    }

    // ── Transport ─────────────────────────────────────────────────────────

    /// Sites, vehicles and routes are added on the handler directly.
    pub fn transport_mut(&mut self) -> &mut TransportationHandler {
        &mut self.transport
    }

    // ── Activities ────────────────────────────────────────────────────────

    fn make_affordance(&mut self, config: AffordanceConfig) -> SimResult<CalcAffordance> {
        self.check_location(config.location)?;
        for dp in &config.device_profiles {
            self.devices.get(dp.device)?;
        }
        let id = AffordanceId(self.activities.len() as u32);
        let affordance = CalcAffordance::new(id, config, &mut self.serials, &self.params)?;
        if affordance.are_there_duplicate_energy_profiles() {
            return Err(SimError::Config(format!(
                "affordance {:?} runs the same device and load type twice",
                affordance.name
            )));
        }
        if let Some(reason) = affordance.are_device_profiles_empty() {
            return Err(SimError::Config(reason));
        }
        Ok(affordance)
    }

    /// Add an affordance persons use where it is, without travelling.
    pub fn add_affordance(&mut self, config: AffordanceConfig) -> SimResult<AffordanceId> {
        let affordance = self.make_affordance(config)?;
        let id = affordance.id;
        debug!(household = %self.id, affordance = %affordance.name, "affordance added");
        self.activities.push(Activity::Direct(affordance));
        Ok(id)
    }

    /// Add an affordance at `site`; persons elsewhere travel there first.
    pub fn add_routed_affordance(&mut self, config: AffordanceConfig, site: SiteId) -> SimResult<AffordanceId> {
        let affordance = self.make_affordance(config)?;
        let id = affordance.id;
        let routed = RoutedActivity::new(affordance, site, &mut self.transport)?;
        debug!(household = %self.id, affordance = %routed.pretty_name(), %site, "routed affordance added");
        self.activities.push(Activity::Routed(routed));
        Ok(id)
    }

    // ── Persons ───────────────────────────────────────────────────────────

    /// Add a person starting at `location`.  The descriptor's id must equal
    /// the person's position.
    pub fn add_person(&mut self, descriptor: PersonDescriptor, location: LocationId) -> SimResult<PersonId> {
        self.check_location(location)?;
        let id = PersonId(self.persons.len() as u32);
        if descriptor.id != id {
            return Err(SimError::Config(format!(
                "person {:?} has id {}, expected {id}",
                descriptor.name, descriptor.id
            )));
        }
        self.persons.push(CalcPerson::new(descriptor, location));
        Ok(id)
    }

    /// Validate cross-references and return a ready-to-run [`Household`].
    pub fn build(self) -> SimResult<Household<C>> {
        for loc in &self.locations {
            if let Some(site) = loc.site {
                self.transport.site(site)?;
            }
        }
        debug!(
            household = %self.id,
            persons = self.persons.len(),
            activities = self.activities.len(),
            devices = self.devices.len(),
            storages = self.storages.len(),
            "household built"
        );
        Ok(Household {
            id:             self.id,
            clock:          self.params.make_clock(),
            rng:            HouseholdRng::new(self.params.seed, self.id),
            params:         self.params,
            load_types:     self.load_types,
            odap:           self.odap,
            devices:        self.devices,
            locations:      self.locations,
            variables:      self.variables,
            auto_devices:   self.auto_devices,
            storages:       self.storages,
            activities:     self.activities,
            transport:      self.transport,
            persons:        self.persons,
            activation_log: ActivationLog::new(),
            storage_log:    Vec::new(),
            chooser:        self.chooser,
            normal:         self.normal,
        })
    }
}
