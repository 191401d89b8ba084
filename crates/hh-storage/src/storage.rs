//! `CalcEnergyStorage`: a rate-limited buffer on one load type.
//!
//! # Per-step algorithm
//!
//! ```text
//! net   = row.sum_fresh() - row[own column]        other entities' balance
//! net < 0, fill < capacity, -net >= min_store      store
//!     delta = min(-net, capacity - fill, max_store)
//! net > 0, fill > 0, net >= min_withdraw           withdraw
//!     delta = -min(net, fill, max_withdraw)
//! otherwise                                        delta = 0
//! fill = previous_fill + delta;  row[own column] = delta
//! ```
//!
//! Storing is a positive delta: the absorbed surplus shows up as
//! consumption in the ledger and raises the fill level.  Withdrawing is a
//! negative delta.  Every calculation starts from the fill level at the
//! beginning of the step, so calling `process_one_timestep` again for the
//! same step recomputes the same delta and reports no change.
//!
//! Capacity and initial fill are given in the load type's sum unit and
//! converted to the ledger's power unit at construction.  Rates are in the
//! ledger unit already.

use tracing::debug;

use hh_core::{CalcLoadType, HouseholdId, LoadTypeId, StorageId, TimeStep, EPSILON};
use hh_odap::{row_for_mut, ActivationProcessor, OefcDeviceType, OefcKey, OnlineEnergyFileRow};

use crate::signal::{EnergyStorageSignal, EnergyStorageSignalConfig};
use crate::{StorageError, StorageResult};

/// Static configuration of one storage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyStorageConfig {
    pub name:                  String,
    pub load_type:             LoadTypeId,
    /// Sum unit of the load type.
    pub capacity:              f64,
    /// Sum unit of the load type.
    pub initial_fill:          f64,
    pub minimum_storage_rate:  f64,
    pub maximum_storage_rate:  f64,
    pub minimum_withdraw_rate: f64,
    pub maximum_withdraw_rate: f64,
}

impl EnergyStorageConfig {
    fn validate(&self) -> StorageResult<()> {
        let bad = |reason: &str| StorageError::InvalidConfig {
            storage: self.name.clone(),
            reason:  reason.to_owned(),
        };
        if self.capacity <= 0.0 || !self.capacity.is_finite() {
            return Err(bad("capacity must be > 0"));
        }
        if self.initial_fill < 0.0 || self.initial_fill > self.capacity {
            return Err(bad("initial fill must lie within [0, capacity]"));
        }
        let rates = [
            self.minimum_storage_rate,
            self.maximum_storage_rate,
            self.minimum_withdraw_rate,
            self.maximum_withdraw_rate,
        ];
        if rates.iter().any(|r| *r < 0.0 || !r.is_finite()) {
            return Err(bad("rates must be finite and >= 0"));
        }
        if self.minimum_storage_rate > self.maximum_storage_rate
            || self.minimum_withdraw_rate > self.maximum_withdraw_rate
        {
            return Err(bad("minimum rate exceeds maximum rate"));
        }
        Ok(())
    }
}

pub struct CalcEnergyStorage {
    pub id:             StorageId,
    pub name:           String,
    household:          HouseholdId,
    load_type:          LoadTypeId,
    unit_of_sum:        String,
    key:                OefcKey,
    column:             usize,
    capacity:           f64,
    min_store:          f64,
    max_store:          f64,
    min_withdraw:       f64,
    max_withdraw:       f64,
    current_fill:       f64,
    previous_fill:      f64,
    current_time:       Option<TimeStep>,
    /// Delta last reported as a change in the current step.
    previous_delta:     f64,
    signals:            Vec<EnergyStorageSignal>,
}

impl CalcEnergyStorage {
    /// Build the storage and register its ledger column.
    pub fn new(
        id: StorageId,
        config: &EnergyStorageConfig,
        load_type: &CalcLoadType,
        household: HouseholdId,
        odap: &mut dyn ActivationProcessor,
    ) -> StorageResult<Self> {
        config.validate()?;
        let key = OefcKey::new(
            household,
            OefcDeviceType::Storage,
            id.0,
            OefcKey::NO_RELATION,
            load_type.id,
            "Energy Storage",
        );
        let column = odap.register_device(&config.name, key.clone(), "Energy Storage Device", load_type);
        let initial = load_type.from_sum_unit(config.initial_fill);
        Ok(Self {
            id,
            name: config.name.clone(),
            household,
            load_type: load_type.id,
            unit_of_sum: load_type.unit_of_sum.clone(),
            key,
            column,
            capacity: load_type.from_sum_unit(config.capacity),
            min_store: config.minimum_storage_rate,
            max_store: config.maximum_storage_rate,
            min_withdraw: config.minimum_withdraw_rate,
            max_withdraw: config.maximum_withdraw_rate,
            current_fill: initial,
            previous_fill: initial,
            current_time: None,
            previous_delta: f64::MIN,
            signals: Vec::new(),
        })
    }

    /// Attach a fill-level signal writing to `dst_load_type`.
    pub fn add_signal(
        &mut self,
        config: EnergyStorageSignalConfig,
        dst_load_type: &CalcLoadType,
        odap: &mut dyn ActivationProcessor,
    ) -> StorageResult<()> {
        config.validate(&self.name)?;
        let key = OefcKey::new(
            self.household,
            OefcDeviceType::Signal,
            self.signals.len() as u32,
            self.id.0,
            dst_load_type.id,
            "Energy Storage Signal",
        );
        let name = format!("{} {}", self.name, config.name);
        let column = odap.register_device(&name, key.clone(), "", dst_load_type);
        self.signals.push(EnergyStorageSignal::new(config, dst_load_type.id, key, column));
        Ok(())
    }

    pub fn load_type(&self) -> LoadTypeId {
        self.load_type
    }

    pub fn key(&self) -> &OefcKey {
        &self.key
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn fill_level(&self) -> f64 {
        self.current_fill
    }

    pub fn previous_fill_level(&self) -> f64 {
        self.previous_fill
    }

    pub fn signals(&self) -> &[EnergyStorageSignal] {
        &self.signals
    }

    /// Balance this step's rows.  Returns whether anything changed compared
    /// with the previous call for the same step.
    ///
    /// A missing row for the storage's own load type means nothing was
    /// registered on it this step; the storage idles.  A missing signal row
    /// is an error.
    pub fn process_one_timestep(
        &mut self,
        rows: &mut [OnlineEnergyFileRow],
        time: TimeStep,
        mut log: Option<&mut Vec<String>>,
    ) -> StorageResult<bool> {
        if self.current_time != Some(time) {
            self.current_time = Some(time);
            self.previous_fill = self.current_fill;
            self.previous_delta = f64::MIN;
        }

        let mut changed = false;
        let Some(row) = row_for_mut(rows, self.load_type) else {
            return Ok(false);
        };

        let net = row.sum_fresh() - row.get(self.column);
        let delta = self.delta_for(net);

        self.current_fill = self.previous_fill + delta;
        row.set(self.column, delta);
        if (self.previous_delta - delta).abs() > EPSILON {
            if let Some(log) = log.as_deref_mut() {
                log.push(format!(
                    "{} set fill level to {} {}",
                    self.name, self.current_fill, self.unit_of_sum
                ));
            }
            debug!(storage = %self.name, %time, delta, fill = self.current_fill, "storage fill changed");
            self.previous_delta = delta;
            changed = true;
        }

        for signal in &mut self.signals {
            let value = signal.value_for(time, self.capacity, self.current_fill);
            let row = row_for_mut(rows, signal.dst_load_type).ok_or_else(|| StorageError::MissingSignalRow {
                storage:   self.name.clone(),
                load_type: signal.dst_load_type,
                time,
            })?;
            if (row.get(signal.column) - value).abs() > EPSILON {
                if let Some(log) = log.as_deref_mut() {
                    log.push(format!("{} set signal {} to {}", self.name, signal.config.name, value));
                }
                debug!(storage = %self.name, signal = %signal.config.name, value, "storage signal changed");
                row.set(signal.column, value);
                changed = true;
            }
        }

        Ok(changed)
    }

    fn delta_for(&self, net: f64) -> f64 {
        let fill = self.previous_fill;
        if net < 0.0 && fill < self.capacity {
            let surplus = -net;
            if surplus < self.min_store {
                return 0.0;
            }
            return surplus.min(self.capacity - fill).min(self.max_store);
        }
        if net > 0.0 && fill > 0.0 {
            if net < self.min_withdraw {
                return 0.0;
            }
            return -net.min(fill).min(self.max_withdraw);
        }
        0.0
    }
}

/// Upper bound on balancing passes per step.
pub const MAX_STORAGE_PASSES: usize = 100;

/// Run every storage over `rows` until a full pass reports no change.
///
/// Storages sharing a load type see each other's deltas, so one pass is not
/// always enough.  Returns the number of passes.
pub fn balance_storages(
    storages: &mut [CalcEnergyStorage],
    rows: &mut [OnlineEnergyFileRow],
    time: TimeStep,
    mut log: Option<&mut Vec<String>>,
) -> StorageResult<usize> {
    if storages.is_empty() {
        return Ok(0);
    }
    for pass in 1..=MAX_STORAGE_PASSES {
        let mut changed = false;
        for storage in storages.iter_mut() {
            changed |= storage.process_one_timestep(rows, time, log.as_deref_mut())?;
        }
        if !changed {
            return Ok(pass);
        }
    }
    Err(StorageError::NoConvergence(MAX_STORAGE_PASSES))
}
