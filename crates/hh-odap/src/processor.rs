//! The `ActivationProcessor` trait and its in-memory implementation `Odap`.
//!
//! # Row lifecycle
//!
//! ```text
//! register_device            once per (entity, load type), before stepping
//! add_activation             any time, for the current step or later
//! process_one_timestep(t)    builds one row per load type for step t,
//!                            pre-filled with every activation covering t
//! (storages edit the rows)
//! finalize_timestep(rows)    folds the final rows into the running totals
//! ```
//!
//! Steps must be processed in increasing order.  Activation values that
//! fall past the simulation horizon are dropped.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use hh_core::{CalcLoadType, CalcParameters, HouseholdId, LoadTypeId, TimeStep};

use crate::key::{ColumnEntry, OefcKey};
use crate::row::OnlineEnergyFileRow;
use crate::{OdapError, OdapResult};

// ── Trait ─────────────────────────────────────────────────────────────────────

/// The ledger interface devices, storages and transport vehicles talk to.
pub trait ActivationProcessor {
    /// Assign (or look up) the column for `key` within its load type.
    ///
    /// Registering the same key twice returns the same column.
    fn register_device(
        &mut self,
        name: &str,
        key: OefcKey,
        description: &str,
        load_type: &CalcLoadType,
    ) -> usize;

    /// Column number of a registered key.
    fn column_number(&self, load_type: LoadTypeId, key: &OefcKey) -> OdapResult<usize>;

    /// Add `values[i]` to the key's column at step `start + i`.
    fn add_activation(&mut self, key: &OefcKey, start: TimeStep, values: &[f64]) -> OdapResult<()>;

    /// Build the rows for `time`, one per registered load type.
    fn process_one_timestep(&mut self, time: TimeStep) -> OdapResult<Vec<OnlineEnergyFileRow>>;

    /// Accept the final rows of a step after storages have written.
    fn finalize_timestep(&mut self, _rows: &[OnlineEnergyFileRow]) {}
}

// ── Odap ──────────────────────────────────────────────────────────────────────

/// Per-load-type column registry and pending values.
#[derive(Default)]
struct LoadTypeLedger {
    load_type: Option<CalcLoadType>,
    columns:   Vec<ColumnEntry>,
    by_key:    FxHashMap<OefcKey, usize>,
    /// step → per-column values accumulated ahead of processing.
    pending:   BTreeMap<u32, Vec<f64>>,
    totals:    Vec<f64>,
}

/// Sum of all finalized rows of one load type, converted to its sum unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadTypeTotal {
    pub load_type:   LoadTypeId,
    pub name:        String,
    pub unit_of_sum: String,
    pub total:       f64,
}

/// In-memory activation processor owned by one household.
pub struct Odap {
    household:     HouseholdId,
    horizon:       u32,
    /// Indexed by `LoadTypeId`.
    ledgers:       Vec<LoadTypeLedger>,
    /// Load types in first-registration order; rows follow this order.
    order:         Vec<LoadTypeId>,
    processed:     Option<TimeStep>,
    /// Rows before this step are settling rows and stay out of the totals.
    first_counted: u32,
}

impl Odap {
    pub fn new(household: HouseholdId, params: &CalcParameters) -> Self {
        Self {
            household,
            horizon: params.internal_timesteps,
            ledgers: Vec::new(),
            order: Vec::new(),
            processed: None,
            first_counted: if params.show_settling_period { 0 } else { params.settling_steps },
        }
    }

    pub fn household(&self) -> HouseholdId {
        self.household
    }

    /// Registered load types in row order.
    pub fn load_types(&self) -> impl Iterator<Item = &CalcLoadType> {
        self.order
            .iter()
            .filter_map(|lt| self.ledgers.get(lt.index()).and_then(|l| l.load_type.as_ref()))
    }

    /// Column registrations of one load type, in column order.
    pub fn columns(&self, load_type: LoadTypeId) -> OdapResult<&[ColumnEntry]> {
        self.ledger(load_type).map(|l| l.columns.as_slice())
    }

    /// Column headers (`"name [unit]"`) of one load type.
    pub fn headers(&self, load_type: LoadTypeId) -> OdapResult<Vec<String>> {
        let ledger = self.ledger(load_type)?;
        let unit = ledger.load_type.as_ref().map_or("", |lt| lt.unit_of_sum.as_str());
        Ok(ledger.columns.iter().map(|c| format!("{} [{}]", c.name, unit)).collect())
    }

    /// Running per-column sums of finalized rows, in power units.  Rows of
    /// a hidden settling period are not counted.
    pub fn column_totals(&self, load_type: LoadTypeId) -> OdapResult<&[f64]> {
        self.ledger(load_type).map(|l| l.totals.as_slice())
    }

    /// Totals of every registered load type.
    pub fn totals(&self) -> Vec<LoadTypeTotal> {
        self.order
            .iter()
            .filter_map(|lt| {
                let ledger = self.ledgers.get(lt.index())?;
                let load_type = ledger.load_type.as_ref()?;
                Some(LoadTypeTotal {
                    load_type:   *lt,
                    name:        load_type.name.clone(),
                    unit_of_sum: load_type.unit_of_sum.clone(),
                    total:       load_type.to_sum_unit(ledger.totals.iter().sum()),
                })
            })
            .collect()
    }

    fn ledger(&self, load_type: LoadTypeId) -> OdapResult<&LoadTypeLedger> {
        self.ledgers
            .get(load_type.index())
            .filter(|l| l.load_type.is_some())
            .ok_or(OdapError::UnknownLoadType(load_type))
    }
}

impl ActivationProcessor for Odap {
    fn register_device(
        &mut self,
        name: &str,
        key: OefcKey,
        description: &str,
        load_type: &CalcLoadType,
    ) -> usize {
        let idx = load_type.id.index();
        if self.ledgers.len() <= idx {
            self.ledgers.resize_with(idx + 1, LoadTypeLedger::default);
        }
        if self.ledgers[idx].load_type.is_none() {
            self.ledgers[idx].load_type = Some(load_type.clone());
            self.order.push(load_type.id);
        }
        let ledger = &mut self.ledgers[idx];
        if let Some(&column) = ledger.by_key.get(&key) {
            return column;
        }
        let column = ledger.columns.len();
        debug!(household = %self.household, %key, column, device = name, "registered ledger column");
        ledger.by_key.insert(key.clone(), column);
        ledger.columns.push(ColumnEntry {
            column,
            name: name.to_owned(),
            description: description.to_owned(),
            key,
        });
        ledger.totals.push(0.0);
        column
    }

    fn column_number(&self, load_type: LoadTypeId, key: &OefcKey) -> OdapResult<usize> {
        self.ledger(load_type)?
            .by_key
            .get(key)
            .copied()
            .ok_or_else(|| OdapError::UnregisteredKey(key.clone()))
    }

    fn add_activation(&mut self, key: &OefcKey, start: TimeStep, values: &[f64]) -> OdapResult<()> {
        if let Some(processed) = self.processed {
            if start <= processed {
                return Err(OdapError::PastActivation { key: key.clone(), start, processed });
            }
        }
        let column = self.column_number(key.load_type, key)?;
        let horizon = self.horizon;
        let ledger = &mut self.ledgers[key.load_type.index()];
        let width = ledger.columns.len();
        for (i, &v) in values.iter().enumerate() {
            let step = start.internal_step + i as u32;
            if step >= horizon {
                break;
            }
            let slot = ledger.pending.entry(step).or_insert_with(|| vec![0.0; width]);
            if slot.len() < width {
                slot.resize(width, 0.0);
            }
            slot[column] += v;
        }
        trace!(%key, %start, steps = values.len(), "activation queued");
        Ok(())
    }

    fn process_one_timestep(&mut self, time: TimeStep) -> OdapResult<Vec<OnlineEnergyFileRow>> {
        let mut rows = Vec::with_capacity(self.order.len());
        for lt in &self.order {
            let ledger = &mut self.ledgers[lt.index()];
            let mut row = OnlineEnergyFileRow::new(time, *lt, self.household, ledger.columns.len());
            // Everything queued before `time` belongs to a skipped step.
            while let Some(entry) = ledger.pending.first_entry() {
                if *entry.key() > time.internal_step {
                    break;
                }
                let step = *entry.key();
                let values = entry.remove();
                if step == time.internal_step {
                    for (c, v) in values.into_iter().enumerate() {
                        row.energy_entries[c] += v;
                    }
                }
            }
            rows.push(row);
        }
        self.processed = Some(time);
        trace!(household = %self.household, %time, rows = rows.len(), "timestep processed");
        Ok(rows)
    }

    fn finalize_timestep(&mut self, rows: &[OnlineEnergyFileRow]) {
        for row in rows {
            if row.time_step.internal_step < self.first_counted {
                continue;
            }
            if let Some(ledger) = self.ledgers.get_mut(row.load_type.index()) {
                for (total, v) in ledger.totals.iter_mut().zip(&row.energy_entries) {
                    *total += v;
                }
            }
        }
    }
}
