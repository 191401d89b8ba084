//! `OnlineEnergyFileRow`: the energy ledger of one load type for one step.

use hh_core::{HouseholdId, LoadTypeId, TimeStep};

/// One row per load type per time step.  `energy_entries[c]` holds the
/// contribution of the entity registered at column `c`, in the load type's
/// power unit.  Every entity writes only its own column.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OnlineEnergyFileRow {
    pub time_step:      TimeStep,
    pub load_type:      LoadTypeId,
    pub household:      HouseholdId,
    pub energy_entries: Vec<f64>,
}

impl OnlineEnergyFileRow {
    pub fn new(time_step: TimeStep, load_type: LoadTypeId, household: HouseholdId, width: usize) -> Self {
        Self {
            time_step,
            load_type,
            household,
            energy_entries: vec![0.0; width],
        }
    }

    /// Sum over all columns as they are right now.
    pub fn sum_fresh(&self) -> f64 {
        self.energy_entries.iter().sum()
    }

    /// Value at `column`; columns past the row width read as zero.
    #[inline]
    pub fn get(&self, column: usize) -> f64 {
        self.energy_entries.get(column).copied().unwrap_or(0.0)
    }

    /// Overwrite `column`, widening the row if needed.
    pub fn set(&mut self, column: usize, value: f64) {
        if column >= self.energy_entries.len() {
            self.energy_entries.resize(column + 1, 0.0);
        }
        self.energy_entries[column] = value;
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.energy_entries.len()
    }
}

/// Find the row for `load_type` in one step's row set.
pub fn row_for(rows: &[OnlineEnergyFileRow], load_type: LoadTypeId) -> Option<&OnlineEnergyFileRow> {
    rows.iter().find(|r| r.load_type == load_type)
}

/// Mutable variant of [`row_for`].
pub fn row_for_mut(
    rows: &mut [OnlineEnergyFileRow],
    load_type: LoadTypeId,
) -> Option<&mut OnlineEnergyFileRow> {
    rows.iter_mut().find(|r| r.load_type == load_type)
}
