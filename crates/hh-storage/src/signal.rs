//! Fill-level signals.
//!
//! A signal switches between `value` and `0` with hysteresis on the fill
//! percentage of its storage:
//!
//! | Trigger order            | Switches on when     | Switches off when     |
//! |--------------------------|----------------------|-----------------------|
//! | `on < off` (refill)      | fill% < `on`         | fill% > `off`         |
//! | `on >= off` (spill)      | fill% > `on`         | fill% < `off`         |
//!
//! Between the thresholds the previous state holds.  The output lands in
//! the signal's own column on `dst_load_type`, e.g. a heater control load.

use hh_core::{LoadTypeId, TimeStep};
use hh_odap::OefcKey;

use crate::{StorageError, StorageResult};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyStorageSignalConfig {
    pub name:                String,
    pub trigger_on_percent:  f64,
    pub trigger_off_percent: f64,
    pub value:               f64,
}

impl EnergyStorageSignalConfig {
    pub(crate) fn validate(&self, storage: &str) -> StorageResult<()> {
        let in_range = |p: f64| (0.0..=100.0).contains(&p);
        if !in_range(self.trigger_on_percent) || !in_range(self.trigger_off_percent) {
            return Err(StorageError::InvalidConfig {
                storage: storage.to_owned(),
                reason:  format!("signal {:?}: trigger levels must lie within [0, 100]", self.name),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct EnergyStorageSignal {
    pub config:        EnergyStorageSignalConfig,
    pub dst_load_type: LoadTypeId,
    pub key:           OefcKey,
    pub column:        usize,
    on:                bool,
    last_time:         Option<TimeStep>,
}

impl EnergyStorageSignal {
    pub(crate) fn new(
        config: EnergyStorageSignalConfig,
        dst_load_type: LoadTypeId,
        key: OefcKey,
        column: usize,
    ) -> Self {
        Self {
            config,
            dst_load_type,
            key,
            column,
            on: false,
            last_time: None,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Update the switch state for `fill` and return the signal's output.
    pub fn value_for(&mut self, time: TimeStep, capacity: f64, fill: f64) -> f64 {
        let pct = if capacity > 0.0 { fill / capacity * 100.0 } else { 0.0 };
        let (on, off) = (self.config.trigger_on_percent, self.config.trigger_off_percent);
        if on < off {
            if pct < on {
                self.on = true;
            } else if pct > off {
                self.on = false;
            }
        } else if pct > on {
            self.on = true;
        } else if pct < off {
            self.on = false;
        }
        self.last_time = Some(time);
        if self.on { self.config.value } else { 0.0 }
    }

    /// Step of the last evaluation.
    pub fn last_evaluated(&self) -> Option<TimeStep> {
        self.last_time
    }
}
