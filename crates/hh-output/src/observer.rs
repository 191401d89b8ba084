//! `HouseholdOutputObserver<W>` — bridges `HouseholdObserver` to an `OutputWriter`.

use hh_affordance::ActivationLog;
use hh_core::{CalcParameters, HouseholdId, TimeStep};
use hh_odap::{Odap, OnlineEnergyFileRow};
use hh_sim::HouseholdObserver;

use crate::row::{ActivationRow, EnergyRow, LoadTypeColumns, TotalRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`HouseholdObserver`] that writes energy rows, the activation log and
/// per-load-type totals to any [`OutputWriter`] backend.
///
/// Rows are converted from power units to each load type's sum unit.  Rows
/// inside the settling period are skipped unless `show_settling_period` is
/// set.  Energy rows and activations follow `params.options`.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After `household.run()` returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct HouseholdOutputObserver<W: OutputWriter> {
    writer:          W,
    start_unix_secs: i64,
    step_secs:       u32,
    first_step:      u32,
    energy_rows:     bool,
    activations:     bool,
    /// Conversion factor per load type, indexed by `LoadTypeId`.
    factors:         Vec<f64>,
    last_error:      Option<OutputError>,
}

impl<W: OutputWriter> HouseholdOutputObserver<W> {
    /// Create an observer backed by `writer`, using `params` for wall-clock
    /// conversion and output options.
    pub fn new(writer: W, params: &CalcParameters) -> Self {
        Self {
            writer,
            start_unix_secs: params.start_unix_secs,
            step_secs:       params.internal_step_secs,
            first_step:      if params.show_settling_period { 0 } else { params.settling_steps },
            energy_rows:     params.options.energy_rows,
            activations:     params.options.activation_log,
            factors:         Vec::new(),
            last_error:      None,
        }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn unix_time(&self, step: TimeStep) -> i64 {
        self.start_unix_secs + i64::from(step.internal_step) * i64::from(self.step_secs)
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn announce(&mut self, odap: &Odap) -> OutputResult<()> {
        for lt in odap.load_types() {
            let idx = lt.id.index();
            if self.factors.len() <= idx {
                self.factors.resize(idx + 1, 1.0);
            }
            self.factors[idx] = lt.conversion_factor;
            let columns = LoadTypeColumns {
                load_type:   lt.id.0,
                name:        lt.name.clone(),
                unit_of_sum: lt.unit_of_sum.clone(),
                headers:     odap.headers(lt.id)?,
            };
            self.writer.begin_load_type(&columns)?;
        }
        Ok(())
    }

    fn write_rows(&mut self, household: HouseholdId, rows: &[OnlineEnergyFileRow]) -> OutputResult<()> {
        for row in rows {
            let factor = self.factors.get(row.load_type.index()).copied().unwrap_or(1.0);
            let out = EnergyRow {
                household:      household.0,
                load_type:      row.load_type.0,
                step:           row.time_step.internal_step,
                external_step:  row.time_step.display_step(),
                unix_time_secs: self.unix_time(row.time_step),
                values:         row.energy_entries.iter().map(|v| v * factor).collect(),
            };
            self.writer.write_energy(&out)?;
        }
        Ok(())
    }

    fn write_summary(&mut self, household: HouseholdId, odap: &Odap, log: &ActivationLog) -> OutputResult<()> {
        if self.activations {
            let rows: Vec<ActivationRow> = log
                .entries()
                .iter()
                .map(|e| ActivationRow {
                    household:      household.0,
                    step:           e.time.internal_step,
                    unix_time_secs: self.unix_time(e.time),
                    person:         e.person.clone(),
                    affordance:     e.affordance.clone(),
                    location:       e.location.clone(),
                    duration_steps: e.duration_steps,
                    data_source:    e.data_source.clone(),
                })
                .collect();
            if !rows.is_empty() {
                self.writer.write_activations(&rows)?;
            }
        }
        let totals: Vec<TotalRow> = odap
            .totals()
            .into_iter()
            .map(|t| TotalRow {
                household:   household.0,
                load_type:   t.name,
                unit_of_sum: t.unit_of_sum,
                total:       t.total,
            })
            .collect();
        self.writer.write_totals(&totals)
    }
}

impl<W: OutputWriter> HouseholdObserver for HouseholdOutputObserver<W> {
    fn on_run_start(&mut self, _household: HouseholdId, odap: &Odap) {
        let result = self.announce(odap);
        self.store_err(result);
    }

    fn on_rows(&mut self, household: HouseholdId, time: TimeStep, rows: &[OnlineEnergyFileRow]) {
        if !self.energy_rows || time.internal_step < self.first_step {
            return;
        }
        let result = self.write_rows(household, rows);
        self.store_err(result);
    }

    fn on_run_end(&mut self, household: HouseholdId, odap: &Odap, log: &ActivationLog) {
        let result = self.write_summary(household, odap, log);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
