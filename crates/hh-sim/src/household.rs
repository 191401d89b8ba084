//! The `Household` struct and its step loop.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, trace};

use hh_affordance::{ActivationContext, ActivationLog, BusyContext};
use hh_core::{CalcParameters, HouseholdId, HouseholdRng, NormalRandom, SimClock, TimeStep};
use hh_device::{CalcAutoDevice, CalcLocation, DeviceEnv, DeviceStore, LoadTypeTable};
use hh_odap::{ActivationProcessor, Odap, OnlineEnergyFileRow};
use hh_storage::{balance_storages, CalcEnergyStorage};
use hh_transport::{Activity, TransportationHandler, TravelContext};
use hh_variables::VariableRepository;

use crate::{
    ActivityChooser, CalcPerson, Candidate, CurrentActivity, HouseholdObserver, RunOutcome, SimResult,
};

/// One simulated household: every entity, the ledger and both random
/// streams.  Nothing here is shared with other households.
///
/// Each step runs five phases in order:
///
/// 1. **Variables**: apply variable operations that came due.
/// 2. **Auto devices**: restart idle always-on devices.
/// 3. **Persons**: every idle person checks all activities from where they
///    are, the chooser picks one of the free ones and it is activated.  A
///    person with nothing free idles for one step.  A person busy with an
///    interruptible activity is offered the free interrupting ones; taking
///    one suspends the current activity, which is resumed or dropped when
///    the interruption ends.
/// 4. **Ledger**: ODAP builds this step's rows; storages balance them until
///    no storage changes any more.
/// 5. **Finalize**: the rows are folded into the totals and handed to the
///    observer.
///
/// Create via [`HouseholdBuilder`][crate::HouseholdBuilder].
pub struct Household<C: ActivityChooser> {
    pub id:             HouseholdId,
    pub params:         CalcParameters,
    pub clock:          SimClock,
    pub load_types:     LoadTypeTable,
    pub odap:           Odap,
    pub devices:        DeviceStore,
    pub locations:      Vec<CalcLocation>,
    pub variables:      VariableRepository,
    pub auto_devices:   Vec<CalcAutoDevice>,
    pub storages:       Vec<CalcEnergyStorage>,
    pub activities:     Vec<Activity>,
    pub transport:      TransportationHandler,
    pub persons:        Vec<CalcPerson>,
    pub activation_log: ActivationLog,
    /// Storage change lines, kept when `options.storage_log` is set.
    pub storage_log:    Vec<String>,
    pub chooser:        C,
    pub(crate) rng:     HouseholdRng,
    pub(crate) normal:  NormalRandom,
}

impl<C: ActivityChooser> Household<C> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current step to the end of the horizon.
    ///
    /// `cancel` is checked before every step; once set, the run stops and
    /// reports the first step it did not simulate.
    pub fn run<O: HouseholdObserver>(
        &mut self,
        observer: &mut O,
        cancel:   Option<&AtomicBool>,
    ) -> SimResult<RunOutcome> {
        info!(household = %self.id, steps = self.params.internal_timesteps, "household run started");
        if self.clock.current_step == 0 {
            observer.on_run_start(self.id, &self.odap);
        }
        let mut outcome = RunOutcome::Completed;
        while self.clock.current_step < self.params.internal_timesteps {
            let now = self.clock.now(&self.params);
            if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                info!(household = %self.id, at = %now, "household run cancelled");
                outcome = RunOutcome::Cancelled { at: now };
                break;
            }
            self.advance(now, observer)?;
        }
        observer.on_run_end(self.id, &self.odap, &self.activation_log);
        for total in self.odap.totals() {
            info!(household = %self.id, load_type = %total.name, total = total.total, unit = %total.unit_of_sum, "load type total");
        }
        Ok(outcome)
    }

    /// Run exactly `n` steps from the current position, stopping early at
    /// the horizon.
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_steps<O: HouseholdObserver>(&mut self, n: u32, observer: &mut O) -> SimResult<()> {
        if self.clock.current_step == 0 && n > 0 {
            observer.on_run_start(self.id, &self.odap);
        }
        for _ in 0..n {
            if self.clock.current_step >= self.params.internal_timesteps {
                break;
            }
            let now = self.clock.now(&self.params);
            self.advance(now, observer)?;
        }
        Ok(())
    }

    fn advance<O: HouseholdObserver>(&mut self, now: TimeStep, observer: &mut O) -> SimResult<()> {
        observer.on_step_start(self.id, now);
        let rows = self.process_step(now)?;
        observer.on_rows(self.id, now, &rows);
        self.clock.advance();
        Ok(())
    }

    // ── Core step processing ──────────────────────────────────────────────

    fn process_step(&mut self, now: TimeStep) -> SimResult<Vec<OnlineEnergyFileRow>> {
        // ── Phase 1: variable operations due now ──────────────────────────
        let applied = self.variables.apply_due(now)?;
        if applied > 0 {
            trace!(household = %self.id, %now, applied, "variable operations applied");
        }

        // ── Phase 2: auto devices ─────────────────────────────────────────
        {
            let mut env = DeviceEnv {
                params:     &self.params,
                load_types: &self.load_types,
                odap:       &mut self.odap,
                normal:     &mut self.normal,
            };
            for auto in &self.auto_devices {
                auto.step(now, &mut self.devices, &self.variables, &mut env)?;
            }
        }

        // ── Phase 3: persons, in ascending PersonId order ─────────────────
        for p in 0..self.persons.len() {
            if self.persons[p].is_idle_at(now) {
                if self.persons[p].resume(now) {
                    debug!(person = %self.persons[p].descriptor.name, %now, "interrupted activity resumed");
                    continue;
                }
                self.plan_person(p, now, false)?;
            } else if self.persons[p].is_interruptible_at(now) {
                self.plan_person(p, now, true)?;
            }
        }

        // ── Phase 4: ledger rows and storages ─────────────────────────────
        let mut rows = self.odap.process_one_timestep(now)?;
        let log = self.params.options.storage_log.then_some(&mut self.storage_log);
        let passes = balance_storages(&mut self.storages, &mut rows, now, log)?;
        if passes > 1 {
            trace!(household = %self.id, %now, passes, "storages balanced");
        }

        // ── Phase 5: finalize ─────────────────────────────────────────────
        self.odap.finalize_timestep(&rows);
        Ok(rows)
    }

    /// Let person `p` pick and start an activity at `now`.  With
    /// `interrupting` only activities that interrupt are offered, and
    /// choosing none leaves the current activity running.
    fn plan_person(&mut self, p: usize, now: TimeStep, interrupting: bool) -> SimResult<()> {
        let person = self.persons[p].descriptor.clone();
        let source = self.persons[p].location;
        let horizon = self.params.internal_timesteps;

        // Explicit field borrows so the borrow checker sees disjoint access.
        let mut free = Vec::new();
        {
            let busy = BusyContext {
                params:    &self.params,
                variables: &self.variables,
                devices:   &self.devices,
            };
            let mut travel = TravelContext { handler: &mut self.transport, rng: &mut self.rng };
            for (i, activity) in self.activities.iter_mut().enumerate() {
                if interrupting && !activity.affordance().interrupts_at(now, horizon) {
                    continue;
                }
                let state = activity.is_busy(now, source, &person, &busy, &mut travel)?;
                trace!(person = %person.name, activity = %activity.pretty_name(), %now, %state, "busy check");
                if !state.is_busy() {
                    free.push(i);
                }
            }
        }

        let candidates: Vec<Candidate<'_>> = free
            .iter()
            .map(|&index| Candidate { index, activity: &self.activities[index] })
            .collect();
        let picked = self
            .chooser
            .choose(&person, now, &candidates, &mut self.rng)
            .and_then(|k| candidates.get(k))
            .map(|c| c.index);
        let Some(index) = picked else {
            if !interrupting {
                trace!(person = %person.name, %now, free = free.len(), "nothing chosen, idling");
                self.persons[p].idle(now);
            }
            return Ok(());
        };

        let mut env = DeviceEnv {
            params:     &self.params,
            load_types: &self.load_types,
            odap:       &mut self.odap,
            normal:     &mut self.normal,
        };
        let mut ctx = ActivationContext {
            devices:   &mut self.devices,
            locations: &self.locations,
            variables: &mut self.variables,
            env:       &mut env,
            log:       &mut self.activation_log,
        };
        let mut travel = TravelContext { handler: &mut self.transport, rng: &mut self.rng };
        let activity = &mut self.activities[index];
        let profile = activity.activate(now, &person, source, &mut ctx, &mut travel)?;
        debug!(
            person = %person.name,
            activity = %activity.pretty_name(),
            %now,
            steps = profile.len(),
            "activity started"
        );
        let affordance = activity.affordance();
        let current = CurrentActivity {
            name:               affordance.name.clone(),
            start:              now,
            profile,
            location:           affordance.location,
            interruptible:      affordance.is_interruptible,
            after_interruption: affordance.after_interruption,
        };
        if interrupting {
            debug!(
                person = %person.name,
                interrupted = self.persons[p].current().map_or("", |c| c.name.as_str()),
                by = %current.name,
                %now,
                "activity interrupted"
            );
            self.persons[p].interrupt(now, current);
        } else {
            self.persons[p].start(now, current);
        }
        Ok(())
    }
}
