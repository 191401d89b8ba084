//! `CalcAffordance`: one schedulable activity at one location.
//!
//! # Availability
//!
//! [`CalcAffordance::is_busy`] runs its checks in a fixed order and stops at
//! the first failure:
//!
//! | # | Check                                             | Failure                        |
//! |---|---------------------------------------------------|--------------------------------|
//! | 1 | variable requirements (all or any, see below)     | `VariableRequirementsNotMet`   |
//! | 2 | person age within `[min_age, max_age]`, gender    | `Occupied`                     |
//! | 3 | busy bitmap at `time`, devices free for their run | `Occupied`                     |
//! | 4 | time limit permits `time`                         | `BeyondTimeLimit`              |
//!
//! Checks 1 and 2 depend only on the person and the variables; they are
//! also available on their own as [`CalcAffordance::check_preconditions`]
//! so a travel wrapper can run them before resolving a route.
//!
//! `require_all` selects all-of versus any-of for the requirements and, on
//! activation, also starts every free sub-affordance.
//!
//! # Interruption
//!
//! A person busy with an `is_interruptible` affordance may be pulled away by
//! one that interrupts: either `is_interrupting` itself, or carrying an
//! interrupting sub-affordance that is free at that step.  The interrupted
//! affordance's `after_interruption` decides what happens afterwards.
//!
//! # Activation
//!
//! The occupied span is the longer of the person profile and the device
//! profiles (each shifted by its offset), cut at the horizon.  The busy
//! bitmap is shared by every person: once one person starts the affordance
//! nobody else can start it inside that span.

use tracing::{debug, trace};

use hh_core::{
    AffordanceId, BusyArray, CalcParameters, DeviceId, LoadTypeId, LocationId, TimeStep,
};
use hh_device::DeviceError;
use hh_profile::CalcProfile;
use hh_variables::{
    all_met, any_met, VariableExecutionTime, VariableOperation, VariableRequirement,
};

use crate::sub::{CalcSubAffordance, SubAffordanceConfig};
use crate::{
    ActionAfterInterruption, ActivationContext, ActivationEntry, AffordanceError, AffordanceResult,
    AffordanceSerialGenerator, BusyContext, BusynessType, PermittedGender, PersonDescriptor,
    TimeLimit,
};

/// A device run triggered by the affordance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceProfile {
    pub device:            DeviceId,
    pub profile:           CalcProfile,
    pub load_type:         LoadTypeId,
    /// Steps after the affordance start at which the device starts.
    pub time_offset_steps: u32,
}

/// How much a desire is fulfilled by doing the affordance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SatisfactionValue {
    pub desire: String,
    pub value:  f64,
}

/// Everything needed to build a [`CalcAffordance`].  Start from
/// [`AffordanceConfig::new`] and override what differs.
#[derive(Clone, Debug)]
pub struct AffordanceConfig {
    pub name:                String,
    pub location:            LocationId,
    pub person_profile:      CalcProfile,
    pub device_profiles:     Vec<DeviceProfile>,
    pub satisfaction_values: Vec<SatisfactionValue>,
    pub min_age:             u32,
    pub max_age:             u32,
    pub permitted_gender:    PermittedGender,
    pub needs_light:         bool,
    pub requirements:        Vec<VariableRequirement>,
    pub require_all:         bool,
    pub variable_operations: Vec<VariableOperation>,
    pub time_limit:          Option<TimeLimit>,
    pub weight:              u32,
    pub is_interruptible:    bool,
    pub is_interrupting:     bool,
    pub after_interruption:  ActionAfterInterruption,
    pub category:            String,
    pub sub_affordances:     Vec<SubAffordanceConfig>,
}

impl AffordanceConfig {
    pub fn new(name: impl Into<String>, location: LocationId, person_profile: CalcProfile) -> Self {
        Self {
            name: name.into(),
            location,
            person_profile,
            device_profiles: Vec::new(),
            satisfaction_values: Vec::new(),
            min_age: 0,
            max_age: u32::MAX,
            permitted_gender: PermittedGender::All,
            needs_light: false,
            requirements: Vec::new(),
            require_all: false,
            variable_operations: Vec::new(),
            time_limit: None,
            weight: 1,
            is_interruptible: false,
            is_interrupting: false,
            after_interruption: ActionAfterInterruption::default(),
            category: String::new(),
            sub_affordances: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CalcAffordance {
    pub id:                  AffordanceId,
    pub serial:              u32,
    pub name:                String,
    pub location:            LocationId,
    pub person_profile:      CalcProfile,
    pub device_profiles:     Vec<DeviceProfile>,
    pub satisfaction_values: Vec<SatisfactionValue>,
    pub min_age:             u32,
    pub max_age:             u32,
    pub permitted_gender:    PermittedGender,
    pub needs_light:         bool,
    pub requirements:        Vec<VariableRequirement>,
    pub require_all:         bool,
    pub variable_operations: Vec<VariableOperation>,
    pub time_limit:          Option<TimeLimit>,
    pub weight:              u32,
    pub is_interruptible:    bool,
    pub is_interrupting:     bool,
    pub after_interruption:  ActionAfterInterruption,
    pub category:            String,
    sub_affordances:         Vec<CalcSubAffordance>,
    busy:                    BusyArray,
}

impl CalcAffordance {
    pub fn new(
        id: AffordanceId,
        config: AffordanceConfig,
        serials: &mut AffordanceSerialGenerator,
        params: &CalcParameters,
    ) -> AffordanceResult<Self> {
        let invalid = |reason: String| AffordanceError::InvalidConfig {
            affordance: config.name.clone(),
            reason,
        };
        config.person_profile.step_values()?;
        for dp in &config.device_profiles {
            dp.profile.step_values()?;
        }
        if config.min_age > config.max_age {
            return Err(invalid(format!("min age {} above max age {}", config.min_age, config.max_age)));
        }
        let horizon = params.internal_timesteps as usize;
        let sub_affordances = config
            .sub_affordances
            .into_iter()
            .map(|s| CalcSubAffordance::new(s, config.location, horizon))
            .collect();
        Ok(Self {
            id,
            serial: serials.next_serial(),
            name: config.name,
            location: config.location,
            person_profile: config.person_profile,
            device_profiles: config.device_profiles,
            satisfaction_values: config.satisfaction_values,
            min_age: config.min_age,
            max_age: config.max_age,
            permitted_gender: config.permitted_gender,
            needs_light: config.needs_light,
            requirements: config.requirements,
            require_all: config.require_all,
            variable_operations: config.variable_operations,
            time_limit: config.time_limit,
            weight: config.weight,
            is_interruptible: config.is_interruptible,
            is_interrupting: config.is_interrupting,
            after_interruption: config.after_interruption,
            category: config.category,
            sub_affordances,
            busy: BusyArray::new(horizon),
        })
    }

    pub fn busy_array(&self) -> &BusyArray {
        &self.busy
    }

    pub fn sub_affordances(&self) -> &[CalcSubAffordance] {
        &self.sub_affordances
    }

    pub fn time_limit_name(&self) -> Option<&str> {
        self.time_limit.as_ref().map(|l| l.name.as_str())
    }

    /// Length of the person profile in steps.
    pub fn default_person_profile_length(&self) -> usize {
        self.person_profile.len()
    }

    /// Steps the affordance stays occupied after an uncut activation.
    pub fn resolved_duration(&self) -> usize {
        self.device_profiles
            .iter()
            .map(|dp| dp.time_offset_steps as usize + dp.profile.len())
            .fold(self.person_profile.len(), usize::max)
    }

    pub fn is_eligible(&self, person: &PersonDescriptor) -> bool {
        (self.min_age..=self.max_age).contains(&person.age)
            && self.permitted_gender.permits(person.gender)
    }

    /// Whether `person` may start the affordance at `time`.
    pub fn is_busy(
        &self,
        time: TimeStep,
        person: &PersonDescriptor,
        ctx: &BusyContext<'_>,
    ) -> AffordanceResult<BusynessType> {
        let result = self.check(time, person, ctx)?;
        trace!(affordance = %self.name, %time, person = %person.name, %result, "busy check");
        Ok(result)
    }

    /// Variable requirements, then age and gender.  `NotBusy` when both pass.
    pub fn check_preconditions(
        &self,
        person: &PersonDescriptor,
        ctx: &BusyContext<'_>,
    ) -> AffordanceResult<BusynessType> {
        let met = if self.require_all {
            all_met(&self.requirements, ctx.variables)?
        } else {
            any_met(&self.requirements, ctx.variables)?
        };
        if !met {
            return Ok(BusynessType::VariableRequirementsNotMet);
        }
        if !self.is_eligible(person) {
            return Ok(BusynessType::Occupied);
        }
        Ok(BusynessType::NotBusy)
    }

    fn check(
        &self,
        time: TimeStep,
        person: &PersonDescriptor,
        ctx: &BusyContext<'_>,
    ) -> AffordanceResult<BusynessType> {
        let pre = self.check_preconditions(person, ctx)?;
        if pre.is_busy() {
            return Ok(pre);
        }
        if self.busy.get(time.index()) {
            return Ok(BusynessType::Occupied);
        }
        for dp in &self.device_profiles {
            let device = ctx.devices.get(dp.device)?;
            let start = time.add_steps(dp.time_offset_steps);
            if device.is_busy_during_timespan(start, dp.profile.len(), 1.0, dp.load_type)? {
                return Ok(BusynessType::Occupied);
            }
        }
        if let Some(limit) = &self.time_limit {
            if !limit.permits(time) {
                return Ok(BusynessType::BeyondTimeLimit);
            }
        }
        Ok(BusynessType::NotBusy)
    }

    /// Start the affordance for `activator` at `time`.
    ///
    /// Runs every device profile, switches on the location's lights when
    /// needed, applies or schedules variable operations and, with
    /// `require_all`, starts the free sub-affordances.  Returns the person
    /// profile cut at the horizon.
    pub fn activate(
        &mut self,
        time: TimeStep,
        activator: &PersonDescriptor,
        source: LocationId,
        ctx: &mut ActivationContext<'_, '_>,
    ) -> AffordanceResult<CalcProfile> {
        if self.busy.get(time.index()) {
            return Err(AffordanceError::AlreadyBusy { affordance: self.name.clone(), time });
        }
        let horizon = ctx.env.params.internal_timesteps;
        let remaining = ctx.env.params.remaining_steps(time) as usize;

        let mut duration = self.person_profile.len();
        for dp in &self.device_profiles {
            let start = time.add_steps(dp.time_offset_steps);
            if start.internal_step >= horizon {
                continue;
            }
            let device = ctx.devices.get_mut(dp.device)?;
            let steps = device.activate(start, &dp.profile, dp.load_type, 1.0, ctx.env)?;
            duration = duration.max(dp.time_offset_steps as usize + steps as usize);
        }
        let duration = duration.min(remaining);
        let from = time.index();
        self.busy.set_range(from..from + duration);

        let locations = ctx.locations;
        let location = locations
            .get(self.location.index())
            .ok_or(DeviceError::UnknownLocation(self.location))?;
        if self.needs_light {
            location.switch_on_lights(time, duration as u32, ctx.devices, ctx.env)?;
        }

        for op in &self.variable_operations {
            match op.execution {
                VariableExecutionTime::AtStart => ctx.variables.apply(op)?,
                VariableExecutionTime::AtEnd => {
                    ctx.variables.schedule(op.clone(), op.due_at(time, duration as u32))?
                }
            }
        }

        if self.require_all {
            for idx in self.collect_sub_affordances(time, false, horizon) {
                let sub = &mut self.sub_affordances[idx];
                let start = time.add_steps(sub.delay_steps);
                sub.activate(start, &activator.name, &location.name, ctx.log)?;
            }
        }

        let profile = self.person_profile.truncated(remaining)?;
        ctx.log.push(ActivationEntry {
            time,
            person:         activator.name.clone(),
            affordance:     self.name.clone(),
            location:       location.name.clone(),
            duration_steps: duration as u32,
            data_source:    profile.data_source.clone(),
        });
        debug!(
            affordance = %self.name,
            %time,
            person = %activator.name,
            from = %source,
            steps = duration,
            "affordance activated"
        );
        Ok(profile)
    }

    /// Indices of the sub-affordances that could start relative to a parent
    /// start at `time`.
    pub fn collect_sub_affordances(&self, time: TimeStep, only_interrupting: bool, horizon: u32) -> Vec<usize> {
        self.sub_affordances
            .iter()
            .enumerate()
            .filter(|(_, sub)| {
                let start = time.add_steps(sub.delay_steps);
                start.internal_step < horizon
                    && !sub.is_busy(start)
                    && (!only_interrupting || sub.is_interrupting)
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether starting at `time` would interrupt someone's interruptible
    /// activity.
    pub fn interrupts_at(&self, time: TimeStep, horizon: u32) -> bool {
        self.is_interrupting || !self.collect_sub_affordances(time, true, horizon).is_empty()
    }

    /// Whether two device profiles drive the same load of the same device.
    pub fn are_there_duplicate_energy_profiles(&self) -> bool {
        self.device_profiles.iter().enumerate().any(|(i, a)| {
            self.device_profiles[i + 1..]
                .iter()
                .any(|b| a.device == b.device && a.load_type == b.load_type)
        })
    }

    /// Describe the first device profile without any step values, if any.
    pub fn are_device_profiles_empty(&self) -> Option<String> {
        self.device_profiles.iter().find(|dp| dp.profile.is_empty()).map(|dp| {
            format!(
                "affordance {:?}: profile {:?} on device {} is empty",
                self.name, dp.profile.name, dp.device
            )
        })
    }
}
