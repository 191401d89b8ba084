//! Variable conditions and requirements that gate affordance eligibility.

use hh_core::{VariableId, EPSILON};

use crate::{VariableRepository, VariableResult};

/// Comparison between a variable's current value and a target.
///
/// `Equal` tolerates a difference of [`EPSILON`]; the ordered comparisons
/// are exact, so `Less` and `Greater` are strict.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariableCondition {
    Equal,
    EqualOrGreater,
    EqualOrLess,
    Greater,
    Less,
}

impl VariableCondition {
    /// Whether `current <condition> target` holds.
    pub fn check(self, current: f64, target: f64) -> bool {
        match self {
            VariableCondition::Equal => (current - target).abs() < EPSILON,
            VariableCondition::EqualOrGreater => current >= target,
            VariableCondition::EqualOrLess => current <= target,
            VariableCondition::Greater => current > target,
            VariableCondition::Less => current < target,
        }
    }
}

/// A condition on one variable that must hold before an affordance or auto
/// device may start.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableRequirement {
    pub variable:  VariableId,
    pub condition: VariableCondition,
    pub value:     f64,
    /// Human-readable label used in logs.
    pub description: String,
}

impl VariableRequirement {
    pub fn new(variable: VariableId, condition: VariableCondition, value: f64) -> Self {
        Self {
            variable,
            condition,
            value,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Evaluate against the current repository state.
    pub fn is_met(&self, repo: &VariableRepository) -> VariableResult<bool> {
        let current = repo.value(self.variable)?;
        Ok(self.condition.check(current, self.value))
    }
}

/// `true` if every requirement holds (vacuously true when empty).
pub fn all_met(requirements: &[VariableRequirement], repo: &VariableRepository) -> VariableResult<bool> {
    for r in requirements {
        if !r.is_met(repo)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// `true` if at least one requirement holds, or if there are none.
pub fn any_met(requirements: &[VariableRequirement], repo: &VariableRepository) -> VariableResult<bool> {
    if requirements.is_empty() {
        return Ok(true);
    }
    for r in requirements {
        if r.is_met(repo)? {
            return Ok(true);
        }
    }
    Ok(false)
}
