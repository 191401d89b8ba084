//! `VariableRepository`: the household's named numeric state.
//!
//! Variables are registered before the run starts and addressed by
//! [`VariableId`] afterwards.  Affordance activations schedule
//! [`VariableOperation`]s that the step loop applies once their time step
//! comes due, so a "set at end of activity" really lands at the end.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use hh_core::{LocationId, TimeStep, VariableId};

use crate::{VariableError, VariableResult};

// ── CalcVariable ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalcVariable {
    pub id:       VariableId,
    pub name:     String,
    /// Location the variable is attached to (e.g. "water tank level" at
    /// the bathroom).
    pub location: LocationId,
    pub value:    f64,
}

// ── Operations ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariableAction {
    SetTo,
    Add,
    Subtract,
}

/// When a scheduled operation fires relative to the triggering activation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariableExecutionTime {
    AtStart,
    AtEnd,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableOperation {
    pub variable:  VariableId,
    pub action:    VariableAction,
    pub value:     f64,
    pub execution: VariableExecutionTime,
}

impl VariableOperation {
    /// The step this operation fires at for an activation starting at
    /// `start` and lasting `duration_steps`.
    pub fn due_at(&self, start: TimeStep, duration_steps: u32) -> TimeStep {
        match self.execution {
            VariableExecutionTime::AtStart => start,
            VariableExecutionTime::AtEnd => start.add_steps(duration_steps),
        }
    }
}

// ── VariableRepository ────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct VariableRepository {
    vars:    Vec<CalcVariable>,
    by_name: FxHashMap<String, VariableId>,
    /// Pending operations keyed by internal step, in scheduling order.
    pending: BTreeMap<u32, Vec<VariableOperation>>,
}

impl VariableRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable under a unique name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        location: LocationId,
        initial: f64,
    ) -> VariableResult<VariableId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(VariableError::DuplicateName(name));
        }
        let id = VariableId(self.vars.len() as u32);
        self.by_name.insert(name.clone(), id);
        self.vars.push(CalcVariable { id, name, location, value: initial });
        Ok(id)
    }

    pub fn id_of(&self, name: &str) -> VariableResult<VariableId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| VariableError::UnknownName(name.to_owned()))
    }

    pub fn get(&self, id: VariableId) -> VariableResult<&CalcVariable> {
        self.vars.get(id.index()).ok_or(VariableError::Unknown(id))
    }

    pub fn value(&self, id: VariableId) -> VariableResult<f64> {
        Ok(self.get(id)?.value)
    }

    pub fn set_value(&mut self, id: VariableId, value: f64) -> VariableResult<()> {
        let var = self.vars.get_mut(id.index()).ok_or(VariableError::Unknown(id))?;
        var.value = value;
        Ok(())
    }

    pub fn add_value(&mut self, id: VariableId, delta: f64) -> VariableResult<()> {
        let var = self.vars.get_mut(id.index()).ok_or(VariableError::Unknown(id))?;
        var.value += delta;
        Ok(())
    }

    /// Apply `op` immediately.
    pub fn apply(&mut self, op: &VariableOperation) -> VariableResult<()> {
        match op.action {
            VariableAction::SetTo => self.set_value(op.variable, op.value),
            VariableAction::Add => self.add_value(op.variable, op.value),
            VariableAction::Subtract => self.add_value(op.variable, -op.value),
        }
    }

    /// Queue `op` to be applied by [`apply_due`](Self::apply_due) at `at`.
    pub fn schedule(&mut self, op: VariableOperation, at: TimeStep) -> VariableResult<()> {
        self.get(op.variable)?;
        self.pending.entry(at.internal_step).or_default().push(op);
        Ok(())
    }

    /// Apply every operation scheduled at or before `now`.  Returns how many
    /// operations ran.
    pub fn apply_due(&mut self, now: TimeStep) -> VariableResult<usize> {
        let mut applied = 0;
        while let Some(entry) = self.pending.first_entry() {
            if *entry.key() > now.internal_step {
                break;
            }
            for op in entry.remove() {
                self.apply(&op)?;
                applied += 1;
            }
        }
        Ok(applied)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalcVariable> {
        self.vars.iter()
    }
}
