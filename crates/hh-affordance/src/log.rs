//! In-memory activation log.
//!
//! One entry per started affordance or sub-affordance.  Output writers
//! persist the entries after the run; the simulation itself never reads
//! them back.

use hh_core::TimeStep;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivationEntry {
    pub time:           TimeStep,
    pub person:         String,
    pub affordance:     String,
    pub location:       String,
    pub duration_steps: u32,
    pub data_source:    String,
}

#[derive(Clone, Debug, Default)]
pub struct ActivationLog {
    entries: Vec<ActivationEntry>,
}

impl ActivationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ActivationEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ActivationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hand over everything logged so far, leaving the log empty.
    pub fn drain(&mut self) -> Vec<ActivationEntry> {
        std::mem::take(&mut self.entries)
    }
}
