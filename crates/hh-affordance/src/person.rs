//! What an affordance needs to know about the person asking.

use hh_core::PersonId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gender {
    Male,
    Female,
}

/// Gender restriction of an affordance.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PermittedGender {
    Male,
    Female,
    #[default]
    All,
}

impl PermittedGender {
    pub fn permits(self, gender: Gender) -> bool {
        match self {
            PermittedGender::All => true,
            PermittedGender::Male => gender == Gender::Male,
            PermittedGender::Female => gender == Gender::Female,
        }
    }
}

/// Read-only view of a person used for eligibility checks and logging.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersonDescriptor {
    pub id:     PersonId,
    pub name:   String,
    pub age:    u32,
    pub gender: Gender,
}

impl PersonDescriptor {
    pub fn new(id: PersonId, name: impl Into<String>, age: u32, gender: Gender) -> Self {
        Self { id, name: name.into(), age, gender }
    }
}
