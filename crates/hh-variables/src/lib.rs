//! `hh-variables` — named numeric household state.
//!
//! | Module         | Contents                                                       |
//! |----------------|----------------------------------------------------------------|
//! | [`condition`]  | `VariableCondition`, `VariableRequirement`, `all_met`, `any_met` |
//! | [`repository`] | `CalcVariable`, `VariableRepository`, `VariableOperation`      |
//! | [`error`]      | `VariableError`, `VariableResult<T>`                           |
//!
//! Variable state is scoped to one household and mutated only through
//! activation side effects (scheduled operations) or explicit setters.

pub mod condition;
pub mod error;
pub mod repository;

#[cfg(test)]
mod tests;

pub use condition::{all_met, any_met, VariableCondition, VariableRequirement};
pub use error::{VariableError, VariableResult};
pub use repository::{
    CalcVariable, VariableAction, VariableExecutionTime, VariableOperation, VariableRepository,
};
