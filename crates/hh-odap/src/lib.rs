//! `hh-odap` — the online device activation processor.
//!
//! The ODAP is the household's energy ledger.  Every device, light,
//! storage, storage signal and transport vehicle registers one column per
//! load type it emits; each step the ODAP produces one
//! [`OnlineEnergyFileRow`] per load type holding everything those entities
//! wrote for that step.
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`key`]       | `OefcKey`, `OefcDeviceType`, `ColumnEntry`             |
//! | [`row`]       | `OnlineEnergyFileRow`, `row_for`, `row_for_mut`        |
//! | [`processor`] | `ActivationProcessor` trait, `Odap`, `LoadTypeTotal`   |
//! | [`error`]     | `OdapError`, `OdapResult<T>`                           |

pub mod error;
pub mod key;
pub mod processor;
pub mod row;


pub use error::{OdapError, OdapResult};
pub use key::{ColumnEntry, OefcDeviceType, OefcKey};
pub use processor::{ActivationProcessor, LoadTypeTotal, Odap};
pub use row::{row_for, row_for_mut, OnlineEnergyFileRow};
