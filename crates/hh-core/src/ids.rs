//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into arena `Vec`s via `id.0 as usize`, but callers should
//! prefer the `.index()` helpers for clarity.
//!
//! Every entity in one household simulation (persons, locations, devices,
//! affordances, storages, …) lives in an arena owned by that household and is
//! addressed by one of these IDs.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Identifies one simulated household (the unit of parallelism).
    pub struct HouseholdId(u32);
}

typed_id! {
    /// Index of a person within its household.
    pub struct PersonId(u32);
}

typed_id! {
    /// Index of a location (room, workplace, …).
    pub struct LocationId(u32);
}

typed_id! {
    /// Index of a site: a group of locations reachable without travel.
    pub struct SiteId(u32);
}

typed_id! {
    /// Index of a device in the household's device store.
    pub struct DeviceId(u32);
}

typed_id! {
    /// Index of an affordance (activity).
    pub struct AffordanceId(u32);
}

typed_id! {
    /// Identifies an energy carrier.  `u16` keeps row keys compact.
    pub struct LoadTypeId(u16);
}

typed_id! {
    /// Index of an energy storage.
    pub struct StorageId(u32);
}

typed_id! {
    /// Index of a variable in the variable repository.
    pub struct VariableId(u32);
}

typed_id! {
    /// Index of a travel route between two sites.
    pub struct RouteId(u32);
}

typed_id! {
    /// Index of a transportation device category (car, bicycle, walking, …).
    pub struct TransportCategoryId(u32);
}
