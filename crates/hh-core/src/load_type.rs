//! Energy carriers.

use crate::LoadTypeId;

/// An energy carrier such as electricity, warm water or gas.
///
/// Ledger rows hold power-unit values per step.  `conversion_factor`
/// translates them into the carrier's *sum* unit for totals and reports
/// (e.g. watts to kWh per minute).  Rows for a load type are aggregated by
/// summation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalcLoadType {
    pub id:                LoadTypeId,
    pub name:              String,
    pub unit_of_power:     String,
    pub unit_of_sum:       String,
    pub conversion_factor: f64,
    pub show_in_charts:    bool,
}

impl CalcLoadType {
    pub fn new(
        id: LoadTypeId,
        name: impl Into<String>,
        unit_of_power: impl Into<String>,
        unit_of_sum: impl Into<String>,
        conversion_factor: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            unit_of_power: unit_of_power.into(),
            unit_of_sum: unit_of_sum.into(),
            conversion_factor,
            show_in_charts: true,
        }
    }

    /// Convert a power-unit quantity into the ledger's sum unit.
    #[inline]
    pub fn to_sum_unit(&self, value: f64) -> f64 {
        value * self.conversion_factor
    }

    /// Convert a sum-unit quantity back to power units.  A zero conversion
    /// factor leaves the value untouched.
    #[inline]
    pub fn from_sum_unit(&self, value: f64) -> f64 {
        if self.conversion_factor == 0.0 {
            value
        } else {
            value / self.conversion_factor
        }
    }
}
