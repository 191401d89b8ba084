//! Plain data row types written by output backends.

/// The columns of one load type, announced before its first energy row.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadTypeColumns {
    pub load_type:   u16,
    pub name:        String,
    pub unit_of_sum: String,
    /// One `"name [unit]"` header per ledger column.
    pub headers:     Vec<String>,
}

/// One finalized ledger row, converted to the load type's sum unit.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyRow {
    pub household:      u32,
    pub load_type:      u16,
    pub step:           u32,
    /// Reported step index (settling period excluded unless shown).
    pub external_step:  i64,
    pub unix_time_secs: i64,
    pub values:         Vec<f64>,
}

/// One started affordance.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationRow {
    pub household:      u32,
    pub step:           u32,
    pub unix_time_secs: i64,
    pub person:         String,
    pub affordance:     String,
    pub location:       String,
    pub duration_steps: u32,
    pub data_source:    String,
}

/// End-of-run sum of one load type.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalRow {
    pub household:   u32,
    pub load_type:   String,
    pub unit_of_sum: String,
    pub total:       f64,
}
