//! CSV profile loader.
//!
//! # CSV format
//!
//! One row per time point.  Rows of the same profile must appear in offset
//! order and share the same `type`.
//!
//! ```csv
//! name,type,offset,value,data_source
//! fridge,relative,0,1.0,measured
//! fridge,relative,00:20:00,0.1,measured
//! fridge,relative,01:00:00,0.0,measured
//! ```
//!
//! **`type`** is `relative` or `absolute`.  **`offset`** is either whole
//! seconds or `HH:MM:SS`.  `data_source` may be empty.
//!
//! Profiles are returned in order of first appearance.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::profile::{CalcProfile, ProfileType};
use crate::{ProfileError, ProfileResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ProfileRecord {
    name:        String,
    #[serde(rename = "type")]
    kind:        String,
    offset:      String,
    value:       f64,
    #[serde(default)]
    data_source: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every profile in a CSV file and convert it to `step_secs` steps.
pub fn load_profiles_csv(path: &Path, step_secs: u32) -> ProfileResult<Vec<CalcProfile>> {
    let file = std::fs::File::open(path)?;
    let mut profiles = load_profiles_reader(file)?;
    for p in &mut profiles {
        p.convert_to_timesteps(step_secs)?;
    }
    Ok(profiles)
}

/// Like [`load_profiles_csv`] but accepts any `Read` source and leaves the
/// profiles unconverted.
pub fn load_profiles_reader<R: Read>(reader: R) -> ProfileResult<Vec<CalcProfile>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut profiles: Vec<CalcProfile> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for result in csv_reader.deserialize::<ProfileRecord>() {
        let row = result.map_err(|e| ProfileError::Parse(e.to_string()))?;
        let kind = parse_type(&row.kind)?;
        let offset = parse_offset(&row.offset)?;

        let idx = match by_name.get(&row.name) {
            Some(&i) => i,
            None => {
                profiles.push(CalcProfile::new(row.name.clone(), kind, row.data_source.clone()));
                by_name.insert(row.name.clone(), profiles.len() - 1);
                profiles.len() - 1
            }
        };
        let profile = &mut profiles[idx];
        if profile.profile_type != kind {
            return Err(ProfileError::Parse(format!(
                "profile {:?} mixes relative and absolute rows",
                row.name
            )));
        }
        profile.add_time_point(offset, row.value)?;
    }

    Ok(profiles)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_type(s: &str) -> ProfileResult<ProfileType> {
    match s.to_ascii_lowercase().as_str() {
        "relative" => Ok(ProfileType::Relative),
        "absolute" => Ok(ProfileType::Absolute),
        other => Err(ProfileError::Parse(format!(
            "invalid profile type {other:?}: expected \"relative\" or \"absolute\""
        ))),
    }
}

/// Parse whole seconds or `HH:MM:SS`.
pub(crate) fn parse_offset(s: &str) -> ProfileResult<u64> {
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs);
    }
    let parts: Vec<&str> = s.split(':').collect();
    let bad = || ProfileError::Parse(format!("invalid offset {s:?}: expected seconds or HH:MM:SS"));
    if parts.len() != 3 {
        return Err(bad());
    }
    let h: u64 = parts[0].parse().map_err(|_| bad())?;
    let m: u64 = parts[1].parse().map_err(|_| bad())?;
    let sec: u64 = parts[2].parse().map_err(|_| bad())?;
    if m >= 60 || sec >= 60 {
        return Err(bad());
    }
    Ok(h * 3_600 + m * 60 + sec)
}
