//! `CalcProfile`: a load curve given as time points, converted once into a
//! per-internal-step value array.
//!
//! # Conversion model
//!
//! A profile is a sorted list of `(offset_secs, value)` points.  Each value
//! holds until the next point; the last point only marks the end of the
//! profile.  Converting at a step length of `s` seconds yields
//!
//! ```text
//! len        = ceil(last_offset / s)
//! values[i]  = value of the last point with offset ≤ i * s
//! ```
//!
//! so a profile with points at 0 h and 1 h converts to 60 one-minute steps.
//! Conversion is deterministic and the result is immutable afterwards;
//! derived profiles (`compress_expand`, `truncated`, `dead_time`) are new
//! values.

use crate::{ProfileError, ProfileResult};

// ── ProfileType ───────────────────────────────────────────────────────────────

/// How a profile reacts to time scaling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProfileType {
    /// Duration is stretched or compressed to fit a target duration
    /// (persons who are slower or faster than average).
    Relative,
    /// Every value lasts exactly its configured duration.
    Absolute,
}

/// One input point of a profile.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimePoint {
    pub offset_secs: u64,
    pub value:       f64,
}

// ── CalcProfile ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalcProfile {
    pub name:         String,
    /// Where the curve came from (measurement set, generated, …).  Shown in
    /// activation logs.
    pub data_source:  String,
    pub profile_type: ProfileType,
    points:           Vec<TimePoint>,
    step_values:      Option<Vec<f64>>,
}

impl CalcProfile {
    pub fn new(
        name: impl Into<String>,
        profile_type: ProfileType,
        data_source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_source: data_source.into(),
            profile_type,
            points: Vec::new(),
            step_values: None,
        }
    }

    /// Build an already-converted profile directly from step values.
    pub fn from_step_values(
        name: impl Into<String>,
        profile_type: ProfileType,
        data_source: impl Into<String>,
        values: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            data_source: data_source.into(),
            profile_type,
            points: Vec::new(),
            step_values: Some(values),
        }
    }

    /// `n` steps of value `1.0`: the person is occupied but no device runs.
    ///
    /// Used as the travel prefix of routed activities.
    pub fn dead_time(n: usize, name: impl Into<String>, data_source: impl Into<String>) -> Self {
        Self::from_step_values(name, ProfileType::Absolute, data_source, vec![1.0; n])
    }

    /// Append an input point.  Points must arrive in non-decreasing offset
    /// order and carry finite values.
    pub fn add_time_point(&mut self, offset_secs: u64, value: f64) -> ProfileResult<()> {
        if !value.is_finite() {
            return Err(ProfileError::NonFiniteValue { name: self.name.clone(), value });
        }
        if let Some(last) = self.points.last() {
            if offset_secs < last.offset_secs {
                return Err(ProfileError::UnorderedPoint {
                    name:          self.name.clone(),
                    offset_secs,
                    previous_secs: last.offset_secs,
                });
            }
        }
        self.points.push(TimePoint { offset_secs, value });
        self.step_values = None;
        Ok(())
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    /// Resample the time points onto a grid of `step_secs`.
    pub fn convert_to_timesteps(&mut self, step_secs: u32) -> ProfileResult<()> {
        if step_secs == 0 {
            return Err(ProfileError::ZeroStepLength);
        }
        if self.points.len() < 2 {
            return Err(ProfileError::TooFewPoints {
                name:  self.name.clone(),
                count: self.points.len(),
            });
        }
        let step = u64::from(step_secs);
        let end = self.points[self.points.len() - 1].offset_secs;
        let len = end.div_ceil(step) as usize;

        let mut values = Vec::with_capacity(len);
        let mut cursor = 0usize;
        for i in 0..len {
            let t = i as u64 * step;
            while cursor + 1 < self.points.len() && self.points[cursor + 1].offset_secs <= t {
                cursor += 1;
            }
            values.push(self.points[cursor].value);
        }
        self.step_values = Some(values);
        Ok(())
    }

    #[inline]
    pub fn is_converted(&self) -> bool {
        self.step_values.is_some()
    }

    /// The per-step values, available after conversion.
    pub fn step_values(&self) -> ProfileResult<&[f64]> {
        self.step_values
            .as_deref()
            .ok_or_else(|| ProfileError::NotConverted(self.name.clone()))
    }

    /// Converted length in steps (0 before conversion).
    #[inline]
    pub fn len(&self) -> usize {
        self.step_values.as_ref().map_or(0, Vec::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first `len` step values, failing if the profile is shorter.
    pub fn values_for_span(&self, len: usize) -> ProfileResult<&[f64]> {
        let values = self.step_values()?;
        if len > values.len() {
            return Err(ProfileError::TooShort {
                name:      self.name.clone(),
                available: values.len(),
                requested: len,
            });
        }
        Ok(&values[..len])
    }

    /// Stretch (`factor > 1`) or compress (`factor < 1`) a relative profile
    /// in time.  Absolute profiles and non-positive factors return an
    /// unchanged copy.  A non-empty profile never shrinks below one step.
    pub fn compress_expand(&self, factor: f64) -> ProfileResult<CalcProfile> {
        let values = self.step_values()?;
        if self.profile_type == ProfileType::Absolute
            || !factor.is_finite()
            || factor <= 0.0
            || values.is_empty()
        {
            return Ok(self.clone());
        }
        let new_len = ((values.len() as f64 * factor).round() as usize).max(1);
        let last = values.len() - 1;
        let scaled = (0..new_len)
            .map(|j| values[((j as f64 / factor) as usize).min(last)])
            .collect();
        Ok(Self::from_step_values(
            self.name.clone(),
            self.profile_type,
            self.data_source.clone(),
            scaled,
        ))
    }

    /// Append `other`'s step values after this profile's.
    pub fn append(&mut self, other: &CalcProfile) -> ProfileResult<()> {
        let tail = other.step_values()?.to_vec();
        let values = self
            .step_values
            .as_mut()
            .ok_or_else(|| ProfileError::NotConverted(self.name.clone()))?;
        values.extend(tail);
        Ok(())
    }

    /// Copy limited to the first `len` steps.
    pub fn truncated(&self, len: usize) -> ProfileResult<CalcProfile> {
        let values = self.step_values()?;
        let keep = len.min(values.len());
        Ok(Self::from_step_values(
            self.name.clone(),
            self.profile_type,
            self.data_source.clone(),
            values[..keep].to_vec(),
        ))
    }

    /// Sum of all step values; useful for quick energy estimates.
    pub fn total(&self) -> f64 {
        self.step_values.as_ref().map_or(0.0, |v| v.iter().sum())
    }
}
