//! Fixed-length occupancy bitmap indexed by internal step.
//!
//! Affordances, devices and transport vehicles each own one `BusyArray` whose
//! length equals the simulation horizon.  A set bit means the owner is
//! unavailable during that step.  Writes outside the horizon are clamped, so
//! activations that run past the end of the simulation simply stop marking.

use std::ops::Range;

const WORD_BITS: usize = 64;

/// Bit-packed per-step busy flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusyArray {
    words: Vec<u64>,
    len:   usize,
}

impl BusyArray {
    /// All-free bitmap covering `len` steps.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Copy the flags from `src`, resized to exactly `len` steps.
    ///
    /// Extra source bits are dropped; missing ones start free.
    pub fn from_bools(src: &[bool], len: usize) -> Self {
        let mut arr = Self::new(len);
        for (i, _) in src.iter().enumerate().take(len).filter(|(_, b)| **b) {
            arr.set(i);
        }
        arr
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether step `i` is busy.  Steps past the end read as free.
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        if i >= self.len {
            return false;
        }
        self.words[i / WORD_BITS] & (1u64 << (i % WORD_BITS)) != 0
    }

    /// Mark step `i` busy.  Ignored past the end.
    #[inline]
    pub fn set(&mut self, i: usize) {
        if i < self.len {
            self.words[i / WORD_BITS] |= 1u64 << (i % WORD_BITS);
        }
    }

    /// Mark every step in `range` busy, clamped to the bitmap length.
    pub fn set_range(&mut self, range: Range<usize>) {
        let end = range.end.min(self.len);
        for i in range.start..end {
            self.set(i);
        }
    }

    /// Whether any step in `range` (clamped) is busy.
    pub fn any_in(&self, range: Range<usize>) -> bool {
        let end = range.end.min(self.len);
        (range.start..end).any(|i| self.get(i))
    }

    /// Number of busy steps.
    pub fn count_busy(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}
