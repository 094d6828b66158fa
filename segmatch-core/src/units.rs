//! Unit extraction
//!
//! A unit is a maximal run of consecutive time steps sharing one non-zero
//! class label. Background runs produce nothing.

use crate::labels::BACKGROUND;

/// A labeled half-open interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    /// Class label, never background
    pub class_label: usize,
    /// First time step (inclusive)
    pub start: usize,
    /// One past the last time step (exclusive)
    pub end: usize,
}

impl Unit {
    /// Create a unit spanning `[start, end)`.
    ///
    /// A unit with `start > end` is treated as empty everywhere.
    pub fn new(class_label: usize, start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "unit start must not exceed end");
        Self {
            class_label,
            start,
            end,
        }
    }

    /// Number of time steps covered
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Number of time steps shared with `other`, regardless of class
    pub fn intersection(&self, other: &Unit) -> usize {
        self.end
            .min(other.end)
            .saturating_sub(self.start.max(other.start))
    }

    /// Interval midpoint in frames
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) as f64 / 2.0
    }

    /// Whether both units carry the same class label
    pub fn same_class(&self, other: &Unit) -> bool {
        self.class_label == other.class_label
    }
}

/// Split a class-index sequence into its ordered non-background units.
///
/// Units come out in increasing `start` order and never overlap.
pub fn extract_units(labels: &[usize]) -> Vec<Unit> {
    let mut units = Vec::new();
    let mut start = 0;

    for run in labels.chunk_by(|a, b| a == b) {
        let end = start + run.len();
        if run[0] != BACKGROUND {
            units.push(Unit::new(run[0], start, end));
        }
        start = end;
    }

    units
}

/// Frames where a unit begins: non-background and differing from the previous frame.
pub fn unit_starts(labels: &[usize]) -> Vec<usize> {
    extract_units(labels).iter().map(|unit| unit.start).collect()
}
