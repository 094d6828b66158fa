//! Concatenation of per-video sequences with separator frames
//!
//! Several videos are often scored as one long stream. Background separator
//! frames between them keep units from fusing across a video boundary, and
//! the returned mask lets framewise metrics skip those frames again.

use crate::labels::{LabelSequence, BACKGROUND};

/// A concatenated label stream and its separator mask
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Concatenated {
    /// Joined labels, separators included
    pub labels: LabelSequence,
    /// `true` on real frames, `false` on separator frames
    pub mask: Vec<bool>,
}

impl Concatenated {
    /// Mask in the form the framewise metrics take
    pub fn idx_not_separation(&self) -> &[bool] {
        &self.mask
    }
}

/// Join sequences, appending `separation` background frames after each one.
pub fn concatenate<S: AsRef<[usize]>>(sequences: &[S], separation: usize) -> Concatenated {
    let total: usize = sequences
        .iter()
        .map(|seq| seq.as_ref().len() + separation)
        .sum();

    let mut labels = Vec::with_capacity(total);
    let mut mask = Vec::with_capacity(total);
    for seq in sequences {
        let seq = seq.as_ref();
        labels.extend_from_slice(seq);
        mask.extend(std::iter::repeat(true).take(seq.len()));
        labels.extend(std::iter::repeat(BACKGROUND).take(separation));
        mask.extend(std::iter::repeat(false).take(separation));
    }

    Concatenated {
        labels: LabelSequence::new(labels),
        mask,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;

    #[test]
    fn test_concatenate_with_separators() {
        let joined = concatenate(&[vec![1usize, 1], vec![1, 2, 0]], 2);
        assert_eq!(joined.labels.as_slice(), &[1, 1, 0, 0, 1, 2, 0, 0, 0]);
        assert_eq!(
            joined.mask,
            vec![true, true, false, false, true, true, true, false, false]
        );
    }

    #[test]
    fn test_separators_keep_units_apart() {
        let joined = concatenate(&[[1usize, 1], [1, 1]], 1);
        assert_eq!(
            joined.labels.units(),
            vec![Unit::new(1, 0, 2), Unit::new(1, 3, 5)]
        );
    }

    #[test]
    fn test_concatenate_nothing() {
        let joined = concatenate::<Vec<usize>>(&[], 5);
        assert!(joined.labels.is_empty());
        assert!(joined.mask.is_empty());
    }
}
