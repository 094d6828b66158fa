//! Label representations and canonicalization
//!
//! Callers hand the scorer either raw class indices or a `[T, C]` matrix of
//! one-hot / probability rows. Both collapse to a [`LabelSequence`], one class
//! index per time step, before any matching happens.

use crate::error::{ensure_same_len, Result, ScoreError};
use crate::units::{extract_units, Unit};
use ndarray::{ArrayView, ArrayView1, ArrayView2, ArrayViewD, Axis, Dimension};

/// Class index reserved for background / no label
pub const BACKGROUND: usize = 0;

/// A borrowed label array together with its representation.
#[derive(Debug, Clone)]
pub enum Labels<'a> {
    /// Class indices, shape `[T]` or `[T, 1]`
    Raw(ArrayViewD<'a, usize>),
    /// One-hot or probability rows, shape `[T, C]`
    Categorical(ArrayView2<'a, f64>),
}

impl<'a> Labels<'a> {
    /// Wrap a plain slice of class indices
    pub fn classes(labels: &'a [usize]) -> Self {
        Labels::Raw(ArrayView1::from(labels).into_dyn())
    }

    /// Wrap a raw class-index array of any dimensionality.
    ///
    /// Shape is checked when the labels are canonicalized.
    pub fn raw<D: Dimension>(view: ArrayView<'a, usize, D>) -> Self {
        Labels::Raw(view.into_dyn())
    }

    /// Wrap a `[T, C]` one-hot or probability matrix
    pub fn categorical(view: ArrayView2<'a, f64>) -> Self {
        Labels::Categorical(view)
    }

    /// Number of time steps
    pub fn len(&self) -> usize {
        match self {
            Labels::Raw(view) => view.shape().first().copied().unwrap_or(0),
            Labels::Categorical(view) => view.nrows(),
        }
    }

    /// Whether there are no time steps
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of class columns for categorical data
    pub fn num_columns(&self) -> Option<usize> {
        match self {
            Labels::Raw(_) => None,
            Labels::Categorical(view) => Some(view.ncols()),
        }
    }

    /// Collapse to one class index per time step.
    ///
    /// Categorical rows resolve to their argmax, lowest column on ties. NaN
    /// entries never win a row.
    pub fn canonicalize(&self) -> Result<LabelSequence> {
        match self {
            Labels::Raw(view) => canonicalize_raw(view),
            Labels::Categorical(view) => canonicalize_categorical(view),
        }
    }
}

impl<'a> From<&'a [usize]> for Labels<'a> {
    fn from(labels: &'a [usize]) -> Self {
        Labels::classes(labels)
    }
}

impl<'a> From<ArrayView2<'a, f64>> for Labels<'a> {
    fn from(view: ArrayView2<'a, f64>) -> Self {
        Labels::Categorical(view)
    }
}

fn canonicalize_raw(view: &ArrayViewD<'_, usize>) -> Result<LabelSequence> {
    match view.shape() {
        [_] | [_, 1] => Ok(LabelSequence::new(view.iter().copied().collect())),
        [rows, cols] => Err(ScoreError::representation(format!(
            "vector expected for raw labels, got [{rows}, {cols}] (use categorical labels for multi-column data)"
        ))),
        shape => Err(ScoreError::representation(format!(
            "vector expected for raw labels, got {} dimensions",
            shape.len()
        ))),
    }
}

fn canonicalize_categorical(view: &ArrayView2<'_, f64>) -> Result<LabelSequence> {
    if view.ncols() == 0 && view.nrows() > 0 {
        return Err(ScoreError::representation(
            "categorical labels need at least one class column",
        ));
    }

    let labels = view.axis_iter(Axis(0)).map(argmax).collect();
    Ok(LabelSequence::new(labels))
}

/// Index of the largest value, first occurrence on ties.
pub(crate) fn argmax(row: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (idx, &value) in row.iter().enumerate() {
        if value > best_value {
            best = idx;
            best_value = value;
        }
    }
    best
}

/// Canonical class-index sequence, one label per time step
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelSequence {
    labels: Vec<usize>,
}

impl LabelSequence {
    /// Create a sequence from class indices
    pub fn new(labels: Vec<usize>) -> Self {
        Self { labels }
    }

    /// Borrow the class indices
    pub fn as_slice(&self) -> &[usize] {
        &self.labels
    }

    /// Number of time steps
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the sequence has no time steps
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Largest class index present
    pub fn max_label(&self) -> Option<usize> {
        self.labels.iter().copied().max()
    }

    /// Extract the non-background units of this sequence
    pub fn units(&self) -> Vec<Unit> {
        extract_units(&self.labels)
    }
}

impl From<Vec<usize>> for LabelSequence {
    fn from(labels: Vec<usize>) -> Self {
        Self::new(labels)
    }
}

impl AsRef<[usize]> for LabelSequence {
    fn as_ref(&self) -> &[usize] {
        &self.labels
    }
}

/// Canonicalize an annotation/prediction pair and check their lengths agree.
pub fn canonical_pair(truth: &Labels<'_>, pred: &Labels<'_>) -> Result<(LabelSequence, LabelSequence)> {
    let truth = truth.canonicalize()?;
    let pred = pred.canonicalize()?;
    ensure_same_len(truth.len(), pred.len())?;
    Ok((truth, pred))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_raw_vector_passes_through() {
        let data = [0, 1, 1, 2];
        let seq = Labels::classes(&data).canonicalize().unwrap();
        assert_eq!(seq.as_slice(), &[0, 1, 1, 2]);
        assert_eq!(seq.max_label(), Some(2));
    }

    #[test]
    fn test_raw_column_vector_is_accepted() {
        let data = array![[0usize], [3], [3]];
        let seq = Labels::raw(data.view()).canonicalize().unwrap();
        assert_eq!(seq.as_slice(), &[0, 3, 3]);
    }

    #[test]
    fn test_raw_matrix_is_rejected() {
        let data = array![[0usize, 1], [1, 0]];
        let err = Labels::raw(data.view()).canonicalize().unwrap_err();
        assert!(matches!(err, ScoreError::RepresentationViolation { .. }));
        assert!(err.to_string().contains("vector expected"));
    }

    #[test]
    fn test_raw_three_dimensional_is_rejected() {
        let data = Array3::<usize>::zeros((2, 1, 1));
        assert!(Labels::raw(data.view()).canonicalize().is_err());
    }

    #[test]
    fn test_categorical_argmax_ties_pick_lowest() {
        let data = array![[0.2, 0.8, 0.0], [0.5, 0.5, 0.0], [0.1, 0.3, 0.6]];
        let seq = Labels::categorical(data.view()).canonicalize().unwrap();
        assert_eq!(seq.as_slice(), &[1, 0, 2]);
    }

    #[test]
    fn test_categorical_nan_never_wins() {
        let data = array![[f64::NAN, 0.1, 0.9]];
        let seq = Labels::categorical(data.view()).canonicalize().unwrap();
        assert_eq!(seq.as_slice(), &[2]);
    }

    #[test]
    fn test_categorical_without_columns_is_rejected() {
        let data = ndarray::Array2::<f64>::zeros((3, 0));
        assert!(Labels::categorical(data.view()).canonicalize().is_err());
    }

    #[test]
    fn test_len_does_not_canonicalize() {
        let data = array![[0usize, 1], [1, 0], [0, 0]];
        assert_eq!(Labels::raw(data.view()).len(), 3);
    }

    #[test]
    fn test_canonical_pair_length_mismatch() {
        let truth = [0, 1, 1];
        let pred = [0, 1];
        let err = canonical_pair(&Labels::classes(&truth), &Labels::classes(&pred)).unwrap_err();
        assert_eq!(
            err,
            ScoreError::ShapeMismatch {
                expected: 3,
                actual: 2
            }
        );
    }
}
