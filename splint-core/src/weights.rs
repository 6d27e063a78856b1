//! Sparse matrix entries in coordinate (COO) form

use crate::errors::{SplintError, SplintResult};
use serde::{Deserialize, Serialize};

/// Parallel weight, row and column sequences describing a sparse matrix
///
/// Indices are kept signed so that a zero in a 1-based file (or any other
/// negative index after conversion) is reported instead of wrapping around.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightTriple {
    pub weights: Vec<f64>,
    pub row_index: Vec<i64>,
    pub col_index: Vec<i64>,
}

impl WeightTriple {
    /// Create a triple, checking that all three sequences have the same length
    pub fn new(weights: Vec<f64>, row_index: Vec<i64>, col_index: Vec<i64>) -> SplintResult<Self> {
        if weights.len() != row_index.len() || weights.len() != col_index.len() {
            return Err(SplintError::Schema(format!(
                "weight triple lengths differ: {} weights, {} row indices, {} column indices",
                weights.len(),
                row_index.len(),
                col_index.len()
            )));
        }
        Ok(Self {
            weights,
            row_index,
            col_index,
        })
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterate over `(row, col, weight)` entries
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64, f64)> + '_ {
        self.row_index
            .iter()
            .zip(self.col_index.iter())
            .zip(self.weights.iter())
            .map(|((&r, &c), &w)| (r, c, w))
    }

    /// Convert 1-based indices to 0-based
    ///
    /// Fails with [`SplintError::ShapeMismatch`] if an index cannot be
    /// shifted down without overflowing.
    pub fn into_zero_based(mut self) -> SplintResult<Self> {
        shift_down(&mut self.row_index, "row")?;
        shift_down(&mut self.col_index, "column")?;
        Ok(self)
    }
}

fn shift_down(indices: &mut [i64], kind: &str) -> SplintResult<()> {
    for (entry, index) in indices.iter_mut().enumerate() {
        let shifted = index.checked_sub(1).ok_or_else(|| {
            SplintError::ShapeMismatch(format!(
                "{} index {} of entry {} is not a valid 1-based index",
                kind, index, entry
            ))
        })?;
        *index = shifted;
    }
    Ok(())
}
