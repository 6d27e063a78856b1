//! N-dimensional arrays with named axes

use crate::errors::{SplintError, SplintResult};
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

/// An array of gridded values where every axis carries a dimension name
///
/// # Examples
///
/// ```rust
/// use ndarray::{ArrayD, IxDyn};
/// use splint_core::labeled::LabeledArray;
///
/// let data = ArrayD::<f64>::zeros(IxDyn(&[12, 181, 360]));
/// let field = LabeledArray::new(["time", "lat", "lon"], data).unwrap();
/// assert_eq!(field.dims(), &["time", "lat", "lon"]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledArray {
    dims: Vec<String>,
    data: ArrayD<f64>,
}

impl LabeledArray {
    /// Attach dimension names to an array
    ///
    /// Fails with [`SplintError::ShapeMismatch`] if the number of names does
    /// not equal the number of axes, and with
    /// [`SplintError::InvalidDimensions`] if a name is repeated.
    pub fn new<N>(dims: N, data: ArrayD<f64>) -> SplintResult<Self>
    where
        N: IntoIterator,
        N::Item: Into<String>,
    {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != data.ndim() {
            return Err(SplintError::ShapeMismatch(format!(
                "{} dimension names {:?} for an array with {} axes",
                dims.len(),
                dims,
                data.ndim()
            )));
        }
        for (i, name) in dims.iter().enumerate() {
            if dims[..i].contains(name) {
                return Err(SplintError::InvalidDimensions(format!(
                    "dimension name '{}' is repeated in {:?}",
                    name, dims
                )));
            }
        }
        Ok(Self { dims, data })
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }

    /// Size of a named dimension
    pub fn dim_size(&self, name: &str) -> Option<usize> {
        self.dims
            .iter()
            .position(|d| d == name)
            .map(|axis| self.data.shape()[axis])
    }
}
