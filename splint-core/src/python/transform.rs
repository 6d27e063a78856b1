use crate::dims::{DimensionSpec, MemoryOrder};
use crate::esmf;
use crate::linear_transform::SparseLinearTransform;
use ndarray::{ArrayD, IxDyn};
use numpy::{PyArray1, PyArrayDyn, PyArrayMethods, PyReadonlyArrayDyn};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PySequence;
use std::path::PathBuf;

/// Dimension names and sizes as returned to Python
type PyDims = (Vec<String>, Vec<usize>);

/// Extract a dimension spec from a two-element sequence of names and sizes
///
/// Both `(["lat", "lon"], [181, 360])` and `[("lat", "lon"), (181, 360)]`
/// are accepted.
fn to_spec(dims: &Bound<'_, PyAny>) -> PyResult<DimensionSpec> {
    let seq = dims.cast::<PySequence>()?;
    if seq.len()? != 2 {
        return Err(PyValueError::new_err(format!(
            "expected a (names, sizes) pair, got {} items",
            seq.len()?
        )));
    }
    let names: Vec<String> = seq.get_item(0)?.extract()?;
    let sizes: Vec<usize> = seq.get_item(1)?.extract()?;
    Ok(DimensionSpec::new(names, sizes)?)
}

fn from_spec(spec: &DimensionSpec) -> PyDims {
    (spec.names().to_vec(), spec.sizes().to_vec())
}

/// Python wrapper for SparseLinearTransform
///
/// Example:
///     transform = SparseLinearTransform(
///         [1.0, 1.0], [1, 2], [2, 1],
///         input_transform_dims=(["x"], [2]),
///         output_transform_dims=[("x",), (2,)],
///         one_based_indices=True,
///         order="C",
///     )
#[pyclass(name = "SparseLinearTransform", frozen)]
#[derive(Debug, Clone)]
pub struct PySparseLinearTransform(pub SparseLinearTransform);

#[pymethods]
impl PySparseLinearTransform {
    #[new]
    #[pyo3(signature = (weights, row_index, col_index, input_transform_dims, output_transform_dims, one_based_indices=false, order="C"))]
    fn new(
        weights: Vec<f64>,
        row_index: Vec<i64>,
        col_index: Vec<i64>,
        input_transform_dims: &Bound<'_, PyAny>,
        output_transform_dims: &Bound<'_, PyAny>,
        one_based_indices: bool,
        order: &str,
    ) -> PyResult<Self> {
        let order: MemoryOrder = order.parse()?;
        let transform = SparseLinearTransform::new(
            weights,
            row_index,
            col_index,
            to_spec(input_transform_dims)?,
            to_spec(output_transform_dims)?,
            one_based_indices,
            order,
        )?;
        Ok(Self(transform))
    }

    /// Apply the transform to an array whose trailing axes match the input dimensions
    fn apply<'py>(
        &self,
        py: Python<'py>,
        data: PyReadonlyArrayDyn<'py, f64>,
    ) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
        let view = data.as_array();
        let input = ArrayD::from_shape_vec(IxDyn(view.shape()), view.iter().copied().collect())
            .map_err(|e| PyValueError::new_err(e.to_string()))?;

        let result = self.0.apply(&input)?;
        let shape = result.shape().to_vec();
        let values: Vec<f64> = result.iter().copied().collect();
        PyArray1::from_vec(py, values).reshape(shape.as_slice())
    }

    /// Number of stored nonzero entries
    #[getter]
    fn nnz(&self) -> usize {
        self.0.nnz()
    }

    /// Matrix shape as (output cells, input cells)
    #[getter]
    fn shape(&self) -> (usize, usize) {
        self.0.shape()
    }

    /// Flattening order, "C" or "F"
    #[getter]
    fn order(&self) -> &'static str {
        self.0.order().code()
    }

    #[getter]
    fn input_transform_dims(&self) -> PyDims {
        from_spec(self.0.input_dims())
    }

    #[getter]
    fn output_transform_dims(&self) -> PyDims {
        from_spec(self.0.output_dims())
    }

    fn __repr__(&self) -> String {
        format!(
            "SparseLinearTransform(nnz={}, input={}, output={}, order={})",
            self.0.nnz(),
            self.0.input_dims(),
            self.0.output_dims(),
            self.0.order()
        )
    }
}

/// Load an ESMF weight file into a SparseLinearTransform
///
/// Dimensions are `(names, sizes)` pairs given as a tuple or a list.
#[pyfunction]
pub fn load_weights(
    filename: PathBuf,
    input_dims: &Bound<'_, PyAny>,
    output_dims: &Bound<'_, PyAny>,
) -> PyResult<PySparseLinearTransform> {
    let transform = esmf::load_weights(filename, to_spec(input_dims)?, to_spec(output_dims)?)?;
    Ok(PySparseLinearTransform(transform))
}
