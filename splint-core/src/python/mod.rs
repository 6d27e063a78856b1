//! Python bindings for loading weights and applying transforms
//!
//! Example:
//!     transform = load_weights(
//!         "my_esmf_regrid_weights.nc",
//!         input_dims=(["lat", "lon"], [181, 360]),
//!         output_dims=(["nf", "Ydim", "Xdim"], [6, 24, 24]),
//!     )
//!     regridded = transform.apply(data)

mod transform;

pub use transform::PySparseLinearTransform;

use crate::errors::SplintError;
use pyo3::exceptions::{PyOSError, PyValueError};
use pyo3::prelude::*;

impl From<SplintError> for PyErr {
    fn from(err: SplintError) -> PyErr {
        match err {
            SplintError::FileAccess { .. } => PyOSError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

#[pymodule]
pub fn core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySparseLinearTransform>()?;
    m.add_function(wrap_pyfunction!(transform::load_weights, m)?)?;
    Ok(())
}
