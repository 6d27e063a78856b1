//! Apply precomputed regridding weights as sparse linear transforms
//!
//! This crate re-exports [`splint_core`] and, with the `python` feature,
//! builds the `splint._lib` Python extension module.

pub use splint_core::{
    config, dataset, dims, errors, esmf, labeled, linear_transform, weights, DimensionSpec,
    MemoryOrder, SparseLinearTransform, SplintError, SplintResult,
};
pub use splint_core::load_weights;

#[cfg(feature = "python")]
mod python;
