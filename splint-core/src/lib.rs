pub mod config;
pub mod dataset;
pub mod dims;
pub mod errors;
pub mod esmf;
pub mod labeled;
pub mod linear_transform;
#[cfg(feature = "python")]
pub mod python;
pub mod weights;

// Re-export the main entry points for convenience
pub use dims::{DimensionSpec, MemoryOrder};
pub use errors::{SplintError, SplintResult};
pub use esmf::load_weights;
pub use linear_transform::SparseLinearTransform;
