//! Loading ESMF regridding weight files
//!
//! `ESMF_RegridWeightGen` writes the regridding matrix in coordinate form as
//! three variables:
//!
//! | Variable | Type    | Meaning                                   |
//! |----------|---------|-------------------------------------------|
//! | `S`      | float   | Weight of each nonzero entry              |
//! | `row`    | integer | 1-based destination cell of each entry    |
//! | `col`    | integer | 1-based source cell of each entry         |
//!
//! Files also record the source and destination cell counts as the
//! dimensions `n_a` and `n_b`. When the dataset exposes them they are checked
//! against the supplied dimension specs.
//!
//! # Examples
//!
//! ```rust,no_run
//! use splint_core::dims::DimensionSpec;
//! use splint_core::esmf::load_weights;
//!
//! let transform = load_weights(
//!     "my_esmf_regrid_weights.nc",
//!     DimensionSpec::new(["lat", "lon"], [181, 360]).unwrap(),
//!     DimensionSpec::new(["nf", "Ydim", "Xdim"], [6, 24, 24]).unwrap(),
//! )
//! .unwrap();
//! assert_eq!(transform.shape(), (6 * 24 * 24, 181 * 360));
//! ```

use crate::dataset::{Dataset, DatasetOpener, FileDatasetOpener};
use crate::dims::{DimensionSpec, MemoryOrder};
use crate::errors::{SplintError, SplintResult};
use crate::linear_transform::SparseLinearTransform;
use crate::weights::WeightTriple;
use log::{debug, info};
use std::path::Path;

/// Name of the weight variable
pub const WEIGHTS_VAR: &str = "S";
/// Name of the 1-based destination index variable
pub const ROW_VAR: &str = "row";
/// Name of the 1-based source index variable
pub const COL_VAR: &str = "col";
/// Dimension holding the number of source cells
pub const SOURCE_CELLS_DIM: &str = "n_a";
/// Dimension holding the number of destination cells
pub const DESTINATION_CELLS_DIM: &str = "n_b";

/// Load an ESMF weight file into a [`SparseLinearTransform`]
///
/// The file format is chosen from the extension by [`FileDatasetOpener`].
///
/// # Errors
///
/// * [`SplintError::FileAccess`] if the file cannot be opened or read
/// * [`SplintError::Schema`] if `S`, `row` or `col` is missing or malformed
/// * [`SplintError::ShapeMismatch`] if the indices do not fit the dimensions
pub fn load_weights(
    path: impl AsRef<Path>,
    input_dims: DimensionSpec,
    output_dims: DimensionSpec,
) -> SplintResult<SparseLinearTransform> {
    load_weights_with(&FileDatasetOpener, path, input_dims, output_dims)
}

/// Load an ESMF weight file using a custom [`DatasetOpener`]
pub fn load_weights_with(
    opener: &dyn DatasetOpener,
    path: impl AsRef<Path>,
    input_dims: DimensionSpec,
    output_dims: DimensionSpec,
) -> SplintResult<SparseLinearTransform> {
    load_transform(
        opener,
        path.as_ref(),
        input_dims,
        output_dims,
        true,
        MemoryOrder::RowMajor,
    )
}

/// Open a weight dataset, check its cell counts and build the transform
pub(crate) fn load_transform(
    opener: &dyn DatasetOpener,
    path: &Path,
    input_dims: DimensionSpec,
    output_dims: DimensionSpec,
    one_based_indices: bool,
    order: MemoryOrder,
) -> SplintResult<SparseLinearTransform> {
    let mut dataset = opener.open(path)?;

    check_cell_count(dataset.as_ref(), SOURCE_CELLS_DIM, &input_dims)?;
    check_cell_count(dataset.as_ref(), DESTINATION_CELLS_DIM, &output_dims)?;

    let triple = read_weight_triple(dataset.as_mut())?;
    let transform = SparseLinearTransform::from_triple(
        triple,
        input_dims,
        output_dims,
        one_based_indices,
        order,
    )?;

    info!(
        "Loaded {} regridding weights from {} ({} -> {})",
        transform.nnz(),
        path.display(),
        transform.input_dims(),
        transform.output_dims()
    );
    Ok(transform)
}

/// Read the `S`, `row` and `col` variables exactly as stored (1-based)
pub fn read_weight_triple(dataset: &mut dyn Dataset) -> SplintResult<WeightTriple> {
    let weights = require(dataset.variable_f64(WEIGHTS_VAR)?, WEIGHTS_VAR)?;
    let row_index = require(dataset.variable_i64(ROW_VAR)?, ROW_VAR)?;
    let col_index = require(dataset.variable_i64(COL_VAR)?, COL_VAR)?;
    debug!(
        "Read {} weights, {} row indices and {} column indices",
        weights.len(),
        row_index.len(),
        col_index.len()
    );
    WeightTriple::new(weights, row_index, col_index)
}

fn require<T>(values: Option<T>, name: &str) -> SplintResult<T> {
    values.ok_or_else(|| {
        SplintError::Schema(format!("required variable '{}' is missing", name))
    })
}

fn check_cell_count(
    dataset: &dyn Dataset,
    dim_name: &str,
    spec: &DimensionSpec,
) -> SplintResult<()> {
    match dataset.dimension_len(dim_name) {
        Some(len) if len != spec.size() => Err(SplintError::ShapeMismatch(format!(
            "weight file has {} = {} cells but dimensions {} describe {} cells",
            dim_name,
            len,
            spec,
            spec.size()
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MemoryDataset;

    fn opener_for(
        dataset: MemoryDataset,
    ) -> impl Fn(&Path) -> SplintResult<Box<dyn Dataset>> {
        move |_: &Path| -> SplintResult<Box<dyn Dataset>> { Ok(Box::new(dataset.clone())) }
    }

    fn regular_weights() -> MemoryDataset {
        MemoryDataset::new()
            .with_float("S", vec![1.0, 0.5, 0.5, 1.0])
            .with_int("row", vec![1, 2, 2, 3])
            .with_int("col", vec![1, 2, 3, 4])
    }

    fn input() -> DimensionSpec {
        DimensionSpec::new(["lat", "lon"], [2, 2]).unwrap()
    }

    fn output() -> DimensionSpec {
        DimensionSpec::new(["x"], [3]).unwrap()
    }

    #[test]
    fn test_indices_reduced_by_one() {
        let transform =
            load_weights_with(&opener_for(regular_weights()), "w.nc", input(), output()).unwrap();

        assert_eq!(transform.nnz(), 4);
        assert_eq!(transform.row_index(), &[0, 1, 1, 2]);
        assert_eq!(transform.col_index(), &[0, 1, 2, 3]);
        assert_eq!(transform.weights(), &[1.0, 0.5, 0.5, 1.0]);
        assert_eq!(transform.order(), MemoryOrder::RowMajor);
    }

    #[test]
    fn test_missing_row_is_schema_error() {
        let dataset = MemoryDataset::new()
            .with_float("S", vec![1.0])
            .with_int("col", vec![1]);
        let result = load_weights_with(&opener_for(dataset), "w.nc", input(), output());
        match result {
            Err(SplintError::Schema(msg)) => assert!(msg.contains("'row'")),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_length_mismatch_is_schema_error() {
        let dataset = MemoryDataset::new()
            .with_float("S", vec![1.0, 1.0])
            .with_int("row", vec![1])
            .with_int("col", vec![1, 2]);
        let result = load_weights_with(&opener_for(dataset), "w.nc", input(), output());
        assert!(matches!(result, Err(SplintError::Schema(_))));
    }

    #[test]
    fn test_output_too_small_is_shape_mismatch() {
        let too_small = DimensionSpec::new(["x"], [2]).unwrap();
        let result = load_weights_with(&opener_for(regular_weights()), "w.nc", input(), too_small);
        assert!(matches!(result, Err(SplintError::ShapeMismatch(_))));
    }

    #[test]
    fn test_cell_count_dimensions_are_checked() {
        let dataset = regular_weights()
            .with_dimension("n_a", 4)
            .with_dimension("n_b", 5);
        let result = load_weights_with(&opener_for(dataset), "w.nc", input(), output());
        assert!(matches!(result, Err(SplintError::ShapeMismatch(_))));

        let dataset = regular_weights()
            .with_dimension("n_a", 4)
            .with_dimension("n_b", 3);
        assert!(load_weights_with(&opener_for(dataset), "w.nc", input(), output()).is_ok());
    }

    #[test]
    fn test_nonexistent_file_is_file_access_error() {
        let result = load_weights("/no/such/dir/weights.npz", input(), output());
        assert!(matches!(result, Err(SplintError::FileAccess { .. })));
    }
}
