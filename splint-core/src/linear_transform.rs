//! Sparse linear transforms between gridded layouts
//!
//! A [`SparseLinearTransform`] wraps a sparse matrix of shape
//! `(output_dims.size(), input_dims.size())` and applies it to N-dimensional
//! data. The trailing axes of the data are the source grid: they are
//! flattened into a vector (in the configured [`MemoryOrder`]), multiplied by
//! the matrix and reshaped into the destination grid. Any leading axes (time,
//! level, ensemble member, ...) are treated as independent batch elements.
//!
//! # Examples
//!
//! ```rust
//! use ndarray::{ArrayD, IxDyn};
//! use splint_core::dims::{DimensionSpec, MemoryOrder};
//! use splint_core::linear_transform::SparseLinearTransform;
//!
//! // Average pairs of cells on a 1x4 grid onto a 1x2 grid
//! let transform = SparseLinearTransform::new(
//!     vec![0.5, 0.5, 0.5, 0.5],
//!     vec![0, 0, 1, 1],
//!     vec![0, 1, 2, 3],
//!     DimensionSpec::new(["y", "x"], [1, 4]).unwrap(),
//!     DimensionSpec::new(["y", "x"], [1, 2]).unwrap(),
//!     false,
//!     MemoryOrder::RowMajor,
//! )
//! .unwrap();
//!
//! let data = ArrayD::from_shape_vec(IxDyn(&[1, 4]), vec![1.0, 3.0, 5.0, 7.0]).unwrap();
//! let regridded = transform.apply(&data).unwrap();
//! assert_eq!(regridded.shape(), &[1, 2]);
//! assert_eq!(regridded.iter().copied().collect::<Vec<_>>(), vec![2.0, 6.0]);
//! ```

use crate::dims::{DimensionSpec, MemoryOrder};
use crate::errors::{SplintError, SplintResult};
use crate::labeled::LabeledArray;
use crate::weights::WeightTriple;
use log::debug;
use ndarray::{Array2, ArrayD, IxDyn, ShapeBuilder};
use sprs::{CsMat, TriMat};

/// Immutable sparse operator mapping an input grid onto an output grid
#[derive(Debug, Clone)]
pub struct SparseLinearTransform {
    /// Zero-based COO entries, exactly as supplied
    triple: WeightTriple,
    input_dims: DimensionSpec,
    output_dims: DimensionSpec,
    order: MemoryOrder,
    /// Compressed copy of `triple` used for products
    matrix: CsMat<f64>,
}

impl SparseLinearTransform {
    /// Create a transform from coordinate-form matrix entries
    ///
    /// # Arguments
    ///
    /// * `weights`, `row_index`, `col_index` - Parallel COO sequences
    /// * `input_dims` - Source grid; its size is the matrix column count
    /// * `output_dims` - Destination grid; its size is the matrix row count
    /// * `one_based_indices` - Subtract one from every supplied index
    /// * `order` - How grid positions map to flat cell indices
    ///
    /// # Errors
    ///
    /// * [`SplintError::Schema`] if the three sequences differ in length
    /// * [`SplintError::ShapeMismatch`] if any index falls outside the matrix
    ///   implied by the dimension specs
    pub fn new(
        weights: Vec<f64>,
        row_index: Vec<i64>,
        col_index: Vec<i64>,
        input_dims: DimensionSpec,
        output_dims: DimensionSpec,
        one_based_indices: bool,
        order: MemoryOrder,
    ) -> SplintResult<Self> {
        let triple = WeightTriple::new(weights, row_index, col_index)?;
        Self::from_triple(triple, input_dims, output_dims, one_based_indices, order)
    }

    /// Create a transform from an already assembled [`WeightTriple`]
    pub fn from_triple(
        triple: WeightTriple,
        input_dims: DimensionSpec,
        output_dims: DimensionSpec,
        one_based_indices: bool,
        order: MemoryOrder,
    ) -> SplintResult<Self> {
        let triple = if one_based_indices {
            triple.into_zero_based()?
        } else {
            triple
        };

        let n_rows = output_dims.size();
        let n_cols = input_dims.size();
        let offset = i64::from(one_based_indices);

        for (entry, (row, col, _)) in triple.iter().enumerate() {
            if row < 0 || row as usize >= n_rows {
                return Err(SplintError::ShapeMismatch(format!(
                    "row index {} of entry {} is outside the {} cells of output dimensions {}",
                    row + offset,
                    entry,
                    n_rows,
                    output_dims
                )));
            }
            if col < 0 || col as usize >= n_cols {
                return Err(SplintError::ShapeMismatch(format!(
                    "column index {} of entry {} is outside the {} cells of input dimensions {}",
                    col + offset,
                    entry,
                    n_cols,
                    input_dims
                )));
            }
        }

        let rows: Vec<usize> = triple.row_index.iter().map(|&r| r as usize).collect();
        let cols: Vec<usize> = triple.col_index.iter().map(|&c| c as usize).collect();
        let matrix: CsMat<f64> =
            TriMat::from_triplets((n_rows, n_cols), rows, cols, triple.weights.clone()).to_csr();

        debug!(
            "Built {}x{} sparse transform with {} entries ({} -> {}, order {})",
            n_rows,
            n_cols,
            triple.len(),
            input_dims,
            output_dims,
            order
        );

        Ok(Self {
            triple,
            input_dims,
            output_dims,
            order,
            matrix,
        })
    }

    /// Number of stored coordinate entries
    pub fn nnz(&self) -> usize {
        self.triple.len()
    }

    /// Matrix shape as `(rows, cols)`, i.e. `(output cells, input cells)`
    pub fn shape(&self) -> (usize, usize) {
        (self.output_dims.size(), self.input_dims.size())
    }

    pub fn weights(&self) -> &[f64] {
        &self.triple.weights
    }

    /// Zero-based row indices
    pub fn row_index(&self) -> &[i64] {
        &self.triple.row_index
    }

    /// Zero-based column indices
    pub fn col_index(&self) -> &[i64] {
        &self.triple.col_index
    }

    pub fn triple(&self) -> &WeightTriple {
        &self.triple
    }

    pub fn input_dims(&self) -> &DimensionSpec {
        &self.input_dims
    }

    pub fn output_dims(&self) -> &DimensionSpec {
        &self.output_dims
    }

    pub fn order(&self) -> MemoryOrder {
        self.order
    }

    /// Dense copy of the matrix, with duplicate entries summed
    pub fn to_dense(&self) -> Array2<f64> {
        self.matrix.to_dense()
    }

    /// Apply the transform to gridded data
    ///
    /// The trailing axes of `data` must match the input dimension sizes.
    /// The result has the leading (batch) axes of `data` followed by the
    /// output dimension sizes.
    ///
    /// # Errors
    ///
    /// [`SplintError::ShapeMismatch`] if the trailing axes of `data` do not
    /// match the input dimensions.
    pub fn apply(&self, data: &ArrayD<f64>) -> SplintResult<ArrayD<f64>> {
        let shape = data.shape();
        let grid_ndim = self.input_dims.ndim();

        if shape.len() < grid_ndim || &shape[shape.len() - grid_ndim..] != self.input_dims.sizes()
        {
            return Err(SplintError::ShapeMismatch(format!(
                "data with shape {:?} does not end with input dimensions {}",
                shape, self.input_dims
            )));
        }

        let leading = &shape[..shape.len() - grid_ndim];
        let n_batch: usize = leading.iter().product();

        let mut batch_shape = vec![n_batch];
        batch_shape.extend_from_slice(self.input_dims.sizes());
        let mut out_batch_shape = vec![n_batch];
        out_batch_shape.extend_from_slice(self.output_dims.sizes());

        let standard = data.as_standard_layout();
        let batched = standard
            .view()
            .into_shape_with_order(IxDyn(&batch_shape))
            .map_err(|e| SplintError::ShapeMismatch(e.to_string()))?;

        // One flattened grid per row, then a single sparse-dense product
        let n_cols = self.input_dims.size();
        let mut flat = Vec::with_capacity(n_batch * n_cols);
        for cells in batched.outer_iter() {
            match self.order {
                MemoryOrder::RowMajor => flat.extend(cells.iter().copied()),
                // Reversing the axes turns logical iteration into Fortran order
                MemoryOrder::ColumnMajor => flat.extend(cells.t().iter().copied()),
            }
        }
        let columns = Array2::from_shape_vec((n_batch, n_cols), flat)
            .map_err(|e| SplintError::ShapeMismatch(e.to_string()))?;
        let product = &self.matrix * &columns.t();

        let mut output = ArrayD::<f64>::zeros(IxDyn(&out_batch_shape));
        for (values, mut out_cells) in product.columns().into_iter().zip(output.outer_iter_mut()) {
            let values: Vec<f64> = values.iter().copied().collect();
            let out_sizes = IxDyn(self.output_dims.sizes());
            let grid = match self.order {
                MemoryOrder::RowMajor => ArrayD::from_shape_vec(out_sizes, values),
                MemoryOrder::ColumnMajor => ArrayD::from_shape_vec(out_sizes.f(), values),
            }
            .map_err(|e| SplintError::ShapeMismatch(e.to_string()))?;
            out_cells.assign(&grid);
        }

        let mut out_shape = leading.to_vec();
        out_shape.extend_from_slice(self.output_dims.sizes());
        output
            .into_shape_with_order(IxDyn(&out_shape))
            .map_err(|e| SplintError::ShapeMismatch(e.to_string()))
    }

    /// Apply the transform to labelled data
    ///
    /// In addition to the shape checks of [`apply`](Self::apply), the names
    /// of the trailing axes must equal the input dimension names. The result
    /// keeps the leading names and uses the output dimension names.
    pub fn apply_labeled(&self, data: &LabeledArray) -> SplintResult<LabeledArray> {
        let dims = data.dims();
        let grid_ndim = self.input_dims.ndim();

        if dims.len() < grid_ndim || &dims[dims.len() - grid_ndim..] != self.input_dims.names() {
            return Err(SplintError::ShapeMismatch(format!(
                "data with dimensions {:?} does not end with input dimensions {:?}",
                dims,
                self.input_dims.names()
            )));
        }

        let values = self.apply(data.data())?;

        let mut out_dims: Vec<String> = dims[..dims.len() - grid_ndim].to_vec();
        out_dims.extend(self.output_dims.names().iter().cloned());
        LabeledArray::new(out_dims, values)
    }
}
