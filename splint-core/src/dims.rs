//! Labelled dimension layouts for gridded data
//!
//! A regridding transform maps between two grids, each described by a
//! [`DimensionSpec`]: an ordered list of dimension names with their sizes.
//! The product of the sizes is the number of grid cells, which must match the
//! number of columns (source grid) or rows (destination grid) of the weight
//! matrix.
//!
//! How an N-dimensional grid position maps to a flat cell index is controlled
//! by [`MemoryOrder`].
//!
//! # Examples
//!
//! ```rust
//! use splint_core::dims::{DimensionSpec, MemoryOrder};
//!
//! // 6-panel cubed sphere with 24x24 cells per face
//! let cubed_sphere = DimensionSpec::new(["nf", "Ydim", "Xdim"], [6, 24, 24]).unwrap();
//! assert_eq!(cubed_sphere.ndim(), 3);
//! assert_eq!(cubed_sphere.size(), 3456);
//!
//! let order: MemoryOrder = "F".parse().unwrap();
//! assert_eq!(order, MemoryOrder::ColumnMajor);
//! ```

use crate::errors::{SplintError, SplintResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Ordered dimension names and sizes describing one side of a transform
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DimensionTable", into = "DimensionTable")]
pub struct DimensionSpec {
    names: Vec<String>,
    sizes: Vec<usize>,
}

impl DimensionSpec {
    /// Create a dimension spec from parallel name and size sequences
    ///
    /// # Errors
    ///
    /// Returns [`SplintError::InvalidDimensions`] if there are no dimensions,
    /// the two sequences differ in length, a name is repeated or the cell
    /// count does not fit in `usize`.
    pub fn new<N, S>(names: N, sizes: S) -> SplintResult<Self>
    where
        N: IntoIterator,
        N::Item: Into<String>,
        S: IntoIterator<Item = usize>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let sizes: Vec<usize> = sizes.into_iter().collect();

        if names.is_empty() {
            return Err(SplintError::InvalidDimensions(
                "at least one dimension is required".to_string(),
            ));
        }
        if names.len() != sizes.len() {
            return Err(SplintError::InvalidDimensions(format!(
                "{} dimension names {:?} but {} sizes {:?}",
                names.len(),
                names,
                sizes.len(),
                sizes
            )));
        }

        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(SplintError::InvalidDimensions(format!(
                    "dimension name '{}' is repeated in {:?}",
                    name, names
                )));
            }
        }

        if sizes
            .iter()
            .try_fold(1usize, |total, &size| total.checked_mul(size))
            .is_none()
        {
            return Err(SplintError::InvalidDimensions(format!(
                "total number of cells for sizes {:?} overflows",
                sizes
            )));
        }

        Ok(Self { names, sizes })
    }

    /// Dimension names, outermost first
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Dimension sizes, in the same order as [`names`](Self::names)
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.sizes.len()
    }

    /// Total number of grid cells (product of all sizes)
    pub fn size(&self) -> usize {
        self.sizes.iter().product()
    }
}

impl fmt::Display for DimensionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .names
            .iter()
            .zip(self.sizes.iter())
            .map(|(name, size)| format!("{name}: {size}"))
            .collect();
        write!(f, "({})", parts.join(", "))
    }
}

/// Serialized form of [`DimensionSpec`], validated on the way in
#[derive(Clone, Debug, Serialize, Deserialize)]
struct DimensionTable {
    names: Vec<String>,
    sizes: Vec<usize>,
}

impl TryFrom<DimensionTable> for DimensionSpec {
    type Error = SplintError;

    fn try_from(table: DimensionTable) -> SplintResult<Self> {
        DimensionSpec::new(table.names, table.sizes)
    }
}

impl From<DimensionSpec> for DimensionTable {
    fn from(spec: DimensionSpec) -> Self {
        DimensionTable {
            names: spec.names,
            sizes: spec.sizes,
        }
    }
}

/// Layout used to flatten a grid into a vector of cells
///
/// With [`RowMajor`](MemoryOrder::RowMajor) ("C") the last dimension varies
/// fastest; with [`ColumnMajor`](MemoryOrder::ColumnMajor) ("F") the first
/// dimension varies fastest.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MemoryOrder {
    /// C order: last index varies fastest
    #[default]
    RowMajor,
    /// Fortran order: first index varies fastest
    ColumnMajor,
}

impl MemoryOrder {
    /// Short numpy-style code for this order ("C" or "F")
    pub fn code(&self) -> &'static str {
        match self {
            MemoryOrder::RowMajor => "C",
            MemoryOrder::ColumnMajor => "F",
        }
    }
}

impl FromStr for MemoryOrder {
    type Err = SplintError;

    fn from_str(s: &str) -> SplintResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "c" | "row-major" | "row_major" => Ok(MemoryOrder::RowMajor),
            "f" | "column-major" | "column_major" => Ok(MemoryOrder::ColumnMajor),
            _ => Err(SplintError::Config(format!(
                "unknown memory order '{}', expected \"C\" or \"F\"",
                s
            ))),
        }
    }
}

impl TryFrom<String> for MemoryOrder {
    type Error = SplintError;

    fn try_from(value: String) -> SplintResult<Self> {
        value.parse()
    }
}

impl From<MemoryOrder> for String {
    fn from(order: MemoryOrder) -> String {
        order.code().to_string()
    }
}

impl fmt::Display for MemoryOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
