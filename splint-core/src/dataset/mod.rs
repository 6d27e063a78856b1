//! Access to named one-dimensional arrays stored in self-describing files
//!
//! The weight loader never parses files itself. It asks a [`DatasetOpener`]
//! for a [`Dataset`] and reads variables by name, so alternative file formats
//! (or in-memory fixtures) can be substituted without touching the transform
//! logic.
//!
//! Two file backends are provided:
//!
//! - [`NpzDataset`]: numpy `.npz` archives (always available)
//! - `NetcdfDataset`: netCDF files, behind the `netcdf` feature
//!
//! [`FileDatasetOpener`] picks a backend from the file extension.

mod npz;
#[cfg(feature = "netcdf")]
mod nc;

#[cfg(feature = "netcdf")]
pub use nc::NetcdfDataset;
pub use npz::NpzDataset;

use crate::errors::{SplintError, SplintResult};
use log::debug;
use std::collections::HashMap;
use std::path::Path;

/// A collection of named one-dimensional variables
pub trait Dataset {
    /// Read a floating point variable
    ///
    /// Returns `Ok(None)` if the variable does not exist.
    fn variable_f64(&mut self, name: &str) -> SplintResult<Option<Vec<f64>>>;

    /// Read an integer variable
    ///
    /// Returns `Ok(None)` if the variable does not exist.
    fn variable_i64(&mut self, name: &str) -> SplintResult<Option<Vec<i64>>>;

    /// Length of a named dimension, for formats that record dimensions
    fn dimension_len(&self, _name: &str) -> Option<usize> {
        None
    }
}

/// Something that can open a [`Dataset`] from a path
pub trait DatasetOpener {
    fn open(&self, path: &Path) -> SplintResult<Box<dyn Dataset>>;
}

impl<F> DatasetOpener for F
where
    F: Fn(&Path) -> SplintResult<Box<dyn Dataset>>,
{
    fn open(&self, path: &Path) -> SplintResult<Box<dyn Dataset>> {
        self(path)
    }
}

/// Opens datasets from disk, choosing the backend by file extension
///
/// | Extension               | Backend                        |
/// |-------------------------|--------------------------------|
/// | `.npz`                  | [`NpzDataset`]                 |
/// | `.nc`, `.nc4`, `.netcdf`| `NetcdfDataset` (feature `netcdf`) |
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDatasetOpener;

impl DatasetOpener for FileDatasetOpener {
    fn open(&self, path: &Path) -> SplintResult<Box<dyn Dataset>> {
        if !path.is_file() {
            return Err(SplintError::file_access(path, "no such file"));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        debug!("Opening {} as a .{} dataset", path.display(), ext);

        match ext.as_str() {
            "npz" => Ok(Box::new(NpzDataset::open(path)?)),
            "nc" | "nc4" | "netcdf" => open_netcdf(path),
            other => Err(SplintError::file_access(
                path,
                format!("unsupported file extension '.{other}'"),
            )),
        }
    }
}

#[cfg(feature = "netcdf")]
fn open_netcdf(path: &Path) -> SplintResult<Box<dyn Dataset>> {
    Ok(Box::new(NetcdfDataset::open(path)?))
}

#[cfg(not(feature = "netcdf"))]
fn open_netcdf(path: &Path) -> SplintResult<Box<dyn Dataset>> {
    Err(SplintError::file_access(
        path,
        "netCDF support requires the `netcdf` feature",
    ))
}

#[derive(Debug, Clone, PartialEq)]
enum MemoryVariable {
    Float(Vec<f64>),
    Int(Vec<i64>),
}

/// A dataset held entirely in memory
///
/// # Examples
///
/// ```rust
/// use splint_core::dataset::{Dataset, MemoryDataset};
///
/// let mut ds = MemoryDataset::new()
///     .with_float("S", vec![1.0, 0.5])
///     .with_int("row", vec![1, 2])
///     .with_dimension("n_s", 2);
///
/// assert_eq!(ds.variable_i64("row").unwrap(), Some(vec![1, 2]));
/// assert_eq!(ds.variable_f64("col").unwrap(), None);
/// assert_eq!(ds.dimension_len("n_s"), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDataset {
    variables: HashMap<String, MemoryVariable>,
    dimensions: HashMap<String, usize>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_float(mut self, name: &str, values: Vec<f64>) -> Self {
        self.variables
            .insert(name.to_string(), MemoryVariable::Float(values));
        self
    }

    pub fn with_int(mut self, name: &str, values: Vec<i64>) -> Self {
        self.variables
            .insert(name.to_string(), MemoryVariable::Int(values));
        self
    }

    pub fn with_dimension(mut self, name: &str, len: usize) -> Self {
        self.dimensions.insert(name.to_string(), len);
        self
    }
}

impl Dataset for MemoryDataset {
    fn variable_f64(&mut self, name: &str) -> SplintResult<Option<Vec<f64>>> {
        Ok(self.variables.get(name).map(|var| match var {
            MemoryVariable::Float(values) => values.clone(),
            MemoryVariable::Int(values) => values.iter().map(|&v| v as f64).collect(),
        }))
    }

    fn variable_i64(&mut self, name: &str) -> SplintResult<Option<Vec<i64>>> {
        match self.variables.get(name) {
            None => Ok(None),
            Some(MemoryVariable::Int(values)) => Ok(Some(values.clone())),
            Some(MemoryVariable::Float(_)) => Err(SplintError::Schema(format!(
                "variable '{}' holds floating point values, expected integers",
                name
            ))),
        }
    }

    fn dimension_len(&self, name: &str) -> Option<usize> {
        self.dimensions.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_dataset_int_as_float() {
        let mut ds = MemoryDataset::new().with_int("row", vec![1, 2, 3]);
        assert_eq!(ds.variable_f64("row").unwrap(), Some(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_memory_dataset_float_as_int_is_schema_error() {
        let mut ds = MemoryDataset::new().with_float("row", vec![1.5]);
        assert!(matches!(
            ds.variable_i64("row"),
            Err(SplintError::Schema(_))
        ));
    }

    #[test]
    fn test_missing_file_is_file_access_error() {
        let result = FileDatasetOpener.open(Path::new("/definitely/not/here/weights.npz"));
        assert!(matches!(result, Err(SplintError::FileAccess { .. })));
    }

    #[test]
    fn test_unknown_extension_is_file_access_error() {
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let result = FileDatasetOpener.open(file.path());
        assert!(matches!(result, Err(SplintError::FileAccess { .. })));
    }

    #[test]
    fn test_closure_as_opener() {
        let opener = |_: &Path| -> SplintResult<Box<dyn Dataset>> {
            Ok(Box::new(MemoryDataset::new().with_int("row", vec![1])))
        };
        let mut ds = opener.open(Path::new("ignored")).unwrap();
        assert_eq!(ds.variable_i64("row").unwrap(), Some(vec![1]));
    }
}
