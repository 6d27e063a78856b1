//! TOML configuration describing a regridding transform
//!
//! ```toml
//! weights = "weights.npz"
//! order = "C"
//! one_based_indices = true
//!
//! [input]
//! names = ["lat", "lon"]
//! sizes = [181, 360]
//!
//! [output]
//! names = ["nf", "Ydim", "Xdim"]
//! sizes = [6, 24, 24]
//! ```
//!
//! Relative `weights` paths are resolved against the directory of the
//! configuration file when it is loaded with [`RegridConfig::from_file`].

use crate::dataset::{DatasetOpener, FileDatasetOpener};
use crate::dims::{DimensionSpec, MemoryOrder};
use crate::errors::{SplintError, SplintResult};
use crate::esmf::load_transform;
use crate::linear_transform::SparseLinearTransform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_one_based() -> bool {
    true
}

/// Everything needed to build a [`SparseLinearTransform`] from a weight file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegridConfig {
    /// Path to the weight file
    pub weights: PathBuf,
    /// Flattening order of grid cells
    #[serde(default)]
    pub order: MemoryOrder,
    /// Whether the indices stored in the file start at one
    #[serde(default = "default_one_based")]
    pub one_based_indices: bool,
    /// Source grid
    pub input: DimensionSpec,
    /// Destination grid
    pub output: DimensionSpec,
}

impl RegridConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> SplintResult<Self> {
        toml::from_str(text).map_err(|e| SplintError::Config(e.to_string()))
    }

    /// Read a configuration file
    ///
    /// A relative `weights` path is taken relative to the configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> SplintResult<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| SplintError::file_access(path, e))?;
        let mut config = Self::from_toml_str(&text)?;

        if config.weights.is_relative() {
            if let Some(parent) = path.parent() {
                config.weights = parent.join(&config.weights);
            }
        }
        Ok(config)
    }

    /// Serialize the configuration back to TOML
    pub fn to_toml_string(&self) -> SplintResult<String> {
        toml::to_string(self).map_err(|e| SplintError::Config(e.to_string()))
    }

    /// Load the weights and build the transform
    pub fn build(&self) -> SplintResult<SparseLinearTransform> {
        self.build_with(&FileDatasetOpener)
    }

    /// Load the weights through a custom [`DatasetOpener`] and build the transform
    pub fn build_with(&self, opener: &dyn DatasetOpener) -> SplintResult<SparseLinearTransform> {
        load_transform(
            opener,
            &self.weights,
            self.input.clone(),
            self.output.clone(),
            self.one_based_indices,
            self.order,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, MemoryDataset};

    const CONFIG: &str = r#"
weights = "weights.npz"
order = "F"

[input]
names = ["lat", "lon"]
sizes = [181, 360]

[output]
names = ["nf", "Ydim", "Xdim"]
sizes = [6, 24, 24]
"#;

    #[test]
    fn test_parse_config() {
        let config = RegridConfig::from_toml_str(CONFIG).unwrap();
        assert_eq!(config.weights, PathBuf::from("weights.npz"));
        assert_eq!(config.order, MemoryOrder::ColumnMajor);
        assert!(config.one_based_indices);
        assert_eq!(config.input.size(), 181 * 360);
        assert_eq!(config.output.names(), &["nf", "Ydim", "Xdim"]);
    }

    #[test]
    fn test_defaults() {
        let text = r#"
weights = "w.nc"
input = { names = ["x"], sizes = [4] }
output = { names = ["x"], sizes = [2] }
"#;
        let config = RegridConfig::from_toml_str(text).unwrap();
        assert_eq!(config.order, MemoryOrder::RowMajor);
        assert!(config.one_based_indices);
    }

    #[test]
    fn test_invalid_order_rejected() {
        let text = CONFIG.replace("order = \"F\"", "order = \"Z\"");
        assert!(matches!(
            RegridConfig::from_toml_str(&text),
            Err(SplintError::Config(_))
        ));
    }

    #[test]
    fn test_mismatched_dimensions_rejected() {
        let text = CONFIG.replace("sizes = [181, 360]", "sizes = [181]");
        assert!(matches!(
            RegridConfig::from_toml_str(&text),
            Err(SplintError::Config(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RegridConfig::from_toml_str(CONFIG).unwrap();
        let text = config.to_toml_string().unwrap();
        assert_eq!(RegridConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_relative_weights_resolved_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regrid.toml");
        std::fs::write(&path, CONFIG).unwrap();

        let config = RegridConfig::from_file(&path).unwrap();
        assert_eq!(config.weights, dir.path().join("weights.npz"));
    }

    fn weights_with_cell_counts(n_a: usize, n_b: usize) -> MemoryDataset {
        MemoryDataset::new()
            .with_float("S", vec![1.0, 1.0])
            .with_int("row", vec![1, 2])
            .with_int("col", vec![1, 4])
            .with_dimension("n_a", n_a)
            .with_dimension("n_b", n_b)
    }

    #[test]
    fn test_build_checks_cell_counts() {
        let text = r#"
weights = "w.nc"
order = "F"
input = { names = ["y", "x"], sizes = [2, 2] }
output = { names = ["x"], sizes = [2] }
"#;
        let config = RegridConfig::from_toml_str(text).unwrap();

        let wrong = weights_with_cell_counts(5, 2);
        let opener = move |_: &Path| -> SplintResult<Box<dyn Dataset>> {
            Ok(Box::new(wrong.clone()))
        };
        assert!(matches!(
            config.build_with(&opener),
            Err(SplintError::ShapeMismatch(_))
        ));

        let right = weights_with_cell_counts(4, 2);
        let opener = move |_: &Path| -> SplintResult<Box<dyn Dataset>> {
            Ok(Box::new(right.clone()))
        };
        let transform = config.build_with(&opener).unwrap();
        assert_eq!(transform.order(), MemoryOrder::ColumnMajor);
        assert_eq!(transform.row_index(), &[0, 1]);
        assert_eq!(transform.col_index(), &[0, 3]);
    }

    #[test]
    fn test_missing_config_file() {
        assert!(matches!(
            RegridConfig::from_file("/no/such/regrid.toml"),
            Err(SplintError::FileAccess { .. })
        ));
    }
}
