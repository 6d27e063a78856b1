use super::Dataset;
use crate::errors::{SplintError, SplintResult};
use netcdf::types::NcVariableType;
use std::path::{Path, PathBuf};

/// Variables and dimensions of a netCDF file
///
/// Values are converted to the requested numeric type by the netCDF library,
/// so `S` may be stored as any numeric type and `row`/`col` as any integer
/// type. Floating point indices are rejected rather than truncated.
pub struct NetcdfDataset {
    path: PathBuf,
    file: netcdf::File,
}

impl NetcdfDataset {
    pub fn open(path: &Path) -> SplintResult<Self> {
        let file = netcdf::open(path).map_err(|e| SplintError::file_access(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    fn variable<'f>(&'f self, name: &str) -> SplintResult<Option<netcdf::Variable<'f>>> {
        let Some(var) = self.file.variable(name) else {
            return Ok(None);
        };
        if var.dimensions().len() != 1 {
            return Err(SplintError::Schema(format!(
                "variable '{}' has {} dimensions, expected a one-dimensional array",
                name,
                var.dimensions().len()
            )));
        }
        Ok(Some(var))
    }
}

impl Dataset for NetcdfDataset {
    fn variable_f64(&mut self, name: &str) -> SplintResult<Option<Vec<f64>>> {
        let Some(var) = self.variable(name)? else {
            return Ok(None);
        };
        var.get_values::<f64, _>(..)
            .map(Some)
            .map_err(|e| SplintError::file_access(&self.path, e))
    }

    fn variable_i64(&mut self, name: &str) -> SplintResult<Option<Vec<i64>>> {
        let Some(var) = self.variable(name)? else {
            return Ok(None);
        };
        if !matches!(var.vartype(), NcVariableType::Int(_)) {
            return Err(SplintError::Schema(format!(
                "variable '{}' has type {:?}, expected an integer type",
                name,
                var.vartype()
            )));
        }
        var.get_values::<i64, _>(..)
            .map(Some)
            .map_err(|e| SplintError::file_access(&self.path, e))
    }

    fn dimension_len(&self, name: &str) -> Option<usize> {
        self.file.dimension_len(name)
    }
}
