use super::Dataset;
use crate::errors::{SplintError, SplintResult};
use npyz::npz::NpzArchive;
use npyz::{DType, NpyFile, TypeChar, TypeStr};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Variables stored as arrays inside a numpy `.npz` archive
///
/// Floating point variables may be stored as `f4` or `f8`; integer variables
/// as `i2`, `i4`, `i8`, `u4` or `u8`. Every array must be one-dimensional.
pub struct NpzDataset {
    path: PathBuf,
    archive: NpzArchive<BufReader<File>>,
}

impl NpzDataset {
    pub fn open(path: &Path) -> SplintResult<Self> {
        let archive = NpzArchive::open(path).map_err(|e| SplintError::file_access(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }
}

fn plain_type<R: Read>(name: &str, npy: &NpyFile<R>) -> SplintResult<TypeStr> {
    if npy.shape().len() != 1 {
        return Err(SplintError::Schema(format!(
            "variable '{}' has shape {:?}, expected a one-dimensional array",
            name,
            npy.shape()
        )));
    }
    match npy.dtype() {
        DType::Plain(type_str) => Ok(type_str),
        other => Err(SplintError::Schema(format!(
            "variable '{}' has unsupported structured dtype {}",
            name,
            other.descr()
        ))),
    }
}

fn unsupported(name: &str, type_str: &TypeStr, expected: &str) -> SplintError {
    SplintError::Schema(format!(
        "variable '{}' has dtype {}, expected {}",
        name, type_str, expected
    ))
}

impl Dataset for NpzDataset {
    fn variable_f64(&mut self, name: &str) -> SplintResult<Option<Vec<f64>>> {
        let path = &self.path;
        let Some(npy) = self
            .archive
            .by_name(name)
            .map_err(|e| SplintError::file_access(path, e))?
        else {
            return Ok(None);
        };

        let type_str = plain_type(name, &npy)?;
        let values = match (type_str.type_char(), type_str.size_field()) {
            (TypeChar::Float, 8) => npy.into_vec::<f64>(),
            (TypeChar::Float, 4) => npy
                .into_vec::<f32>()
                .map(|v| v.into_iter().map(f64::from).collect()),
            _ => return Err(unsupported(name, &type_str, "f4 or f8")),
        }
        .map_err(|e| SplintError::file_access(path, e))?;

        Ok(Some(values))
    }

    fn variable_i64(&mut self, name: &str) -> SplintResult<Option<Vec<i64>>> {
        let path = &self.path;
        let Some(npy) = self
            .archive
            .by_name(name)
            .map_err(|e| SplintError::file_access(path, e))?
        else {
            return Ok(None);
        };

        let type_str = plain_type(name, &npy)?;
        let values: Vec<i64> = match (type_str.type_char(), type_str.size_field()) {
            (TypeChar::Int, 8) => npy.into_vec::<i64>(),
            (TypeChar::Int, 4) => npy
                .into_vec::<i32>()
                .map(|v| v.into_iter().map(i64::from).collect()),
            (TypeChar::Int, 2) => npy
                .into_vec::<i16>()
                .map(|v| v.into_iter().map(i64::from).collect()),
            (TypeChar::Uint, 4) => npy
                .into_vec::<u32>()
                .map(|v| v.into_iter().map(i64::from).collect()),
            (TypeChar::Uint, 8) => {
                let raw = npy
                    .into_vec::<u64>()
                    .map_err(|e| SplintError::file_access(path, e))?;
                return raw
                    .into_iter()
                    .map(|v| {
                        i64::try_from(v).map_err(|_| {
                            SplintError::Schema(format!(
                                "variable '{}' holds index {} which does not fit in i64",
                                name, v
                            ))
                        })
                    })
                    .collect::<SplintResult<Vec<_>>>()
                    .map(Some);
            }
            _ => return Err(unsupported(name, &type_str, "an integer dtype")),
        }
        .map_err(|e| SplintError::file_access(path, e))?;

        Ok(Some(values))
    }
}
