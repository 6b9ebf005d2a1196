//! In-memory grid source.

use super::GridReader;
use crate::error::{PrepError, Result};
use crate::grid::Grid;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A [`GridReader`] over records held in memory, keyed by file path.
///
/// Useful for synthetic inputs and tests: each inserted variable is a list of
/// records, mirroring the `[Time, ...]` layout of a NetCDF file.
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    files: HashMap<PathBuf, HashMap<String, Vec<Grid>>>,
}

impl MemoryReader {
    /// Create an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the records of `variable` in the file at `path`.
    pub fn insert(&mut self, path: impl Into<PathBuf>, variable: impl Into<String>, records: Vec<Grid>) {
        self.files
            .entry(path.into())
            .or_default()
            .insert(variable.into(), records);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, path: impl Into<PathBuf>, variable: impl Into<String>, records: Vec<Grid>) -> Self {
        self.insert(path, variable, records);
        self
    }

    fn records(&self, path: &Path, variable: &str) -> Result<&Vec<Grid>> {
        self.files
            .get(path)
            .ok_or_else(|| PrepError::file_open(path, "no such file"))?
            .get(variable)
            .ok_or_else(|| PrepError::missing_variable(variable, path))
    }
}

impl GridReader for MemoryReader {
    type Handle = PathBuf;

    fn open(&self, path: &Path) -> Result<PathBuf> {
        if self.files.contains_key(path) {
            Ok(path.to_path_buf())
        } else {
            Err(PrepError::file_open(path, "no such file"))
        }
    }

    fn read(&self, handle: &mut PathBuf, variable: &str, record: usize) -> Result<Grid> {
        let records = self.records(handle, variable)?;
        records
            .get(record)
            .cloned()
            .ok_or_else(|| PrepError::RecordOutOfRange {
                variable: variable.to_string(),
                path: handle.clone(),
                record,
                available: records.len(),
            })
    }

    fn dimension_length(&self, path: &Path, variable: &str, index: usize) -> Result<usize> {
        let records = self.records(path, variable)?;
        if index == 0 {
            return Ok(records.len());
        }
        let shape = records.first().map(|g| g.shape().to_vec()).unwrap_or_default();
        shape.get(index - 1).copied().ok_or_else(|| {
            PrepError::NetCdf(format!(
                "'{}' has {} dimensions, no dimension {}",
                variable,
                shape.len() + 1,
                index
            ))
        })
    }
}
