//! Data reading.
//!
//! This module defines the [`GridReader`] boundary that the streaming layer
//! pulls through, with a NetCDF implementation for WRF-CMAQ output and an
//! in-memory implementation for tests and synthetic inputs.

mod memory;
mod netcdf_reader;
mod template;

pub use memory::MemoryReader;
pub use netcdf_reader::{NetcdfFile, NetcdfReader};
pub use template::{PathTemplate, DATE_PLACEHOLDER, FILE_DATE_FORMAT};

use crate::error::Result;
use crate::grid::Grid;
use std::path::Path;

/// Access to one dated file at a time.
///
/// Implementations treat the first dimension of every stored variable as the
/// record (time) axis and return grids with that axis removed.
pub trait GridReader {
    /// An open file.
    type Handle;

    /// Open the file at `path`, failing with
    /// [`PrepError::FileOpen`](crate::PrepError::FileOpen) when it is missing or unreadable.
    fn open(&self, path: &Path) -> Result<Self::Handle>;

    /// Read record `record` of `variable` from an open file.
    fn read(&self, handle: &mut Self::Handle, variable: &str, record: usize) -> Result<Grid>;

    /// Length of dimension `index` of `variable` in the file at `path`.
    fn dimension_length(&self, path: &Path, variable: &str, index: usize) -> Result<usize>;
}
