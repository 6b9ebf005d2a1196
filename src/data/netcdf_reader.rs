//! NetCDF reader for WRF-CMAQ output files.

use super::GridReader;
use crate::error::{PrepError, Result};
use crate::grid::Grid;
use ndarray::{ArrayD, IxDyn};
use netcdf::types::{FloatType, IntType, NcVariableType};
use netcdf::AttributeValue;
use std::path::{Path, PathBuf};

/// Reads WRF-CMAQ variables from NetCDF files.
///
/// Every variable is expected to be laid out `[Time, ...]` with at most four
/// dimensions after `Time`. Each read fetches exactly one record from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetcdfReader;

/// An open NetCDF file.
pub struct NetcdfFile {
    path: PathBuf,
    file: netcdf::File,
}

impl std::fmt::Debug for NetcdfFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetcdfFile").field("path", &self.path).finish()
    }
}

impl NetcdfFile {
    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NetcdfReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self
    }
}

impl GridReader for NetcdfReader {
    type Handle = NetcdfFile;

    fn open(&self, path: &Path) -> Result<NetcdfFile> {
        if !path.is_file() {
            return Err(PrepError::file_open(path, "no such file"));
        }
        let file = netcdf::open(path).map_err(|e| PrepError::file_open(path, e))?;
        Ok(NetcdfFile {
            path: path.to_path_buf(),
            file,
        })
    }

    fn read(&self, handle: &mut NetcdfFile, variable: &str, record: usize) -> Result<Grid> {
        let var = handle
            .file
            .variable(variable)
            .ok_or_else(|| PrepError::missing_variable(variable, &handle.path))?;

        let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let Some((&available, grid_shape)) = dims.split_first() else {
            return Err(PrepError::NetCdf(format!(
                "'{}' in {} has no record dimension",
                variable,
                handle.path.display()
            )));
        };
        if record >= available {
            return Err(PrepError::RecordOutOfRange {
                variable: variable.to_string(),
                path: handle.path.clone(),
                record,
                available,
            });
        }

        let mut values = read_record(&var, record, grid_shape)?;

        // Packed integer fields (CF convention)
        let scale_factor = attr_f64(&var, "scale_factor").unwrap_or(1.0);
        let add_offset = attr_f64(&var, "add_offset").unwrap_or(0.0);
        if scale_factor != 1.0 || add_offset != 0.0 {
            values.iter_mut().for_each(|v| *v = *v * scale_factor + add_offset);
        }

        tracing::debug!(
            "Read {}[{}] {:?} from {}",
            variable,
            record,
            grid_shape,
            handle.path.display()
        );
        ArrayD::from_shape_vec(IxDyn(grid_shape), values).map_err(|e| {
            PrepError::NetCdf(format!(
                "'{}': values do not fit shape {:?}: {}",
                variable, grid_shape, e
            ))
        })
    }

    fn dimension_length(&self, path: &Path, variable: &str, index: usize) -> Result<usize> {
        let handle = self.open(path)?;
        let var = handle
            .file
            .variable(variable)
            .ok_or_else(|| PrepError::missing_variable(variable, path))?;
        let dims = var.dimensions();
        let len = dims.get(index).map(|d| d.len());
        len.ok_or_else(|| {
            PrepError::NetCdf(format!(
                "'{}' has {} dimensions, no dimension {}",
                variable,
                dims.len(),
                index
            ))
        })
    }
}

fn attr_f64(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    match var.attribute(name)?.value().ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(v as f64),
        AttributeValue::Int(v) => Some(v as f64),
        AttributeValue::Short(v) => Some(v as f64),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&x| x as f64),
        _ => None,
    }
}

/// Fetch record `record` of `var` as flat `f64` values, row-major over `grid_shape`.
fn read_record(var: &netcdf::Variable<'_>, record: usize, grid_shape: &[usize]) -> Result<Vec<f64>> {
    let name = var.name();

    macro_rules! typed {
        ($extents:expr, $t:ty) => {{
            let values: Vec<$t> = var.get_values($extents).map_err(|e| {
                PrepError::NetCdf(format!("failed to read record {} of '{}': {}", record, name, e))
            })?;
            values.into_iter().map(|x| x as f64).collect::<Vec<f64>>()
        }};
    }

    macro_rules! any_type {
        ($extents:expr) => {
            match var.vartype() {
                NcVariableType::Float(FloatType::F64) => typed!($extents, f64),
                NcVariableType::Float(FloatType::F32) => typed!($extents, f32),
                NcVariableType::Int(IntType::I64) => typed!($extents, i64),
                NcVariableType::Int(IntType::I32) => typed!($extents, i32),
                NcVariableType::Int(IntType::I16) => typed!($extents, i16),
                NcVariableType::Int(IntType::I8) => typed!($extents, i8),
                NcVariableType::Int(IntType::U64) => typed!($extents, u64),
                NcVariableType::Int(IntType::U32) => typed!($extents, u32),
                NcVariableType::Int(IntType::U16) => typed!($extents, u16),
                NcVariableType::Int(IntType::U8) => typed!($extents, u8),
                other => {
                    return Err(PrepError::NetCdf(format!(
                        "'{}' has non-numeric type {:?}",
                        name, other
                    )))
                },
            }
        };
    }

    let r = record..record + 1;
    let values = match *grid_shape {
        [a] => any_type!((r, 0..a)),
        [a, b] => any_type!((r, 0..a, 0..b)),
        [a, b, c] => any_type!((r, 0..a, 0..b, 0..c)),
        [a, b, c, d] => any_type!((r, 0..a, 0..b, 0..c, 0..d)),
        _ => {
            return Err(PrepError::NetCdf(format!(
                "'{}' has {} dimensions after Time, expected 1 to 4",
                name,
                grid_shape.len()
            )))
        },
    };
    Ok(values)
}
