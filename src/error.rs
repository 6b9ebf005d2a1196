//! Error types for wrfcmaq-prep.
//!
//! This module provides a unified error handling approach using `thiserror`.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for preprocessor operations.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Errors that can occur while reading or deriving grids.
#[derive(Debug, Error)]
pub enum PrepError {
    /// Malformed configuration: dates, intervals, templates or groups.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A dated file is missing or could not be opened.
    #[error("Failed to open file {path}: {reason}")]
    FileOpen { path: PathBuf, reason: String },

    /// Failed to decode NetCDF content.
    #[error("NetCDF error: {0}")]
    NetCdf(String),

    /// A variable is absent from an otherwise readable file.
    #[error("Variable '{variable}' not found in {path}")]
    MissingVariable { variable: String, path: PathBuf },

    /// The file holds fewer records than the time window requires.
    #[error("Record {record} of '{variable}' is out of range in {path} ({available} records)")]
    RecordOutOfRange {
        variable: String,
        path: PathBuf,
        record: usize,
        available: usize,
    },

    /// Grids combined elementwise do not share one shape.
    #[error("Shape mismatch in {quantity}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        quantity: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// A grid has the wrong number of dimensions for a derivation.
    #[error("{quantity} needs {expected}-dimensional grids, found {found} dimensions")]
    Dimensionality {
        quantity: String,
        expected: usize,
        found: usize,
    },

    /// A categorical code has no entry in a lookup table. `code` is `None`
    /// when the cell is NaN or infinite.
    #[error("{} is outside lookup table '{table}' (1..={len}){}", code_text(.code), at_suffix(.timestamp))]
    LookupRange {
        table: String,
        code: Option<i64>,
        len: usize,
        timestamp: Option<DateTime<Utc>>,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn code_text(code: &Option<i64>) -> String {
    match code {
        Some(c) => format!("Code {}", c),
        None => "Non-finite code".to_string(),
    }
}

fn at_suffix(timestamp: &Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(t) => format!(" at {}", t.format("%Y-%m-%d %H:%M:%S")),
        None => String::new(),
    }
}

impl PrepError {
    /// Create a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a FileOpen error.
    pub fn file_open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FileOpen {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a MissingVariable error.
    pub fn missing_variable(variable: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingVariable {
            variable: variable.into(),
            path: path.into(),
        }
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(quantity: impl Into<String>, expected: &[usize], found: &[usize]) -> Self {
        Self::ShapeMismatch {
            quantity: quantity.into(),
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }

    /// True when the error comes from reaching the data rather than from its content.
    pub fn is_access(&self) -> bool {
        matches!(
            self,
            Self::FileOpen { .. }
                | Self::NetCdf(_)
                | Self::MissingVariable { .. }
                | Self::RecordOutOfRange { .. }
                | Self::Io(_)
        )
    }
}

impl From<netcdf::Error> for PrepError {
    fn from(err: netcdf::Error) -> Self {
        Self::NetCdf(err.to_string())
    }
}
