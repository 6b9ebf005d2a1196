//! Table lookup of integer-coded categorical grids.

use super::{GridProducer, GridStream};
use crate::error::{PrepError, Result};
use crate::grid::Grid;
use chrono::{DateTime, Utc};

/// A fixed table indexed by 1-based category code.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    name: String,
    values: Vec<f64>,
}

impl LookupTable {
    /// Create a table from entries convertible to `f64`.
    pub fn new<T: Copy + Into<f64>>(name: impl Into<String>, entries: &[T]) -> Self {
        Self {
            name: name.into(),
            values: entries.iter().map(|&e| e.into()).collect(),
        }
    }

    /// Name used in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entry for a 1-based `code`, if it is in range.
    pub fn get(&self, code: i64) -> Option<f64> {
        if code < 1 {
            return None;
        }
        self.values.get((code - 1) as usize).copied()
    }

    /// Replace every cell with the entry for its code.
    ///
    /// Cells are rounded to the nearest integer code. Codes below 1, above the
    /// table length, or non-finite cells fail; nothing is clamped.
    pub fn remap(&self, grid: &Grid, timestamp: Option<DateTime<Utc>>) -> Result<Grid> {
        let mut out = Grid::zeros(grid.raw_dim());
        for (o, &cell) in out.iter_mut().zip(grid.iter()) {
            let code = cell.is_finite().then(|| cell.round() as i64);
            *o = code.and_then(|c| self.get(c)).ok_or_else(|| PrepError::LookupRange {
                table: self.name.clone(),
                code,
                len: self.values.len(),
                timestamp,
            })?;
        }
        Ok(out)
    }
}

/// Remaps every grid of an upstream producer through a [`LookupTable`].
pub struct Remapped {
    input: GridStream,
    table: LookupTable,
    halted: bool,
}

impl std::fmt::Debug for Remapped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Remapped")
            .field("table", &self.table.name)
            .field("halted", &self.halted)
            .finish()
    }
}

impl Remapped {
    /// Remap `input` through `table`.
    pub fn new(input: GridStream, table: LookupTable) -> Self {
        Self {
            input,
            table,
            halted: false,
        }
    }
}

impl Iterator for Remapped {
    type Item = Result<Grid>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }
        let result = match self.input.next()? {
            Ok(grid) => self.table.remap(&grid, self.input.timestamp()),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            tracing::warn!("{} halted: {}", self.table.name, e);
            self.halted = true;
        }
        Some(result)
    }
}

impl GridProducer for Remapped {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.input.timestamp()
    }
}
