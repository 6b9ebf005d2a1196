//! Weighted sums of named variables.

use super::{Combined, GridStream};
use crate::error::{PrepError, Result};
use crate::grid::Grid;
use std::collections::HashSet;

/// A named, immutable set of `(variable, weight)` pairs summed into one
/// composite quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableGroup {
    name: String,
    members: Vec<(String, f64)>,
}

impl VariableGroup {
    /// Create a group. Names must be unique and there must be at least one
    /// member with a finite weight.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        members: impl IntoIterator<Item = (S, f64)>,
    ) -> Result<Self> {
        let name = name.into();
        let members: Vec<(String, f64)> = members.into_iter().map(|(v, w)| (v.into(), w)).collect();

        if members.is_empty() {
            return Err(PrepError::config(format!("variable group '{}' is empty", name)));
        }
        let mut seen = HashSet::new();
        for (variable, weight) in &members {
            if !seen.insert(variable.as_str()) {
                return Err(PrepError::config(format!(
                    "variable group '{}' lists '{}' twice",
                    name, variable
                )));
            }
            if !weight.is_finite() {
                return Err(PrepError::config(format!(
                    "variable group '{}' has non-finite weight {} for '{}'",
                    name, weight, variable
                )));
            }
        }
        Ok(Self { name, members })
    }

    /// A group of one variable with weight 1.
    pub fn single(name: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: vec![(variable.into(), 1.0)],
        }
    }

    /// Name of the composite quantity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[(String, f64)] {
        &self.members
    }

    /// Weighted elementwise sum of one grid per member, in member order.
    pub fn combine(&self, grids: &[Grid]) -> Result<Grid> {
        if grids.len() != self.members.len() {
            return Err(PrepError::config(format!(
                "variable group '{}' has {} members but received {} grids",
                self.name,
                self.members.len(),
                grids.len()
            )));
        }
        let mut total = Grid::zeros(grids[0].raw_dim());
        for (grid, (_, weight)) in grids.iter().zip(&self.members) {
            if grid.shape() != total.shape() {
                return Err(PrepError::shape_mismatch(&self.name, total.shape(), grid.shape()));
            }
            total.scaled_add(*weight, grid);
        }
        Ok(total)
    }
}

/// Sum `group` over one fresh stream per member, built by `member`.
///
/// All member streams walk the same cadence, so every pull sees one
/// timestamp. A failing member fails the pull; there are no partial sums.
pub fn weighted_sum<M>(group: &VariableGroup, mut member: M) -> GridStream
where
    M: FnMut(&str) -> GridStream,
{
    let inputs: Vec<GridStream> = group.members().iter().map(|(v, _)| member(v)).collect();
    let group = group.clone();
    Box::new(Combined::new(group.name.clone(), inputs, move |grids: &[Grid]| {
        group.combine(grids)
    }))
}
