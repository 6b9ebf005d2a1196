//! Elementwise physics used to derive model inputs from raw WRF-CMAQ fields.
//!
//! Everything here is a pure function on [`Grid`]s. Callers are expected to
//! have checked shapes with [`ensure_same_shape`](crate::grid::ensure_same_shape);
//! the functions re-check and fail rather than panic on a mismatch.

use crate::error::{PrepError, Result};
use crate::grid::{ensure_same_shape, Grid};
use ndarray::{Axis, Zip};

/// Reference pressure for potential temperature [Pa].
pub const REFERENCE_PRESSURE: f64 = 101300.0;

/// Poisson constant R/cp for dry air.
pub const KAPPA: f64 = 0.2854;

/// Base state potential temperature of WRF perturbation fields [K].
pub const BASE_POTENTIAL_TEMPERATURE: f64 = 300.0;

/// Standard gravitational acceleration [m/s²].
pub const G: f64 = 9.80665;

/// Ambient temperature [K] from perturbation potential temperature [K] and
/// pressure [Pa].
#[inline]
pub fn theta_perturbation_to_temperature(theta_perturbation: f64, pressure: f64) -> f64 {
    let theta = theta_perturbation + BASE_POTENTIAL_TEMPERATURE;
    theta * (pressure / REFERENCE_PRESSURE).powf(KAPPA)
}

/// Elementwise sum of grids sharing one shape.
pub fn sum(quantity: &str, grids: &[Grid]) -> Result<Grid> {
    ensure_same_shape(quantity, grids)?;
    let (first, rest) = grids
        .split_first()
        .ok_or_else(|| PrepError::config(format!("{} has no inputs", quantity)))?;
    let mut total = first.clone();
    for g in rest {
        total += g;
    }
    Ok(total)
}

/// Ambient temperature grid from perturbation potential temperature and pressure.
pub fn temperature(theta_perturbation: &Grid, pressure: &Grid) -> Result<Grid> {
    if theta_perturbation.shape() != pressure.shape() {
        return Err(PrepError::shape_mismatch(
            "temperature",
            theta_perturbation.shape(),
            pressure.shape(),
        ));
    }
    Ok(Zip::from(theta_perturbation)
        .and(pressure)
        .map_collect(|&tp, &p| theta_perturbation_to_temperature(tp, p)))
}

/// Layer heights above ground [m] from perturbation and base geopotential [m²/s²].
///
/// Both grids are `[layer, row, column]`. Each column is referenced to its own
/// surface (layer 0) value, so layer 0 is always exactly zero.
pub fn geopotential_to_height(ph: &Grid, phb: &Grid) -> Result<Grid> {
    if ph.ndim() != 3 {
        return Err(PrepError::Dimensionality {
            quantity: "height".to_string(),
            expected: 3,
            found: ph.ndim(),
        });
    }
    if ph.shape() != phb.shape() {
        return Err(PrepError::shape_mismatch("height", ph.shape(), phb.shape()));
    }

    let geopotential = ph + phb;
    if geopotential.len_of(Axis(0)) == 0 {
        return Ok(geopotential);
    }
    let surface = geopotential.index_axis(Axis(0), 0).to_owned();
    let mut height = geopotential;
    for mut layer in height.axis_iter_mut(Axis(0)) {
        layer -= &surface;
        layer /= G;
    }
    Ok(height)
}
