//! wrfcmaq-prep - lazy, time-windowed access to WRF-CMAQ output.
//!
//! Meteorology and chemistry fields are stored across a sequence of dated
//! NetCDF files, one timestep per record. This crate walks that sequence as a
//! continuous stream of grids and derives the standardized quantities an
//! air-quality model consumes.
//!
//! # Features
//!
//! - Streams that cross file boundaries transparently
//! - Derived fields: pressure, temperature, layer height, downwelling radiation
//! - Weighted multi-species aggregates
//! - Land-use remapping to dry deposition classes and roughness length
//! - Fail-fast errors: nothing is silently zero-filled
//!
//! # Example
//!
//! ```ignore
//! use wrfcmaq_prep::{Preprocessor, PreprocessorConfig};
//!
//! let config = PreprocessorConfig::new("/data/wrfcmaq_[DATE].nc", "20160101", "20160102")?;
//! let prep = Preprocessor::open(config);
//!
//! for grid in prep.temperature() {
//!     let grid = grid?;
//!     println!("temperature {:?}", grid.shape());
//! }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod config;
pub mod data;
pub mod error;
pub mod grid;
pub mod landuse;
pub mod physics;
pub mod preprocessor;
pub mod progress;
pub mod stream;
pub mod time;

pub use config::PreprocessorConfig;
pub use error::{PrepError, Result};
pub use grid::{Grid, GridStats};
pub use preprocessor::{Preprocessor, Quantity, SpeciesGroups};
pub use stream::{GridProducer, GridStream};
