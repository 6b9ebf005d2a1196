//! Lazy, forward-only grid streams.
//!
//! A [`GridProducer`] is an iterator of `Result<Grid>`: `None` means the time
//! window is exhausted, `Some(Err(_))` means the pull failed. A producer that
//! has failed is halted and yields `None` from then on. Producers cannot rewind;
//! a fresh one is built from the same configuration instead.

mod combine;
mod cursor;
mod group;
mod raw;
mod remap;

pub use combine::Combined;
pub use cursor::{Step, TimeCursor};
pub use group::{weighted_sum, VariableGroup};
pub use raw::RawProducer;
pub use remap::{LookupTable, Remapped};

use crate::error::Result;
use crate::grid::Grid;
use chrono::{DateTime, Utc};

/// A pull source of grids.
pub trait GridProducer: Iterator<Item = Result<Grid>> {
    /// Timestamp of the most recently produced grid.
    fn timestamp(&self) -> Option<DateTime<Utc>>;
}

/// A boxed producer, as handed out by the preprocessor.
pub type GridStream = Box<dyn GridProducer>;

impl<P: GridProducer + ?Sized> GridProducer for Box<P> {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        (**self).timestamp()
    }
}
