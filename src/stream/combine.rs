//! Elementwise functions lifted over producers.

use super::{GridProducer, GridStream};
use crate::error::{PrepError, Result};
use crate::grid::{ensure_same_shape, Grid};
use chrono::{DateTime, Utc};

/// Pulls every input once per call, in declaration order, checks that the
/// grids share one shape and applies `op` to them.
///
/// The stream ends as soon as any input is exhausted; with no inputs at all it
/// is empty. The first input error is returned and halts the stream.
pub struct Combined<F> {
    quantity: String,
    inputs: Vec<GridStream>,
    op: F,
    halted: bool,
}

impl<F> std::fmt::Debug for Combined<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Combined")
            .field("quantity", &self.quantity)
            .field("inputs", &self.inputs.len())
            .field("halted", &self.halted)
            .finish()
    }
}

impl<F> Combined<F>
where
    F: FnMut(&[Grid]) -> Result<Grid>,
{
    /// Combine `inputs` with `op`, naming the result `quantity` in errors.
    pub fn new(quantity: impl Into<String>, inputs: Vec<GridStream>, op: F) -> Self {
        Self {
            quantity: quantity.into(),
            inputs,
            op,
            halted: false,
        }
    }
}

fn halt(halted: &mut bool, quantity: &str, err: PrepError) -> Option<Result<Grid>> {
    tracing::warn!("{} halted: {}", quantity, err);
    *halted = true;
    Some(Err(err))
}

impl<F> Iterator for Combined<F>
where
    F: FnMut(&[Grid]) -> Result<Grid>,
{
    type Item = Result<Grid>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted || self.inputs.is_empty() {
            self.halted = true;
            return None;
        }

        let mut grids = Vec::with_capacity(self.inputs.len());
        for input in &mut self.inputs {
            match input.next() {
                Some(Ok(grid)) => grids.push(grid),
                Some(Err(e)) => return halt(&mut self.halted, &self.quantity, e),
                None => {
                    self.halted = true;
                    return None;
                },
            }
        }

        if let Err(e) = ensure_same_shape(&self.quantity, &grids) {
            return halt(&mut self.halted, &self.quantity, e);
        }
        match (self.op)(&grids) {
            Ok(grid) => Some(Ok(grid)),
            Err(e) => halt(&mut self.halted, &self.quantity, e),
        }
    }
}

impl<F> GridProducer for Combined<F>
where
    F: FnMut(&[Grid]) -> Result<Grid>,
{
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.inputs.first().and_then(|p| p.timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    /// Replays fixed results.
    struct Replay {
        items: std::vec::IntoIter<Result<Grid>>,
        pulls: std::rc::Rc<std::cell::Cell<usize>>,
    }

    impl Iterator for Replay {
        type Item = Result<Grid>;
        fn next(&mut self) -> Option<Self::Item> {
            self.pulls.set(self.pulls.get() + 1);
            self.items.next()
        }
    }

    impl GridProducer for Replay {
        fn timestamp(&self) -> Option<DateTime<Utc>> {
            None
        }
    }

    fn replay(items: Vec<Result<Grid>>) -> (GridStream, std::rc::Rc<std::cell::Cell<usize>>) {
        let pulls = std::rc::Rc::new(std::cell::Cell::new(0));
        let stream = Box::new(Replay {
            items: items.into_iter(),
            pulls: pulls.clone(),
        });
        (stream, pulls)
    }

    fn filled(shape: &[usize], v: f64) -> Grid {
        Grid::from_elem(IxDyn(shape), v)
    }

    #[test]
    fn shape_mismatch_fails_before_op_runs() {
        let (a, _) = replay(vec![Ok(filled(&[2, 2, 2], 1.0))]);
        let (b, _) = replay(vec![Ok(filled(&[2, 2], 1.0))]);
        let mut calls = 0;
        let mut c = Combined::new("test", vec![a, b], |g: &[Grid]| {
            calls += 1;
            Ok(g[0].clone())
        });
        assert!(matches!(c.next(), Some(Err(PrepError::ShapeMismatch { .. }))));
        assert!(c.next().is_none());
        drop(c);
        assert_eq!(calls, 0);
    }

    #[test]
    fn error_halts_and_stops_pulling_inputs() {
        let (a, a_pulls) = replay(vec![
            Err(PrepError::config("boom")),
            Ok(filled(&[1], 1.0)),
        ]);
        let (b, b_pulls) = replay(vec![Ok(filled(&[1], 1.0)), Ok(filled(&[1], 1.0))]);
        let mut c = Combined::new("test", vec![a, b], |g: &[Grid]| Ok(g[0].clone()));
        assert!(matches!(c.next(), Some(Err(PrepError::Config(_)))));
        assert!(c.next().is_none());
        assert_eq!(a_pulls.get(), 1);
        assert_eq!(b_pulls.get(), 0);
    }

    #[test]
    fn no_inputs_means_no_grids() {
        let mut calls = 0;
        let mut c = Combined::new("test", Vec::new(), |_: &[Grid]| {
            calls += 1;
            Ok(Grid::zeros(IxDyn(&[1])))
        });
        assert!(c.next().is_none());
        assert!(c.next().is_none());
        drop(c);
        assert_eq!(calls, 0);
    }

    #[test]
    fn ends_when_an_input_ends() {
        let (a, _) = replay(vec![Ok(filled(&[1], 1.0))]);
        let (b, _) = replay(vec![Ok(filled(&[1], 2.0))]);
        let mut c = Combined::new("test", vec![a, b], |g: &[Grid]| Ok(&g[0] + &g[1]));
        assert_eq!(c.next().unwrap().unwrap()[[0]], 3.0);
        assert!(c.next().is_none());
    }
}
