//! Stepping through a time window across file boundaries.

use crate::time::{seconds, TimeWindow};
use chrono::{DateTime, Duration, Utc};

/// Where a timestamp lives in the file sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Timestamp of the record.
    pub time: DateTime<Utc>,
    /// Number of whole file intervals between the window start and `time`.
    pub file_index: i64,
    /// First timestamp covered by the file holding `time`.
    pub file_start: DateTime<Utc>,
    /// Record index of `time` inside its file.
    pub record: usize,
}

/// Current position in a [`TimeWindow`].
///
/// Yields `start, start + Δr, …` while the timestamp is before `end`.
/// A timestamp exactly on a file boundary belongs to the file that starts there.
#[derive(Debug, Clone)]
pub struct TimeCursor {
    window: TimeWindow,
    next: DateTime<Utc>,
}

impl TimeCursor {
    /// Create a cursor positioned at the window start.
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            next: window.start(),
        }
    }

    /// The window being walked.
    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    /// Move one record forward, or `None` once the window is exhausted.
    pub fn advance(&mut self) -> Option<Step> {
        if !self.window.contains(self.next) {
            return None;
        }
        let step = self.locate(self.next);
        self.next += self.window.record_interval();
        Some(step)
    }

    /// Rewind to the window start.
    pub fn reset(&mut self) {
        self.next = self.window.start();
    }

    /// Locate `time` in the file sequence.
    pub fn locate(&self, time: DateTime<Utc>) -> Step {
        let elapsed = seconds(time - self.window.start());
        let file_secs = seconds(self.window.file_interval());
        let record_secs = seconds(self.window.record_interval());

        let file_index = elapsed.div_euclid(file_secs);
        let file_start = self.window.start() + Duration::seconds(file_index * file_secs);
        let record = (elapsed - file_index * file_secs) / record_secs;

        Step {
            time,
            file_index,
            file_start,
            record: record as usize,
        }
    }
}
