//! Producer of one stored variable.

use super::{GridProducer, TimeCursor};
use crate::data::{GridReader, PathTemplate};
use crate::error::Result;
use crate::grid::Grid;
use crate::progress::ProgressSink;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;

struct OpenFile<H> {
    index: i64,
    path: PathBuf,
    handle: H,
}

/// Reads one variable record by record, opening the covering file whenever
/// the cursor crosses into a new one.
pub struct RawProducer<R: GridReader> {
    reader: Arc<R>,
    template: PathTemplate,
    variable: String,
    cursor: TimeCursor,
    open: Option<OpenFile<R::Handle>>,
    progress: Arc<dyn ProgressSink>,
    last: Option<DateTime<Utc>>,
    halted: bool,
}

impl<R: GridReader> std::fmt::Debug for RawProducer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawProducer")
            .field("template", &self.template)
            .field("variable", &self.variable)
            .field("cursor", &self.cursor)
            .field("open", &self.open.as_ref().map(|o| &o.path))
            .field("halted", &self.halted)
            .finish()
    }
}

impl<R: GridReader> RawProducer<R> {
    /// Create a producer for `variable` starting at the cursor's position.
    pub fn new(
        reader: Arc<R>,
        template: PathTemplate,
        variable: impl Into<String>,
        cursor: TimeCursor,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            reader,
            template,
            variable: variable.into(),
            cursor,
            open: None,
            progress,
            last: None,
            halted: false,
        }
    }

    /// Name of the variable being read.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    fn pull(&mut self, file_index: i64, file_start: DateTime<Utc>, record: usize) -> Result<Grid> {
        let mut file = match self.open.take() {
            Some(file) if file.index == file_index => file,
            _ => {
                let path = self.template.expand(file_start);
                self.progress
                    .send(format!("Reading {} from {}", self.variable, path.display()));
                tracing::debug!("Opening {} for {}", path.display(), self.variable);
                let handle = self.reader.open(&path)?;
                OpenFile {
                    index: file_index,
                    path,
                    handle,
                }
            },
        };

        let grid = self.reader.read(&mut file.handle, &self.variable, record);
        self.open = Some(file);
        grid
    }
}

impl<R: GridReader> Iterator for RawProducer<R> {
    type Item = Result<Grid>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }
        let Some(step) = self.cursor.advance() else {
            self.halted = true;
            self.open = None;
            return None;
        };

        match self.pull(step.file_index, step.file_start, step.record) {
            Ok(grid) => {
                self.last = Some(step.time);
                Some(Ok(grid))
            },
            Err(e) => {
                tracing::warn!(
                    "{} halted at {}: {}",
                    self.variable,
                    step.time.format("%Y-%m-%d %H:%M"),
                    e
                );
                self.halted = true;
                self.open = None;
                Some(Err(e))
            },
        }
    }
}

impl<R: GridReader> GridProducer for RawProducer<R> {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.last
    }
}
