//! Preprocessor configuration.

use crate::data::PathTemplate;
use crate::error::Result;
use crate::time::{parse_date, parse_interval, TimeWindow};
use chrono::Duration;

/// Default spacing between stored records.
pub const DEFAULT_RECORD_INTERVAL: &str = "1h";

/// Default time span of one file.
pub const DEFAULT_FILE_INTERVAL: &str = "24h";

/// Where the source files are and which part of them to walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessorConfig {
    source: PathTemplate,
    window: TimeWindow,
}

impl PreprocessorConfig {
    /// Create a configuration from a path template containing `[DATE]` and
    /// `YYYYMMDD` start and end dates, with hourly records in daily files.
    pub fn new(source: impl Into<String>, start_date: &str, end_date: &str) -> Result<Self> {
        let source = PathTemplate::new(source)?;
        let window = TimeWindow::new(
            parse_date(start_date)?,
            parse_date(end_date)?,
            parse_interval(DEFAULT_RECORD_INTERVAL)?,
            parse_interval(DEFAULT_FILE_INTERVAL)?,
        )?;
        Ok(Self { source, window })
    }

    /// Set the record interval from a string such as `"1h"`.
    pub fn with_record_interval(self, interval: &str) -> Result<Self> {
        let record = parse_interval(interval)?;
        let file = self.window.file_interval();
        self.set_intervals(record, file)
    }

    /// Set the file interval from a string such as `"24h"`.
    pub fn with_file_interval(self, interval: &str) -> Result<Self> {
        let file = parse_interval(interval)?;
        let record = self.window.record_interval();
        self.set_intervals(record, file)
    }

    /// Replace the source template.
    pub fn with_source(mut self, source: PathTemplate) -> Self {
        self.source = source;
        self
    }

    /// Set both intervals at once, validating them as a pair.
    pub fn with_intervals(self, record_interval: &str, file_interval: &str) -> Result<Self> {
        let record = parse_interval(record_interval)?;
        let file = parse_interval(file_interval)?;
        self.set_intervals(record, file)
    }

    fn set_intervals(mut self, record: Duration, file: Duration) -> Result<Self> {
        self.window = self.window.with_intervals(record, file)?;
        Ok(self)
    }

    /// Source path template.
    pub fn source(&self) -> &PathTemplate {
        &self.source
    }

    /// Simulation window.
    pub fn window(&self) -> &TimeWindow {
        &self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrepError;

    #[test]
    fn defaults_to_hourly_records_in_daily_files() {
        let c = PreprocessorConfig::new("wrf_[DATE].nc", "20160101", "20160103").unwrap();
        assert_eq!(c.window().record_interval(), Duration::hours(1));
        assert_eq!(c.window().file_interval(), Duration::hours(24));
        assert_eq!(c.window().record_count(), 48);
    }

    #[test]
    fn malformed_inputs_are_config_errors() {
        let cases = [
            PreprocessorConfig::new("wrf_[DATE].nc", "2016-01-01", "20160103"),
            PreprocessorConfig::new("wrf_[DATE].nc", "20160101", "tomorrow"),
            PreprocessorConfig::new("wrf.nc", "20160101", "20160103"),
            PreprocessorConfig::new("wrf_[DATE].nc", "20160103", "20160101"),
        ];
        for case in cases {
            assert!(matches!(case, Err(PrepError::Config(_))));
        }
    }

    #[test]
    fn intervals_are_validated_together() {
        let c = PreprocessorConfig::new("wrf_[DATE].nc", "20160101", "20160103").unwrap();
        let c = c.with_record_interval("3h").unwrap();
        assert_eq!(c.window().record_interval(), Duration::hours(3));
        assert!(c.clone().with_file_interval("10h").is_err());
        assert!(c.clone().with_record_interval("1x").is_err());
        let c = c.with_intervals("5h", "10h").unwrap();
        assert_eq!(c.window().file_interval(), Duration::hours(10));
    }
}
