//! Dated file path templates.

use crate::error::{PrepError, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

/// Placeholder replaced by the date of the file covering a timestamp.
pub const DATE_PLACEHOLDER: &str = "[DATE]";

/// Date format substituted for the placeholder in WRF-CMAQ file names.
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A file path with an embedded [`DATE_PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    template: String,
    date_format: String,
}

impl PathTemplate {
    /// Create a template using [`FILE_DATE_FORMAT`].
    pub fn new(template: impl Into<String>) -> Result<Self> {
        Self::with_date_format(template, FILE_DATE_FORMAT)
    }

    /// Create a template with a custom `strftime` date format.
    pub fn with_date_format(template: impl Into<String>, date_format: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(DATE_PLACEHOLDER) {
            return Err(PrepError::config(format!(
                "path template '{}' has no {} placeholder",
                template, DATE_PLACEHOLDER
            )));
        }
        Ok(Self {
            template,
            date_format: date_format.into(),
        })
    }

    /// Path of the file whose first record is at `file_start`.
    pub fn expand(&self, file_start: DateTime<Utc>) -> PathBuf {
        let date = file_start.format(&self.date_format).to_string();
        PathBuf::from(self.template.replace(DATE_PLACEHOLDER, &date))
    }

    /// The raw template string.
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn expands_every_placeholder() {
        let t = PathTemplate::new("/data/[DATE]/wrfcmaq_[DATE].nc").unwrap();
        let day = Utc.with_ymd_and_hms(2016, 7, 4, 0, 0, 0).unwrap();
        assert_eq!(
            t.expand(day),
            PathBuf::from("/data/2016-07-04/wrfcmaq_2016-07-04.nc")
        );
    }

    #[test]
    fn custom_format() {
        let t = PathTemplate::with_date_format("out_[DATE].nc", "%Y%m%d%H").unwrap();
        let hour = Utc.with_ymd_and_hms(2016, 7, 4, 6, 0, 0).unwrap();
        assert_eq!(t.expand(hour), PathBuf::from("out_2016070406.nc"));
    }

    #[test]
    fn requires_placeholder() {
        assert!(matches!(PathTemplate::new("static.nc"), Err(PrepError::Config(_))));
    }
}
