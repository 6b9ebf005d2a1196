//! Simulation dates, intervals and the time window they span.

use crate::error::{PrepError, Result};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

/// Date format accepted for simulation start and end dates.
pub const INPUT_DATE_FORMAT: &str = "%Y%m%d";

/// Parse an 8-digit `YYYYMMDD` date as midnight UTC.
pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PrepError::config(format!(
            "date '{}' is not an 8-digit YYYYMMDD string",
            s
        )));
    }
    let date = NaiveDate::parse_from_str(s, INPUT_DATE_FORMAT)
        .map_err(|e| PrepError::config(format!("date '{}': {}", s, e)))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| PrepError::config(format!("date '{}' has no midnight", s)))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

/// Parse an interval such as `1h`, `24h`, `30m`, `1h30m`, `2d` or `90s`.
///
/// Components must be whole numbers followed by one of `d`, `h`, `m`, `s`.
/// Zero-length intervals are rejected.
pub fn parse_interval(s: &str) -> Result<Duration> {
    let text = s.trim();
    if text.is_empty() {
        return Err(PrepError::config("empty interval"));
    }

    let mut total = Duration::zero();
    let mut digits = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.is_empty() {
            return Err(PrepError::config(format!(
                "interval '{}': unit '{}' has no amount",
                text, c
            )));
        }
        let amount: i64 = digits
            .parse()
            .map_err(|e| PrepError::config(format!("interval '{}': {}", text, e)))?;
        digits.clear();
        let part = match c {
            'd' => Duration::try_days(amount),
            'h' => Duration::try_hours(amount),
            'm' => Duration::try_minutes(amount),
            's' => Duration::try_seconds(amount),
            other => {
                return Err(PrepError::config(format!(
                    "interval '{}': unknown unit '{}'",
                    text, other
                )))
            },
        };
        total = part
            .and_then(|p| total.checked_add(&p))
            .ok_or_else(|| PrepError::config(format!("interval '{}' overflows", text)))?;
    }

    if !digits.is_empty() {
        return Err(PrepError::config(format!(
            "interval '{}': trailing amount '{}' has no unit",
            text, digits
        )));
    }
    if total <= Duration::zero() {
        return Err(PrepError::config(format!("interval '{}' must be positive", text)));
    }
    Ok(total)
}

/// The half-open simulation window `[start, end)` and its stepping intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    record_interval: Duration,
    file_interval: Duration,
}

impl TimeWindow {
    /// Create a validated window.
    ///
    /// Both intervals must be positive, the file interval must hold a whole
    /// number of records, and `start` must not be after `end`.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        record_interval: Duration,
        file_interval: Duration,
    ) -> Result<Self> {
        if record_interval <= Duration::zero() {
            return Err(PrepError::config("record interval must be positive"));
        }
        if file_interval <= Duration::zero() {
            return Err(PrepError::config("file interval must be positive"));
        }
        if seconds(file_interval) % seconds(record_interval) != 0 {
            return Err(PrepError::config(format!(
                "file interval ({}s) is not a whole number of record intervals ({}s)",
                seconds(file_interval),
                seconds(record_interval)
            )));
        }
        if start > end {
            return Err(PrepError::config(format!(
                "start {} is after end {}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            )));
        }
        Ok(Self {
            start,
            end,
            record_interval,
            file_interval,
        })
    }

    /// First timestamp of the window.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive upper bound of the window.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Spacing between consecutive records.
    pub fn record_interval(&self) -> Duration {
        self.record_interval
    }

    /// Time span covered by one file.
    pub fn file_interval(&self) -> Duration {
        self.file_interval
    }

    /// Number of records the window yields.
    pub fn record_count(&self) -> usize {
        let span = seconds(self.end - self.start);
        let step = seconds(self.record_interval);
        ((span + step - 1) / step) as usize
    }

    /// Whether `t` lies inside `[start, end)`.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t < self.end
    }

    pub(crate) fn with_intervals(&self, record_interval: Duration, file_interval: Duration) -> Result<Self> {
        Self::new(self.start, self.end, record_interval, file_interval)
    }
}

pub(crate) fn seconds(d: Duration) -> i64 {
    d.num_seconds()
}
