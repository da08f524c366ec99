//! Parsing and formatting of the board's stored timestamp text, and the clock
//! that turns a UTC instant into board-local wall-clock time.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

/// Format written for `publish_date_time`.
pub const PUBLISH_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format written for `expiry_date` and accepted for range bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const PUBLISH_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

pub fn parse_publish_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    PUBLISH_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

pub fn format_publish_time(at: NaiveDateTime) -> String {
    at.format(PUBLISH_FORMAT).to_string()
}

/// Wall clock pinned to the board's configured UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct BoardClock {
    offset: FixedOffset,
}

impl BoardClock {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn from_offset_minutes(minutes: i32) -> Self {
        match FixedOffset::east_opt(minutes.saturating_mul(60)) {
            Some(offset) => Self { offset },
            None => {
                tracing::warn!("UTC offset of {} minutes is out of range, using UTC", minutes);
                Self::utc()
            }
        }
    }

    pub fn local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset).naive_local()
    }

    pub fn now(&self) -> NaiveDateTime {
        self.local(Utc::now())
    }
}

impl Default for BoardClock {
    fn default() -> Self {
        Self::utc()
    }
}
