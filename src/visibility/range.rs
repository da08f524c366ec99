use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Inclusive publish-date window, `[start 00:00:00, end 23:59:59]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        let lower = self.start.and_time(NaiveTime::MIN);
        let within_upper = self
            .end
            .and_hms_opt(23, 59, 59)
            .map_or(false, |upper| instant <= upper);
        instant >= lower && within_upper
    }
}

/// User-held range filter controls.
///
/// Bounds are plain input; [`apply`](Self::apply) switches the filter on once
/// both are set. While on, the range is always built from the current bounds,
/// so removing either bound takes the range out of play until both are set again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRangeFilter {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    active: bool,
}

impl DateRangeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_start(&mut self, start: Option<NaiveDate>) {
        self.start = start;
    }

    pub fn set_end(&mut self, end: Option<NaiveDate>) {
        self.end = end;
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Switches the filter on if both bounds are set; a half-filled range
    /// leaves it as it was. Returns whether a range is now in effect.
    pub fn apply(&mut self) -> bool {
        if self.start.is_some() && self.end.is_some() {
            self.active = true;
        }
        self.is_active()
    }

    /// Resets both bounds and switches the filter off.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.effective_range().is_some()
    }

    /// The range taking part in filtering: only when switched on and both
    /// current bounds are present.
    pub fn effective_range(&self) -> Option<DateRange> {
        match (self.active, self.start, self.end) {
            (true, Some(start), Some(end)) => Some(DateRange::new(start, end)),
            _ => None,
        }
    }
}
