//! Date/time value primitives: selection precision, inclusive bounds,
//! and the pluggable "now" source pickers read the current time from.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// How much of the time-of-day a picker tracks.
///
/// Fixed at construction. `DateOnly` suppresses the time component
/// entirely: any materialized value is forced to midnight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Precision {
    /// Hours, minutes and seconds.
    #[default]
    Seconds,
    /// Hours and minutes; seconds are always zero.
    Minutes,
    /// Calendar date only; time-of-day is always midnight.
    DateOnly,
}

impl Precision {
    /// Whether values carry a visible time-of-day component.
    pub fn has_time(self) -> bool {
        !matches!(self, Precision::DateOnly)
    }

    /// Whether values carry a seconds field.
    pub fn has_seconds(self) -> bool {
        matches!(self, Precision::Seconds)
    }

    /// Drop the sub-precision fields of a time-of-day.
    pub fn truncate_time(self, time: NaiveTime) -> NaiveTime {
        let (h, m, s) = match self {
            Precision::Seconds => (time.hour(), time.minute(), time.second()),
            Precision::Minutes => (time.hour(), time.minute(), 0),
            Precision::DateOnly => (0, 0, 0),
        };
        NaiveTime::from_hms_opt(h, m, s).unwrap_or(NaiveTime::MIN)
    }

    /// Drop the sub-precision fields of a full value.
    pub fn truncate(self, value: NaiveDateTime) -> NaiveDateTime {
        value.date().and_time(self.truncate_time(value.time()))
    }
}

/// Optional inclusive `[min, max]` limits on selectable values.
///
/// `min <= max` is the caller's responsibility when both are set;
/// nothing here validates it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bounds {
    /// Earliest selectable value, unlimited when `None`.
    pub min: Option<NaiveDateTime>,
    /// Latest selectable value, unlimited when `None`.
    pub max: Option<NaiveDateTime>,
}

impl Bounds {
    /// No limit in either direction.
    pub const UNBOUNDED: Bounds = Bounds {
        min: None,
        max: None,
    };

    pub fn new(min: Option<NaiveDateTime>, max: Option<NaiveDateTime>) -> Self {
        Self { min, max }
    }

    /// True when the calendar date is selectable, ignoring time-of-day.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        if let Some(min) = self.min {
            if date < min.date() {
                return false;
            }
        }
        if let Some(max) = self.max {
            if date > max.date() {
                return false;
            }
        }
        true
    }

    /// True when the full value lies within the limits.
    pub fn contains(&self, value: NaiveDateTime) -> bool {
        if let Some(min) = self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return false;
            }
        }
        true
    }

    /// Clamp a value into the limits. The min check runs first, so a
    /// value violating both (only possible with min > max) lands on min.
    pub fn clamp(&self, value: NaiveDateTime) -> NaiveDateTime {
        if let Some(min) = self.min {
            if value < min {
                return min;
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return max;
            }
        }
        value
    }

    /// Clamp a calendar date into the date span of the limits.
    pub fn clamp_date(&self, date: NaiveDate) -> NaiveDate {
        if let Some(min) = self.min {
            if date < min.date() {
                return min.date();
            }
        }
        if let Some(max) = self.max {
            if date > max.date() {
                return max.date();
            }
        }
        date
    }
}

/// Pluggable wall-clock source. Pickers call it for "today" and for
/// seeding edits when nothing is selected; tests inject a fixed one.
pub type NowFn = Box<dyn Fn() -> NaiveDateTime + Send>;

/// The default wall-clock source: local time.
pub fn system_now() -> NaiveDateTime {
    Local::now().naive_local()
}
