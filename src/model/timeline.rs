use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::layout::DAY_WIDTH;

/// Named size of the visible timeline window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    #[default]
    Month,
    Quarter,
}

impl Period {
    pub const ALL: [Period; 3] = [Self::Week, Self::Month, Self::Quarter];

    /// First and last day of the window anchored on `reference`.
    ///
    /// Month arithmetic clamps to the last day of a shorter month
    /// (March 31 minus one month is the end of February).
    pub fn bounds(&self, reference: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Week => (
                reference - Duration::days(7),
                reference + Duration::days(21),
            ),
            Self::Month => (sub_months(reference, 1), add_months(reference, 3)),
            Self::Quarter => (sub_months(reference, 3), add_months(reference, 9)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            other => Err(format!("unknown timeline period '{}'", other)),
        }
    }
}

fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// Every calendar day of the window for `period` around `reference`,
/// ascending and inclusive at both ends.
pub fn dates_in_window(period: Period, reference: NaiveDate) -> Vec<NaiveDate> {
    let (start, end) = period.bounds(reference);
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// The visible date range of the timeline and its horizontal scale.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineWindow {
    /// The leftmost visible date.
    pub start: NaiveDate,
    /// The rightmost visible date (inclusive).
    pub end: NaiveDate,
    /// Width of one day column in pixels.
    pub day_width: f32,
}

impl TimelineWindow {
    /// A zero, negative or non-finite `day_width` falls back to [`DAY_WIDTH`].
    pub fn new(start: NaiveDate, end: NaiveDate, day_width: f32) -> Self {
        let day_width = if day_width.is_finite() && day_width > 0.0 {
            day_width
        } else {
            DAY_WIDTH
        };
        Self {
            start,
            end,
            day_width,
        }
    }

    pub fn for_period(period: Period, reference: NaiveDate, day_width: f32) -> Self {
        let (start, end) = period.bounds(reference);
        Self::new(start, end, day_width)
    }

    /// Day columns of the window, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    pub fn day_count(&self) -> usize {
        ((self.end - self.start).num_days() + 1).max(0) as usize
    }

    /// Convert a date to an x-pixel offset from the window start.
    /// Dates before the window give a negative offset.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        let days = (date - self.start).num_days() as f32;
        days * self.day_width
    }

    /// Convert an x-pixel offset back to the date of that column, clamped to
    /// the window.
    pub fn x_to_date(&self, x: f32) -> NaiveDate {
        let last = (self.end - self.start).num_days().max(0);
        let days = ((x / self.day_width).floor() as i64).clamp(0, last);
        Duration::try_days(days)
            .and_then(|offset| self.start.checked_add_signed(offset))
            .unwrap_or(self.start)
    }

    /// Total width in pixels of all day columns.
    pub fn total_width(&self) -> f32 {
        self.day_count() as f32 * self.day_width
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Scroll the window by a number of days. Returns `false` and leaves the
    /// window alone when either edge would leave the calendar.
    pub fn scroll_days(&mut self, days: i64) -> bool {
        let Some(offset) = Duration::try_days(days) else {
            return false;
        };
        match (
            self.start.checked_add_signed(offset),
            self.end.checked_add_signed(offset),
        ) {
            (Some(start), Some(end)) => {
                self.start = start;
                self.end = end;
                true
            }
            _ => false,
        }
    }
}
