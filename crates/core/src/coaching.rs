//! Coaching
//!
//! Coaches publish a weekly allow-list of start times keyed by abbreviated day name, for example
//! `{"Mon": ["09:00", "10:00"], "Sun": ["10:00"]}`. Matching is exact: a missing day key or a
//! start time not listed verbatim means the coach is unavailable. There is no interval matching.

use std::collections::BTreeMap;

use jiff::civil::{Date, Time, Weekday};
use serde::{Deserialize, Serialize};

/// A coach's weekly allow-list of permitted start times.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyAvailability(BTreeMap<String, Vec<String>>);

impl WeeklyAvailability {
    /// Creates an empty allow-list; the coach is never available.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds permitted `HH:MM` start times for the given day.
    #[must_use]
    pub fn with_day<I, S>(mut self, day: Weekday, times: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(day_key(day).to_string())
            .or_default()
            .extend(times.into_iter().map(Into::into));

        self
    }

    /// Whether the coach accepts a session on `date` starting at `start`.
    pub fn permits(&self, date: Date, start: Time) -> bool {
        let Some(times) = self.0.get(day_key(date.weekday())) else {
            return false;
        };

        let wanted = start.strftime("%H:%M").to_string();

        times.iter().any(|time| *time == wanted)
    }
}

/// Abbreviated English day name used as the allow-list key.
pub const fn day_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}
