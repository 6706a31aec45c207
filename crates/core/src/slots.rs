//! Slots
//!
//! A slot is the atomic bookable unit: one court, one date, one start time. Slots are created
//! lazily on first reference and last [`SLOT_DURATION`].

use jiff::{
    SignedDuration,
    civil::{self, Time},
};
use thiserror::Error;

/// Length of every slot.
pub const SLOT_DURATION: SignedDuration = SignedDuration::from_hours(1);

/// First start time offered on the day grid.
pub const DAY_OPENS: Time = civil::time(9, 0, 0, 0);

/// The day grid offers no start time at or after this.
pub const DAY_CLOSES: Time = civil::time(22, 0, 0, 0);

/// Slot rule violations.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SlotError {
    /// The slot would run past midnight.
    #[error("slot starting at {0} does not fit within the day")]
    PastMidnight(Time),
}

/// Returns the end time of a slot starting at `start`.
///
/// # Errors
///
/// - [`SlotError::PastMidnight`]: the slot would not end on the same day.
pub fn slot_end(start: Time) -> Result<Time, SlotError> {
    start
        .checked_add(SLOT_DURATION)
        .map_err(|_overflow| SlotError::PastMidnight(start))
}

/// Hourly start times shown on the day grid, earliest first.
pub fn day_grid_starts() -> impl Iterator<Item = Time> {
    (DAY_OPENS.hour()..DAY_CLOSES.hour()).map(|hour| civil::time(hour, 0, 0, 0))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn slot_end_is_one_hour_later() -> TestResult {
        assert_eq!(slot_end(civil::time(18, 0, 0, 0))?, civil::time(19, 0, 0, 0));
        assert_eq!(slot_end(civil::time(9, 30, 0, 0))?, civil::time(10, 30, 0, 0));

        Ok(())
    }

    #[test]
    fn slot_end_rejects_last_hour_of_day() {
        let start = civil::time(23, 15, 0, 0);

        assert_eq!(slot_end(start), Err(SlotError::PastMidnight(start)));
    }

    #[test]
    fn day_grid_runs_nine_to_nine_pm() {
        let starts: Vec<Time> = day_grid_starts().collect();

        assert_eq!(starts.len(), 13, "09:00 through 21:00 inclusive");
        assert_eq!(starts.first(), Some(&civil::time(9, 0, 0, 0)));
        assert_eq!(starts.last(), Some(&civil::time(21, 0, 0, 0)));
    }
}
