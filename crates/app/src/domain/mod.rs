//! Courtside Domain Concerns

use std::fmt;

pub mod availability;
pub mod catalog;
pub mod notifications;
pub mod reservations;
pub mod slots;
pub mod users;
pub mod waitlist;

/// SQLSTATE raised when `lock_timeout` elapses while waiting on a row lock.
const LOCK_NOT_AVAILABLE: &str = "55P03";

/// SQLSTATE raised when PostgreSQL breaks a deadlock by aborting one participant.
const DEADLOCK_DETECTED: &str = "40P01";

/// Resource kinds named in not-found and inactive failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Court,
    Coach,
    Equipment,
    Reservation,
    Slot,
    Notification,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Court => "court",
            Self::Coach => "coach",
            Self::Equipment => "equipment",
            Self::Reservation => "reservation",
            Self::Slot => "slot",
            Self::Notification => "notification",
        })
    }
}

/// Whether the error is a lock wait timeout or a deadlock abort.
pub(crate) fn is_lock_contention(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|database_error| database_error.code())
        .is_some_and(|code| code == LOCK_NOT_AVAILABLE || code == DEADLOCK_DETECTED)
}
