//! Waitlist notifications
//!
//! A slot-available notification is a time-boxed offer. It is live strictly before its expiry
//! instant and hidden from reads afterwards.

use std::{fmt, str::FromStr};

use jiff::{
    SignedDuration, Timestamp,
    civil::{Date, Time},
};
use serde::{Deserialize, Serialize};

use crate::errors::ParseKindError;

/// How long a slot-available offer stays live.
pub const OFFER_VALIDITY: SignedDuration = SignedDuration::from_mins(15);

/// Notification kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// The waitlisted slot was freed.
    SlotAvailable,

    /// The user's waitlist position moved.
    PositionChanged,
}

impl NotificationKind {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SlotAvailable => "SLOT_AVAILABLE",
            Self::PositionChanged => "POSITION_CHANGED",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = ParseKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "SLOT_AVAILABLE" => Ok(Self::SlotAvailable),
            "POSITION_CHANGED" => Ok(Self::PositionChanged),
            other => Err(ParseKindError::new("notification kind", other)),
        }
    }
}

/// Expiry instant of an offer created at `created_at`.
///
/// # Errors
///
/// Returns an error if the expiry would fall outside the supported timestamp range.
pub fn offer_expires_at(created_at: Timestamp) -> Result<Timestamp, jiff::Error> {
    created_at.checked_add(OFFER_VALIDITY)
}

/// Whether a notification expiring at `expires_at` is still visible at `point_in_time`.
pub fn is_live(expires_at: Timestamp, point_in_time: Timestamp) -> bool {
    expires_at > point_in_time
}

/// Message body of a slot-available offer.
pub fn slot_available_message(court_name: &str, date: Date, start: Time) -> String {
    format!(
        "Good news! The slot for {court_name} on {date} at {} is now available.",
        start.strftime("%H:%M")
    )
}
