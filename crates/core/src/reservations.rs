//! Reservations

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ParseKindError;

/// Reservation lifecycle state.
///
/// `Confirmed` moves to `Cancelled` through cancellation, or to `Completed` once the slot has
/// been played, which is recorded outside this system. Both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Holds its slot, coach and equipment.
    Confirmed,

    /// Released everything it held.
    Cancelled,

    /// Played.
    Completed,
}

impl ReservationStatus {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        }
    }

    /// Whether the reservation currently holds resources.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Confirmed)
    }

    /// Whether the reservation counts towards a user's spend.
    pub const fn is_billable(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ParseKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CONFIRMED" => Ok(Self::Confirmed),
            "CANCELLED" => Ok(Self::Cancelled),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(ParseKindError::new("reservation status", other)),
        }
    }
}
