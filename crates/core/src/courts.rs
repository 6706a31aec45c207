//! Courts

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ParseKindError;

/// Court surface placement, which drives the indoor pricing premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourtKind {
    /// Covered court, priced with the indoor multiplier.
    Indoor,

    /// Open air court.
    Outdoor,
}

impl CourtKind {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Indoor => "INDOOR",
            Self::Outdoor => "OUTDOOR",
        }
    }
}

impl fmt::Display for CourtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourtKind {
    type Err = ParseKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "INDOOR" => Ok(Self::Indoor),
            "OUTDOOR" => Ok(Self::Outdoor),
            other => Err(ParseKindError::new("court kind", other)),
        }
    }
}
