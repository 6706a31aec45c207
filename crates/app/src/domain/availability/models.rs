//! Availability Models

use jiff::civil::{Date, Time};
use serde::Serialize;

use crate::domain::catalog::models::Court;

/// One hourly start on a court's day grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub start_time: Time,
    pub end_time: Time,
    pub is_free: bool,
}

/// A court's bookable starts for one date.
#[derive(Debug, Clone, Serialize)]
pub struct CourtDay {
    pub court: Court,
    pub date: Date,
    pub cells: Vec<GridCell>,
}
