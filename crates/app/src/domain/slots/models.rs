//! Slot Models

use jiff::{
    Timestamp,
    civil::{Date, Time},
};
use serde::Serialize;

use crate::{domain::catalog::models::CourtUuid, uuids::TypedUuid};

/// Slot UUID
pub type SlotUuid = TypedUuid<Slot>;

/// Slot Model
#[derive(Debug, Clone, Serialize)]
pub struct Slot {
    pub uuid: SlotUuid,
    pub court: CourtUuid,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub is_booked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
