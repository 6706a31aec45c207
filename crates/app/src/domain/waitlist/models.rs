//! Waitlist Models

use jiff::{
    Timestamp,
    civil::{Date, Time},
};
use serde::Serialize;

use crate::{
    domain::{
        catalog::models::CourtUuid, notifications::models::NotificationUuid,
        slots::models::SlotUuid, users::UserUuid,
    },
    uuids::TypedUuid,
};

/// Waitlist Entry UUID
pub type WaitlistEntryUuid = TypedUuid<WaitlistEntry>;

/// Waitlist Entry Model
#[derive(Debug, Clone, Serialize)]
pub struct WaitlistEntry {
    pub uuid: WaitlistEntryUuid,
    pub user: UserUuid,
    pub slot: SlotUuid,
    pub court: CourtUuid,

    /// One-based arrival order within the slot's queue. Never reused.
    pub position: u32,
    pub notified: bool,
    pub notification: Option<NotificationUuid>,
    pub created_at: Timestamp,
}

/// Waitlist join request
#[derive(Debug, Clone, PartialEq)]
pub struct NewWaitlistEntry {
    pub uuid: WaitlistEntryUuid,
    pub user: UserUuid,
    pub court: CourtUuid,
    pub date: Date,
    pub start_time: Time,
}
