//! Notification Models

use courtside::notifications::NotificationKind;
use jiff::Timestamp;
use serde::Serialize;

use crate::{
    domain::{slots::models::SlotUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Notification UUID
pub type NotificationUuid = TypedUuid<Notification>;

/// Notification Model
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub uuid: NotificationUuid,
    pub user: UserUuid,
    pub slot: SlotUuid,
    pub kind: NotificationKind,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// New Notification Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub uuid: NotificationUuid,
    pub user: UserUuid,
    pub slot: SlotUuid,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Outcome of one expired-offer sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    /// Slots examined because their queue stalled.
    pub slots_examined: usize,

    /// Offers sent to the next user in line.
    pub promoted: Vec<Notification>,
}
