//! Slot offers to the head of a waitlist.

use courtside::notifications::{NotificationKind, slot_available_message};
use jiff::Timestamp;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::domain::{
    notifications::{
        models::{NewNotification, Notification, NotificationUuid},
        repository::PgNotificationsRepository,
    },
    slots::models::Slot,
    waitlist::{models::WaitlistEntry, repository::PgWaitlistRepository},
};

/// Offer window of a new slot-available notification.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OfferWindow {
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SlotOffers {
    notifications: PgNotificationsRepository,
    waitlist: PgWaitlistRepository,
}

impl SlotOffers {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Offer the freed slot to the oldest unnotified entry in its queue, if any.
    ///
    /// Caller must hold the slot's row lock so two offers cannot race for the same head.
    pub(crate) async fn offer_to_head(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slot: &Slot,
        court_name: &str,
        window: OfferWindow,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let Some(entry) = self.waitlist.lock_next_pending(tx, slot.uuid).await? else {
            return Ok(None);
        };

        self.offer_to_entry(tx, &entry, slot, court_name, window)
            .await
            .map(Some)
    }

    /// Create the slot-available offer for `entry` and mark the entry notified.
    #[tracing::instrument(
        name = "notifications.offers.offer_to_entry",
        skip(self, tx, entry, slot, court_name),
        fields(entry = %entry.uuid, user = %entry.user, slot = %slot.uuid),
        err
    )]
    pub(crate) async fn offer_to_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: &WaitlistEntry,
        slot: &Slot,
        court_name: &str,
        window: OfferWindow,
    ) -> Result<Notification, sqlx::Error> {
        let notification = self
            .notifications
            .create_notification(
                tx,
                &NewNotification {
                    uuid: NotificationUuid::new(),
                    user: entry.user,
                    slot: slot.uuid,
                    kind: NotificationKind::SlotAvailable,
                    message: slot_available_message(court_name, slot.date, slot.start_time),
                    created_at: window.created_at,
                    expires_at: window.expires_at,
                },
            )
            .await?;

        self.waitlist
            .mark_notified(tx, entry.uuid, notification.uuid)
            .await?;

        info!(
            notification = %notification.uuid,
            position = entry.position,
            expires_at = %notification.expires_at,
            "offered freed slot to waitlisted user"
        );

        Ok(notification)
    }
}
