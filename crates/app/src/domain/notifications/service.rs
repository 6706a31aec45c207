//! Notifications service.

use async_trait::async_trait;
use courtside::notifications::{NotificationKind, offer_expires_at, slot_available_message};
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        Resource,
        catalog::repository::PgCatalogRepository,
        notifications::{
            errors::NotificationsServiceError,
            models::{NewNotification, Notification, NotificationUuid, SweepReport},
            offers::{OfferWindow, SlotOffers},
            repository::PgNotificationsRepository,
        },
        slots::{models::SlotUuid, repository::PgSlotsRepository},
        users::UserUuid,
        waitlist::repository::PgWaitlistRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgNotificationsService {
    db: Db,
    catalog: PgCatalogRepository,
    slots: PgSlotsRepository,
    waitlist: PgWaitlistRepository,
    offers: SlotOffers,
    repository: PgNotificationsRepository,
}

impl PgNotificationsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            catalog: PgCatalogRepository::new(),
            slots: PgSlotsRepository::new(),
            waitlist: PgWaitlistRepository::new(),
            offers: SlotOffers::new(),
            repository: PgNotificationsRepository::new(),
        }
    }

    /// Offer one stalled slot to the next user in line, re-checking under the slot lock.
    async fn promote_slot(
        &self,
        slot: SlotUuid,
        window: OfferWindow,
    ) -> Result<Option<Notification>, NotificationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let slot = self.slots.lock_slot(&mut tx, slot).await?;

        if slot.is_booked
            || self
                .repository
                .has_live_offer(&mut tx, slot.uuid, window.created_at)
                .await?
        {
            debug!(slot = %slot.uuid, "slot no longer stalled");

            return Ok(None);
        }

        let court = self
            .catalog
            .get_court(&mut tx, slot.court)
            .await?
            .ok_or(NotificationsServiceError::ResourceNotFound(Resource::Court))?;

        if !court.is_active {
            debug!(slot = %slot.uuid, court = %court.uuid, "court closed; offer withheld");

            return Ok(None);
        }

        let promoted = self
            .offers
            .offer_to_head(&mut tx, &slot, &court.name, window)
            .await?;

        tx.commit().await?;

        Ok(promoted)
    }
}

#[async_trait]
impl NotificationsService for PgNotificationsService {
    #[tracing::instrument(
        name = "notifications.service.create_slot_available",
        skip(self),
        fields(user = %user, slot = %slot),
        err
    )]
    async fn create_slot_available(
        &self,
        user: UserUuid,
        slot: SlotUuid,
        point_in_time: Timestamp,
    ) -> Result<Notification, NotificationsServiceError> {
        let window = OfferWindow {
            created_at: point_in_time,
            expires_at: offer_expires_at(point_in_time)?,
        };

        let mut tx = self.db.begin_transaction().await?;

        let slot = self
            .slots
            .get_slot(&mut tx, slot)
            .await?
            .ok_or(NotificationsServiceError::ResourceNotFound(Resource::Slot))?;

        let court = self
            .catalog
            .get_court(&mut tx, slot.court)
            .await?
            .ok_or(NotificationsServiceError::ResourceNotFound(Resource::Court))?;

        let notification = match self.waitlist.lock_entry(&mut tx, user, slot.uuid).await? {
            Some(entry) => {
                self.offers
                    .offer_to_entry(&mut tx, &entry, &slot, &court.name, window)
                    .await?
            }
            None => {
                self.repository
                    .create_notification(
                        &mut tx,
                        &NewNotification {
                            uuid: NotificationUuid::new(),
                            user,
                            slot: slot.uuid,
                            kind: NotificationKind::SlotAvailable,
                            message: slot_available_message(
                                &court.name,
                                slot.date,
                                slot.start_time,
                            ),
                            created_at: window.created_at,
                            expires_at: window.expires_at,
                        },
                    )
                    .await?
            }
        };

        tx.commit().await?;

        Ok(notification)
    }

    async fn mark_read(
        &self,
        notification: NotificationUuid,
        user: UserUuid,
    ) -> Result<bool, NotificationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self
            .repository
            .mark_read(&mut tx, notification, user)
            .await?;

        tx.commit().await?;

        Ok(rows_affected > 0)
    }

    async fn unread_count(
        &self,
        user: UserUuid,
        point_in_time: Timestamp,
    ) -> Result<u64, NotificationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let count = self
            .repository
            .count_unread(&mut tx, user, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(count)
    }

    async fn list(
        &self,
        user: UserUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<Notification>, NotificationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let notifications = self
            .repository
            .list_notifications(&mut tx, user, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(notifications)
    }

    #[tracing::instrument(
        name = "notifications.service.promote_expired",
        skip(self),
        fields(stalled = tracing::field::Empty, promoted = tracing::field::Empty),
        err
    )]
    async fn promote_expired(
        &self,
        point_in_time: Timestamp,
    ) -> Result<SweepReport, NotificationsServiceError> {
        let window = OfferWindow {
            created_at: point_in_time,
            expires_at: offer_expires_at(point_in_time)?,
        };

        let mut tx = self.db.begin_transaction().await?;

        let stalled = self
            .repository
            .list_stalled_slots(&mut tx, point_in_time)
            .await?;

        tx.commit().await?;

        let mut report = SweepReport {
            slots_examined: stalled.len(),
            promoted: Vec::new(),
        };

        for slot in stalled {
            if let Some(notification) = self.promote_slot(slot, window).await? {
                report.promoted.push(notification);
            }
        }

        tracing::Span::current().record("stalled", report.slots_examined);
        tracing::Span::current().record("promoted", report.promoted.len());

        info!(
            stalled = report.slots_examined,
            promoted = report.promoted.len(),
            "expired offer sweep finished"
        );

        Ok(report)
    }
}

#[automock]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    /// Creates a slot-available offer valid for fifteen minutes from `point_in_time` and links it
    /// to the user's waitlist entry for the slot, marking the entry notified.
    async fn create_slot_available(
        &self,
        user: UserUuid,
        slot: SlotUuid,
        point_in_time: Timestamp,
    ) -> Result<Notification, NotificationsServiceError>;

    /// Marks the user's notification read. Returns `false` when no such notification belongs to
    /// the user.
    async fn mark_read(
        &self,
        notification: NotificationUuid,
        user: UserUuid,
    ) -> Result<bool, NotificationsServiceError>;

    /// Unread notifications still live at `point_in_time`.
    async fn unread_count(
        &self,
        user: UserUuid,
        point_in_time: Timestamp,
    ) -> Result<u64, NotificationsServiceError>;

    /// Notifications still live at `point_in_time`, newest first.
    async fn list(
        &self,
        user: UserUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<Notification>, NotificationsServiceError>;

    /// Offers every free slot whose last offer lapsed to the next unnotified user in its queue.
    async fn promote_expired(
        &self,
        point_in_time: Timestamp,
    ) -> Result<SweepReport, NotificationsServiceError>;
}
