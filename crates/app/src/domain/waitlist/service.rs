//! Waitlist service.

use async_trait::async_trait;
use courtside::slots::slot_end;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        Resource,
        catalog::repository::PgCatalogRepository,
        slots::repository::PgSlotsRepository,
        users::UserUuid,
        waitlist::{
            errors::WaitlistServiceError,
            models::{NewWaitlistEntry, WaitlistEntry},
            repository::PgWaitlistRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgWaitlistService {
    db: Db,
    catalog: PgCatalogRepository,
    slots: PgSlotsRepository,
    repository: PgWaitlistRepository,
}

impl PgWaitlistService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            catalog: PgCatalogRepository::new(),
            slots: PgSlotsRepository::new(),
            repository: PgWaitlistRepository::new(),
        }
    }
}

#[async_trait]
impl WaitlistService for PgWaitlistService {
    #[tracing::instrument(
        name = "waitlist.service.join",
        skip(self, entry),
        fields(
            user = %entry.user,
            court = %entry.court,
            date = %entry.date,
            start_time = %entry.start_time,
            position = tracing::field::Empty
        ),
        err
    )]
    async fn join(&self, entry: NewWaitlistEntry) -> Result<WaitlistEntry, WaitlistServiceError> {
        let end_time = slot_end(entry.start_time)?;

        let mut tx = self.db.begin_transaction().await?;

        self.catalog
            .get_court(&mut tx, entry.court)
            .await?
            .ok_or(WaitlistServiceError::ResourceNotFound(Resource::Court))?;

        let slot = self
            .slots
            .resolve_slot(&mut tx, entry.court, entry.date, entry.start_time, end_time)
            .await?;

        // Serializes position assignment among concurrent joins for this slot.
        let slot = self.slots.lock_slot(&mut tx, slot.uuid).await?;

        if !slot.is_booked {
            return Err(WaitlistServiceError::SlotNotBooked);
        }

        if self
            .repository
            .find_entry(&mut tx, entry.user, slot.uuid)
            .await?
            .is_some()
        {
            return Err(WaitlistServiceError::DuplicateWaitlistEntry);
        }

        let position = self.repository.count_entries(&mut tx, slot.uuid).await? + 1;

        let created = self
            .repository
            .create_entry(
                &mut tx,
                entry.uuid,
                entry.user,
                slot.uuid,
                entry.court,
                position,
            )
            .await?;

        tx.commit().await?;

        tracing::Span::current().record("position", created.position);

        info!(entry = %created.uuid, position = created.position, "joined waitlist");

        Ok(created)
    }

    async fn list_entries(
        &self,
        user: UserUuid,
    ) -> Result<Vec<WaitlistEntry>, WaitlistServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let entries = self.repository.list_user_entries(&mut tx, user).await?;

        tx.commit().await?;

        Ok(entries)
    }
}

#[automock]
#[async_trait]
pub trait WaitlistService: Send + Sync {
    /// Queues the user for an occupied slot at the next position.
    async fn join(&self, entry: NewWaitlistEntry) -> Result<WaitlistEntry, WaitlistServiceError>;

    /// The user's waitlist entries, newest first.
    async fn list_entries(
        &self,
        user: UserUuid,
    ) -> Result<Vec<WaitlistEntry>, WaitlistServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::civil::{Date, Time, date, time};
    use testresult::TestResult;

    use crate::{
        domain::{
            catalog::models::CourtUuid, reservations::ReservationsService,
            waitlist::models::WaitlistEntryUuid,
        },
        test::{TestContext, helpers::new_reservation},
    };

    use super::*;

    fn join_request(user: UserUuid, court: CourtUuid, date: Date, start: Time) -> NewWaitlistEntry {
        NewWaitlistEntry {
            uuid: WaitlistEntryUuid::new(),
            user,
            court,
            date,
            start_time: start,
        }
    }

    #[tokio::test]
    async fn positions_follow_arrival_order() -> TestResult {
        let ctx = TestContext::new().await;
        let day = date(2025, 12, 16);
        let start = time(18, 0, 0, 0);

        ctx.reservations
            .reserve(new_reservation(UserUuid::new(), ctx.indoor_court, day, start))
            .await?;

        let mut positions = Vec::new();

        for _ in 0..3 {
            let entry = ctx
                .waitlist
                .join(join_request(UserUuid::new(), ctx.indoor_court, day, start))
                .await?;

            positions.push(entry.position);
        }

        assert_eq!(positions, vec![1, 2, 3]);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_join_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let day = date(2025, 12, 16);
        let start = time(18, 0, 0, 0);
        let user = UserUuid::new();

        ctx.reservations
            .reserve(new_reservation(UserUuid::new(), ctx.indoor_court, day, start))
            .await?;

        ctx.waitlist
            .join(join_request(user, ctx.indoor_court, day, start))
            .await?;

        let result = ctx
            .waitlist
            .join(join_request(user, ctx.indoor_court, day, start))
            .await;

        assert!(
            matches!(result, Err(WaitlistServiceError::DuplicateWaitlistEntry)),
            "expected DuplicateWaitlistEntry, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn reused_entry_uuid_is_not_reported_as_a_duplicate_join() -> TestResult {
        let ctx = TestContext::new().await;
        let day = date(2025, 12, 16);

        for court in [ctx.indoor_court, ctx.outdoor_court] {
            ctx.reservations
                .reserve(new_reservation(UserUuid::new(), court, day, time(18, 0, 0, 0)))
                .await?;
        }

        let first = join_request(UserUuid::new(), ctx.indoor_court, day, time(18, 0, 0, 0));
        let uuid = first.uuid;
        ctx.waitlist.join(first).await?;

        let mut second = join_request(UserUuid::new(), ctx.outdoor_court, day, time(18, 0, 0, 0));
        second.uuid = uuid;

        let result = ctx.waitlist.join(second).await;

        assert!(
            matches!(result, Err(WaitlistServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn joining_a_free_slot_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .waitlist
            .join(join_request(
                UserUuid::new(),
                ctx.indoor_court,
                date(2025, 12, 16),
                time(18, 0, 0, 0),
            ))
            .await;

        assert!(
            matches!(result, Err(WaitlistServiceError::SlotNotBooked)),
            "expected SlotNotBooked, got {result:?}"
        );
    }

    #[tokio::test]
    async fn joining_unknown_court_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .waitlist
            .join(join_request(
                UserUuid::new(),
                CourtUuid::new(),
                date(2025, 12, 16),
                time(18, 0, 0, 0),
            ))
            .await;

        assert!(
            matches!(
                result,
                Err(WaitlistServiceError::ResourceNotFound(Resource::Court))
            ),
            "expected ResourceNotFound(Court), got {result:?}"
        );
    }

    #[tokio::test]
    async fn positions_are_not_reused_after_promotion() -> TestResult {
        let ctx = TestContext::new().await;
        let day = date(2025, 12, 16);
        let start = time(18, 0, 0, 0);
        let first = UserUuid::new();

        let reservation = ctx
            .reservations
            .reserve(new_reservation(UserUuid::new(), ctx.indoor_court, day, start))
            .await?;

        ctx.waitlist
            .join(join_request(first, ctx.indoor_court, day, start))
            .await?;

        ctx.reservations.cancel(reservation.uuid).await?;
        ctx.reservations
            .reserve(new_reservation(first, ctx.indoor_court, day, start))
            .await?;

        let late = ctx
            .waitlist
            .join(join_request(UserUuid::new(), ctx.indoor_court, day, start))
            .await?;

        assert_eq!(late.position, 2);

        Ok(())
    }

    #[tokio::test]
    async fn list_entries_returns_newest_first() -> TestResult {
        let ctx = TestContext::new().await;
        let day = date(2025, 12, 16);
        let user = UserUuid::new();

        for start in [time(10, 0, 0, 0), time(11, 0, 0, 0)] {
            ctx.reservations
                .reserve(new_reservation(UserUuid::new(), ctx.indoor_court, day, start))
                .await?;
            ctx.waitlist
                .join(join_request(user, ctx.indoor_court, day, start))
                .await?;
        }

        let entries = ctx.waitlist.list_entries(user).await?;
        let starts: Vec<_> = entries.iter().map(|entry| entry.created_at).collect();

        assert_eq!(entries.len(), 2);
        assert!(starts.windows(2).all(|pair| pair[0] >= pair[1]));

        Ok(())
    }
}
