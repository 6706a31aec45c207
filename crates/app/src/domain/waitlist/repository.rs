//! Waitlist Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    catalog::models::CourtUuid,
    notifications::models::NotificationUuid,
    slots::models::SlotUuid,
    users::UserUuid,
    waitlist::models::{WaitlistEntry, WaitlistEntryUuid},
};

const CREATE_WAITLIST_ENTRY_SQL: &str = include_str!("sql/create_waitlist_entry.sql");
const FIND_WAITLIST_ENTRY_SQL: &str = include_str!("sql/find_waitlist_entry.sql");
const LOCK_WAITLIST_ENTRY_SQL: &str = include_str!("sql/lock_waitlist_entry.sql");
const COUNT_WAITLIST_ENTRIES_SQL: &str = include_str!("sql/count_waitlist_entries.sql");
const LOCK_NEXT_PENDING_ENTRY_SQL: &str = include_str!("sql/lock_next_pending_entry.sql");
const MARK_ENTRY_NOTIFIED_SQL: &str = include_str!("sql/mark_entry_notified.sql");
const LIST_USER_ENTRIES_SQL: &str = include_str!("sql/list_user_entries.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWaitlistRepository;

impl PgWaitlistRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: WaitlistEntryUuid,
        user: UserUuid,
        slot: SlotUuid,
        court: CourtUuid,
        position: u32,
    ) -> Result<WaitlistEntry, sqlx::Error> {
        let position = i32::try_from(position).map_err(|e| sqlx::Error::ColumnDecode {
            index: "position".to_string(),
            source: Box::new(e),
        })?;

        query_as::<Postgres, WaitlistEntry>(CREATE_WAITLIST_ENTRY_SQL)
            .bind(entry.into_uuid())
            .bind(user.into_uuid())
            .bind(slot.into_uuid())
            .bind(court.into_uuid())
            .bind(position)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        slot: SlotUuid,
    ) -> Result<Option<WaitlistEntry>, sqlx::Error> {
        query_as::<Postgres, WaitlistEntry>(FIND_WAITLIST_ENTRY_SQL)
            .bind(user.into_uuid())
            .bind(slot.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn lock_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        slot: SlotUuid,
    ) -> Result<Option<WaitlistEntry>, sqlx::Error> {
        query_as::<Postgres, WaitlistEntry>(LOCK_WAITLIST_ENTRY_SQL)
            .bind(user.into_uuid())
            .bind(slot.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Number of entries ever queued for the slot. Caller must hold the slot's row lock.
    pub(crate) async fn count_entries(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slot: SlotUuid,
    ) -> Result<u32, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_WAITLIST_ENTRIES_SQL)
            .bind(slot.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        u32::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    /// Oldest entry for the slot that has not been offered the slot yet, locked.
    #[tracing::instrument(
        name = "waitlist.repository.lock_next_pending",
        skip(self, tx),
        fields(slot = %slot),
        err
    )]
    pub(crate) async fn lock_next_pending(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slot: SlotUuid,
    ) -> Result<Option<WaitlistEntry>, sqlx::Error> {
        query_as::<Postgres, WaitlistEntry>(LOCK_NEXT_PENDING_ENTRY_SQL)
            .bind(slot.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn mark_notified(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: WaitlistEntryUuid,
        notification: NotificationUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_ENTRY_NOTIFIED_SQL)
            .bind(entry.into_uuid())
            .bind(notification.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_user_entries(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<WaitlistEntry>, sqlx::Error> {
        query_as::<Postgres, WaitlistEntry>(LIST_USER_ENTRIES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for WaitlistEntry {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let position_i32: i32 = row.try_get("position")?;

        let position = u32::try_from(position_i32).map_err(|e| sqlx::Error::ColumnDecode {
            index: "position".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: WaitlistEntryUuid::from_uuid(row.try_get("uuid")?),
            user: UserUuid::from_uuid(row.try_get("user_uuid")?),
            slot: SlotUuid::from_uuid(row.try_get("slot_uuid")?),
            court: CourtUuid::from_uuid(row.try_get("court_uuid")?),
            position,
            notified: row.try_get("notified")?,
            notification: row
                .try_get::<Option<Uuid>, _>("notification_uuid")?
                .map(NotificationUuid::from_uuid),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
