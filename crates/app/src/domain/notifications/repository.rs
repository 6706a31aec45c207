//! Notifications Repository

use courtside::notifications::NotificationKind;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    notifications::models::{NewNotification, Notification, NotificationUuid},
    slots::models::SlotUuid,
    users::UserUuid,
};

const CREATE_NOTIFICATION_SQL: &str = include_str!("sql/create_notification.sql");
const MARK_NOTIFICATION_READ_SQL: &str = include_str!("sql/mark_notification_read.sql");
const COUNT_UNREAD_NOTIFICATIONS_SQL: &str = include_str!("sql/count_unread_notifications.sql");
const LIST_NOTIFICATIONS_SQL: &str = include_str!("sql/list_notifications.sql");
const HAS_LIVE_OFFER_SQL: &str = include_str!("sql/has_live_offer.sql");
const LIST_STALLED_SLOTS_SQL: &str = include_str!("sql/list_stalled_slots.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgNotificationsRepository;

impl PgNotificationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_notification(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        notification: &NewNotification,
    ) -> Result<Notification, sqlx::Error> {
        query_as::<Postgres, Notification>(CREATE_NOTIFICATION_SQL)
            .bind(notification.uuid.into_uuid())
            .bind(notification.user.into_uuid())
            .bind(notification.slot.into_uuid())
            .bind(notification.kind.as_str())
            .bind(&notification.message)
            .bind(SqlxTimestamp::from(notification.created_at))
            .bind(SqlxTimestamp::from(notification.expires_at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn mark_read(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        notification: NotificationUuid,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_NOTIFICATION_READ_SQL)
            .bind(notification.into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn count_unread(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        point_in_time: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_UNREAD_NOTIFICATIONS_SQL)
            .bind(user.into_uuid())
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    pub(crate) async fn list_notifications(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        query_as::<Postgres, Notification>(LIST_NOTIFICATIONS_SQL)
            .bind(user.into_uuid())
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn has_live_offer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slot: SlotUuid,
        point_in_time: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(HAS_LIVE_OFFER_SQL)
            .bind(slot.into_uuid())
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_one(&mut **tx)
            .await
    }

    /// Free slots whose queue still has unnotified users but no live offer.
    pub(crate) async fn list_stalled_slots(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        point_in_time: Timestamp,
    ) -> Result<Vec<SlotUuid>, sqlx::Error> {
        let slots: Vec<Uuid> = query_scalar(LIST_STALLED_SLOTS_SQL)
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_all(&mut **tx)
            .await?;

        Ok(slots.into_iter().map(SlotUuid::from_uuid).collect())
    }
}

impl<'r> FromRow<'r, PgRow> for Notification {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind = row
            .try_get::<String, _>("kind")?
            .parse::<NotificationKind>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "kind".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: NotificationUuid::from_uuid(row.try_get("uuid")?),
            user: UserUuid::from_uuid(row.try_get("user_uuid")?),
            slot: SlotUuid::from_uuid(row.try_get("slot_uuid")?),
            kind,
            message: row.try_get("message")?,
            is_read: row.try_get("is_read")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
        })
    }
}
