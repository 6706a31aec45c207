//! Slots Repository

use jiff::civil::{Date, Time};
use jiff_sqlx::{Date as SqlxDate, Time as SqlxTime, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    catalog::models::CourtUuid,
    slots::models::{Slot, SlotUuid},
};

const RESOLVE_SLOT_SQL: &str = include_str!("sql/resolve_slot.sql");
const FIND_SLOT_SQL: &str = include_str!("sql/find_slot.sql");
const GET_SLOT_SQL: &str = include_str!("sql/get_slot.sql");
const LOCK_SLOT_SQL: &str = include_str!("sql/lock_slot.sql");
const SET_SLOT_BOOKED_SQL: &str = include_str!("sql/set_slot_booked.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSlotsRepository;

impl PgSlotsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Return the slot for the key, inserting it first when absent.
    ///
    /// Concurrent callers racing on the same key converge on one row: the losing insert waits on
    /// the unique constraint and then reads the winner's row.
    #[tracing::instrument(
        name = "slots.repository.resolve_slot",
        skip(self, tx),
        fields(court = %court, %date, %start_time, created = tracing::field::Empty),
        err
    )]
    pub(crate) async fn resolve_slot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        court: CourtUuid,
        date: Date,
        start_time: Time,
        end_time: Time,
    ) -> Result<Slot, sqlx::Error> {
        let inserted = query_as::<Postgres, Slot>(RESOLVE_SLOT_SQL)
            .bind(SlotUuid::new().into_uuid())
            .bind(court.into_uuid())
            .bind(SqlxDate::from(date))
            .bind(SqlxTime::from(start_time))
            .bind(SqlxTime::from(end_time))
            .fetch_optional(&mut **tx)
            .await?;

        tracing::Span::current().record("created", inserted.is_some());

        match inserted {
            Some(slot) => Ok(slot),
            None => self
                .find_slot(tx, court, date, start_time)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    pub(crate) async fn find_slot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        court: CourtUuid,
        date: Date,
        start_time: Time,
    ) -> Result<Option<Slot>, sqlx::Error> {
        query_as::<Postgres, Slot>(FIND_SLOT_SQL)
            .bind(court.into_uuid())
            .bind(SqlxDate::from(date))
            .bind(SqlxTime::from(start_time))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_slot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slot: SlotUuid,
    ) -> Result<Option<Slot>, sqlx::Error> {
        query_as::<Postgres, Slot>(GET_SLOT_SQL)
            .bind(slot.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Fetch the slot and hold its row lock until the transaction ends.
    #[tracing::instrument(
        name = "slots.repository.lock_slot",
        skip(self, tx),
        fields(slot = %slot),
        err
    )]
    pub(crate) async fn lock_slot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slot: SlotUuid,
    ) -> Result<Slot, sqlx::Error> {
        query_as::<Postgres, Slot>(LOCK_SLOT_SQL)
            .bind(slot.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Caller must hold the slot's row lock.
    pub(crate) async fn set_booked(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slot: SlotUuid,
        is_booked: bool,
    ) -> Result<Slot, sqlx::Error> {
        query_as::<Postgres, Slot>(SET_SLOT_BOOKED_SQL)
            .bind(slot.into_uuid())
            .bind(is_booked)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Slot {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: SlotUuid::from_uuid(row.try_get("uuid")?),
            court: CourtUuid::from_uuid(row.try_get("court_uuid")?),
            date: row.try_get::<SqlxDate, _>("date")?.to_jiff(),
            start_time: row.try_get::<SqlxTime, _>("start_time")?.to_jiff(),
            end_time: row.try_get::<SqlxTime, _>("end_time")?.to_jiff(),
            is_booked: row.try_get("is_booked")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
