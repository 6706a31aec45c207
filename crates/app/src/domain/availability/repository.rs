//! Availability Repository

use jiff::civil::{Date, Time};
use jiff_sqlx::{Date as SqlxDate, Time as SqlxTime};
use rustc_hash::FxHashSet;
use sqlx::{Postgres, Transaction, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::catalog::models::{CoachUuid, CourtUuid, EquipmentUuid};

const COURT_HAS_CONFIRMED_SQL: &str = include_str!("sql/court_has_confirmed.sql");
const COACH_HAS_CONFIRMED_SQL: &str = include_str!("sql/coach_has_confirmed.sql");
const UNITS_HELD_SQL: &str = include_str!("sql/units_held.sql");
const OCCUPIED_STARTS_SQL: &str = include_str!("sql/occupied_starts.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAvailabilityRepository;

impl PgAvailabilityRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Whether a confirmed reservation holds the court at (date, start time).
    pub(crate) async fn court_has_confirmed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        court: CourtUuid,
        date: Date,
        start_time: Time,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(COURT_HAS_CONFIRMED_SQL)
            .bind(court.into_uuid())
            .bind(SqlxDate::from(date))
            .bind(SqlxTime::from(start_time))
            .fetch_one(&mut **tx)
            .await
    }

    /// Whether a confirmed reservation holds the coach at (date, start time) on any court.
    pub(crate) async fn coach_has_confirmed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coach: CoachUuid,
        date: Date,
        start_time: Time,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(COACH_HAS_CONFIRMED_SQL)
            .bind(coach.into_uuid())
            .bind(SqlxDate::from(date))
            .bind(SqlxTime::from(start_time))
            .fetch_one(&mut **tx)
            .await
    }

    /// Units of the equipment held by confirmed reservations at (date, start time).
    #[tracing::instrument(
        name = "availability.repository.units_held",
        skip(self, tx),
        fields(held = tracing::field::Empty),
        err
    )]
    pub(crate) async fn units_held(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        equipment: EquipmentUuid,
        date: Date,
        start_time: Time,
    ) -> Result<u32, sqlx::Error> {
        let held: i64 = query_scalar(UNITS_HELD_SQL)
            .bind(equipment.into_uuid())
            .bind(SqlxDate::from(date))
            .bind(SqlxTime::from(start_time))
            .fetch_one(&mut **tx)
            .await?;

        let held = u32::try_from(held).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        tracing::Span::current().record("held", held);

        Ok(held)
    }

    /// Every (court, start time) on `date` that is flagged booked or held by a confirmed
    /// reservation.
    pub(crate) async fn occupied_starts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        date: Date,
    ) -> Result<FxHashSet<(CourtUuid, Time)>, sqlx::Error> {
        let rows: Vec<(Uuid, SqlxTime)> = query_as(OCCUPIED_STARTS_SQL)
            .bind(SqlxDate::from(date))
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(court, start_time)| (CourtUuid::from_uuid(court), start_time.to_jiff()))
            .collect())
    }
}
