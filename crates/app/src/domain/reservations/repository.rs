//! Reservations Repository

use courtside::reservations::ReservationStatus;
use jiff::Timestamp;
use jiff_sqlx::{Date as SqlxDate, Time as SqlxTime, Timestamp as SqlxTimestamp};
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    catalog::models::{CoachUuid, CourtUuid, EquipmentUuid},
    reservations::models::{EquipmentHolding, Reservation, ReservationSummary, ReservationUuid},
    slots::models::SlotUuid,
    users::UserUuid,
};

const CREATE_RESERVATION_SQL: &str = include_str!("sql/create_reservation.sql");
const CREATE_RESERVATION_EQUIPMENT_SQL: &str = include_str!("sql/create_reservation_equipment.sql");
const GET_RESERVATION_SQL: &str = include_str!("sql/get_reservation.sql");
const LOCK_RESERVATION_SQL: &str = include_str!("sql/lock_reservation.sql");
const LIST_USER_RESERVATIONS_SQL: &str = include_str!("sql/list_user_reservations.sql");
const LIST_RESERVATION_EQUIPMENT_SQL: &str = include_str!("sql/list_reservation_equipment.sql");
const UPDATE_RESERVATION_STATUS_SQL: &str = include_str!("sql/update_reservation_status.sql");
const SUMMARIZE_USER_RESERVATIONS_SQL: &str =
    include_str!("sql/summarize_user_reservations.sql");

/// Columns of a reservation row to insert.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReservationRow {
    pub uuid: ReservationUuid,
    pub user: UserUuid,
    pub court: CourtUuid,
    pub coach: Option<CoachUuid>,
    pub slot: SlotUuid,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReservationsRepository;

impl PgReservationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert a confirmed reservation with its equipment holdings.
    #[tracing::instrument(
        name = "reservations.repository.create_reservation",
        skip(self, tx, row, holdings),
        fields(reservation = %row.uuid, slot = %row.slot, holdings = holdings.len()),
        err
    )]
    pub(crate) async fn create_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        row: ReservationRow,
        holdings: Vec<EquipmentHolding>,
    ) -> Result<Reservation, sqlx::Error> {
        let mut reservation = query_as::<Postgres, Reservation>(CREATE_RESERVATION_SQL)
            .bind(row.uuid.into_uuid())
            .bind(row.user.into_uuid())
            .bind(row.court.into_uuid())
            .bind(row.coach.map(CoachUuid::into_uuid))
            .bind(row.slot.into_uuid())
            .bind(row.total_price)
            .fetch_one(&mut **tx)
            .await?;

        if !holdings.is_empty() {
            let equipment: Vec<Uuid> = holdings
                .iter()
                .map(|holding| holding.equipment.into_uuid())
                .collect();

            let quantities = holdings
                .iter()
                .map(|holding| {
                    i32::try_from(holding.quantity).map_err(|e| sqlx::Error::ColumnDecode {
                        index: "quantity".to_string(),
                        source: Box::new(e),
                    })
                })
                .collect::<Result<Vec<i32>, _>>()?;

            query(CREATE_RESERVATION_EQUIPMENT_SQL)
                .bind(row.uuid.into_uuid())
                .bind(&equipment)
                .bind(&quantities)
                .execute(&mut **tx)
                .await?;
        }

        reservation.equipment = holdings;

        Ok(reservation)
    }

    pub(crate) async fn get_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reservation: ReservationUuid,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let found = query_as::<Postgres, Reservation>(GET_RESERVATION_SQL)
            .bind(reservation.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        match found {
            Some(reservation) => Ok(self.attach_holdings(tx, vec![reservation]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Fetch the reservation and hold its row lock until the transaction ends.
    #[tracing::instrument(
        name = "reservations.repository.lock_reservation",
        skip(self, tx),
        fields(reservation = %reservation),
        err
    )]
    pub(crate) async fn lock_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reservation: ReservationUuid,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let found = query_as::<Postgres, Reservation>(LOCK_RESERVATION_SQL)
            .bind(reservation.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        match found {
            Some(reservation) => Ok(self.attach_holdings(tx, vec![reservation]).await?.pop()),
            None => Ok(None),
        }
    }

    pub(crate) async fn list_user_reservations(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        let reservations = query_as::<Postgres, Reservation>(LIST_USER_RESERVATIONS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        self.attach_holdings(tx, reservations).await
    }

    /// Caller must hold the reservation's row lock.
    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reservation: ReservationUuid,
        status: ReservationStatus,
    ) -> Result<Timestamp, sqlx::Error> {
        let updated_at: SqlxTimestamp = query_scalar(UPDATE_RESERVATION_STATUS_SQL)
            .bind(reservation.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await?;

        Ok(updated_at.to_jiff())
    }

    pub(crate) async fn summarize_user_reservations(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<ReservationSummary, sqlx::Error> {
        let (active, total_spent): (i64, Decimal) = query_as(SUMMARIZE_USER_RESERVATIONS_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        let active = u64::try_from(active).map_err(|e| sqlx::Error::ColumnDecode {
            index: "active_count".to_string(),
            source: Box::new(e),
        })?;

        Ok(ReservationSummary {
            active,
            total_spent,
        })
    }

    async fn attach_holdings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut reservations: Vec<Reservation>,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        if reservations.is_empty() {
            return Ok(reservations);
        }

        let uuids: Vec<Uuid> = reservations
            .iter()
            .map(|reservation| reservation.uuid.into_uuid())
            .collect();

        let rows: Vec<(Uuid, Uuid, i32)> = query_as(LIST_RESERVATION_EQUIPMENT_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut holdings: FxHashMap<ReservationUuid, Vec<EquipmentHolding>> =
            FxHashMap::default();

        for (reservation, equipment, quantity) in rows {
            let quantity = u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
                index: "quantity".to_string(),
                source: Box::new(e),
            })?;

            holdings
                .entry(ReservationUuid::from_uuid(reservation))
                .or_default()
                .push(EquipmentHolding {
                    equipment: EquipmentUuid::from_uuid(equipment),
                    quantity,
                });
        }

        for reservation in &mut reservations {
            reservation.equipment = holdings.remove(&reservation.uuid).unwrap_or_default();
        }

        Ok(reservations)
    }
}

impl<'r> FromRow<'r, PgRow> for Reservation {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = row
            .try_get::<String, _>("status")?
            .parse::<ReservationStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: ReservationUuid::from_uuid(row.try_get("uuid")?),
            user: UserUuid::from_uuid(row.try_get("user_uuid")?),
            court: CourtUuid::from_uuid(row.try_get("court_uuid")?),
            coach: row
                .try_get::<Option<Uuid>, _>("coach_uuid")?
                .map(CoachUuid::from_uuid),
            slot: SlotUuid::from_uuid(row.try_get("slot_uuid")?),
            date: row.try_get::<SqlxDate, _>("date")?.to_jiff(),
            start_time: row.try_get::<SqlxTime, _>("start_time")?.to_jiff(),
            end_time: row.try_get::<SqlxTime, _>("end_time")?.to_jiff(),
            equipment: Vec::new(),
            total_price: row.try_get("total_price")?,
            status,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
