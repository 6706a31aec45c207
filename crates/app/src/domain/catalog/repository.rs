//! Catalog Repository

use courtside::{coaching::WeeklyAvailability, courts::CourtKind, pricing::PricingRule};
use jiff_sqlx::{Time as SqlxTime, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json};
use uuid::Uuid;

use crate::domain::catalog::models::{
    Coach, CoachUuid, Court, CourtUuid, Equipment, EquipmentUuid, NewCoach, NewCourt,
    NewEquipment, NewPricingRule, PricingRuleRecord, PricingRuleUuid,
};

const CREATE_COURT_SQL: &str = include_str!("sql/create_court.sql");
const GET_COURT_SQL: &str = include_str!("sql/get_court.sql");
const LOCK_COURT_SQL: &str = include_str!("sql/lock_court.sql");
const LIST_COURTS_SQL: &str = include_str!("sql/list_courts.sql");
const UPDATE_COURT_ACTIVE_SQL: &str = include_str!("sql/update_court_active.sql");
const CREATE_EQUIPMENT_SQL: &str = include_str!("sql/create_equipment.sql");
const GET_EQUIPMENT_SQL: &str = include_str!("sql/get_equipment.sql");
const LOCK_EQUIPMENT_SQL: &str = include_str!("sql/lock_equipment.sql");
const LIST_EQUIPMENT_SQL: &str = include_str!("sql/list_equipment.sql");
const FIND_EQUIPMENT_SQL: &str = include_str!("sql/find_equipment.sql");
const CREATE_COACH_SQL: &str = include_str!("sql/create_coach.sql");
const GET_COACH_SQL: &str = include_str!("sql/get_coach.sql");
const LOCK_COACH_SQL: &str = include_str!("sql/lock_coach.sql");
const LIST_COACHES_SQL: &str = include_str!("sql/list_coaches.sql");
const DEACTIVATE_PRICING_RULES_SQL: &str = include_str!("sql/deactivate_pricing_rules.sql");
const CREATE_PRICING_RULE_SQL: &str = include_str!("sql/create_pricing_rule.sql");
const GET_ACTIVE_PRICING_RULE_SQL: &str = include_str!("sql/get_active_pricing_rule.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_court(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        court: &NewCourt,
    ) -> Result<Court, sqlx::Error> {
        query_as::<Postgres, Court>(CREATE_COURT_SQL)
            .bind(court.uuid.into_uuid())
            .bind(&court.name)
            .bind(court.kind.as_str())
            .bind(court.is_active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_court(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        court: CourtUuid,
    ) -> Result<Option<Court>, sqlx::Error> {
        query_as::<Postgres, Court>(GET_COURT_SQL)
            .bind(court.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Fetch the court and hold its row lock until the transaction ends.
    #[tracing::instrument(
        name = "catalog.repository.lock_court",
        skip(self, tx),
        fields(court = %court),
        err
    )]
    pub(crate) async fn lock_court(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        court: CourtUuid,
    ) -> Result<Option<Court>, sqlx::Error> {
        query_as::<Postgres, Court>(LOCK_COURT_SQL)
            .bind(court.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_courts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        active_only: bool,
    ) -> Result<Vec<Court>, sqlx::Error> {
        query_as::<Postgres, Court>(LIST_COURTS_SQL)
            .bind(active_only)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn set_court_active(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        court: CourtUuid,
        is_active: bool,
    ) -> Result<Court, sqlx::Error> {
        query_as::<Postgres, Court>(UPDATE_COURT_ACTIVE_SQL)
            .bind(court.into_uuid())
            .bind(is_active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_equipment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        equipment: &NewEquipment,
    ) -> Result<Equipment, sqlx::Error> {
        let stock = i32::try_from(equipment.stock).map_err(|e| sqlx::Error::ColumnDecode {
            index: "stock".to_string(),
            source: Box::new(e),
        })?;

        query_as::<Postgres, Equipment>(CREATE_EQUIPMENT_SQL)
            .bind(equipment.uuid.into_uuid())
            .bind(&equipment.name)
            .bind(&equipment.category)
            .bind(stock)
            .bind(equipment.hourly_rate)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_equipment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        equipment: EquipmentUuid,
    ) -> Result<Option<Equipment>, sqlx::Error> {
        query_as::<Postgres, Equipment>(GET_EQUIPMENT_SQL)
            .bind(equipment.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Fetch the equipment and hold its row lock until the transaction ends.
    #[tracing::instrument(
        name = "catalog.repository.lock_equipment",
        skip(self, tx),
        fields(equipment = %equipment),
        err
    )]
    pub(crate) async fn lock_equipment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        equipment: EquipmentUuid,
    ) -> Result<Option<Equipment>, sqlx::Error> {
        query_as::<Postgres, Equipment>(LOCK_EQUIPMENT_SQL)
            .bind(equipment.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_equipment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Equipment>, sqlx::Error> {
        query_as::<Postgres, Equipment>(LIST_EQUIPMENT_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Fetch the distinct equipment among `uuids`; unknown ids are absent from the result.
    pub(crate) async fn find_equipment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuids: &[EquipmentUuid],
    ) -> Result<Vec<Equipment>, sqlx::Error> {
        let uuids: Vec<Uuid> = uuids.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, Equipment>(FIND_EQUIPMENT_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_coach(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coach: &NewCoach,
    ) -> Result<Coach, sqlx::Error> {
        query_as::<Postgres, Coach>(CREATE_COACH_SQL)
            .bind(coach.uuid.into_uuid())
            .bind(&coach.name)
            .bind(coach.hourly_rate)
            .bind(Json(&coach.availability))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_coach(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coach: CoachUuid,
    ) -> Result<Option<Coach>, sqlx::Error> {
        query_as::<Postgres, Coach>(GET_COACH_SQL)
            .bind(coach.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Fetch the coach and hold its row lock until the transaction ends.
    #[tracing::instrument(
        name = "catalog.repository.lock_coach",
        skip(self, tx),
        fields(coach = %coach),
        err
    )]
    pub(crate) async fn lock_coach(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coach: CoachUuid,
    ) -> Result<Option<Coach>, sqlx::Error> {
        query_as::<Postgres, Coach>(LOCK_COACH_SQL)
            .bind(coach.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_coaches(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Coach>, sqlx::Error> {
        query_as::<Postgres, Coach>(LIST_COACHES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_pricing_rule(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rule: &NewPricingRule,
    ) -> Result<PricingRuleRecord, sqlx::Error> {
        if rule.activate {
            query(DEACTIVATE_PRICING_RULES_SQL)
                .execute(&mut **tx)
                .await?;
        }

        query_as::<Postgres, PricingRuleRecord>(CREATE_PRICING_RULE_SQL)
            .bind(rule.uuid.into_uuid())
            .bind(&rule.rule.name)
            .bind(SqlxTime::from(rule.rule.peak_start))
            .bind(SqlxTime::from(rule.rule.peak_end))
            .bind(rule.rule.peak_multiplier)
            .bind(rule.rule.weekend_multiplier)
            .bind(rule.rule.indoor_multiplier)
            .bind(rule.rule.base_price)
            .bind(rule.activate)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_active_pricing_rule(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<PricingRuleRecord>, sqlx::Error> {
        query_as::<Postgres, PricingRuleRecord>(GET_ACTIVE_PRICING_RULE_SQL)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Court {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind = row
            .try_get::<String, _>("kind")?
            .parse::<CourtKind>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "kind".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: CourtUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            kind,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Equipment {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let stock_i32: i32 = row.try_get("stock")?;

        let stock = u32::try_from(stock_i32).map_err(|e| sqlx::Error::ColumnDecode {
            index: "stock".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: EquipmentUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            stock,
            hourly_rate: row.try_get("hourly_rate")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Coach {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CoachUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            hourly_rate: row.try_get("hourly_rate")?,
            availability: row
                .try_get::<Json<WeeklyAvailability>, _>("availability")?
                .0,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for PricingRuleRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PricingRuleUuid::from_uuid(row.try_get("uuid")?),
            rule: PricingRule {
                name: row.try_get("name")?,
                peak_start: row.try_get::<SqlxTime, _>("peak_start")?.to_jiff(),
                peak_end: row.try_get::<SqlxTime, _>("peak_end")?.to_jiff(),
                peak_multiplier: row.try_get("peak_multiplier")?,
                weekend_multiplier: row.try_get("weekend_multiplier")?,
                indoor_multiplier: row.try_get("indoor_multiplier")?,
                base_price: row.try_get("base_price")?,
            },
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
