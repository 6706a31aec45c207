//! Catalog service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        models::{
            Coach, CoachUuid, Court, CourtUuid, Equipment, EquipmentUuid, NewCoach, NewCourt,
            NewEquipment, NewPricingRule, PricingRuleRecord,
        },
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn create_court(&self, court: NewCourt) -> Result<Court, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_court(&mut tx, &court).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_court(&self, court: CourtUuid) -> Result<Court, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let court = self
            .repository
            .get_court(&mut tx, court)
            .await?
            .ok_or(CatalogServiceError::NotFound)?;

        tx.commit().await?;

        Ok(court)
    }

    async fn list_courts(&self, active_only: bool) -> Result<Vec<Court>, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let courts = self.repository.list_courts(&mut tx, active_only).await?;

        tx.commit().await?;

        Ok(courts)
    }

    async fn set_court_active(
        &self,
        court: CourtUuid,
        is_active: bool,
    ) -> Result<Court, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .set_court_active(&mut tx, court, is_active)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn create_equipment(
        &self,
        equipment: NewEquipment,
    ) -> Result<Equipment, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_equipment(&mut tx, &equipment).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_equipment(
        &self,
        equipment: EquipmentUuid,
    ) -> Result<Equipment, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let equipment = self
            .repository
            .get_equipment(&mut tx, equipment)
            .await?
            .ok_or(CatalogServiceError::NotFound)?;

        tx.commit().await?;

        Ok(equipment)
    }

    async fn list_equipment(&self) -> Result<Vec<Equipment>, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let equipment = self.repository.list_equipment(&mut tx).await?;

        tx.commit().await?;

        Ok(equipment)
    }

    async fn create_coach(&self, coach: NewCoach) -> Result<Coach, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_coach(&mut tx, &coach).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_coach(&self, coach: CoachUuid) -> Result<Coach, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let coach = self
            .repository
            .get_coach(&mut tx, coach)
            .await?
            .ok_or(CatalogServiceError::NotFound)?;

        tx.commit().await?;

        Ok(coach)
    }

    async fn list_coaches(&self) -> Result<Vec<Coach>, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let coaches = self.repository.list_coaches(&mut tx).await?;

        tx.commit().await?;

        Ok(coaches)
    }

    async fn create_pricing_rule(
        &self,
        rule: NewPricingRule,
    ) -> Result<PricingRuleRecord, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_pricing_rule(&mut tx, &rule).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn active_pricing_rule(&self) -> Result<Option<PricingRuleRecord>, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rule = self.repository.get_active_pricing_rule(&mut tx).await?;

        tx.commit().await?;

        Ok(rule)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Creates a court.
    async fn create_court(&self, court: NewCourt) -> Result<Court, CatalogServiceError>;

    /// Retrieve a single court.
    async fn get_court(&self, court: CourtUuid) -> Result<Court, CatalogServiceError>;

    /// Lists courts ordered by name, optionally only those open for booking.
    async fn list_courts(&self, active_only: bool) -> Result<Vec<Court>, CatalogServiceError>;

    /// Opens or closes a court for booking.
    async fn set_court_active(
        &self,
        court: CourtUuid,
        is_active: bool,
    ) -> Result<Court, CatalogServiceError>;

    /// Creates an equipment item with its owned stock.
    async fn create_equipment(
        &self,
        equipment: NewEquipment,
    ) -> Result<Equipment, CatalogServiceError>;

    /// Retrieve a single equipment item.
    async fn get_equipment(
        &self,
        equipment: EquipmentUuid,
    ) -> Result<Equipment, CatalogServiceError>;

    /// Lists equipment ordered by name.
    async fn list_equipment(&self) -> Result<Vec<Equipment>, CatalogServiceError>;

    /// Creates a coach with a weekly allow-list of start times.
    async fn create_coach(&self, coach: NewCoach) -> Result<Coach, CatalogServiceError>;

    /// Retrieve a single coach.
    async fn get_coach(&self, coach: CoachUuid) -> Result<Coach, CatalogServiceError>;

    /// Lists coaches ordered by name.
    async fn list_coaches(&self) -> Result<Vec<Coach>, CatalogServiceError>;

    /// Stores a pricing rule. An activated rule replaces the current active rule.
    async fn create_pricing_rule(
        &self,
        rule: NewPricingRule,
    ) -> Result<PricingRuleRecord, CatalogServiceError>;

    /// The rule currently used to price bookings, if one is configured.
    async fn active_pricing_rule(&self) -> Result<Option<PricingRuleRecord>, CatalogServiceError>;
}
