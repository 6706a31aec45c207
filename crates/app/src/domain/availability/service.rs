//! Availability service.

use async_trait::async_trait;
use courtside::{
    inventory::{EquipmentDemand, can_hold, remaining_units},
    slots::{day_grid_starts, slot_end},
};
use jiff::civil::{Date, Time};
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        Resource,
        availability::{
            errors::AvailabilityServiceError,
            models::{CourtDay, GridCell},
            repository::PgAvailabilityRepository,
        },
        catalog::{
            models::{CoachUuid, CourtUuid, EquipmentUuid},
            repository::PgCatalogRepository,
        },
        slots::repository::PgSlotsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgAvailabilityService {
    db: Db,
    catalog: PgCatalogRepository,
    slots: PgSlotsRepository,
    repository: PgAvailabilityRepository,
}

impl PgAvailabilityService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            catalog: PgCatalogRepository::new(),
            slots: PgSlotsRepository::new(),
            repository: PgAvailabilityRepository::new(),
        }
    }
}

#[async_trait]
impl AvailabilityService for PgAvailabilityService {
    #[tracing::instrument(
        name = "availability.service.is_court_free",
        skip(self),
        fields(court = %court, %date, %start_time),
        err
    )]
    async fn is_court_free(
        &self,
        court: CourtUuid,
        date: Date,
        start_time: Time,
    ) -> Result<bool, AvailabilityServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let flagged = self
            .slots
            .find_slot(&mut tx, court, date, start_time)
            .await?
            .is_some_and(|slot| slot.is_booked);

        let held = flagged
            || self
                .repository
                .court_has_confirmed(&mut tx, court, date, start_time)
                .await?;

        tx.commit().await?;

        Ok(!held)
    }

    #[tracing::instrument(
        name = "availability.service.is_coach_free",
        skip(self),
        fields(coach = %coach, %date, %start_time),
        err
    )]
    async fn is_coach_free(
        &self,
        coach: CoachUuid,
        date: Date,
        start_time: Time,
    ) -> Result<bool, AvailabilityServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let coach_record = self
            .catalog
            .get_coach(&mut tx, coach)
            .await?
            .ok_or(AvailabilityServiceError::ResourceNotFound(Resource::Coach))?;

        let free = !self
            .repository
            .coach_has_confirmed(&mut tx, coach, date, start_time)
            .await?
            && coach_record.availability.permits(date, start_time);

        tx.commit().await?;

        Ok(free)
    }

    #[tracing::instrument(
        name = "availability.service.is_equipment_free",
        skip(self, equipment),
        fields(requested = equipment.len(), %date, %start_time),
        err
    )]
    async fn is_equipment_free(
        &self,
        equipment: Vec<EquipmentUuid>,
        date: Date,
        start_time: Time,
    ) -> Result<bool, AvailabilityServiceError> {
        let demand = EquipmentDemand::tally(equipment);

        let mut tx = self.db.begin_transaction().await?;

        for (uuid, wanted) in demand.iter() {
            let Some(item) = self.catalog.get_equipment(&mut tx, uuid).await? else {
                debug!(equipment = %uuid, "requested equipment does not exist");

                return Ok(false);
            };

            let held = self
                .repository
                .units_held(&mut tx, uuid, date, start_time)
                .await?;

            if !can_hold(item.stock, held, wanted) {
                return Ok(false);
            }
        }

        tx.commit().await?;

        Ok(true)
    }

    async fn equipment_remaining(
        &self,
        equipment: EquipmentUuid,
        date: Date,
        start_time: Time,
    ) -> Result<u32, AvailabilityServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let item = self
            .catalog
            .get_equipment(&mut tx, equipment)
            .await?
            .ok_or(AvailabilityServiceError::ResourceNotFound(Resource::Equipment))?;

        let held = self
            .repository
            .units_held(&mut tx, equipment, date, start_time)
            .await?;

        tx.commit().await?;

        Ok(remaining_units(item.stock, held))
    }

    #[tracing::instrument(name = "availability.service.day_grid", skip(self), err)]
    async fn day_grid(&self, date: Date) -> Result<Vec<CourtDay>, AvailabilityServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let courts = self.catalog.list_courts(&mut tx, true).await?;
        let occupied = self.repository.occupied_starts(&mut tx, date).await?;

        tx.commit().await?;

        let grid = courts
            .into_iter()
            .map(|court| {
                let cells = day_grid_starts()
                    .filter_map(|start_time| {
                        let end_time = slot_end(start_time).ok()?;

                        Some(GridCell {
                            start_time,
                            end_time,
                            is_free: !occupied.contains(&(court.uuid, start_time)),
                        })
                    })
                    .collect();

                CourtDay { court, date, cells }
            })
            .collect();

        Ok(grid)
    }
}

#[automock]
#[async_trait]
pub trait AvailabilityService: Send + Sync {
    /// Whether the court is free at (date, start time). A court is taken when its slot is flagged
    /// booked or a confirmed reservation holds it.
    async fn is_court_free(
        &self,
        court: CourtUuid,
        date: Date,
        start_time: Time,
    ) -> Result<bool, AvailabilityServiceError>;

    /// Whether the coach is unbooked at (date, start time) and lists that start time for the
    /// date's weekday.
    async fn is_coach_free(
        &self,
        coach: CoachUuid,
        date: Date,
        start_time: Time,
    ) -> Result<bool, AvailabilityServiceError>;

    /// Whether every requested unit fits in the remaining stock at (date, start time). Repeated
    /// identities request multiple units; unknown identities are never free.
    async fn is_equipment_free(
        &self,
        equipment: Vec<EquipmentUuid>,
        date: Date,
        start_time: Time,
    ) -> Result<bool, AvailabilityServiceError>;

    /// Units of the equipment still unheld at (date, start time).
    async fn equipment_remaining(
        &self,
        equipment: EquipmentUuid,
        date: Date,
        start_time: Time,
    ) -> Result<u32, AvailabilityServiceError>;

    /// Hourly grid of every active court for the date.
    async fn day_grid(&self, date: Date) -> Result<Vec<CourtDay>, AvailabilityServiceError>;
}
