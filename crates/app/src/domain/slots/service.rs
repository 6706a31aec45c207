//! Slots service.

use async_trait::async_trait;
use courtside::slots::slot_end;
use jiff::civil::{Date, Time};
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        catalog::models::CourtUuid,
        slots::{
            errors::SlotsServiceError,
            models::{Slot, SlotUuid},
            repository::PgSlotsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgSlotsService {
    db: Db,
    repository: PgSlotsRepository,
}

impl PgSlotsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgSlotsRepository::new(),
        }
    }
}

#[async_trait]
impl SlotsService for PgSlotsService {
    async fn resolve_slot(
        &self,
        court: CourtUuid,
        date: Date,
        start_time: Time,
    ) -> Result<Slot, SlotsServiceError> {
        let end_time = slot_end(start_time)?;

        let mut tx = self.db.begin_transaction().await?;

        let slot = self
            .repository
            .resolve_slot(&mut tx, court, date, start_time, end_time)
            .await?;

        tx.commit().await?;

        Ok(slot)
    }

    async fn get_slot(&self, slot: SlotUuid) -> Result<Slot, SlotsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let slot = self
            .repository
            .get_slot(&mut tx, slot)
            .await?
            .ok_or(SlotsServiceError::NotFound)?;

        tx.commit().await?;

        Ok(slot)
    }
}

#[automock]
#[async_trait]
pub trait SlotsService: Send + Sync {
    /// Returns the slot for (court, date, start time), creating an unbooked one-hour slot when
    /// none exists yet.
    async fn resolve_slot(
        &self,
        court: CourtUuid,
        date: Date,
        start_time: Time,
    ) -> Result<Slot, SlotsServiceError>;

    /// Retrieve a single slot.
    async fn get_slot(&self, slot: SlotUuid) -> Result<Slot, SlotsServiceError>;
}
