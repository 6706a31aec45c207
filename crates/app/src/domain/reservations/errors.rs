//! Reservations service errors.

use courtside::{reservations::ReservationStatus, slots::SlotError};
use sqlx::{Error, error::ErrorKind};
use thiserror::Error;

use crate::domain::{Resource, catalog::models::EquipmentUuid, is_lock_contention};

/// Partial unique index admitting one confirmed reservation per slot.
const CONFIRMED_SLOT_CONSTRAINT: &str = "reservations_confirmed_slot_idx";

#[derive(Debug, Error)]
pub enum ReservationsServiceError {
    #[error("{0} not found")]
    ResourceNotFound(Resource),

    #[error("{0} is not open for booking")]
    InactiveResource(Resource),

    #[error("slot is already booked")]
    SlotAlreadyBooked,

    #[error("reservation already exists")]
    AlreadyExists,

    #[error("coach is not available at this time")]
    CoachUnavailable,

    #[error("equipment {0} is not available at this time")]
    EquipmentUnavailable(EquipmentUuid),

    #[error("reservation is {0} and cannot be cancelled")]
    NotCancellable(ReservationStatus),

    #[error(transparent)]
    InvalidSlot(#[from] SlotError),

    #[error("resource is locked by another transaction")]
    ResourceBusy,

    #[error("offer expiry is out of range")]
    InvalidTimestamp(#[from] jiff::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ReservationsServiceError {
    fn from(error: Error) -> Self {
        if is_lock_contention(&error) {
            return Self::ResourceBusy;
        }

        let slot_taken = error
            .as_database_error()
            .filter(|database_error| matches!(database_error.kind(), ErrorKind::UniqueViolation))
            .map(|database_error| database_error.constraint() == Some(CONFIRMED_SLOT_CONSTRAINT));

        match slot_taken {
            Some(true) => Self::SlotAlreadyBooked,
            Some(false) => Self::AlreadyExists,
            None => Self::Sql(error),
        }
    }
}
