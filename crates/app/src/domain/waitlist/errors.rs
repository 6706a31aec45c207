//! Waitlist service errors.

use courtside::slots::SlotError;
use sqlx::{Error, error::ErrorKind};
use thiserror::Error;

use crate::domain::{Resource, is_lock_contention};

/// One entry per user and slot.
const USER_SLOT_CONSTRAINT: &str = "waitlist_entries_user_slot_key";

#[derive(Debug, Error)]
pub enum WaitlistServiceError {
    #[error("{0} not found")]
    ResourceNotFound(Resource),

    #[error("slot is free; book it instead of waiting")]
    SlotNotBooked,

    #[error("user is already waiting for this slot")]
    DuplicateWaitlistEntry,

    #[error("waitlist entry already exists")]
    AlreadyExists,

    #[error(transparent)]
    InvalidSlot(#[from] SlotError),

    #[error("resource is locked by another transaction")]
    ResourceBusy,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for WaitlistServiceError {
    fn from(error: Error) -> Self {
        if is_lock_contention(&error) {
            return Self::ResourceBusy;
        }

        let duplicate = error
            .as_database_error()
            .filter(|database_error| matches!(database_error.kind(), ErrorKind::UniqueViolation))
            .map(|database_error| database_error.constraint() == Some(USER_SLOT_CONSTRAINT));

        match duplicate {
            Some(true) => Self::DuplicateWaitlistEntry,
            Some(false) => Self::AlreadyExists,
            None => Self::Sql(error),
        }
    }
}
