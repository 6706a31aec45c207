//! Slots service errors.

use courtside::slots::SlotError;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::is_lock_contention;

#[derive(Debug, Error)]
pub enum SlotsServiceError {
    #[error("slot not found")]
    NotFound,

    #[error("court not found")]
    InvalidReference,

    #[error(transparent)]
    InvalidSlot(#[from] SlotError),

    #[error("resource is locked by another transaction")]
    ResourceBusy,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for SlotsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if is_lock_contention(&error) {
            return Self::ResourceBusy;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
