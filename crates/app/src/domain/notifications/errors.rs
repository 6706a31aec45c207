//! Notifications service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{Resource, is_lock_contention};

#[derive(Debug, Error)]
pub enum NotificationsServiceError {
    #[error("{0} not found")]
    ResourceNotFound(Resource),

    #[error("resource is locked by another transaction")]
    ResourceBusy,

    #[error("offer expiry is out of range")]
    InvalidTimestamp(#[from] jiff::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for NotificationsServiceError {
    fn from(error: Error) -> Self {
        if is_lock_contention(&error) {
            return Self::ResourceBusy;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::ResourceNotFound(Resource::Slot),
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
