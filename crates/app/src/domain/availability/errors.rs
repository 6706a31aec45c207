//! Availability service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::{Resource, is_lock_contention};

#[derive(Debug, Error)]
pub enum AvailabilityServiceError {
    #[error("{0} not found")]
    ResourceNotFound(Resource),

    #[error("resource is locked by another transaction")]
    ResourceBusy,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AvailabilityServiceError {
    fn from(error: Error) -> Self {
        if is_lock_contention(&error) {
            return Self::ResourceBusy;
        }

        Self::Sql(error)
    }
}
