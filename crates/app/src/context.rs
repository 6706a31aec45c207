//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::DatabaseConfig,
    database::{self, Db},
    domain::{
        availability::{AvailabilityService, PgAvailabilityService},
        catalog::{CatalogService, PgCatalogService},
        notifications::{NotificationsService, PgNotificationsService},
        reservations::{PgReservationsService, ReservationsService},
        slots::{PgSlotsService, SlotsService},
        waitlist::{PgWaitlistService, WaitlistService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub slots: Arc<dyn SlotsService>,
    pub availability: Arc<dyn AvailabilityService>,
    pub reservations: Arc<dyn ReservationsService>,
    pub waitlist: Arc<dyn WaitlistService>,
    pub notifications: Arc<dyn NotificationsService>,
}

impl AppContext {
    /// Build application context from database settings.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database_url, config.max_connections)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(
            Db::new(pool).with_lock_timeout(config.lock_timeout()),
        ))
    }

    /// Wire every service over one shared pool.
    #[must_use]
    pub fn from_db(db: Db) -> Self {
        Self {
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            slots: Arc::new(PgSlotsService::new(db.clone())),
            availability: Arc::new(PgAvailabilityService::new(db.clone())),
            reservations: Arc::new(PgReservationsService::new(db.clone())),
            waitlist: Arc::new(PgWaitlistService::new(db.clone())),
            notifications: Arc::new(PgNotificationsService::new(db)),
        }
    }
}
