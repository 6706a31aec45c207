//! Test context for service-level integration tests.

use courtside::{coaching::WeeklyAvailability, courts::CourtKind};
use jiff::civil::Weekday;
use rust_decimal::Decimal;

use crate::{
    database::Db,
    domain::{
        availability::PgAvailabilityService,
        catalog::{
            CatalogService, PgCatalogService,
            models::{
                CoachUuid, CourtUuid, EquipmentUuid, NewCoach, NewCourt, NewEquipment,
            },
        },
        notifications::PgNotificationsService,
        reservations::PgReservationsService,
        slots::PgSlotsService,
        waitlist::PgWaitlistService,
    },
};

use super::db::TestDb;

/// Every service over one fresh database, plus a small catalog:
///
/// - "Court A" (indoor) and "Court B" (outdoor), both active
/// - rackets: 2 units at 50.00/h, shoes: 2 units at 100.00/h
/// - a coach at 300.00/h who works Tuesdays 17:00 and 18:00 and Saturdays 10:00
///
/// No pricing rule is stored, so bookings use the built-in defaults.
pub struct TestContext {
    pub db: TestDb,
    pub catalog: PgCatalogService,
    pub slots: PgSlotsService,
    pub availability: PgAvailabilityService,
    pub reservations: PgReservationsService,
    pub waitlist: PgWaitlistService,
    pub notifications: PgNotificationsService,
    pub indoor_court: CourtUuid,
    pub outdoor_court: CourtUuid,
    pub racket: EquipmentUuid,
    pub shoes: EquipmentUuid,
    pub coach: CoachUuid,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        let catalog = PgCatalogService::new(db.clone());

        let indoor_court = create_court(&catalog, "Court A", CourtKind::Indoor).await;
        let outdoor_court = create_court(&catalog, "Court B", CourtKind::Outdoor).await;
        let racket = create_equipment(&catalog, "Racket", "Rackets", 50_00).await;
        let shoes = create_equipment(&catalog, "Court Shoes", "Footwear", 100_00).await;

        let coach = CoachUuid::new();

        catalog
            .create_coach(NewCoach {
                uuid: coach,
                name: "Alex".to_string(),
                hourly_rate: Decimal::new(300_00, 2),
                availability: WeeklyAvailability::new()
                    .with_day(Weekday::Tuesday, ["17:00", "18:00"])
                    .with_day(Weekday::Saturday, ["10:00"]),
            })
            .await
            .expect("Failed to create test coach");

        Self {
            slots: PgSlotsService::new(db.clone()),
            availability: PgAvailabilityService::new(db.clone()),
            reservations: PgReservationsService::new(db.clone()),
            waitlist: PgWaitlistService::new(db.clone()),
            notifications: PgNotificationsService::new(db),
            catalog,
            indoor_court,
            outdoor_court,
            racket,
            shoes,
            coach,
            db: test_db,
        }
    }
}

async fn create_court(catalog: &PgCatalogService, name: &str, kind: CourtKind) -> CourtUuid {
    let uuid = CourtUuid::new();

    catalog
        .create_court(NewCourt {
            uuid,
            name: name.to_string(),
            kind,
            is_active: true,
        })
        .await
        .expect("Failed to create test court");

    uuid
}

async fn create_equipment(
    catalog: &PgCatalogService,
    name: &str,
    category: &str,
    rate_minor: i64,
) -> EquipmentUuid {
    let uuid = EquipmentUuid::new();

    catalog
        .create_equipment(NewEquipment {
            uuid,
            name: name.to_string(),
            category: category.to_string(),
            stock: 2,
            hourly_rate: Decimal::new(rate_minor, 2),
        })
        .await
        .expect("Failed to create test equipment");

    uuid
}
