use clap::Args;
use courtside_app::{
    config::DatabaseConfig,
    domain::reservations::{ReservationsService, models::NewReservation},
};
use jiff::civil::{Date, Time};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ReserveArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    /// Booking user UUID
    #[arg(long)]
    user: Uuid,

    /// Court UUID
    #[arg(long)]
    court: Uuid,

    /// Slot date (YYYY-MM-DD)
    #[arg(long)]
    date: Date,

    /// Slot start time (HH:MM)
    #[arg(long)]
    start: Time,

    /// Equipment UUID; repeat to hold several units
    #[arg(long = "equipment")]
    equipment: Vec<Uuid>,

    /// Optional coach UUID
    #[arg(long)]
    coach: Option<Uuid>,

    /// Optional reservation UUID; generated when omitted
    #[arg(long)]
    reservation_uuid: Option<Uuid>,
}

impl ReserveArgs {
    fn request(&self) -> NewReservation {
        NewReservation {
            uuid: self.reservation_uuid.unwrap_or_else(Uuid::now_v7).into(),
            user: self.user.into(),
            court: self.court.into(),
            date: self.date,
            start_time: self.start,
            equipment: self.equipment.iter().copied().map(Into::into).collect(),
            coach: self.coach.map(Into::into),
        }
    }
}

pub(crate) async fn run(args: ReserveArgs) -> Result<(), String> {
    let context = super::connect(&args.database).await?;
    let output = execute(context.reservations.as_ref(), args.request()).await?;

    println!("{output}");

    Ok(())
}

async fn execute(
    service: &dyn ReservationsService,
    request: NewReservation,
) -> Result<String, String> {
    let reservation = service
        .reserve(request)
        .await
        .map_err(|error| format!("failed to reserve: {error}"))?;

    super::render(&reservation)
}

#[cfg(test)]
mod tests {
    use courtside_app::domain::reservations::{
        MockReservationsService, ReservationsServiceError,
    };
    use jiff::civil::{date, time};
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::cli::fixtures;

    use super::*;

    fn request() -> NewReservation {
        NewReservation {
            uuid: Uuid::now_v7().into(),
            user: Uuid::now_v7().into(),
            court: Uuid::now_v7().into(),
            date: date(2025, 12, 16),
            start_time: time(18, 0, 0, 0),
            equipment: Vec::new(),
            coach: None,
        }
    }

    #[tokio::test]
    async fn renders_the_confirmed_reservation() -> TestResult {
        let request = request();
        let uuid = request.uuid;

        let mut service = MockReservationsService::new();
        service
            .expect_reserve()
            .withf(move |candidate| candidate.uuid == uuid)
            .times(1)
            .returning(|candidate| Ok(fixtures::confirmed(&candidate, Decimal::new(1050_00, 2))));

        let output = execute(&service, request).await?;

        assert!(output.contains(&uuid.to_string()), "missing uuid in {output}");
        assert!(output.contains("\"1050.00\""), "missing total in {output}");
        assert!(output.contains("CONFIRMED"), "missing status in {output}");

        Ok(())
    }

    #[tokio::test]
    async fn reports_a_taken_slot() {
        let mut service = MockReservationsService::new();
        service
            .expect_reserve()
            .returning(|_| Err(ReservationsServiceError::SlotAlreadyBooked));

        let result = execute(&service, request()).await;

        assert!(
            matches!(&result, Err(message) if message == "failed to reserve: slot is already booked"),
            "expected slot taken, got {result:?}"
        );
    }

    #[test]
    fn repeated_equipment_flags_request_several_units() -> Result<(), clap::Error> {
        use clap::Parser;

        #[derive(Debug, Parser)]
        struct Harness {
            #[command(flatten)]
            args: ReserveArgs,
        }

        let racket = Uuid::now_v7();
        let harness = Harness::try_parse_from([
            "reserve".to_string(),
            "--database-url".to_string(),
            "postgres://localhost/courtside".to_string(),
            "--user".to_string(),
            Uuid::now_v7().to_string(),
            "--court".to_string(),
            Uuid::now_v7().to_string(),
            "--date".to_string(),
            "2025-12-16".to_string(),
            "--start".to_string(),
            "18:00".to_string(),
            "--equipment".to_string(),
            racket.to_string(),
            "--equipment".to_string(),
            racket.to_string(),
        ])?;

        let request = harness.args.request();

        assert_eq!(request.equipment.len(), 2);
        assert!(request.equipment.iter().all(|uuid| uuid.into_uuid() == racket));

        Ok(())
    }
}
