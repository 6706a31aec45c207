use clap::Args;
use courtside_app::{
    config::DatabaseConfig,
    domain::{availability::AvailabilityService, catalog::models::CourtUuid},
};
use jiff::civil::{Date, Time};
use serde_json::json;
use uuid::Uuid;

use crate::cli;

#[derive(Debug, Args)]
pub(crate) struct CourtArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    /// Court UUID
    #[arg(long)]
    court: Uuid,

    /// Slot date (YYYY-MM-DD)
    #[arg(long)]
    date: Date,

    /// Slot start time (HH:MM)
    #[arg(long)]
    start: Time,
}

pub(crate) async fn run(args: CourtArgs) -> Result<(), String> {
    let context = cli::connect(&args.database).await?;

    let output = execute(
        context.availability.as_ref(),
        args.court.into(),
        args.date,
        args.start,
    )
    .await?;

    println!("{output}");

    Ok(())
}

async fn execute(
    service: &dyn AvailabilityService,
    court: CourtUuid,
    date: Date,
    start_time: Time,
) -> Result<String, String> {
    let free = service
        .is_court_free(court, date, start_time)
        .await
        .map_err(|error| format!("failed to check court availability: {error}"))?;

    cli::render(&json!({
        "court": court,
        "date": date,
        "start_time": start_time,
        "free": free,
    }))
}

#[cfg(test)]
mod tests {
    use courtside_app::domain::availability::MockAvailabilityService;
    use jiff::civil::{date, time};
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn renders_a_taken_court() -> TestResult {
        let court = CourtUuid::new();

        let mut service = MockAvailabilityService::new();
        service
            .expect_is_court_free()
            .withf(move |candidate, _, start| {
                *candidate == court && *start == time(18, 0, 0, 0)
            })
            .times(1)
            .returning(|_, _, _| Ok(false));

        let output = execute(&service, court, date(2025, 12, 16), time(18, 0, 0, 0)).await?;

        assert!(output.contains("\"free\": false"), "missing flag in {output}");

        Ok(())
    }
}
