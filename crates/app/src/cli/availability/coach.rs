use clap::Args;
use courtside_app::{
    config::DatabaseConfig,
    domain::{availability::AvailabilityService, catalog::models::CoachUuid},
};
use jiff::civil::{Date, Time};
use serde_json::json;
use uuid::Uuid;

use crate::cli;

#[derive(Debug, Args)]
pub(crate) struct CoachArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    /// Coach UUID
    #[arg(long)]
    coach: Uuid,

    /// Slot date (YYYY-MM-DD)
    #[arg(long)]
    date: Date,

    /// Slot start time (HH:MM)
    #[arg(long)]
    start: Time,
}

pub(crate) async fn run(args: CoachArgs) -> Result<(), String> {
    let context = cli::connect(&args.database).await?;

    let output = execute(
        context.availability.as_ref(),
        args.coach.into(),
        args.date,
        args.start,
    )
    .await?;

    println!("{output}");

    Ok(())
}

async fn execute(
    service: &dyn AvailabilityService,
    coach: CoachUuid,
    date: Date,
    start_time: Time,
) -> Result<String, String> {
    let free = service
        .is_coach_free(coach, date, start_time)
        .await
        .map_err(|error| format!("failed to check coach availability: {error}"))?;

    cli::render(&json!({
        "coach": coach,
        "date": date,
        "start_time": start_time,
        "free": free,
    }))
}

#[cfg(test)]
mod tests {
    use courtside_app::domain::{
        Resource,
        availability::{AvailabilityServiceError, MockAvailabilityService},
    };
    use jiff::civil::{date, time};

    use super::*;

    #[tokio::test]
    async fn reports_an_unknown_coach() {
        let mut service = MockAvailabilityService::new();
        service
            .expect_is_coach_free()
            .returning(|_, _, _| Err(AvailabilityServiceError::ResourceNotFound(Resource::Coach)));

        let result = execute(
            &service,
            CoachUuid::new(),
            date(2025, 12, 16),
            time(17, 0, 0, 0),
        )
        .await;

        assert_eq!(
            result,
            Err("failed to check coach availability: coach not found".to_string())
        );
    }
}
