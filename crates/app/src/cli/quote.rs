use clap::Args;
use courtside_app::{
    config::DatabaseConfig,
    domain::reservations::{ReservationsService, models::QuoteRequest},
};
use jiff::civil::{Date, Time};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
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

    /// Equipment UUID; repeat to price several units
    #[arg(long = "equipment")]
    equipment: Vec<Uuid>,

    /// Optional coach UUID
    #[arg(long)]
    coach: Option<Uuid>,
}

pub(crate) async fn run(args: QuoteArgs) -> Result<(), String> {
    let context = super::connect(&args.database).await?;

    let request = QuoteRequest {
        court: args.court.into(),
        date: args.date,
        start_time: args.start,
        equipment: args.equipment.into_iter().map(Into::into).collect(),
        coach: args.coach.map(Into::into),
    };

    let output = execute(context.reservations.as_ref(), request).await?;

    println!("{output}");

    Ok(())
}

async fn execute(
    service: &dyn ReservationsService,
    request: QuoteRequest,
) -> Result<String, String> {
    let quote = service
        .quote(request)
        .await
        .map_err(|error| format!("failed to quote: {error}"))?;

    super::render(&quote)
}

#[cfg(test)]
mod tests {
    use courtside::{
        courts::CourtKind,
        pricing::{PricingRule, compute_breakdown},
    };
    use courtside_app::domain::reservations::{MockReservationsService, models::PriceQuote};
    use jiff::civil::{date, time};
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn renders_the_itemised_breakdown() -> TestResult {
        let request = QuoteRequest {
            court: Uuid::now_v7().into(),
            date: date(2025, 12, 16),
            start_time: time(18, 0, 0, 0),
            equipment: Vec::new(),
            coach: None,
        };

        let mut service = MockReservationsService::new();
        service.expect_quote().times(1).returning(|request| {
            let rule = PricingRule::default();
            let breakdown = compute_breakdown(
                &rule,
                CourtKind::Indoor,
                request.date,
                request.start_time,
                &[],
                None,
            );

            Ok(PriceQuote {
                court: request.court,
                date: request.date,
                start_time: request.start_time,
                rule_name: rule.name,
                breakdown,
            })
        });

        let output = execute(&service, request).await?;

        assert!(output.contains("\"1050.00\""), "missing total in {output}");
        assert!(output.contains("\"peak_surcharge\""), "missing items in {output}");

        Ok(())
    }
}
