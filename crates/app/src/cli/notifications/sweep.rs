use clap::Args;
use courtside_app::{config::DatabaseConfig, domain::notifications::NotificationsService};
use jiff::Timestamp;

use crate::cli;

#[derive(Debug, Args)]
pub(crate) struct SweepArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    /// Treat offers as expired relative to this instant instead of now
    #[arg(long)]
    at: Option<Timestamp>,
}

pub(crate) async fn run(args: SweepArgs) -> Result<(), String> {
    let context = cli::connect(&args.database).await?;
    let point_in_time = args.at.unwrap_or_else(Timestamp::now);

    let output = execute(context.notifications.as_ref(), point_in_time).await?;

    println!("{output}");

    Ok(())
}

async fn execute(
    service: &dyn NotificationsService,
    point_in_time: Timestamp,
) -> Result<String, String> {
    let report = service
        .promote_expired(point_in_time)
        .await
        .map_err(|error| format!("failed to sweep expired offers: {error}"))?;

    cli::render(&report)
}
