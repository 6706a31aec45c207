use clap::Args;
use courtside_app::{config::DatabaseConfig, domain::availability::AvailabilityService};
use jiff::civil::Date;

use crate::cli;

#[derive(Debug, Args)]
pub(crate) struct GridArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    /// Day to lay out (YYYY-MM-DD)
    #[arg(long)]
    date: Date,
}

pub(crate) async fn run(args: GridArgs) -> Result<(), String> {
    let context = cli::connect(&args.database).await?;
    let output = execute(context.availability.as_ref(), args.date).await?;

    println!("{output}");

    Ok(())
}

async fn execute(service: &dyn AvailabilityService, date: Date) -> Result<String, String> {
    let grid = service
        .day_grid(date)
        .await
        .map_err(|error| format!("failed to build day grid: {error}"))?;

    cli::render(&grid)
}
