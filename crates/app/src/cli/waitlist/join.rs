use clap::Args;
use courtside_app::{
    config::DatabaseConfig,
    domain::waitlist::{WaitlistService, models::NewWaitlistEntry},
};
use jiff::civil::{Date, Time};
use uuid::Uuid;

use crate::cli;

#[derive(Debug, Args)]
pub(crate) struct JoinWaitlistArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    /// Waiting user UUID
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
}

pub(crate) async fn run(args: JoinWaitlistArgs) -> Result<(), String> {
    let context = cli::connect(&args.database).await?;

    let entry = NewWaitlistEntry {
        uuid: Uuid::now_v7().into(),
        user: args.user.into(),
        court: args.court.into(),
        date: args.date,
        start_time: args.start,
    };

    let output = execute(context.waitlist.as_ref(), entry).await?;

    println!("{output}");

    Ok(())
}

async fn execute(service: &dyn WaitlistService, entry: NewWaitlistEntry) -> Result<String, String> {
    let entry = service
        .join(entry)
        .await
        .map_err(|error| format!("failed to join waitlist: {error}"))?;

    cli::render(&entry)
}
