use clap::Args;
use courtside_app::{
    config::DatabaseConfig,
    domain::{notifications::NotificationsService, users::UserUuid},
};
use jiff::Timestamp;
use uuid::Uuid;

use crate::cli;

#[derive(Debug, Args)]
pub(crate) struct ListNotificationsArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    /// Recipient user UUID
    #[arg(long)]
    user: Uuid,

    /// Evaluate expiry at this instant instead of now
    #[arg(long)]
    at: Option<Timestamp>,
}

pub(crate) async fn run(args: ListNotificationsArgs) -> Result<(), String> {
    let context = cli::connect(&args.database).await?;
    let point_in_time = args.at.unwrap_or_else(Timestamp::now);

    let output = execute(
        context.notifications.as_ref(),
        args.user.into(),
        point_in_time,
    )
    .await?;

    println!("{output}");

    Ok(())
}

async fn execute(
    service: &dyn NotificationsService,
    user: UserUuid,
    point_in_time: Timestamp,
) -> Result<String, String> {
    let notifications = service
        .list(user, point_in_time)
        .await
        .map_err(|error| format!("failed to list notifications: {error}"))?;

    cli::render(&notifications)
}
