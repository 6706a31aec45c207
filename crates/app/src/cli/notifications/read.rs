use clap::Args;
use courtside_app::{
    config::DatabaseConfig,
    domain::{
        notifications::{NotificationsService, models::NotificationUuid},
        users::UserUuid,
    },
};
use uuid::Uuid;

use crate::cli;

#[derive(Debug, Args)]
pub(crate) struct MarkReadArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    /// Notification UUID
    #[arg(long)]
    notification: Uuid,

    /// Owning user UUID
    #[arg(long)]
    user: Uuid,
}

pub(crate) async fn run(args: MarkReadArgs) -> Result<(), String> {
    let context = cli::connect(&args.database).await?;

    execute(
        context.notifications.as_ref(),
        args.notification.into(),
        args.user.into(),
    )
    .await?;

    println!("notification {} marked read", args.notification);

    Ok(())
}

async fn execute(
    service: &dyn NotificationsService,
    notification: NotificationUuid,
    user: UserUuid,
) -> Result<(), String> {
    let updated = service
        .mark_read(notification, user)
        .await
        .map_err(|error| format!("failed to mark notification read: {error}"))?;

    if !updated {
        return Err(format!(
            "notification {notification} not found for user {user}"
        ));
    }

    Ok(())
}
