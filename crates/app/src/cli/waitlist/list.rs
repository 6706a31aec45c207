use clap::Args;
use courtside_app::{
    config::DatabaseConfig,
    domain::{users::UserUuid, waitlist::WaitlistService},
};
use uuid::Uuid;

use crate::cli;

#[derive(Debug, Args)]
pub(crate) struct ListEntriesArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    /// User UUID whose entries should be listed
    #[arg(long)]
    user: Uuid,
}

pub(crate) async fn run(args: ListEntriesArgs) -> Result<(), String> {
    let context = cli::connect(&args.database).await?;
    let output = execute(context.waitlist.as_ref(), args.user.into()).await?;

    println!("{output}");

    Ok(())
}

async fn execute(service: &dyn WaitlistService, user: UserUuid) -> Result<String, String> {
    let entries = service
        .list_entries(user)
        .await
        .map_err(|error| format!("failed to list waitlist entries: {error}"))?;

    cli::render(&entries)
}

#[cfg(test)]
mod tests {
    use courtside_app::domain::waitlist::MockWaitlistService;
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn renders_an_empty_list() -> TestResult {
        let user = UserUuid::new();

        let mut service = MockWaitlistService::new();
        service
            .expect_list_entries()
            .withf(move |candidate| *candidate == user)
            .times(1)
            .returning(|_| Ok(Vec::new()));

        assert_eq!(execute(&service, user).await?, "[]");

        Ok(())
    }
}
