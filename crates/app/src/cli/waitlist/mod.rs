use clap::{Args, Subcommand};

mod join;
mod list;

#[derive(Debug, Args)]
pub(crate) struct WaitlistCommand {
    #[command(subcommand)]
    command: WaitlistSubcommand,
}

#[derive(Debug, Subcommand)]
enum WaitlistSubcommand {
    Join(join::JoinWaitlistArgs),
    List(list::ListEntriesArgs),
}

pub(crate) async fn run(command: WaitlistCommand) -> Result<(), String> {
    match command.command {
        WaitlistSubcommand::Join(args) => join::run(args).await,
        WaitlistSubcommand::List(args) => list::run(args).await,
    }
}
